//! OrchestratorBuilder - Orchestrator の構築とワイヤリング
//!
//! # Fail-fast 設計
//! - 設定の検証（0 件の上限などを拒否）
//! - 買い物リストとアクティビティログは必須
//! - 品目数が 0 または capacity 超過なら fan-out 前に BuildError
//! - decoder / clock は省略時に既定の実装を使う

use std::sync::Arc;

use crate::aggregate::SharedAggregate;
use crate::app::context::{FanoutLimits, RunContext};
use crate::app::orchestrator::Orchestrator;
use crate::config::EvaluationConfig;
use crate::domain::ShoppingList;
use crate::impls::TextCatalogDecoder;
use crate::layout::CatalogLayout;
use crate::observability::Tally;
use crate::ports::{ActivityLog, CatalogDecoder, Clock, IdGenerator, SystemClock, UlidGenerator};

/// BuildError は Orchestrator 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("missing component: {0}. It must be provided before build().")]
    Missing(&'static str),

    #[error("shopping list holds {count} items; expected 1..={capacity}")]
    ItemCount { count: usize, capacity: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// # 使用例
/// ```ignore
/// let orchestrator = Orchestrator::builder(config)
///     .shopping_list(list)
///     .activity_log(log)
///     .build()?;
/// ```
pub struct OrchestratorBuilder {
    config: EvaluationConfig,
    shopping_list: Option<ShoppingList>,
    activity_log: Option<Arc<dyn ActivityLog>>,
    decoder: Option<Arc<dyn CatalogDecoder>>,
    clock: Arc<dyn Clock>,
}

impl OrchestratorBuilder {
    pub fn new(config: EvaluationConfig) -> Self {
        Self {
            config,
            shopping_list: None,
            activity_log: None,
            decoder: None,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn shopping_list(mut self, list: ShoppingList) -> Self {
        self.shopping_list = Some(list);
        self
    }

    pub fn activity_log(mut self, log: Arc<dyn ActivityLog>) -> Self {
        self.activity_log = Some(log);
        self
    }

    pub fn decoder(mut self, decoder: Arc<dyn CatalogDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Result<Orchestrator, BuildError> {
        self.config
            .validate()
            .map_err(|e| BuildError::InvalidConfig(e.to_string()))?;

        let list = self.shopping_list.ok_or(BuildError::Missing("shopping list"))?;
        let log = self.activity_log.ok_or(BuildError::Missing("activity log"))?;
        let capacity = self.config.max_items;
        if list.is_empty() || list.len() > capacity {
            return Err(BuildError::ItemCount {
                count: list.len(),
                capacity,
            });
        }

        let decoder: Arc<dyn CatalogDecoder> = match self.decoder {
            Some(decoder) => decoder,
            None => Arc::new(TextCatalogDecoder::new(self.config.max_name_len)),
        };
        let ids: Arc<dyn IdGenerator> = Arc::new(UlidGenerator::new(Arc::clone(&self.clock)));

        let ctx = RunContext {
            run_id: ids.generate_run_id(),
            layout: CatalogLayout::new(self.config.catalog_root.clone()),
            limits: FanoutLimits {
                max_subcategories: self.config.max_subcategories,
                max_entries_per_subcategory: self.config.max_entries_per_subcategory,
            },
            aggregate: Arc::new(SharedAggregate::new(list, self.config.store_count)),
            log,
            decoder,
            ids,
            tally: Tally::default(),
        };
        Ok(Orchestrator::new(ctx, self.config.store_count))
    }
}
