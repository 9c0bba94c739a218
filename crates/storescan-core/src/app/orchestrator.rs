//! Orchestrator - 評価パイプラインの最上位
//!
//! 1. カタログルートを確認（読めなければ fatal-setup）
//! 2. 店舗ごとに store coordinator を起動し、全部の終了を待つ（barrier）
//! 3. barrier 後に店舗別合計を読む。この読み取りに Gate の競合はない
//! 4. 選択された店舗の合計を selected にコピーし、finalization を走らせる

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::aggregate::{AggregateError, Selection, SharedAggregate};
use crate::app::builder::OrchestratorBuilder;
use crate::app::context::RunContext;
use crate::app::finalization::{self, FinalizationReport};
use crate::app::store_coordinator;
use crate::config::EvaluationConfig;
use crate::domain::{CoordinatorError, FinalizationError, RunId, SetupError, StoreId};
use crate::observability::EvaluationReport;
use crate::ports::{ActivityLog, Prompt};

type StoreUnit = JoinHandle<Result<usize, CoordinatorError>>;

pub struct Orchestrator {
    ctx: Arc<RunContext>,
    store_count: usize,
}

impl Orchestrator {
    pub(crate) fn new(ctx: RunContext, store_count: usize) -> Self {
        Self {
            ctx: Arc::new(ctx),
            store_count,
        }
    }

    pub fn builder(config: EvaluationConfig) -> OrchestratorBuilder {
        OrchestratorBuilder::new(config)
    }

    pub fn run_id(&self) -> RunId {
        self.ctx.run_id
    }

    pub fn aggregate(&self) -> &Arc<SharedAggregate> {
        &self.ctx.aggregate
    }

    pub fn activity_log(&self) -> &Arc<dyn ActivityLog> {
        &self.ctx.log
    }

    /// Scan every store concurrently and return the final totals.
    ///
    /// A store whose directory cannot be read ends on its own; its total stays
    /// at whatever it reached (usually 0) and the others are unaffected.
    pub async fn evaluate(&self) -> Result<EvaluationReport, SetupError> {
        let root = self.ctx.layout.root().to_path_buf();
        let meta = tokio::fs::metadata(&root)
            .await
            .map_err(|source| SetupError::CatalogRoot {
                path: root.clone(),
                source,
            })?;
        if !meta.is_dir() {
            return Err(SetupError::CatalogRootNotDirectory(root));
        }
        let _entries = tokio::fs::read_dir(&root)
            .await
            .map_err(|source| SetupError::CatalogRoot {
                path: root.clone(),
                source,
            })?;

        info!(run_id = %self.ctx.run_id, stores = self.store_count, root = %root.display(), "evaluation started");

        let units: Vec<(StoreId, StoreUnit)> = StoreId::all(self.store_count)
            .map(|store| {
                let ctx = Arc::clone(&self.ctx);
                (store, tokio::spawn(store_coordinator::run(ctx, store)))
            })
            .collect();

        for (store, unit) in units {
            match unit.await {
                Ok(Ok(launched)) => {
                    info!(%store, subcategories = launched, "store coordinator finished");
                    self.ctx.tally.store_completed();
                }
                Ok(Err(err)) => {
                    warn!(%store, error = %err, "store coordinator terminated abnormally");
                    self.ctx.tally.store_failed();
                }
                Err(err) => {
                    warn!(%store, error = %err, "store coordinator panicked");
                    self.ctx.tally.store_failed();
                }
            }
        }

        let totals = self.ctx.aggregate.store_totals();
        for t in &totals {
            info!(store = %t.store, total = t.total, "store total");
            self.ctx
                .log
                .record(&format!("Store {} Total Score: {:.2}", t.store, t.total));
        }

        Ok(EvaluationReport {
            totals,
            counts: self.ctx.tally.snapshot(),
        })
    }

    pub fn select(&self, store: StoreId) -> Result<Selection, AggregateError> {
        let selection = self.ctx.aggregate.select(store)?;
        info!(%store, total = selection.total, "store selected");
        self.ctx
            .log
            .record(&format!("User selected Store {store} for purchase."));
        Ok(selection)
    }

    /// Run the finalization pipeline against the selected store.
    pub async fn finalize(
        &self,
        ceiling: Option<f64>,
        prompt: Box<dyn Prompt>,
    ) -> Result<(FinalizationReport, Box<dyn Prompt>), FinalizationError> {
        finalization::run(
            Arc::clone(&self.ctx.aggregate),
            Arc::clone(&self.ctx.log),
            ceiling,
            prompt,
        )
        .await
    }
}
