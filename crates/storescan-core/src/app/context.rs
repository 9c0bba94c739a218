//! RunContext - 1 回の実行で全 tier が共有するもの
//!
//! Orchestrator が作り、`Arc<RunContext>` として store / subcategory / worker に渡す。

use std::sync::Arc;

use crate::aggregate::SharedAggregate;
use crate::domain::RunId;
use crate::layout::CatalogLayout;
use crate::observability::Tally;
use crate::ports::{ActivityLog, CatalogDecoder, IdGenerator};

/// Capacity bounds of the fan-out tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanoutLimits {
    pub max_subcategories: usize,
    pub max_entries_per_subcategory: usize,
}

pub struct RunContext {
    pub run_id: RunId,
    pub layout: CatalogLayout,
    pub limits: FanoutLimits,
    pub aggregate: Arc<SharedAggregate>,
    pub log: Arc<dyn ActivityLog>,
    pub decoder: Arc<dyn CatalogDecoder>,
    pub ids: Arc<dyn IdGenerator>,
    pub tally: Tally,
}
