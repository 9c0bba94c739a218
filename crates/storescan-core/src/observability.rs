//! Observability - 評価フェーズのカウンタ
//!
//! どのエントリが失敗したかは上位に伝えない。件数だけを数える。

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use crate::aggregate::StoreTotal;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationCounts {
    pub stores_completed: usize,
    pub stores_failed: usize,
    pub subcategories_scanned: usize,
    pub subcategories_failed: usize,
    pub entries_spawned: usize,
    pub entries_decoded: usize,
    pub entries_skipped: usize,
    pub matches: usize,
}

/// Lock-free counters bumped from every tier.
#[derive(Debug, Default)]
pub struct Tally {
    stores_completed: AtomicUsize,
    stores_failed: AtomicUsize,
    subcategories_scanned: AtomicUsize,
    subcategories_failed: AtomicUsize,
    entries_spawned: AtomicUsize,
    entries_decoded: AtomicUsize,
    entries_skipped: AtomicUsize,
    matches: AtomicUsize,
}

impl Tally {
    pub fn store_completed(&self) {
        self.stores_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn store_failed(&self) {
        self.stores_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn subcategory_scanned(&self) {
        self.subcategories_scanned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn subcategory_failed(&self) {
        self.subcategories_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn entry_spawned(&self) {
        self.entries_spawned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn entry_decoded(&self) {
        self.entries_decoded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn entry_skipped(&self) {
        self.entries_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn matched(&self) {
        self.matches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> EvaluationCounts {
        EvaluationCounts {
            stores_completed: self.stores_completed.load(Ordering::Relaxed),
            stores_failed: self.stores_failed.load(Ordering::Relaxed),
            subcategories_scanned: self.subcategories_scanned.load(Ordering::Relaxed),
            subcategories_failed: self.subcategories_failed.load(Ordering::Relaxed),
            entries_spawned: self.entries_spawned.load(Ordering::Relaxed),
            entries_decoded: self.entries_decoded.load(Ordering::Relaxed),
            entries_skipped: self.entries_skipped.load(Ordering::Relaxed),
            matches: self.matches.load(Ordering::Relaxed),
        }
    }
}

/// Final per-store totals plus the counters, read after the join barrier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub totals: Vec<StoreTotal>,
    pub counts: EvaluationCounts,
}

impl EvaluationReport {
    pub fn total_for(&self, store: crate::domain::StoreId) -> Option<f64> {
        self.totals
            .iter()
            .find(|t| t.store == store)
            .map(|t| t.total)
    }
}
