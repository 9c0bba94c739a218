//! Worker - Product Valuation Worker
//!
//! # フロー
//! 1. カタログエントリをデコード（Gate の外で I/O）
//! 2. 買い物リストと大文字小文字を無視して照合
//! 3. 一致ごとにアクティビティログを 1 行
//! 4. Gate の中で店舗合計に `price × score × quantity` を加算し、
//!    品目の Rating が未設定なら設定する
//!
//! デコード失敗は寄与なしで終了するだけ（recoverable-skip）。

use std::path::Path;

use tracing::{debug, warn};

use crate::app::context::RunContext;
use crate::domain::StoreId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerOutcome {
    Skipped,
    Contributed { matches: usize },
}

/// Evaluate one catalog entry for `store`.
pub fn evaluate_entry(ctx: &RunContext, store: StoreId, entry: &Path) -> WorkerOutcome {
    let worker_id = ctx.ids.generate_worker_id();

    let record = match ctx.decoder.decode(entry) {
        Ok(record) => record,
        Err(err) => {
            warn!(%worker_id, %store, error = %err, "catalog entry skipped");
            ctx.tally.entry_skipped();
            return WorkerOutcome::Skipped;
        }
    };
    ctx.tally.entry_decoded();

    // O(items) の単純な線形照合
    let matched = ctx.aggregate.matching_items(&record.name);
    for item in &matched {
        ctx.log.record(&format!(
            "Worker {worker_id} (PID: {}, {}, Store {store}) read product '{}' with Price: {:.2} and Score: {:.2}",
            std::process::id(),
            ctx.run_id,
            record.name,
            record.price,
            record.score,
        ));

        match ctx.aggregate.fold(store, item.index, &record) {
            Ok(fold) => {
                ctx.tally.matched();
                debug!(
                    %worker_id,
                    %store,
                    item = %item.name,
                    added = fold.added,
                    first_score = fold.first_score,
                    "contribution folded"
                );
            }
            Err(err) => warn!(%worker_id, %store, error = %err, "contribution rejected"),
        }
    }

    WorkerOutcome::Contributed {
        matches: matched.len(),
    }
}
