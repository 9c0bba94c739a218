//! Subcategory Coordinator
//!
//! 1 つの (store, subcategory) を担当する。エントリごとに worker スレッドを 1 本起動し、
//! 全部 join してから終わる。
//!
//! - ディレクトリが読めなければこの coordinator だけが異常終了（fatal-local）
//! - spawn に失敗したエントリはログを出して飛ばす（再試行しない）
//! - worker の panic は join で観測してログに残すだけ

use std::fs;
use std::path::Path;
use std::thread;

use tracing::{debug, warn};

use crate::app::context::RunContext;
use crate::app::worker::{self, WorkerOutcome};
use crate::domain::{CoordinatorError, StoreId};

/// Summary of one subcategory scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubcategoryScan {
    pub spawned: usize,
    pub contributed: usize,
    pub abnormal: usize,
}

pub fn run(ctx: &RunContext, store: StoreId, dir: &Path) -> Result<SubcategoryScan, CoordinatorError> {
    debug!(%store, path = %dir.display(), "subcategory coordinator started");

    // read_dir は "." と ".." を返さない
    let entries = fs::read_dir(dir).map_err(|source| CoordinatorError::SubcategoryDirectory {
        store,
        path: dir.to_path_buf(),
        source,
    })?;
    let limit = ctx.limits.max_entries_per_subcategory;

    let scan = thread::scope(|scope| {
        let mut workers = Vec::new();
        for entry in entries {
            if workers.len() >= limit {
                debug!(%store, path = %dir.display(), limit, "worker limit reached; remaining entries ignored");
                break;
            }
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(err) => {
                    warn!(%store, error = %err, "unreadable directory entry skipped");
                    ctx.tally.entry_skipped();
                    continue;
                }
            };

            let spawned = thread::Builder::new()
                .name(format!("valuation-s{store}"))
                .spawn_scoped(scope, move || worker::evaluate_entry(ctx, store, &path));
            match spawned {
                Ok(handle) => {
                    ctx.tally.entry_spawned();
                    workers.push(handle);
                }
                Err(err) => {
                    warn!(%store, error = %err, "failed to spawn valuation worker; entry skipped");
                    ctx.tally.entry_skipped();
                }
            }
        }

        let mut scan = SubcategoryScan {
            spawned: workers.len(),
            ..SubcategoryScan::default()
        };
        for handle in workers {
            match handle.join() {
                Ok(WorkerOutcome::Contributed { .. }) => scan.contributed += 1,
                Ok(WorkerOutcome::Skipped) => {}
                Err(_) => {
                    warn!(%store, "valuation worker terminated abnormally");
                    scan.abnormal += 1;
                }
            }
        }
        scan
    });

    debug!(%store, path = %dir.display(), spawned = scan.spawned, "subcategory coordinator finished");
    Ok(scan)
}
