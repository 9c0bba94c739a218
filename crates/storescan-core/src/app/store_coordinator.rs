//! Store Coordinator
//!
//! 1 店舗を担当する。`Store<id>` 直下のサブディレクトリごとに subcategory coordinator を
//! blocking pool 上で起動し、全部待ってから終わる。
//!
//! - ディレクトリ以外のエントリは無視
//! - `max_subcategories` を超えた分は黙って無視（エラーではない）
//! - 店舗ディレクトリが読めなければこの店舗だけが異常終了（fatal-local）

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::app::context::RunContext;
use crate::app::subcategory_coordinator::{self, SubcategoryScan};
use crate::domain::{CoordinatorError, StoreId};

type SubcategoryUnit = JoinHandle<Result<SubcategoryScan, CoordinatorError>>;

/// Scan every subcategory of `store`; returns how many were launched.
pub async fn run(ctx: Arc<RunContext>, store: StoreId) -> Result<usize, CoordinatorError> {
    let store_dir = ctx.layout.store_dir(store);
    debug!(%store, path = %store_dir.display(), "store coordinator started");

    let mut entries = tokio::fs::read_dir(&store_dir)
        .await
        .map_err(|source| CoordinatorError::StoreDirectory {
            store,
            path: store_dir.clone(),
            source,
        })?;

    let mut units: Vec<SubcategoryUnit> = Vec::new();
    loop {
        if units.len() >= ctx.limits.max_subcategories {
            debug!(%store, limit = ctx.limits.max_subcategories, "subcategory limit reached; remaining entries ignored");
            break;
        }
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(err) => {
                warn!(%store, error = %err, "store directory listing stopped early");
                break;
            }
        };

        let path = entry.path();
        // stat はシンボリックリンクを辿る
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => continue,
            Err(err) => {
                warn!(%store, path = %path.display(), error = %err, "cannot stat subcategory path");
                continue;
            }
        }

        let ctx = Arc::clone(&ctx);
        units.push(tokio::task::spawn_blocking(move || {
            subcategory_coordinator::run(&ctx, store, &path)
        }));
    }

    let launched = units.len();
    for unit in units {
        match unit.await {
            Ok(Ok(_scan)) => ctx.tally.subcategory_scanned(),
            Ok(Err(err)) => {
                warn!(%store, error = %err, "subcategory coordinator terminated abnormally");
                ctx.tally.subcategory_failed();
            }
            Err(err) => {
                warn!(%store, error = %err, "subcategory coordinator panicked");
                ctx.tally.subcategory_failed();
            }
        }
    }

    debug!(%store, launched, "store coordinator finished");
    Ok(launched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::context::testing::{context, write_entry};

    fn store(id: u16) -> StoreId {
        StoreId::new(id).unwrap()
    }

    #[tokio::test]
    async fn scans_every_subcategory_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store_dir = dir.path().join("Store1");
        write_entry(&store_dir.join("A"), "w.txt", "Widget", 10.0, 0.8);
        write_entry(&store_dir.join("B"), "w.txt", "Widget", 1.0, 1.0);
        std::fs::write(store_dir.join("README"), "not a subcategory").unwrap();
        let (ctx, _log) = context(dir.path(), &[("Widget", 2)]);

        let launched = run(Arc::clone(&ctx), store(1)).await.unwrap();

        assert_eq!(launched, 2);
        assert!((ctx.aggregate.store_total(store(1)).unwrap() - 18.0).abs() < 1e-9);
        assert_eq!(ctx.tally.snapshot().subcategories_scanned, 2);
    }

    #[tokio::test]
    async fn excess_subcategories_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["A", "B", "C"] {
            write_entry(&dir.path().join("Store1").join(name), "w.txt", "Widget", 1.0, 1.0);
        }
        let (ctx, _log) = context(dir.path(), &[("Widget", 1)]);
        let ctx = Arc::new(RunContext {
            limits: crate::app::FanoutLimits {
                max_subcategories: 2,
                max_entries_per_subcategory: 100,
            },
            ..Arc::into_inner(ctx).unwrap()
        });

        let launched = run(Arc::clone(&ctx), store(1)).await.unwrap();

        assert_eq!(launched, 2);
        assert_eq!(ctx.aggregate.store_total(store(1)).unwrap(), 2.0);
    }

    #[tokio::test]
    async fn missing_store_directory_is_fatal_local() {
        let dir = tempfile::tempdir().unwrap();
        let (ctx, _log) = context(dir.path(), &[("Widget", 1)]);

        let err = run(ctx, store(3)).await.unwrap_err();
        assert!(matches!(err, CoordinatorError::StoreDirectory { .. }));
    }
}
