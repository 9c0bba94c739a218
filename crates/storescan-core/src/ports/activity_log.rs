//! ActivityLog port - 追記専用のアクティビティログ
//!
//! 1 回の `append` で 1 行、タイムスタンプ付きで追記する。
//! 実装は呼び出し元すべて（全 tier の全スレッド）を 1 つの Gate で直列化すること。

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("cannot write activity log {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot relocate activity log {from} -> {to}: {source}")]
    Relocate {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub trait ActivityLog: Send + Sync {
    /// Append one timestamp-prefixed line.
    fn append(&self, line: &str) -> Result<(), LogError>;

    /// `append` for callers that only report failures (workers, finalization tasks).
    fn record(&self, line: &str) {
        if let Err(err) = self.append(line) {
            tracing::warn!(error = %err, "activity log append failed");
        }
    }
}
