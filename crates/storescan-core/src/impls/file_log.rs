//! FileActivityLog - ファイルへの追記専用ログ
//!
//! # 実装詳細
//! - 追記ごとにファイルを開いて閉じる（途中で移動しても次の追記は新しい場所へ）
//! - 現在のパスは Gate に入れてあり、追記と移動は同じ Gate で直列化される
//! - 1 つのインスタンスを `Arc` で全 tier に配るので、兄弟 coordinator 間でも排他される

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::gate::Gate;
use crate::ports::{ActivityLog, Clock, LogError};

use super::stamp;

pub struct FileActivityLog {
    path: Gate<PathBuf>,
    clock: Arc<dyn Clock>,
}

impl FileActivityLog {
    /// Create (or truncate) the working log file.
    pub fn create(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Result<Self, LogError> {
        let path = path.into();
        let write_err = |source| LogError::Write {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::File::create(&path).map_err(write_err)?;
        Ok(Self {
            path: Gate::new(path),
            clock,
        })
    }

    pub fn path(&self) -> PathBuf {
        self.path.with(|p| p.clone())
    }

    /// Move the log file to `dest`. Later appends go to `dest`.
    pub fn relocate(&self, dest: &Path) -> Result<PathBuf, LogError> {
        self.path.with(|current| {
            let relocate_err = |source| LogError::Relocate {
                from: current.clone(),
                to: dest.to_path_buf(),
                source,
            };
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(relocate_err)?;
            }
            if fs::rename(&*current, dest).is_err() {
                // rename は別ファイルシステム間では失敗する
                fs::copy(&*current, dest).map_err(relocate_err)?;
                fs::remove_file(&*current).map_err(relocate_err)?;
            }
            tracing::debug!(from = %current.display(), to = %dest.display(), "activity log relocated");
            *current = dest.to_path_buf();
            Ok(current.clone())
        })
    }
}

impl ActivityLog for FileActivityLog {
    fn append(&self, line: &str) -> Result<(), LogError> {
        let stamped = stamp(self.clock.as_ref(), line);
        self.path.with(|path| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&*path)
                .and_then(|mut file| writeln!(file, "{stamped}"))
                .map_err(|source| LogError::Write {
                    path: path.clone(),
                    source,
                })
        })
    }
}
