//! Layout - カタログディレクトリとログファイルの配置規則
//!
//! ```text
//! <catalog_root>/Store<id>/<subcategory>/<entry>
//! <log_dir>/<identity>_Order.log              (作業中)
//! <log_dir>/store<id>/<identity>_Order.log    (完了後)
//! ```

use std::path::{Path, PathBuf};

use crate::domain::StoreId;

const LOG_SUFFIX: &str = "_Order.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLayout {
    root: PathBuf,
}

impl CatalogLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store_dir(&self, store: StoreId) -> PathBuf {
        self.root.join(format!("Store{store}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLocations {
    log_dir: PathBuf,
    identity: String,
}

impl LogLocations {
    pub fn new(log_dir: impl Into<PathBuf>, identity: impl Into<String>) -> Self {
        Self {
            log_dir: log_dir.into(),
            identity: identity.into(),
        }
    }

    pub fn working(&self) -> PathBuf {
        self.log_dir.join(self.file_name())
    }

    pub fn final_for(&self, store: StoreId) -> PathBuf {
        self.log_dir
            .join(format!("store{store}"))
            .join(self.file_name())
    }

    fn file_name(&self) -> String {
        format!("{}{LOG_SUFFIX}", self.identity)
    }
}
