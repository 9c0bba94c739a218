//! Configuration - 実行設定
//!
//! 優先順位（CLI 側で解決する）:
//! 1. コマンドライン引数
//! 2. 環境変数（`STORESCAN_*`）
//! 3. TOML 設定ファイル
//! 4. コンパイル時の既定値

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::SetupError;

pub const DEFAULT_CATALOG_ROOT: &str = "./Dataset";
pub const DEFAULT_LOG_DIR: &str = "./dataset";
pub const DEFAULT_STORE_COUNT: usize = 3;
pub const DEFAULT_MAX_SUBCATEGORIES: usize = 8;
pub const DEFAULT_MAX_ENTRIES: usize = 100;
pub const DEFAULT_MAX_ITEMS: usize = 100;
pub const DEFAULT_MAX_NAME_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluationConfig {
    /// Directory holding one `Store<id>` directory per store.
    pub catalog_root: PathBuf,
    /// Directory for the working log and the per-store final logs.
    pub log_dir: PathBuf,
    pub store_count: usize,
    /// Subcategories beyond this count are ignored (not an error).
    pub max_subcategories: usize,
    /// Valuation workers spawned per subcategory at most.
    pub max_entries_per_subcategory: usize,
    /// Shopping list capacity.
    pub max_items: usize,
    /// Bound on names including the terminator slot; names hold one less.
    pub max_name_len: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            catalog_root: PathBuf::from(DEFAULT_CATALOG_ROOT),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            store_count: DEFAULT_STORE_COUNT,
            max_subcategories: DEFAULT_MAX_SUBCATEGORIES,
            max_entries_per_subcategory: DEFAULT_MAX_ENTRIES,
            max_items: DEFAULT_MAX_ITEMS,
            max_name_len: DEFAULT_MAX_NAME_LEN,
        }
    }
}

impl EvaluationConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, SetupError> {
        toml::from_str(text).map_err(|e| SetupError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, SetupError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SetupError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        let positive = [
            ("store_count", self.store_count),
            ("max_subcategories", self.max_subcategories),
            ("max_entries_per_subcategory", self.max_entries_per_subcategory),
            ("max_items", self.max_items),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(SetupError::Config(format!("{name} must be at least 1")));
            }
        }
        if self.store_count > usize::from(u16::MAX) {
            return Err(SetupError::Config(format!(
                "store_count {} is too large",
                self.store_count
            )));
        }
        if self.max_name_len < 2 {
            return Err(SetupError::Config("max_name_len must be at least 2".into()));
        }
        Ok(())
    }
}
