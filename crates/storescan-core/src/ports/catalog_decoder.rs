//! CatalogDecoder port - カタログエントリ 1 ファイルのデコード
//!
//! `decode(path) → CatalogRecord | DecodeError`。
//! デコード失敗は worker を寄与なしで終わらせるだけ（recoverable-skip）。

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::CatalogRecord;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot read catalog entry {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog entry {path}: missing field '{field}'")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("catalog entry {path}: malformed {field} value '{value}'")]
    Malformed {
        path: PathBuf,
        field: &'static str,
        value: String,
    },
}

pub trait CatalogDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<CatalogRecord, DecodeError>;
}
