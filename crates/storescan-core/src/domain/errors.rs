//! Errors - エラー型と分類
//!
//! # 分類（ErrorKind）
//! - FatalSetup: 共有資源の確保やトップレベルの入力が失敗。実行全体を中止する
//! - FatalLocal: coordinator 自身のディレクトリが読めない。その subtree だけ終了する
//! - RecoverableSkip: エントリ 1 件のデコード失敗や spawn 失敗。ログを出して飛ばす
//! - InputValidation: 対話入力の不正。再入力またはスキップ

use std::path::PathBuf;

use thiserror::Error;

use crate::aggregate::AggregateError;
use crate::app::builder::BuildError;
use crate::domain::shopping::ShoppingListError;
use crate::domain::store::StoreId;
use crate::ports::{DecodeError, LogError, PromptError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FatalSetup,
    FatalLocal,
    RecoverableSkip,
    InputValidation,
}

/// Failures that abort the whole run before (or instead of) fan-out.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("catalog root {path} is not readable: {source}")]
    CatalogRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog root {0} is not a directory")]
    CatalogRootNotDirectory(PathBuf),

    #[error("invalid number of products '{input}': expected 1..={capacity}")]
    InvalidItemCount { input: String, capacity: usize },

    #[error("activity log unavailable: {0}")]
    ActivityLog(#[from] LogError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// A coordinator could not read its own directory.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("store {store}: cannot read store directory {path}: {source}")]
    StoreDirectory {
        store: StoreId,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store {store}: cannot read subcategory directory {path}: {source}")]
    SubcategoryDirectory {
        store: StoreId,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("input closed while waiting for {0}")]
    InputClosed(&'static str),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}

#[derive(Debug, Error)]
pub enum FinalizationError {
    #[error("finalization requires a selected store")]
    NotSelected,

    #[error("{task} task terminated abnormally: {reason}")]
    TaskFailed { task: &'static str, reason: String },
}

/// StorescanError はアプリケーション全体のエラー
#[derive(Debug, Error)]
pub enum StorescanError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error(transparent)]
    ShoppingList(#[from] ShoppingListError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Finalization(#[from] FinalizationError),

    #[error(transparent)]
    Log(#[from] LogError),
}

impl StorescanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StorescanError::Setup(_)
            | StorescanError::Build(_)
            | StorescanError::Log(_)
            | StorescanError::Intake(_) => ErrorKind::FatalSetup,
            StorescanError::ShoppingList(_) | StorescanError::Aggregate(_) => {
                ErrorKind::InputValidation
            }
            StorescanError::Finalization(_) => ErrorKind::FatalLocal,
        }
    }
}

impl CoordinatorError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::FatalLocal
    }
}

impl DecodeError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::RecoverableSkip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_item_count_is_fatal_setup() {
        let err: StorescanError = SetupError::InvalidItemCount {
            input: "0".to_string(),
            capacity: 100,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::FatalSetup);
        assert!(err.to_string().contains("1..=100"));
    }

    #[test]
    fn shopping_list_errors_are_input_validation() {
        let err: StorescanError = ShoppingListError::EmptyName.into();
        assert_eq!(err.kind(), ErrorKind::InputValidation);
    }

    #[test]
    fn coordinator_errors_are_local() {
        let err = CoordinatorError::StoreDirectory {
            store: StoreId::new(2).unwrap(),
            path: PathBuf::from("/missing/Store2"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(err.kind(), ErrorKind::FatalLocal);
        assert!(err.to_string().contains("store 2"));
    }
}
