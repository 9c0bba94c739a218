//! storescan-core
//!
//! 複数の店舗カタログを並行スキャンして買い物リストを評価するための中核ライブラリ。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, store, shopping, catalog, errors）
//! - **ports**: 抽象化レイヤー（Clock, IdGenerator, ActivityLog, CatalogDecoder, Prompt）
//! - **impls**: ports の実装（FileActivityLog, TextCatalogDecoder, ConsolePrompt など）
//! - **app**: 評価パイプライン（builder, orchestrator, coordinators, worker, finalization, session）
//! - **gate**: SharedAggregate を守る唯一の排他ゲート
//! - **aggregate**: 全 tier から共有される集計領域
//! - **config**: 実行設定（TOML / 既定値）
//! - **layout**: カタログディレクトリとログファイルの配置規則
//! - **observability**: 評価中のカウンタとレポート

pub mod domain;
pub mod ports;
pub mod impls;
pub mod app;

pub mod aggregate;
pub mod config;
pub mod gate;
pub mod layout;
pub mod observability;

pub use aggregate::SharedAggregate;
pub use config::EvaluationConfig;
pub use domain::errors::{ErrorKind, StorescanError};
pub use gate::Gate;
