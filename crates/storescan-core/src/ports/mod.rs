//! Ports - 抽象化レイヤー
//!
//! 外部の協力者（カタログのテキスト形式、対話入力、追記専用ログ、時刻、ID）への
//! インターフェースを定義し、実装の詳細を impls に隠す。

pub mod activity_log;
pub mod catalog_decoder;
pub mod clock;
pub mod id_generator;
pub mod prompt;

// 主要な trait を再エクスポート
pub use self::activity_log::{ActivityLog, LogError};
pub use self::catalog_decoder::{CatalogDecoder, DecodeError};
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::prompt::{Prompt, PromptError};
