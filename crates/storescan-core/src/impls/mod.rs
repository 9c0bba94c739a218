//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **FileActivityLog**: 作業用ログファイルへの追記と最終位置への移動
//! - **MemoryActivityLog**: テスト・開発用のメモリ内ログ
//! - **TextCatalogDecoder**: `Key: value` 形式のカタログエントリ
//! - **ConsolePrompt**: stdin / stdout の対話
//! - **ScriptedPrompt**: 事前に用意した回答を返す（テスト用）

pub mod console_prompt;
pub mod file_log;
pub mod memory_log;
pub mod scripted_prompt;
pub mod text_decoder;

pub use self::console_prompt::ConsolePrompt;
pub use self::file_log::FileActivityLog;
pub use self::memory_log::MemoryActivityLog;
pub use self::scripted_prompt::ScriptedPrompt;
pub use self::text_decoder::TextCatalogDecoder;

use chrono::Local;

use crate::ports::Clock;

/// `[YYYY-MM-DD HH:MM:SS] line` in local time.
pub(crate) fn stamp(clock: &dyn Clock, line: &str) -> String {
    let now = clock.now().with_timezone(&Local);
    format!("[{}] {}", now.format("%Y-%m-%d %H:%M:%S"), line)
}
