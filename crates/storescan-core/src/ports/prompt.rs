//! Prompt port - 対話入力の抽象化
//!
//! 質問を 1 行出して 1 行受け取る。入力の検証は呼び出し側（intake / re-rating）が行う。
//! ユーザー向けの表示（合計一覧、選択結果など）も同じ port を通す。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("interactive I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub trait Prompt: Send {
    /// Show `question` and read one line. `Ok(None)` means input is closed.
    fn ask(&mut self, question: &str) -> Result<Option<String>, PromptError>;

    /// Show one line of output.
    fn say(&mut self, line: &str) -> Result<(), PromptError>;
}
