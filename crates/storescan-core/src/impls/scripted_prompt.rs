//! ScriptedPrompt - 事前に用意した回答を順に返す Prompt（テスト用）
//!
//! clone は同じ状態を共有する。片方を `Box<dyn Prompt>` として渡し、
//! 手元に残したもう片方から transcript を検証できる。

use std::collections::VecDeque;
use std::sync::Arc;

use crate::gate::Gate;
use crate::ports::{Prompt, PromptError};

#[derive(Debug, Default)]
struct Script {
    answers: VecDeque<String>,
    transcript: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    script: Arc<Gate<Script>>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Arc::new(Gate::new(Script {
                answers: answers.into_iter().map(Into::into).collect(),
                transcript: Vec::new(),
            })),
        }
    }

    /// Every question asked and line shown, in order.
    pub fn transcript(&self) -> Vec<String> {
        self.script.with(|s| s.transcript.clone())
    }

    pub fn remaining(&self) -> usize {
        self.script.with(|s| s.answers.len())
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &str) -> Result<Option<String>, PromptError> {
        Ok(self.script.with(|s| {
            s.transcript.push(question.to_string());
            s.answers.pop_front()
        }))
    }

    fn say(&mut self, line: &str) -> Result<(), PromptError> {
        self.script.with(|s| s.transcript.push(line.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_answers_and_transcript() {
        let handle = ScriptedPrompt::new(["first", "second"]);
        let mut boxed: Box<dyn Prompt> = Box::new(handle.clone());

        assert_eq!(boxed.ask("q1? ").unwrap().as_deref(), Some("first"));
        boxed.say("shown").unwrap();

        assert_eq!(handle.remaining(), 1);
        assert_eq!(handle.transcript(), vec!["q1? ".to_string(), "shown".to_string()]);
    }

    #[test]
    fn exhausted_script_reports_closed_input() {
        let mut prompt = ScriptedPrompt::new(Vec::<String>::new());
        assert_eq!(prompt.ask("anything? ").unwrap(), None);
    }
}
