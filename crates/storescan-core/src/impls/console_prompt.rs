//! ConsolePrompt - stdin / stdout の対話

use std::io::{self, BufRead, Write};

use crate::ports::{Prompt, PromptError};

#[derive(Debug, Default)]
pub struct ConsolePrompt;

impl ConsolePrompt {
    pub fn new() -> Self {
        Self
    }
}

impl Prompt for ConsolePrompt {
    fn ask(&mut self, question: &str) -> Result<Option<String>, PromptError> {
        let mut out = io::stdout().lock();
        write!(out, "{question}")?;
        out.flush()?;
        drop(out);

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn say(&mut self, line: &str) -> Result<(), PromptError> {
        let mut out = io::stdout().lock();
        writeln!(out, "{line}")?;
        Ok(())
    }
}
