//! MemoryActivityLog - メモリ内のアクティビティログ（テスト・開発用）

use std::sync::Arc;

use crate::gate::Gate;
use crate::ports::{ActivityLog, Clock, LogError, SystemClock};

use super::stamp;

pub struct MemoryActivityLog {
    lines: Gate<Vec<String>>,
    clock: Arc<dyn Clock>,
}

impl MemoryActivityLog {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            lines: Gate::new(Vec::new()),
            clock,
        }
    }

    /// Lines as written, timestamp prefix included.
    pub fn lines(&self) -> Vec<String> {
        self.lines.with(|l| l.clone())
    }

    /// Lines without their `[timestamp] ` prefix.
    pub fn messages(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .map(|line| match line.split_once("] ") {
                Some((_, rest)) => rest.to_string(),
                None => line,
            })
            .collect()
    }
}

impl Default for MemoryActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityLog for MemoryActivityLog {
    fn append(&self, line: &str) -> Result<(), LogError> {
        let stamped = stamp(self.clock.as_ref(), line);
        self.lines.with(|l| l.push(stamped));
        Ok(())
    }
}
