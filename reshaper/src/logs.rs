//! Progress logging for pipeline runs.
//!
//! Entries go to stderr (stdout stays free for command output) and are kept
//! in a bounded history so a run report can include them.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Entries retained in the history.
const HISTORY_CAPACITY: usize = 100;

/// Log level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting depth for sub-steps
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    fn line(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        format!("{}{} {}", indent, prefix, self.message)
    }
}

/// Global logger
pub static LOGGER: Lazy<Logger> = Lazy::new(Logger::new);

/// Prints entries to stderr and remembers the most recent ones.
pub struct Logger {
    history: Mutex<VecDeque<LogEntry>>,
    quiet: AtomicBool,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            history: Mutex::new(VecDeque::with_capacity(HISTORY_CAPACITY)),
            quiet: AtomicBool::new(false),
        }
    }

    /// Record an entry and print it. A quiet logger still prints errors.
    pub fn log(&self, entry: LogEntry) {
        if entry.level == LogLevel::Error || !self.quiet.load(Ordering::Relaxed) {
            eprintln!("{}", entry.line());
        }

        let mut history = self.history.lock().unwrap_or_else(|e| e.into_inner());
        if history.len() == HISTORY_CAPACITY {
            history.pop_front();
        }
        history.push_back(entry);
    }

    pub fn set_quiet(&self, quiet: bool) {
        self.quiet.store(quiet, Ordering::Relaxed);
    }

    /// Snapshot of the retained entries, oldest first.
    pub fn history(&self) -> Vec<LogEntry> {
        let history = self.history.lock().unwrap_or_else(|e| e.into_inner());
        history.iter().cloned().collect()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

pub fn log_info(msg: impl Into<String>) {
    LOGGER.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOGGER.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOGGER.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOGGER.log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LOGGER.log(LogEntry::info(msg).with_indent(indent));
}

/// Silence or restore stderr output of the global logger.
pub fn set_quiet(quiet: bool) {
    LOGGER.set_quiet(quiet);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_line_format() {
        assert_eq!(LogEntry::success("Read 3 rows").line(), "   ✓ Read 3 rows");
        assert_eq!(LogEntry::info("Columns").with_indent(1).line(), "       Columns");
    }

    #[test]
    fn test_history_is_bounded() {
        let logger = Logger::new();
        logger.set_quiet(true);
        for i in 0..(HISTORY_CAPACITY + 5) {
            logger.log(LogEntry::info(format!("entry {i}")));
        }

        let history = logger.history();
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history[0].message, "entry 5");
    }

    #[test]
    fn test_quiet_logger_keeps_errors() {
        let logger = Logger::new();
        logger.set_quiet(true);
        logger.log(LogEntry::info("Reading raw-values.csv"));
        logger.log(LogEntry::error("Input file not found: raw-values.csv"));

        let history = logger.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].level, LogLevel::Error);
        assert_eq!(history[1].line(), "   ❌ Input file not found: raw-values.csv");
    }

    #[test]
    fn test_entry_serialization() {
        let json = serde_json::to_string(&LogEntry::warning("3 missing cells")).unwrap();
        assert_eq!(json, r#"{"level":"warning","message":"3 missing cells","indent":0}"#);
    }
}
