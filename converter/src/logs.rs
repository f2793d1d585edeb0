//! Pipeline progress log.
//!
//! Every entry is printed to stderr (unless quiet) and kept in an in-memory
//! history that callers can drain, e.g. to attach to a JSON report.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Log level for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Conversion step an entry was emitted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Read,
    Parse,
    Group,
    Write,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Read => "read",
            Stage::Parse => "parse",
            Stage::Group => "group",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

/// A single log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    pub message: String,
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            stage: None,
            message: message.into(),
            indent: 0,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }

    pub fn at(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Line as printed to stderr: `   ✓ [group] Grouped into 2 frames`.
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        match self.stage {
            Some(stage) => format!("{}{} [{}] {}", indent, prefix, stage, self.message),
            None => format!("{}{} {}", indent, prefix, self.message),
        }
    }
}

/// Global logger
pub static LOGGER: Lazy<Logger> = Lazy::new(Logger::new);

/// Prints entries and records them in order.
pub struct Logger {
    history: Mutex<Vec<LogEntry>>,
    quiet: AtomicBool,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            history: Mutex::new(Vec::new()),
            quiet: AtomicBool::new(false),
        }
    }

    pub fn log(&self, entry: LogEntry) {
        if !self.quiet.load(Ordering::Relaxed) {
            eprintln!("{}", entry.render());
        }
        if let Ok(mut history) = self.history.lock() {
            history.push(entry);
        }
    }

    /// Stop printing; entries are still recorded.
    pub fn set_quiet(&self, quiet: bool) {
        self.quiet.store(quiet, Ordering::Relaxed);
    }

    /// Take all recorded entries, leaving the history empty.
    pub fn drain(&self) -> Vec<LogEntry> {
        self.history
            .lock()
            .map(|mut h| std::mem::take(&mut *h))
            .unwrap_or_default()
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

pub fn log_warning(msg: impl Into<String>) {
    LOGGER.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOGGER.log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LOGGER.log(LogEntry::info(msg).with_indent(indent));
}

/// Log a pipeline step.
pub fn log_stage(stage: Stage, level: LogLevel, msg: impl Into<String>) {
    LOGGER.log(LogEntry::new(level, msg).at(stage));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_and_drain() {
        let logger = Logger::new();
        logger.set_quiet(true);
        logger.log(LogEntry::info("reading"));
        logger.log(LogEntry::warning("odd frame").with_indent(1));

        let entries = logger.drain();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].level, LogLevel::Warning);
        assert_eq!(entries[1].indent, 1);
        assert!(logger.drain().is_empty());
    }

    #[test]
    fn test_render_prefix_and_indent() {
        assert_eq!(LogEntry::success("done").render(), "   ✓ done");
        assert_eq!(LogEntry::info("x").with_indent(1).render(), "       x");
        assert_eq!(
            LogEntry::success("Grouped into 2 frames").at(Stage::Group).render(),
            "   ✓ [group] Grouped into 2 frames"
        );
    }

    #[test]
    fn test_entry_json() {
        let json = serde_json::to_value(LogEntry::error("boom")).unwrap();
        assert_eq!(json["level"], "error");
        assert_eq!(json["message"], "boom");
        assert_eq!(json["indent"], 0);
    }
}
