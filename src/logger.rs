//! Training progress logging with verbosity levels.
//!
//! The level travels with [`HoeffdingTreeSettings`](crate::config::HoeffdingTreeSettings),
//! so independent models in one process can log at different levels.
//! Messages go to stderr unless a [`LogSink::Buffer`] is installed.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// How much the trainer reports on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Verbosity {
    /// Nothing at all.
    Silent,
    /// Ignored or overridden parameters.
    #[default]
    Warning,
    /// Split commits and pass summaries.
    Info,
    /// Every leaf evaluation, including deferred ones.
    Debug,
}

/// Destination of log lines.
#[derive(Debug, Clone, Default)]
pub enum LogSink {
    /// Standard error.
    #[default]
    Stderr,
    /// Shared in-memory buffer, one entry per line.
    Buffer(Arc<Mutex<Vec<String>>>),
}

impl LogSink {
    /// A new, empty in-memory sink.
    pub fn buffer() -> Self {
        LogSink::Buffer(Arc::default())
    }

    /// Lines written so far; always empty for stderr.
    pub fn lines(&self) -> Vec<String> {
        match self {
            LogSink::Stderr => Vec::new(),
            LogSink::Buffer(buffer) => buffer
                .lock()
                .map(|lines| lines.clone())
                .unwrap_or_default(),
        }
    }

    fn write_line(&self, line: String) {
        match self {
            LogSink::Stderr => eprintln!("{line}"),
            LogSink::Buffer(buffer) => {
                if let Ok(mut lines) = buffer.lock() {
                    lines.push(line);
                }
            }
        }
    }
}

/// Two sinks are equal when they write to the same place.
impl PartialEq for LogSink {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LogSink::Stderr, LogSink::Stderr) => true,
            (LogSink::Buffer(a), LogSink::Buffer(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Writes leveled messages for one training call.
#[derive(Debug, Clone)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    sink: LogSink,
}

impl TrainingLogger {
    /// Creates a stderr logger that drops messages above `verbosity`.
    pub fn new(verbosity: Verbosity) -> Self {
        Self::with_sink(verbosity, LogSink::Stderr)
    }

    /// Creates a logger writing to `sink`.
    pub fn with_sink(verbosity: Verbosity, sink: LogSink) -> Self {
        Self { verbosity, sink }
    }

    /// Returns true when messages at `level` are written.
    #[inline]
    pub fn enabled(&self, level: Verbosity) -> bool {
        level != Verbosity::Silent && level <= self.verbosity
    }

    /// Logs a warning.
    pub fn warn(&self, message: &str) {
        self.write(Verbosity::Warning, message);
    }

    /// Logs an informational message.
    pub fn info(&self, message: &str) {
        self.write(Verbosity::Info, message);
    }

    /// Logs a debug message.
    pub fn debug(&self, message: &str) {
        self.write(Verbosity::Debug, message);
    }

    /// Summary line at the end of a training pass.
    pub fn log_pass(&self, mode: &str, observations: usize, num_nodes: usize, num_leaves: usize) {
        if self.enabled(Verbosity::Info) {
            self.info(&format!(
                "{mode} pass over {observations} observations: {num_nodes} nodes, {num_leaves} leaves"
            ));
        }
    }

    fn write(&self, level: Verbosity, message: &str) {
        if !self.enabled(level) {
            return;
        }
        let tag = match level {
            Verbosity::Silent => return,
            Verbosity::Warning => "WARN",
            Verbosity::Info => "INFO",
            Verbosity::Debug => "DEBUG",
        };
        self.sink.write_line(format!("[hoeffding_tree {tag}] {message}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered() {
        let logger = TrainingLogger::new(Verbosity::Info);
        assert!(logger.enabled(Verbosity::Warning));
        assert!(logger.enabled(Verbosity::Info));
        assert!(!logger.enabled(Verbosity::Debug));
        assert!(!logger.enabled(Verbosity::Silent));

        let silent = TrainingLogger::new(Verbosity::Silent);
        assert!(!silent.enabled(Verbosity::Warning));
    }

    #[test]
    fn buffer_collects_enabled_lines() {
        let sink = LogSink::buffer();
        let logger = TrainingLogger::with_sink(Verbosity::Info, sink.clone());
        logger.warn("first");
        logger.debug("dropped");
        logger.log_pass("batch", 10, 3, 2);

        assert_eq!(
            sink.lines(),
            vec![
                "[hoeffding_tree WARN] first".to_string(),
                "[hoeffding_tree INFO] batch pass over 10 observations: 3 nodes, 2 leaves".to_string(),
            ]
        );
        assert_eq!(sink, sink.clone());
        assert_ne!(sink, LogSink::buffer());
        assert!(LogSink::Stderr.lines().is_empty());
    }
}
