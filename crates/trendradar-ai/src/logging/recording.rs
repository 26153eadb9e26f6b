//! In-memory logger that records every line

use parking_lot::Mutex;

use super::traits::{Level, Logger};

/// A logger that keeps every message in memory
///
/// Lets callers (and tests) inspect the progress output of the tool-calling
/// loop without scraping stdout.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<(Level, String)>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded lines in order
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().clone()
    }

    /// Messages only, in order
    pub fn messages(&self) -> Vec<String> {
        self.lines.lock().iter().map(|(_, m)| m.clone()).collect()
    }

    /// Whether any recorded message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|(_, m)| m.contains(needle))
    }

    /// Drop everything recorded so far
    pub fn clear(&self) {
        self.lines.lock().clear();
    }

    fn push(&self, level: Level, message: &str) {
        self.lines.lock().push((level, message.to_string()));
    }
}

impl Logger for RecordingLogger {
    fn debug(&self, message: &str) {
        self.push(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_logger() {
        let logger = RecordingLogger::new();
        logger.info("round 1");
        logger.warn("probe unknown");

        assert_eq!(logger.lines().len(), 2);
        assert_eq!(logger.lines()[1].0, Level::Warn);
        assert!(logger.contains("round"));
        assert!(!logger.contains("round 2"));

        logger.clear();
        assert!(logger.messages().is_empty());
    }
}
