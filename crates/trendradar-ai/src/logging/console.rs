//! Terminal logger

use super::traits::{Level, Logger};

/// Writes tagged lines to the terminal.
///
/// Info lines go to stdout so progress of the tool-calling loop shows up next
/// to report output; warnings and errors go to stderr. Debug lines are dropped
/// unless the logger is verbose.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    tag: String,
    verbose: bool,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLogger {
    /// Logger tagged `[AI]`
    pub fn new() -> Self {
        Self::tagged("[AI]")
    }

    pub fn tagged(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            verbose: false,
        }
    }

    /// Also print debug lines
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    fn line(&self, level: Level, message: &str) -> Option<String> {
        match level {
            Level::Debug if !self.verbose => None,
            Level::Info => Some(format!("{} {}", self.tag, message)),
            _ => Some(format!("{} {}: {}", self.tag, level, message)),
        }
    }
}

impl Logger for ConsoleLogger {
    fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    fn log(&self, level: Level, message: &str) {
        match (level, self.line(level, message)) {
            (_, None) => {}
            (Level::Info, Some(line)) => println!("{line}"),
            (_, Some(line)) => eprintln!("{line}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_format() {
        let logger = ConsoleLogger::tagged("[Tushare]");
        assert_eq!(logger.line(Level::Debug, "hidden"), None);
        assert_eq!(
            logger.line(Level::Info, "query daily").as_deref(),
            Some("[Tushare] query daily")
        );
        assert_eq!(
            logger.line(Level::Warn, "empty frame").as_deref(),
            Some("[Tushare] WARN: empty frame")
        );

        let verbose = ConsoleLogger::new().verbose();
        assert_eq!(
            verbose.line(Level::Debug, "raw args").as_deref(),
            Some("[AI] DEBUG: raw args")
        );
    }
}
