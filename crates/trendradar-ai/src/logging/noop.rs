//! Silent logger

use super::traits::{Level, Logger};

/// Discards every line.
///
/// The default for embedders that report through their own channels, and for
/// tests that only care about the loop's return value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl NoOpLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for NoOpLogger {
    fn debug(&self, _: &str) {}
    fn info(&self, _: &str) {}
    fn warn(&self, _: &str) {}
    fn error(&self, _: &str) {}

    fn log(&self, _: Level, _: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_noop_as_shared_logger() {
        let logger: Arc<dyn Logger> = Arc::new(NoOpLogger::new());
        for level in [Level::Debug, Level::Info, Level::Warn, Level::Error] {
            logger.log(level, "[AiClient] tool call #1: get_index_daily({})");
        }
        crate::log_warn!(logger, "round budget of {} exhausted", 30);
    }
}
