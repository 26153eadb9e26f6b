//! Logger trait definition

/// Severity of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        })
    }
}

/// Logger abstraction for runtime-agnostic logging
///
/// The client and the executors take an `Arc<dyn Logger>` so the embedding
/// application decides where progress output goes.
///
/// Implementations:
/// - `NoOpLogger`: Silent logger
/// - `ConsoleLogger`: Logs to stdout/stderr
/// - `RecordingLogger`: Keeps every line in memory for inspection
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str);

    fn info(&self, message: &str);

    fn warn(&self, message: &str);

    fn error(&self, message: &str);

    /// Dispatch on a runtime level
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::Debug => self.debug(message),
            Level::Info => self.info(message),
            Level::Warn => self.warn(message),
            Level::Error => self.error(message),
        }
    }
}

/// Convenience macros for logging with format arguments
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {{
        use $crate::logging::Logger as _;
        $logger.log($crate::logging::Level::Debug, &format!($($arg)*))
    }};
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {{
        use $crate::logging::Logger as _;
        $logger.log($crate::logging::Level::Info, &format!($($arg)*))
    }};
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {{
        use $crate::logging::Logger as _;
        $logger.log($crate::logging::Level::Warn, &format!($($arg)*))
    }};
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {{
        use $crate::logging::Logger as _;
        $logger.log($crate::logging::Level::Error, &format!($($arg)*))
    }};
}
