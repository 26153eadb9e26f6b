//! Tool executor contract

use async_trait::async_trait;
use serde_json::{Map, Value};

/// Prefix marking a tool result as an error message
pub const ERROR_MARKER: &str = "错误：";

/// Executes model-requested tool calls
///
/// `execute` never fails: every problem (unknown function, bad arguments,
/// upstream failure) comes back as human-readable text that the model can
/// read as ordinary tool output. Implementations must accept an empty
/// argument map.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(&self, function_name: &str, arguments: &Map<String, Value>) -> String;
}

/// Adapter turning a synchronous closure into a `ToolExecutor`
///
/// ```
/// use serde_json::{Map, Value};
/// use trendradar_ai::tools::FnExecutor;
///
/// let executor = FnExecutor::new(|name: &str, args: &Map<String, Value>| {
///     format!("{name}: {} args", args.len())
/// });
/// # let _ = executor;
/// ```
pub struct FnExecutor<F> {
    f: F,
}

impl<F> FnExecutor<F>
where
    F: Fn(&str, &Map<String, Value>) -> String + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> ToolExecutor for FnExecutor<F>
where
    F: Fn(&str, &Map<String, Value>) -> String + Send + Sync,
{
    async fn execute(&self, function_name: &str, arguments: &Map<String, Value>) -> String {
        (self.f)(function_name, arguments)
    }
}

/// Error text for a function name nobody registered
pub fn unknown_function(name: &str) -> String {
    format!("{}未知的工具函数 '{}'", ERROR_MARKER, name)
}

/// Truncate to at most `max` characters, appending `...` when cut
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// First `max` characters of `text` (never splits a character)
pub fn char_prefix(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
