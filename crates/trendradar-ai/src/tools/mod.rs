//! Tool execution
//!
//! The model client only knows the `ToolExecutor` contract:
//! `execute(name, arguments) -> text`, never failing. Implementations:
//!
//! - `FnExecutor`: wraps a plain closure
//! - `ToolRegistry`: name → handler table with per-tool enable flags
//! - `crate::tushare::TushareToolExecutor`: Tushare Pro market data queries

mod executor;
mod registry;

pub use executor::{
    char_prefix, truncate_with_ellipsis, unknown_function, FnExecutor, ToolExecutor, ERROR_MARKER,
};
pub use registry::{RegistryError, ToolHandler, ToolRegistry};
