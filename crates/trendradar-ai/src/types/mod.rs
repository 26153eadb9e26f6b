//! Core types for LLM interactions
//!
//! This module contains the message and tool types shared by the client,
//! the provider backends and the tool executors.

mod message;
mod tool;

pub use message::{ChatMessage, MessageRole};
pub use tool::{Tool, ToolCall, ToolChoice};
