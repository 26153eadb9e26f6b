//! Tool registry for closure-backed tools
//!
//! Maps each tool name to a handler at registration time. A call for a name
//! that was never registered is a lookup miss with its own error text,
//! distinct from a handler failure.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use thiserror::Error;

use super::executor::{unknown_function, ToolExecutor};
use crate::logging::Logger;
use crate::types::Tool;

/// Handler invoked with the parsed argument map
pub type ToolHandler = Arc<dyn Fn(&Map<String, Value>) -> String + Send + Sync>;

/// Registration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("tool already registered: {0}")]
    Duplicate(String),

    #[error("tool name must not be empty")]
    EmptyName,
}

struct Entry {
    tool: Tool,
    handler: ToolHandler,
}

/// Registry of named tools and their handlers
pub struct ToolRegistry {
    entries: RwLock<Vec<Entry>>,
    index: RwLock<HashMap<String, usize>>,
    logger: Arc<dyn Logger>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            index: RwLock::new(HashMap::new()),
            logger,
        }
    }

    /// Register a tool with its handler
    pub fn register<F>(&self, tool: Tool, handler: F) -> Result<(), RegistryError>
    where
        F: Fn(&Map<String, Value>) -> String + Send + Sync + 'static,
    {
        if tool.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }

        let mut index = self.index.write();
        if index.contains_key(&tool.name) {
            return Err(RegistryError::Duplicate(tool.name));
        }

        let mut entries = self.entries.write();
        index.insert(tool.name.clone(), entries.len());
        entries.push(Entry {
            tool,
            handler: Arc::new(handler),
        });
        Ok(())
    }

    /// Schema of every registered tool, in registration order
    pub fn tools(&self) -> Vec<Tool> {
        self.entries.read().iter().map(|e| e.tool.clone()).collect()
    }

    /// Number of registered tools
    pub fn tool_count(&self) -> usize {
        self.entries.read().len()
    }

    fn handler(&self, name: &str) -> Option<ToolHandler> {
        let pos = *self.index.read().get(name)?;
        self.entries.read().get(pos).map(|e| Arc::clone(&e.handler))
    }
}

#[async_trait]
impl ToolExecutor for ToolRegistry {
    async fn execute(&self, function_name: &str, arguments: &Map<String, Value>) -> String {
        match self.handler(function_name) {
            Some(handler) => handler(arguments),
            None => {
                self.logger.warn(&format!(
                    "[ToolRegistry] no tool named '{}'",
                    function_name
                ));
                unknown_function(function_name)
            }
        }
    }
}
