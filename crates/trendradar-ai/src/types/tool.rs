//! Tool/function calling types

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Tool definition for function calling
///
/// The client never interprets these; they are handed to the model as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name (function name)
    pub name: String,
    /// Description of what the tool does
    pub description: String,
    /// JSON Schema for the input parameters
    pub parameters: Value,
}

impl Tool {
    /// Create a new tool definition with an empty parameter object
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: json!({ "type": "object", "properties": {}, "required": [] }),
        }
    }

    /// Set the parameter schema
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.parameters = schema;
        self
    }

    /// Render as an OpenAI `tools` entry
    pub fn to_openai(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }

    /// Parse an OpenAI `tools` entry
    pub fn from_openai(value: &Value) -> Option<Self> {
        let function = value.get("function")?;
        Some(Self {
            name: function.get("name")?.as_str()?.to_string(),
            description: function
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            parameters: function.get("parameters").cloned().unwrap_or(Value::Null),
        })
    }
}

/// Tool call from the LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Opaque identifier, unique within one assistant turn
    pub id: String,
    /// Name of the function being called
    pub name: String,
    /// Raw argument payload; expected to be a JSON object but not guaranteed
    pub arguments: String,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Parse the argument payload into a key/value map
    ///
    /// Malformed text, an empty payload or a JSON value that is not an object
    /// all yield an empty map.
    pub fn parse_arguments(&self) -> Map<String, Value> {
        match serde_json::from_str::<Value>(&self.arguments) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Tool choice option for requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    /// Let the model decide whether to use tools
    #[default]
    Auto,
    /// Don't use tools
    None,
    /// Force tool use
    Required,
}
