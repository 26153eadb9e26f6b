//! Per-call overrides

use serde_json::{Map, Value};

use crate::providers::{ClientError, ClientResult};

/// Per-call overrides of the configured defaults
///
/// Recognised keys replace the configured value for one call. Anything in
/// `extra` is forwarded verbatim to the backend, except keys the client
/// already sets itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub temperature: Option<f64>,
    /// Seconds
    pub timeout: Option<u64>,
    pub max_tokens: Option<i64>,
    pub num_retries: Option<u32>,
    pub extra: Map<String, Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Some(secs);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: i64) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_num_retries(mut self, retries: u32) -> Self {
        self.num_retries = Some(retries);
        self
    }

    /// Add a provider-specific passthrough key
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Split a loose key/value map into recognised overrides and passthrough
    ///
    /// A recognised key with a value of the wrong type is an error.
    pub fn from_map(map: Map<String, Value>) -> ClientResult<Self> {
        let mut options = Self::default();

        for (key, value) in map {
            match key.as_str() {
                "temperature" => {
                    options.temperature = Some(value.as_f64().ok_or_else(|| bad_type(&key, "a number"))?);
                }
                "timeout" => {
                    options.timeout = Some(value.as_u64().ok_or_else(|| bad_type(&key, "a non-negative integer"))?);
                }
                "max_tokens" => {
                    options.max_tokens = Some(value.as_i64().ok_or_else(|| bad_type(&key, "an integer"))?);
                }
                "num_retries" => {
                    let retries = value
                        .as_u64()
                        .and_then(|v| u32::try_from(v).ok())
                        .ok_or_else(|| bad_type(&key, "a non-negative integer"))?;
                    options.num_retries = Some(retries);
                }
                _ => {
                    options.extra.insert(key, value);
                }
            }
        }

        Ok(options)
    }
}

fn bad_type(key: &str, expected: &str) -> ClientError {
    ClientError::Other(format!("override '{}' must be {}", key, expected))
}
