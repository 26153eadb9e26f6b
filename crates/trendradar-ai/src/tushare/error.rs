//! Tushare error types

use thiserror::Error;

/// Errors from a Tushare data query
#[derive(Debug, Error)]
pub enum TushareError {
    /// HTTP transport or connection error
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Tushare answered with a non-zero code
    #[error("[{code}] {msg}")]
    Api { code: i64, msg: String },

    /// Response body did not have the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),

    /// Tool arguments could not be decoded
    #[error("{0}")]
    InvalidArguments(String),

    /// The HTTP client could not be built
    #[error("{0}")]
    Client(String),
}

impl TushareError {
    /// Short category name shown in tool output
    pub fn kind(&self) -> &'static str {
        match self {
            TushareError::Http(_) => "HttpError",
            TushareError::Api { .. } => "ApiError",
            TushareError::Decode(_) => "DecodeError",
            TushareError::InvalidArguments(_) => "InvalidArguments",
            TushareError::Client(_) => "ClientError",
        }
    }
}

pub type TushareResult<T> = Result<T, TushareError>;
