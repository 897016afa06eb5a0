//! Error types for the pipeline

use thiserror::Error;

/// Pipeline-wide error type
#[derive(Error, Debug)]
pub enum NewsdeskError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl NewsdeskError {
    pub fn api(msg: impl Into<String>) -> Self {
        NewsdeskError::Api(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        NewsdeskError::Network(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        NewsdeskError::Auth(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        NewsdeskError::Parse(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        NewsdeskError::NotFound(msg.into())
    }

    pub fn rate_limited(msg: impl Into<String>) -> Self {
        NewsdeskError::RateLimited(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        NewsdeskError::Storage(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        NewsdeskError::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        NewsdeskError::Internal(msg.into())
    }
}

/// Result type alias for pipeline operations
pub type NewsdeskResult<T> = Result<T, NewsdeskError>;
