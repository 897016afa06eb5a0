//! Error types for the feeds crate

use thiserror::Error;

/// Errors that can occur while fetching or extracting content
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Upstream returned an error response
    #[error("Feed error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Failed to parse a feed body
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Content extraction produced nothing usable
    #[error("Extraction failed: {0}")]
    ExtractFailed(String),
}
