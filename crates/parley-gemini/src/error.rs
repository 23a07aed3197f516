//! Error types for parley-gemini

use thiserror::Error;

/// Result type alias using parley-gemini Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the Gemini API
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid API key
    #[error("Invalid or missing API key")]
    InvalidApiKey,
}
