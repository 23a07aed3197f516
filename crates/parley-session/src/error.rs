//! Error types for parley-session

use thiserror::Error;

/// Result type alias using parley-session Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a conversation
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request to the relay failed outright
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The relay answered with something other than the JSON envelope
    #[error("Server did not return JSON")]
    NotJson,

    /// The relay reported a failure envelope
    #[error("{reply}")]
    Relay { status: u16, reply: String },

    /// Another exchange is already in flight
    #[error("an exchange is already in progress")]
    Busy,

    /// Reading an attachment failed
    #[error("failed to read attachment {path}: {source}")]
    Attachment {
        path: String,
        source: std::io::Error,
    },
}
