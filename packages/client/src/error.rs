//! Error types for the Roundtable client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The watched room does not exist (or was deleted)
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The server rejected a request
    #[error("Server responded {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A line typed at the prompt could not be understood
    #[error("{0}")]
    InvalidCommand(String),
}
