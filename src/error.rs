//! Error types for the document store client

use std::io;
use thiserror::Error;

/// Errors that can occur when talking to the document store server.
#[derive(Error, Debug)]
pub enum Error {
    /// Network-level failure (connect, DNS, TLS handshake, broken transfer)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request timeout
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Server answered with an error status
    #[error("Server error (status {status}): {message}")]
    Protocol {
        /// HTTP status code
        status: u16,
        /// Error body returned by the server
        message: String,
    },

    /// Malformed connection string or malformed server payload
    #[error("Format error: {0}")]
    Format(String),

    /// Operation requires or forbids an open transaction
    #[error("Transaction state error: {0}")]
    TransactionState(String),

    /// HTTP method outside GET/PUT/POST/DELETE
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// Endpoint that is not implemented by this client yet
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    /// File path without a usable extension
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;
