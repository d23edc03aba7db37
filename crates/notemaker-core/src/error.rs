//! Error types for notemaker.

use thiserror::Error;

/// Result type alias using notemaker's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for notemaker operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A media reference cannot be encoded as a tag
    #[error("Invalid media reference: {0}")]
    InvalidReference(String),

    /// Note not found
    #[error("Note not found: {0}")]
    NoteNotFound(uuid::Uuid),

    /// Authenticated but not the owner of the resource
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Remote asset store rejected or failed an operation
    #[error("Asset store error: {0}")]
    AssetStore(String),

    /// An external call exceeded its deadline
    #[error("Timed out after {0}ms")]
    Timeout(u64),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
