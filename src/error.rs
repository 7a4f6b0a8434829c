//! Error types for casket

use thiserror::Error;

/// Result type alias for blob store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in blob store operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// True for the not-found condition raised by `retrieve` or `remove`
    /// on an absent key.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
