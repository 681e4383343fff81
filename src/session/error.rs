//! Session error types

use thiserror::Error;

/// Errors raised while persisting or restoring a session
#[derive(Error, Debug)]
pub enum SessionError {
    /// Reading or writing a session entry failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The user entry could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(err.to_string())
    }
}

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;
