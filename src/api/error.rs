//! API Client Error Types
//!
//! Every failed call resolves to a [`ClientError`]. Its `Display` output is
//! what panels show inline, so API variants render the server's message
//! verbatim.

use thiserror::Error;

use crate::session::SessionError;

/// Errors returned by [`ApiClient`](super::ApiClient) calls
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The backend rejected the token; the session has already been cleared
    #[error("{message}")]
    Unauthorized { message: String },

    /// Any other non-2xx response
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A 2xx response whose body did not match the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Session storage failed
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl ClientError {
    /// HTTP status, when the backend answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized { .. } => Some(401),
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Result type for API client operations
pub type ClientResult<T> = Result<T, ClientError>;
