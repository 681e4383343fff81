//! Session Pipeline
//!
//! Persisted credentials and the shared in-memory session.
//!
//! ## Lifecycle
//!
//! 1. At startup [`SessionContext::restore`] reads the store once
//! 2. A successful login calls [`SessionContext::establish`]
//! 3. Logout, or any 401 from the backend, calls [`SessionContext::invalidate`]
//!
//! Token and user travel together as one [`Session`]; there is no state
//! in which only one of them is set.

mod context;
mod error;
mod store;

pub use context::SessionContext;
pub use error::{SessionError, SessionResult};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, TOKEN_ENTRY, USER_ENTRY};

use serde::{Deserialize, Serialize};

use crate::types::User;

/// Authenticated identity held by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token, trusted until the server rejects it
    pub token: String,
    pub user: User,
}
