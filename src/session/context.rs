//! Shared Session Context
//!
//! The one in-memory copy of the signed-in session. Every network-calling
//! collaborator holds a clone; all mutations go through `establish` and
//! `invalidate`, which serialize on a single async lock so the store and
//! the in-memory value never disagree.

use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;

use super::error::SessionResult;
use super::store::SessionStore;
use super::Session;
use crate::types::User;

/// Cheaply cloneable handle to the current session
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn SessionStore>,
    current: RwLock<Option<Session>>,
    write_lock: Mutex<()>,
}

impl SessionContext {
    /// Create a context with a known initial session
    pub fn new(store: Arc<dyn SessionStore>, initial: Option<Session>) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                current: RwLock::new(initial),
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Load the persisted session once and wrap it
    pub async fn restore(store: Arc<dyn SessionStore>) -> SessionResult<Self> {
        let initial = store.load().await?;
        match &initial {
            Some(session) => tracing::info!(user = %session.user.email, "Restored session"),
            None => tracing::debug!("No stored session"),
        }
        Ok(Self::new(store, initial))
    }

    pub fn current(&self) -> Option<Session> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Bearer token, read at call time
    pub fn token(&self) -> Option<String> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Persist a freshly authenticated session and make it current
    pub async fn establish(&self, session: Session) -> SessionResult<()> {
        let _guard = self.inner.write_lock.lock().await;

        self.inner.store.save(&session).await?;
        tracing::info!(user = %session.user.email, "Signed in");
        *self
            .inner
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(session);
        Ok(())
    }

    /// Drop the session from memory and storage.
    ///
    /// Returns whether a session was present. Safe to call concurrently;
    /// later callers find nothing left to clear.
    pub async fn invalidate(&self) -> SessionResult<bool> {
        let _guard = self.inner.write_lock.lock().await;

        let previous = self
            .inner
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.inner.store.clear().await?;

        if let Some(session) = &previous {
            tracing::info!(user = %session.user.email, "Session cleared");
        }
        Ok(previous.is_some())
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{FileSessionStore, MemorySessionStore};
    use tempfile::tempdir;

    fn sample_session() -> Session {
        Session {
            token: "tok-123".to_string(),
            user: User {
                id: "u1".to_string(),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_establish_then_restore() {
        let dir = tempdir().unwrap();
        let store = Arc::new(FileSessionStore::new(dir.path()));

        let ctx = SessionContext::restore(store.clone()).await.unwrap();
        assert!(!ctx.is_authenticated());

        ctx.establish(sample_session()).await.unwrap();
        assert_eq!(ctx.token().as_deref(), Some("tok-123"));

        // Simulates the next process start
        let restored = SessionContext::restore(store).await.unwrap();
        assert_eq!(restored.current(), Some(sample_session()));
        assert_eq!(restored.user().unwrap().name, "Ada");
    }

    #[tokio::test]
    async fn test_invalidate_clears_memory_and_store() {
        let store = Arc::new(MemorySessionStore::with_session(sample_session()));
        let ctx = SessionContext::restore(store.clone()).await.unwrap();

        assert!(ctx.invalidate().await.unwrap());
        assert!(ctx.current().is_none());
        assert!(ctx.token().is_none());
        assert!(store.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_invalidate_is_idempotent() {
        let store = Arc::new(MemorySessionStore::with_session(sample_session()));
        let ctx = SessionContext::restore(store.clone()).await.unwrap();

        let (a, b) = tokio::join!(ctx.invalidate(), ctx.invalidate());
        let cleared = [a.unwrap(), b.unwrap()];

        assert_eq!(cleared.iter().filter(|c| **c).count(), 1);
        assert!(!ctx.is_authenticated());
        assert!(store.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let ctx = SessionContext::new(Arc::new(MemorySessionStore::new()), None);
        let other = ctx.clone();

        ctx.establish(sample_session()).await.unwrap();
        assert!(other.is_authenticated());

        other.invalidate().await.unwrap();
        assert!(!ctx.is_authenticated());
    }
}
