//! Persisted Session Storage
//!
//! Two entries make up a persisted session: the bearer token and the
//! serialized user profile. Both are written on login and removed on
//! logout; a store holding only one of them loads as signed out.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::io::AsyncWriteExt;

use super::error::SessionResult;
use super::Session;
use crate::types::User;

/// File name of the bearer token entry
pub const TOKEN_ENTRY: &str = "token";

/// File name of the serialized user entry
pub const USER_ENTRY: &str = "user.json";

/// Durable storage for the signed-in session
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the persisted session, `None` unless both entries are present
    async fn load(&self) -> SessionResult<Option<Session>>;

    /// Persist token and user
    async fn save(&self, session: &Session) -> SessionResult<()>;

    /// Remove both entries
    async fn clear(&self) -> SessionResult<()>;
}

/// Session entries kept as files in a directory
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_ENTRY)
    }

    fn user_path(&self) -> PathBuf {
        self.dir.join(USER_ENTRY)
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> SessionResult<Option<Session>> {
        let token = match read_entry(&self.token_path()).await? {
            Some(token) if !token.trim().is_empty() => token.trim().to_string(),
            _ => return Ok(None),
        };

        let Some(raw_user) = read_entry(&self.user_path()).await? else {
            tracing::warn!(dir = ?self.dir, "Token present without user profile, ignoring");
            return Ok(None);
        };

        match serde_json::from_str::<User>(&raw_user) {
            Ok(user) => Ok(Some(Session { token, user })),
            Err(e) => {
                tracing::warn!(dir = ?self.dir, error = %e, "Stored user profile is unreadable, ignoring");
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &Session) -> SessionResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        // The token goes last so a failed save never pairs it with the wrong user
        remove_entry(&self.token_path()).await?;
        let user = serde_json::to_string(&session.user)?;
        write_entry(&self.user_path(), &user).await?;
        write_entry(&self.token_path(), &session.token).await?;

        tracing::debug!(dir = ?self.dir, "Session persisted");
        Ok(())
    }

    async fn clear(&self) -> SessionResult<()> {
        remove_entry(&self.token_path()).await?;
        remove_entry(&self.user_path()).await?;
        tracing::debug!(dir = ?self.dir, "Session entries removed");
        Ok(())
    }
}

async fn read_entry(path: &Path) -> SessionResult<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write through a sibling tmp file created owner-only, then rename into place
async fn write_entry(path: &Path, contents: &str) -> SessionResult<()> {
    let tmp = path.with_extension("tmp");
    remove_entry(&tmp).await?;

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(&tmp).await?;
    file.write_all(contents.as_bytes()).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

async fn remove_entry(path: &Path) -> SessionResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// In-process store, lost when the process exits
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entry: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a session
    pub fn with_session(session: Session) -> Self {
        Self {
            entry: Mutex::new(Some(session)),
        }
    }

    /// Current contents, for inspection
    pub fn snapshot(&self) -> Option<Session> {
        self.entry
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> SessionResult<Option<Session>> {
        Ok(self.snapshot())
    }

    async fn save(&self, session: &Session) -> SessionResult<()> {
        *self
            .entry
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> SessionResult<()> {
        self.entry
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
    async fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session"));

        assert!(store.load().await.unwrap().is_none());

        store.save(&sample_session()).await.unwrap();

        // A fresh store over the same directory sees the same session
        let reopened = FileSessionStore::new(dir.path().join("session"));
        assert_eq!(reopened.load().await.unwrap(), Some(sample_session()));
    }

    #[tokio::test]
    async fn test_file_store_clear_removes_both_entries() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());

        store.save(&sample_session()).await.unwrap();
        store.clear().await.unwrap();

        assert!(!dir.path().join(TOKEN_ENTRY).exists());
        assert!(!dir.path().join(USER_ENTRY).exists());
        assert!(store.load().await.unwrap().is_none());

        // Clearing an empty store is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_token_without_user_is_signed_out() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(TOKEN_ENTRY), "tok-123").unwrap();

        let store = FileSessionStore::new(dir.path());
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_corrupt_user_is_signed_out() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(TOKEN_ENTRY), "tok-123").unwrap();
        std::fs::write(dir.path().join(USER_ENTRY), "{not json").unwrap();

        let store = FileSessionStore::new(dir.path());
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_failed_save_drops_previous_token() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        store.save(&sample_session()).await.unwrap();

        // Blocks the token write
        std::fs::create_dir(dir.path().join("token.tmp")).unwrap();

        let mut other = sample_session();
        other.token = "tok-456".to_string();
        other.user.id = "u2".to_string();
        assert!(store.save(&other).await.is_err());

        assert!(!dir.path().join(TOKEN_ENTRY).exists());
        assert!(store.load().await.unwrap().is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_store_entries_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        store.save(&sample_session()).await.unwrap();

        for entry in [TOKEN_ENTRY, USER_ENTRY] {
            let mode = std::fs::metadata(dir.path().join(entry))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o777, 0o600, "{}", entry);
        }
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemorySessionStore::new();
        store.save(&sample_session()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(sample_session()));

        store.clear().await.unwrap();
        assert!(store.snapshot().is_none());
    }
}
