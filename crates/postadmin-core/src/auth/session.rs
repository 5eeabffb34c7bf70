use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Storage for the current bearer token.
///
/// At most one token is held at a time and the last `set`/`clear` wins.
/// Implementations never surface storage failures to callers; they log them.
pub trait SessionStore: Send + Sync {
    /// Current token, if any. Has no side effects.
    fn get(&self) -> Option<String>;

    /// Persist `token`, replacing any previous value.
    fn set(&self, token: &str);

    /// Remove the token.
    fn clear(&self);

    fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }
}

/// Process-local store. Clones share the same token.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    token: Arc<RwLock<Option<String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.set(token);
        store
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<String> {
        self.token.read().clone()
    }

    fn set(&self, token: &str) {
        *self.token.write() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.write() = None;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub saved_at: DateTime<Utc>,
}

/// Durable store backed by a JSON file in the cache directory.
///
/// Every `get` reads the file, so separate handles on the same directory
/// observe each other's writes.
pub struct FileSessionStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileSessionStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            path: cache_dir.join(SESSION_FILE),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the current token was stored, if there is one.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        let _guard = self.lock.read();
        self.read_stored().map(|s| s.saved_at)
    }

    fn load(&self) -> Result<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents =
            std::fs::read_to_string(&self.path).context("Failed to read session file")?;
        let data: StoredSession =
            serde_json::from_str(&contents).context("Failed to parse session file")?;
        Ok(Some(data))
    }

    fn read_stored(&self) -> Option<StoredSession> {
        match self.load() {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "Ignoring unreadable session file");
                None
            }
        }
    }

    fn save(&self, data: &StoredSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<String> {
        let _guard = self.lock.read();
        self.read_stored().map(|s| s.token)
    }

    fn set(&self, token: &str) {
        let _guard = self.lock.write();
        let data = StoredSession {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        match self.save(&data) {
            Ok(()) => debug!(path = %self.path.display(), "Session saved"),
            Err(e) => warn!(error = %e, "Failed to save session"),
        }
    }

    fn clear(&self) {
        let _guard = self.lock.write();
        match self.remove() {
            Ok(()) => debug!(path = %self.path.display(), "Session cleared"),
            Err(e) => warn!(error = %e, "Failed to remove session file"),
        }
    }
}
