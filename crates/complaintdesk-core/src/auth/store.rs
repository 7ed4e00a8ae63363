//! Durable key-value storage for the session.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::debug;

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access session file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse session file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Cannot store a credential without a cached username")]
    MissingUsername,
}

/// The fixed keys a session is persisted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    Token,
    Username,
    TempPassword,
}

impl SessionKey {
    pub const ALL: [SessionKey; 3] = [SessionKey::Token, SessionKey::Username, SessionKey::TempPassword];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKey::Token => "token",
            SessionKey::Username => "username",
            SessionKey::TempPassword => "temp_password",
        }
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage for the session keys, shared by every in-flight request.
///
/// Individual operations are atomic; there is no multi-key transaction, so
/// two concurrent writers of the same key resolve as last-write-wins.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: SessionKey) -> Option<String>;

    fn set(&self, key: SessionKey, value: &str) -> Result<(), StoreError>;

    /// Removing a key that is not present is not an error.
    fn remove(&self, key: SessionKey) -> Result<(), StoreError>;

    /// Remove every session key.
    fn clear(&self) -> Result<(), StoreError> {
        for key in SessionKey::ALL {
            self.remove(key)?;
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic while holding the lock cannot leave the map half-written
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<BTreeMap<&'static str, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: SessionKey) -> Option<String> {
        lock(&self.entries).get(key.as_str()).cloned()
    }

    fn set(&self, key: SessionKey, value: &str) -> Result<(), StoreError> {
        lock(&self.entries).insert(key.as_str(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: SessionKey) -> Result<(), StoreError> {
        lock(&self.entries).remove(key.as_str());
        Ok(())
    }
}

/// Store persisted as a JSON object in `<cache_dir>/session.json`.
///
/// The file is rewritten on every mutation and deleted once the last key is
/// removed.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileSessionStore {
    /// Open the store in `cache_dir`, loading any existing session file.
    pub fn open(cache_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = cache_dir.as_ref().join(SESSION_FILE);
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), keys = entries.len(), "Session store opened");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the entries, write it out, and only then
    /// replace the in-memory map. A failed write leaves both sides unchanged.
    fn update(&self, change: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), StoreError> {
        let mut entries = lock(&self.entries);
        let mut updated = entries.clone();
        change(&mut updated);
        if updated == *entries {
            return Ok(());
        }
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if entries.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path)?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, contents)?;
        restrict_permissions(&self.path)?;
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: SessionKey) -> Option<String> {
        lock(&self.entries).get(key.as_str()).cloned()
    }

    fn set(&self, key: SessionKey, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.as_str().to_string(), value.to_string());
        })
    }

    fn remove(&self, key: SessionKey) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.remove(key.as_str());
        })
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.update(|entries| {
            for key in SessionKey::ALL {
                entries.remove(key.as_str());
            }
        })
    }
}
