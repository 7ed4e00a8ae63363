use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use keyring::Entry;
use tracing::{debug, warn};

use super::store::{SessionKey, SessionStore, StoreError};

const SERVICE_NAME: &str = "complaintdesk";

/// Password storage addressed by username.
pub trait CredentialBackend: Send + Sync {
    fn set_password(&self, username: &str, password: &str) -> Result<(), StoreError>;

    /// `None` if no password is stored for the username
    fn get_password(&self, username: &str) -> Result<Option<String>, StoreError>;

    /// Missing entries are ignored.
    fn delete(&self, username: &str) -> Result<(), StoreError>;
}

impl<T: CredentialBackend + ?Sized> CredentialBackend for Arc<T> {
    fn set_password(&self, username: &str, password: &str) -> Result<(), StoreError> {
        (**self).set_password(username, password)
    }

    fn get_password(&self, username: &str) -> Result<Option<String>, StoreError> {
        (**self).get_password(username)
    }

    fn delete(&self, username: &str) -> Result<(), StoreError> {
        (**self).delete(username)
    }
}

/// The OS keychain, one entry per username.
#[derive(Debug, Default, Clone, Copy)]
pub struct CredentialStore;

impl CredentialBackend for CredentialStore {
    fn set_password(&self, username: &str, password: &str) -> Result<(), StoreError> {
        Entry::new(SERVICE_NAME, username)?.set_password(password)?;
        Ok(())
    }

    fn get_password(&self, username: &str) -> Result<Option<String>, StoreError> {
        match Entry::new(SERVICE_NAME, username)?.get_password() {
            Ok(password) => Ok(Some(password)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, username: &str) -> Result<(), StoreError> {
        match Entry::new(SERVICE_NAME, username)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process credential backend for tests and keychain-less environments.
#[derive(Debug, Default)]
pub struct MemoryCredentials {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored passwords
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CredentialBackend for MemoryCredentials {
    fn set_password(&self, username: &str, password: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(username.to_string(), password.to_string());
        Ok(())
    }

    fn get_password(&self, username: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(username)
            .cloned())
    }

    fn delete(&self, username: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(username);
        Ok(())
    }
}

/// Session store that keeps `temp_password` in a credential backend (the OS
/// keychain by default) and every other key in the wrapped store.
///
/// The credential is addressed by the cached username, so the username must
/// be stored before the password and removed after it. Changing the cached
/// username deletes the previous user's credential.
pub struct KeyringSessionStore<S, C = CredentialStore> {
    inner: S,
    credentials: C,
}

impl<S: SessionStore> KeyringSessionStore<S> {
    pub fn new(inner: S) -> Self {
        Self::with_backend(inner, CredentialStore)
    }
}

impl<S: SessionStore, C: CredentialBackend> KeyringSessionStore<S, C> {
    pub fn with_backend(inner: S, credentials: C) -> Self {
        Self { inner, credentials }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: SessionStore, C: CredentialBackend> SessionStore for KeyringSessionStore<S, C> {
    fn get(&self, key: SessionKey) -> Option<String> {
        if key != SessionKey::TempPassword {
            return self.inner.get(key);
        }
        let username = self.inner.get(SessionKey::Username)?;
        match self.credentials.get_password(&username) {
            Ok(password) => password,
            Err(e) => {
                warn!(error = %e, "Failed to read cached password from keychain");
                None
            }
        }
    }

    fn set(&self, key: SessionKey, value: &str) -> Result<(), StoreError> {
        match key {
            SessionKey::TempPassword => {
                let username = self
                    .inner
                    .get(SessionKey::Username)
                    .ok_or(StoreError::MissingUsername)?;
                self.credentials.set_password(&username, value)
            }
            SessionKey::Username => {
                if let Some(previous) = self.inner.get(SessionKey::Username) {
                    if previous != value {
                        debug!(previous = %previous, "Cached user changed, dropping old credential");
                        self.credentials.delete(&previous)?;
                    }
                }
                self.inner.set(key, value)
            }
            SessionKey::Token => self.inner.set(key, value),
        }
    }

    fn remove(&self, key: SessionKey) -> Result<(), StoreError> {
        if key != SessionKey::TempPassword {
            return self.inner.remove(key);
        }
        match self.inner.get(SessionKey::Username) {
            Some(username) => self.credentials.delete(&username),
            None => Ok(()),
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.remove(SessionKey::TempPassword)?;
        self.inner.clear()
    }
}
