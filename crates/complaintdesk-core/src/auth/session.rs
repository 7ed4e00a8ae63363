use super::store::{SessionKey, SessionStore, StoreError};

/// A logged-in session: the bearer token plus the credentials cached for
/// silent re-authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub username: String,
    pub credential: String,
}

impl Session {
    pub fn new(access_token: String, username: String, credential: String) -> Self {
        Self {
            access_token,
            username,
            credential,
        }
    }

    /// Load the session from a store. Returns `None` unless all three keys are present.
    pub fn load(store: &dyn SessionStore) -> Option<Self> {
        Some(Self {
            access_token: store.get(SessionKey::Token)?,
            username: store.get(SessionKey::Username)?,
            credential: store.get(SessionKey::TempPassword)?,
        })
    }

    /// Write all three keys. The username goes first since keychain-backed
    /// stores address the credential by it.
    pub fn save(&self, store: &dyn SessionStore) -> Result<(), StoreError> {
        store.set(SessionKey::Username, &self.username)?;
        store.set(SessionKey::TempPassword, &self.credential)?;
        store.set(SessionKey::Token, &self.access_token)?;
        Ok(())
    }
}

// Keep secrets out of logs
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("username", &self.username)
            .field("credential", &"<redacted>")
            .finish()
    }
}
