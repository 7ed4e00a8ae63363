use chrono::{DateTime, Duration, Utc};
use tracing::info;

use super::navigator::{Navigator, LOGIN_ROUTE};
use super::store::{SessionKey, SessionStore, StoreError};

/// Inactivity period after which the session token is dropped.
const IDLE_TIMEOUT_MINUTES: i64 = 30;

/// Tracks user activity and logs the session out after a period of inactivity.
#[derive(Debug, Clone)]
pub struct IdleTimeout {
    timeout: Duration,
    last_activity: DateTime<Utc>,
}

impl Default for IdleTimeout {
    fn default() -> Self {
        Self::new()
    }
}

impl IdleTimeout {
    pub fn new() -> Self {
        Self::with_last_activity(Utc::now())
    }

    /// Resume tracking from a previously recorded activity time
    pub fn with_last_activity(last_activity: DateTime<Utc>) -> Self {
        Self {
            timeout: Duration::minutes(IDLE_TIMEOUT_MINUTES),
            last_activity,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    pub fn record_activity(&mut self) {
        self.last_activity = Utc::now();
    }

    pub fn is_idle(&self) -> bool {
        self.is_idle_at(Utc::now())
    }

    pub fn is_idle_at(&self, now: DateTime<Utc>) -> bool {
        now - self.last_activity >= self.timeout
    }

    /// If idle, drop the token and navigate to the login route.
    ///
    /// Only the token is removed; the cached username and credential stay so
    /// the login screen can be pre-filled. Returns whether a logout happened.
    pub fn expire_if_idle(
        &self,
        store: &dyn SessionStore,
        navigator: &dyn Navigator,
    ) -> Result<bool, StoreError> {
        if !self.is_idle() || store.get(SessionKey::Token).is_none() {
            return Ok(false);
        }
        info!(
            idle_minutes = (Utc::now() - self.last_activity).num_minutes(),
            "Idle timeout reached, logging out"
        );
        store.remove(SessionKey::Token)?;
        navigator.navigate(LOGIN_ROUTE);
        Ok(true)
    }
}
