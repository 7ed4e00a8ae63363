//! Application-level navigation triggered by the API client.
//!
//! When a silent re-authentication fails the client discards the session and
//! sends the application back to its login entry point. What "navigate" means
//! depends on the front end, so it is injected as a `Navigator`.

use tokio::sync::mpsc;
use tracing::warn;

/// Route of the login entry point
pub const LOGIN_ROUTE: &str = "/login";

pub trait Navigator: Send + Sync {
    /// Leave the current view for `route`, discarding any in-memory state.
    fn navigate(&self, route: &str);
}

/// Navigator that only logs. Used when no front end is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: &str) {
        warn!(route, "Session ended, navigation requested");
    }
}

/// Navigator that forwards each requested route over a channel so an event
/// loop can act on it.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: &str) {
        if self.tx.send(route.to_string()).is_err() {
            warn!(route, "Navigation receiver dropped");
        }
    }
}
