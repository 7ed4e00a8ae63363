//! Authentication module for managing user sessions and credentials.
//!
//! This module provides:
//! - `SessionStore`: Durable key-value storage for the session keys
//!   (`token`, `username`, `temp_password`)
//! - `FileSessionStore` / `MemorySessionStore`: Disk-backed and in-process stores
//! - `KeyringSessionStore`: Routes the cached password to the OS keychain
//! - `Session`: Typed view over the three session keys
//! - `Navigator`: Sink for the "go back to the login screen" side effect
//! - `IdleTimeout`: Inactivity logout after 30 minutes

pub mod credentials;
pub mod idle;
pub mod navigator;
pub mod session;
pub mod store;

pub use credentials::{CredentialBackend, CredentialStore, KeyringSessionStore, MemoryCredentials};
pub use idle::IdleTimeout;
pub use navigator::{ChannelNavigator, LogNavigator, Navigator, LOGIN_ROUTE};
pub use session::Session;
pub use store::{FileSessionStore, MemorySessionStore, SessionKey, SessionStore, StoreError};
