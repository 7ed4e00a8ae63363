//! Core library for complaintdesk.
//!
//! Provides the authenticated API client for the complaints service, the
//! session storage it relies on, the API data models and configuration.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError, ApiRequest};
pub use auth::{Navigator, Session, SessionKey, SessionStore};
pub use config::Config;
