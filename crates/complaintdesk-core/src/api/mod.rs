//! REST API client module for the complaints service.
//!
//! This module provides the `ApiClient` for communicating with the
//! complaints API: authentication, complaints with their comments and
//! audit history, tags, and admin user management.
//!
//! The API uses bearer token authentication. Tokens are obtained from
//! `POST /users/token` and silently renewed once per request when the
//! API answers `401 Unauthorized`.

pub mod admin;
pub mod client;
pub mod complaints;
pub mod error;
pub mod request;
pub mod tags;

pub use client::{ApiClient, ApiClientBuilder, TOKEN_PATH};
pub use error::ApiError;
pub use request::ApiRequest;
