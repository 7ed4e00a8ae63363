//! Data models for the complaints API.
//!
//! This module contains the request and response types exchanged with the
//! remote API:
//!
//! - `Complaint`, `ComplaintCreate`, `ComplaintUpdate`, `ComplaintFilter`
//! - `Comment`, `AuditLog`: Discussion and change history of a complaint
//! - `Tag`: Labels attached to complaints
//! - `User` and the admin user-management payloads

pub mod comment;
pub mod complaint;
pub mod tag;
pub mod user;

pub use comment::{AuditLog, Comment, CommentCreate};
pub use complaint::{
    Complaint, ComplaintCreate, ComplaintDetail, ComplaintFilter, ComplaintPriority, ComplaintStatus,
    ComplaintUpdate,
};
pub use tag::{Tag, TagCreate, TagUpdate, DEFAULT_TAG_COLOR};
pub use user::{PasswordReset, User, UserCreate, UserRole, UserUpdate};
