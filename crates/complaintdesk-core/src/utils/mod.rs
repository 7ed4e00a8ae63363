//! Utility functions for formatting and display.

pub mod format;

pub use format::{format_date, format_optional, truncate_string};
