//! Utility functions for display formatting.

pub mod format;

pub use format::{format_last_read, format_timestamp};
