//! Portal client module for the Cornèr Bank data transfer platform.
//!
//! This module provides the `PortalClient` for logging into the portal,
//! listing remote directories and downloading files.
//!
//! The portal uses cookie-based sessions obtained through a form login.

pub mod client;
pub mod error;

pub use client::{PortalClient, DEFAULT_DIRECTORY, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_URL};
pub use error::{PortalError, Result};
