//! Authentication module for the portal session and credentials.
//!
//! This module provides:
//! - `Session`: cookie-carrying HTTP channel bound to the portal base URL
//! - `Credentials`: username, password and base URL for the login handshake
//! - `CredentialStore`: OS-level password storage via keyring
//!
//! The portal has no logout; a session lives as long as the process.

pub mod credentials;
pub mod session;

pub use credentials::{CredentialStore, Credentials};
pub use session::Session;
