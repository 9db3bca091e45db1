//! corner-transfer-core - client library for the Cornèr Bank data transfer portal.
//!
//! Logs into the portal with a form login, lists remote directories, picks
//! the latest or unread files and downloads them, optionally decrypting
//! them with the local GnuPG keyring.

pub mod api;
pub mod auth;
pub mod config;
pub mod crypto;
pub mod models;
pub mod utils;

pub use api::{PortalClient, PortalError, Result, DEFAULT_DIRECTORY, DEFAULT_URL};
pub use auth::{CredentialStore, Credentials, Session};
pub use config::Config;
pub use crypto::{Decryptor, GpgDecryptor};
pub use models::{DirectoryListing, RemoteFile};
