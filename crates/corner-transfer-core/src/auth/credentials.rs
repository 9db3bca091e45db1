use std::fmt;

use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "corner-transfer";

/// Portal login details. Immutable once built.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
    base_url: String,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            base_url: base_url.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Portal passwords kept in the OS keychain.
///
/// Entries are keyed by username and portal host, so the same login on a
/// test portal and on production does not share a password.
pub struct CredentialStore;

impl CredentialStore {
    /// Store the password of a login that just succeeded
    pub fn store(credentials: &Credentials) -> Result<()> {
        Self::entry(credentials.username(), credentials.base_url())?
            .set_password(credentials.password())
            .context("Failed to store password in keychain")
    }

    /// Stored password for a username on a portal, `None` when there is none
    pub fn get_password(username: &str, base_url: &str) -> Result<Option<String>> {
        match Self::entry(username, base_url)?.get_password() {
            Ok(password) => Ok(Some(password)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve password from keychain"),
        }
    }

    /// Delete the stored password, returning whether one existed
    pub fn delete(username: &str, base_url: &str) -> Result<bool> {
        match Self::entry(username, base_url)?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(e).context("Failed to delete password from keychain"),
        }
    }

    fn entry(username: &str, base_url: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, &account(username, base_url))
            .context("Failed to create keyring entry")
    }
}

/// Keychain account name: `username@host`
fn account(username: &str, base_url: &str) -> String {
    let host = base_url
        .split_once("://")
        .map_or(base_url, |(_, rest)| rest)
        .trim_end_matches('/');
    format!("{}@{}", username, host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let credentials = Credentials::new("alice", "s3cret!", "https://ft.corner.ch/");
        let printed = format!("{:?}", credentials);
        assert!(printed.contains("alice"));
        assert!(printed.contains("<redacted>"));
        assert!(!printed.contains("s3cret!"));
    }

    #[test]
    fn test_accessors() {
        let credentials = Credentials::new("alice", "pw", "https://ft.corner.ch/");
        assert_eq!(credentials.username(), "alice");
        assert_eq!(credentials.password(), "pw");
        assert_eq!(credentials.base_url(), "https://ft.corner.ch/");
    }

    #[test]
    fn test_account_is_per_portal() {
        assert_eq!(account("alice", "https://ft.corner.ch/"), "alice@ft.corner.ch");
        assert_eq!(account("alice", "https://ft.corner.ch"), "alice@ft.corner.ch");
        assert_eq!(account("alice", "http://127.0.0.1:8080//"), "alice@127.0.0.1:8080");
        assert_ne!(
            account("alice", "https://ft.corner.ch/"),
            account("alice", "https://ft-test.corner.ch/")
        );
    }
}
