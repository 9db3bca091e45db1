//! Client for the Cornèr Bank data transfer portal.
//!
//! This module provides the `PortalClient` struct which logs into the
//! portal, lists remote directories and downloads (and decrypts) files.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::auth::{Credentials, Session};
use crate::crypto::{Decryptor, GpgDecryptor};
use crate::models::{DirectoryListing, ListingResponse, RemoteFile};

use super::{PortalError, Result};

// ============================================================================
// Constants
// ============================================================================

/// Portal base URL used when none is configured
pub const DEFAULT_URL: &str = "https://ft.corner.ch/";

/// Remote directory holding files for the customer to pick up
pub const DEFAULT_DIRECTORY: &str = "OUT";

/// HTTP request timeout in seconds.
/// Downloads are single blocking bodies, so this is generous.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Fetched only to receive the initial session cookies
const STATIC_PATH: &str = "static";

const LOGIN_PATH: &str = "auth/login";

/// Portal client. Owns the credentials, the cookie session and the
/// decryptor used for downloaded content.
pub struct PortalClient {
    credentials: Credentials,
    session: Session,
    decryptor: Box<dyn Decryptor>,
}

impl PortalClient {
    /// Create a client with the default request timeout and gpg decryption.
    /// No request is made until [`login`](Self::login).
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_timeout(
            credentials,
            Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
        )
    }

    /// Create a client with an explicit per-request timeout (`None` disables it)
    pub fn with_timeout(credentials: Credentials, timeout: Option<Duration>) -> Result<Self> {
        let session = Session::new(credentials.base_url(), timeout)?;
        Ok(Self {
            credentials,
            session,
            decryptor: Box::new(GpgDecryptor::default()),
        })
    }

    /// Replace the decryptor used by `content(.., true)` and `download(.., true)`
    pub fn with_decryptor(mut self, decryptor: Box<dyn Decryptor>) -> Self {
        self.decryptor = decryptor;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn resolve_url(&self, path: &str) -> String {
        self.session.resolve_url(path)
    }

    /// Log into the portal.
    ///
    /// Primes the cookie store with `GET static`, then posts the credentials
    /// as a form to `auth/login`. Either step failing aborts the login.
    /// Calling this again re-authenticates.
    pub async fn login(&self) -> Result<()> {
        let static_url = self.resolve_url(STATIC_PATH);
        self.session.get(&static_url).await?;

        let login_url = self.resolve_url(LOGIN_PATH);
        let form = [
            ("username", self.credentials.username()),
            ("password", self.credentials.password()),
        ];
        self.session.post_form(&login_url, &form).await?;

        info!(username = self.credentials.username(), "Login successful");
        Ok(())
    }

    // ===== Directory Listing =====

    /// Fetch the files of a remote directory, keyed by filename.
    ///
    /// A filename listed twice keeps the later entry. Timestamps are not
    /// checked here; a file with a broken date is still listed.
    pub async fn list_files(&self, directory: &str) -> Result<DirectoryListing> {
        let url = self.resolve_url(&format!("files/{}?spcmd=splist", directory));
        let response = self.session.get(&url).await?;
        let body = response.bytes().await?;

        let parsed: ListingResponse = serde_json::from_slice(&body).map_err(|e| {
            PortalError::InvalidResponse(format!("directory listing of {}: {}", directory, e))
        })?;

        let mut listing = DirectoryListing::new(directory);
        for entry in parsed.files {
            let file = RemoteFile::from_entry(entry);
            if let Some(replaced) = listing.insert(file) {
                warn!(filename = %replaced.filename, id = %replaced.id, "Duplicate filename in listing, keeping later entry");
            }
        }

        debug!(directory, count = listing.len(), "Directory listed");
        Ok(listing)
    }

    /// Fetch the files of a directory that have never been read
    pub async fn list_unread_files(&self, directory: &str) -> Result<DirectoryListing> {
        let unread = self.list_files(directory).await?.unread();
        debug!(directory, count = unread.len(), "Unread files selected");
        Ok(unread)
    }

    /// Fetch the most recently put file of a directory.
    ///
    /// Fails with `EmptyListing` when the directory has no files, and with
    /// `InvalidResponse` when a put date cannot be read.
    pub async fn latest_file(&self, directory: &str) -> Result<RemoteFile> {
        let listing = self.list_files(directory).await?;
        let latest = listing.latest()?.clone();
        debug!(directory, filename = %latest.filename, put_date = ?latest.raw_put_date, "Latest file selected");
        Ok(latest)
    }

    // ===== File Content =====

    /// Fetch the content of a file, decrypting it when `decrypt` is set.
    ///
    /// Undecrypted content is returned as the raw response bytes.
    pub async fn content(&self, file: &RemoteFile, decrypt: bool) -> Result<Vec<u8>> {
        let url = self.session.download_url(&file.download_uri);
        let response = self.session.get(&url).await?;
        let body = response.bytes().await?;
        debug!(filename = %file.filename, bytes = body.len(), "File content received");

        if decrypt {
            self.decryptor.decrypt(&body).await
        } else {
            Ok(body.to_vec())
        }
    }

    /// Download a file to `destination`, replacing any existing file.
    ///
    /// Nothing is written when fetching or decrypting fails.
    pub async fn download(&self, file: &RemoteFile, destination: impl AsRef<Path>, decrypt: bool) -> Result<()> {
        let destination = destination.as_ref();
        let content = self.content(file, decrypt).await?;
        tokio::fs::write(destination, &content).await?;

        info!(
            filename = %file.filename,
            destination = %destination.display(),
            bytes = content.len(),
            decrypted = decrypt,
            "File downloaded"
        );
        Ok(())
    }
}
