use std::time::Duration;

use reqwest::{Client, Response};
use tracing::debug;

use crate::api::{PortalError, Result};

/// Cookie-carrying HTTP channel to the portal.
///
/// Every request goes through the same cookie store, so once the login
/// handshake has run the session stays authenticated for later calls.
/// Clone is cheap and shares the cookie store.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    base_url: String,
}

impl Session {
    /// Build a session for `base_url`. No request is made.
    ///
    /// `timeout` applies to each request as a whole; `None` leaves requests
    /// without a deadline.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .user_agent(concat!("corner-transfer/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join the base URL and a relative path with exactly one slash.
    ///
    /// Query strings are part of `path` and are passed through untouched.
    pub fn resolve_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Absolute download URLs are used as given, relative ones are resolved
    /// against the base URL.
    pub fn download_url(&self, uri: &str) -> String {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            uri.to_string()
        } else {
            self.resolve_url(uri.trim_start_matches('/'))
        }
    }

    pub(crate) async fn get(&self, url: &str) -> Result<Response> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await?;
        Self::check_response(url, response).await
    }

    pub(crate) async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<Response> {
        debug!(url, "POST");
        let response = self.client.post(url).form(form).send().await?;
        Self::check_response(url, response).await
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(url: &str, response: Response) -> Result<Response> {
        let status = response.status();
        debug!(url, status = %status, "Response received");
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(PortalError::from_status(status, url, &body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url_single_slash() {
        let session = Session::new("https://ft.corner.ch/", None).unwrap();
        assert_eq!(session.resolve_url("static"), "https://ft.corner.ch/static");

        let session = Session::new("https://ft.corner.ch", None).unwrap();
        assert_eq!(session.resolve_url("auth/login"), "https://ft.corner.ch/auth/login");
    }

    #[test]
    fn test_resolve_url_strips_every_trailing_slash() {
        let session = Session::new("https://ft.corner.ch///", None).unwrap();
        assert_eq!(session.resolve_url("static"), "https://ft.corner.ch/static");
    }

    #[test]
    fn test_resolve_url_keeps_query() {
        let session = Session::new("https://ft.corner.ch/", None).unwrap();
        assert_eq!(
            session.resolve_url("files/OUT?spcmd=splist"),
            "https://ft.corner.ch/files/OUT?spcmd=splist"
        );
    }

    #[test]
    fn test_download_url() {
        let session = Session::new("https://ft.corner.ch/", Some(Duration::from_secs(5))).unwrap();
        assert_eq!(
            session.download_url("https://cdn.corner.ch/files/OUT/a.csv"),
            "https://cdn.corner.ch/files/OUT/a.csv"
        );
        assert_eq!(
            session.download_url("/files/OUT/a.csv"),
            "https://ft.corner.ch/files/OUT/a.csv"
        );
        assert_eq!(
            session.download_url("files/OUT/a.csv"),
            "https://ft.corner.ch/files/OUT/a.csv"
        );
    }
}
