use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("HTTP {status} from {url}: {body}")]
    Http {
        status: StatusCode,
        url: String,
        body: String,
    },

    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Invalid filename \"{0}\"")]
    FileNotFound(String),

    #[error("No files in directory \"{0}\"")]
    EmptyListing(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PortalError>;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl PortalError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: StatusCode, url: &str, body: &str) -> Self {
        PortalError::Http {
            status,
            url: url.to_string(),
            body: Self::truncate_body(body),
        }
    }

    /// HTTP status code, if this error came from a non-2xx portal response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            PortalError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
