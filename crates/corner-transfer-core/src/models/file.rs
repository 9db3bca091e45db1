use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::{PortalError, Result};

/// Attribute key holding the time the file was placed on the portal
pub const PUT_DATE_ATTRIBUTE: &str = "FSR_FILE_SYS_MD.START_PUT_DATE";

/// Attribute key holding the time the file was last read (empty when unread)
pub const LAST_READ_DATE_ATTRIBUTE: &str = "FSR_FILE_SYS_MD.LAST_READ_DATE";

/// Body of `GET files/{directory}?spcmd=splist`
#[derive(Debug, Deserialize)]
pub struct ListingResponse {
    pub files: Vec<FileEntry>,
}

/// One raw entry of the portal's `files` array
#[derive(Debug, Clone, Deserialize)]
pub struct FileEntry {
    // Seen as both strings and numbers
    #[serde(default)]
    pub id: Value,
    pub filename: String,
    #[serde(rename = "downloadUri")]
    pub download_uri: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

/// A file available for download in a portal directory.
///
/// Holds passive data only. Content is fetched through the
/// [`PortalClient`](crate::api::PortalClient) that produced the listing.
///
/// Timestamps are kept as the portal sent them and parsed on access, so a
/// file with a broken date still lists and downloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteFile {
    pub id: String,
    pub filename: String,
    pub download_uri: String,
    /// `None` when the attribute is missing or not a string
    #[serde(rename = "put_date")]
    pub raw_put_date: Option<String>,
    #[serde(rename = "last_read_date")]
    pub raw_last_read_date: Option<String>,
}

impl RemoteFile {
    pub fn from_entry(entry: FileEntry) -> Self {
        let id = match entry.id {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };

        Self {
            id,
            raw_put_date: attribute_string(&entry.attributes, PUT_DATE_ATTRIBUTE),
            raw_last_read_date: attribute_string(&entry.attributes, LAST_READ_DATE_ATTRIBUTE),
            filename: entry.filename,
            download_uri: entry.download_uri,
        }
    }

    /// Time the file was placed on the portal.
    ///
    /// Fails with `InvalidResponse` naming the file when the attribute is
    /// missing, empty or unparseable.
    pub fn put_date(&self) -> Result<NaiveDateTime> {
        let raw = self.raw_put_date.as_deref().ok_or_else(|| {
            PortalError::InvalidResponse(format!(
                "file \"{}\" has no {} attribute",
                self.filename, PUT_DATE_ATTRIBUTE
            ))
        })?;
        parse_timestamp(raw)
            .map_err(|e| invalid_timestamp(&self.filename, PUT_DATE_ATTRIBUTE, &e))?
            .ok_or_else(|| {
                PortalError::InvalidResponse(format!(
                    "file \"{}\" has an empty {} attribute",
                    self.filename, PUT_DATE_ATTRIBUTE
                ))
            })
    }

    /// Time the file was last read, `None` when it never was
    pub fn last_read_date(&self) -> Result<Option<NaiveDateTime>> {
        match self.raw_last_read_date.as_deref() {
            Some(raw) => parse_timestamp(raw)
                .map_err(|e| invalid_timestamp(&self.filename, LAST_READ_DATE_ATTRIBUTE, &e)),
            None => Ok(None),
        }
    }

    /// A file is unread when the portal has no last-read timestamp for it.
    ///
    /// Only checks for presence: an unparseable value still counts as read.
    pub fn is_unread(&self) -> bool {
        self.raw_last_read_date
            .as_deref()
            .map_or(true, |raw| raw.trim_end_matches('Z').is_empty())
    }
}

impl fmt::Display for RemoteFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.filename)
    }
}

fn attribute_string(attributes: &Map<String, Value>, key: &str) -> Option<String> {
    attributes.get(key).and_then(Value::as_str).map(str::to_string)
}

fn invalid_timestamp(filename: &str, key: &str, raw: &str) -> PortalError {
    PortalError::InvalidResponse(format!(
        "file \"{}\" has an unparseable {} value \"{}\"",
        filename, key, raw
    ))
}

/// Parse a portal timestamp as a naive local timestamp.
///
/// Trailing `Z` markers are stripped and no timezone conversion is applied.
/// Returns `Ok(None)` when nothing is left after stripping, and `Err` with
/// the stripped input when no supported layout matches.
pub fn parse_timestamp(raw: &str) -> std::result::Result<Option<NaiveDateTime>, String> {
    let value = raw.trim_end_matches('Z');
    if value.is_empty() {
        return Ok(None);
    }

    const LAYOUTS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for layout in LAYOUTS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, layout) {
            return Ok(Some(parsed));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0));
    }

    // Explicit offsets keep their wall-clock time
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(parsed.naive_local()));
    }

    Err(value.to_string())
}
