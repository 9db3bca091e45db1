//! Data models for portal directory listings.
//!
//! - `FileEntry`, `ListingResponse`: raw JSON shapes returned by the portal
//! - `RemoteFile`: one file, timestamps parsed on access
//! - `DirectoryListing`: filename-keyed files with the unread filter and
//!   latest-file selection

pub mod file;
pub mod listing;

pub use file::{parse_timestamp, FileEntry, ListingResponse, RemoteFile};
pub use listing::DirectoryListing;
