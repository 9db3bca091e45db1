use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::api::{PortalError, Result};

use super::RemoteFile;

/// Files of one portal directory, keyed by filename.
///
/// Iterates in the order each filename first appeared in the portal
/// response. Inserting a filename that is already present replaces the
/// stored file in place, so the later entry of a response wins.
#[derive(Debug, Clone, Default)]
pub struct DirectoryListing {
    directory: String,
    files: Vec<RemoteFile>,
    index: HashMap<String, usize>,
}

impl DirectoryListing {
    pub fn new(directory: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            files: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn from_files(directory: impl Into<String>, files: impl IntoIterator<Item = RemoteFile>) -> Self {
        let mut listing = Self::new(directory);
        for file in files {
            listing.insert(file);
        }
        listing
    }

    /// Insert a file, returning the one it replaced if the filename was taken
    pub fn insert(&mut self, file: RemoteFile) -> Option<RemoteFile> {
        match self.index.get(&file.filename) {
            Some(&position) => Some(std::mem::replace(&mut self.files[position], file)),
            None => {
                self.index.insert(file.filename.clone(), self.files.len());
                self.files.push(file);
                None
            }
        }
    }

    /// Name of the remote directory this listing was fetched from
    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, filename: &str) -> Option<&RemoteFile> {
        self.index.get(filename).map(|&position| &self.files[position])
    }

    /// Look up a file, failing with `FileNotFound` when it is not listed
    pub fn require(&self, filename: &str) -> Result<&RemoteFile> {
        self.get(filename)
            .ok_or_else(|| PortalError::FileNotFound(filename.to_string()))
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.index.contains_key(filename)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RemoteFile> {
        self.files.iter()
    }

    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.filename.as_str())
    }

    /// Files the portal has never recorded a read for
    pub fn unread(&self) -> DirectoryListing {
        DirectoryListing::from_files(
            self.directory.clone(),
            self.files.iter().filter(|f| f.is_unread()).cloned(),
        )
    }

    /// The file with the greatest put date.
    ///
    /// On equal put dates the file iterated later wins. A file whose put
    /// date cannot be read fails the selection with `InvalidResponse`.
    pub fn latest(&self) -> Result<&RemoteFile> {
        let mut best: Option<(&RemoteFile, NaiveDateTime)> = None;
        for file in &self.files {
            let put_date = file.put_date()?;
            match best {
                Some((_, best_date)) if put_date < best_date => {}
                _ => best = Some((file, put_date)),
            }
        }
        best.map(|(file, _)| file)
            .ok_or_else(|| PortalError::EmptyListing(self.directory.clone()))
    }
}

impl<'a> IntoIterator for &'a DirectoryListing {
    type Item = &'a RemoteFile;
    type IntoIter = std::slice::Iter<'a, RemoteFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}
