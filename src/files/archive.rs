//! Zip archive reading
//!
//! [`ZipReader`] wraps an in-memory zip blob, enumerates its entries and
//! extracts them on demand. Extracted entries are rebuilt in the same
//! [`Blob`] representation the archive itself arrived in, so a bundle and
//! its entries hash identically no matter which representation the caller
//! chose.

use std::io::{Cursor, Read};

use zip::result::ZipError;
use zip::ZipArchive;

use crate::content::{Blob, BlobKind};
use crate::files::error::{Error, Result};

/// An opened in-memory zip archive
#[derive(Debug)]
pub struct ZipReader {
    archive: ZipArchive<Cursor<Vec<u8>>>,
    kind: BlobKind,
}

impl ZipReader {
    /// Open a zip-formatted blob
    ///
    /// Fails with [`Error::CorruptArchive`] when the bytes are not a
    /// valid zip structure.
    pub fn open(blob: &Blob) -> Result<Self> {
        let cursor = Cursor::new(blob.as_bytes().to_vec());
        let archive =
            ZipArchive::new(cursor).map_err(|e| Error::corrupt_archive(e.to_string()))?;
        Ok(Self {
            archive,
            kind: blob.kind(),
        })
    }

    /// List entry paths, skipping directories, dot-files and the names in
    /// `exclude`
    ///
    /// The exclusion set lets callers enumerate content entries and
    /// manifest entries separately. Paths come back sorted.
    pub fn entries(&self, exclude: &[&str]) -> Vec<String> {
        let mut names: Vec<String> = self
            .archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .filter(|name| {
                let base = basename(name);
                !base.starts_with('.') && !exclude.contains(&base)
            })
            .map(String::from)
            .collect();
        names.sort();
        names
    }

    /// Whether the archive holds an entry at the exact path
    pub fn contains(&self, path: &str) -> bool {
        self.archive.index_for_name(path).is_some()
    }

    /// Extract one entry as a blob in the archive's own representation
    pub fn extract(&mut self, path: &str) -> Result<Blob> {
        let mut entry = self.archive.by_name(path).map_err(|e| match e {
            ZipError::FileNotFound => Error::entry_not_found(path),
            other => Error::corrupt_archive(other.to_string()),
        })?;

        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        Ok(Blob::from_parts(self.kind, bytes))
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
