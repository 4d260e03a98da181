//! In-memory reader for MAFF containers.
//!
//! A MAFF file is a zip container whose entries all live under a single
//! top-level directory (one directory per saved page). [`Archive`] opens the
//! container entirely in memory, detects that directory, and serves entry
//! payloads by their path relative to it. Nothing is ever extracted to disk.

pub mod error;
mod path;

use crate::error::{ErrorKind, Result};
pub use crate::path::normalize as normalize_entry_path;
use exn::ResultExt;
use std::collections::BTreeSet;
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::instrument;
use zip::ZipArchive;
use zip::result::ZipError;

/// Name of the metadata manifest inside the top-level directory.
pub const MANIFEST_NAME: &str = "index.rdf";

/// An opened MAFF container.
pub struct Archive {
    zip: ZipArchive<Cursor<Vec<u8>>>,
    root: String,
}
impl Archive {
    /// Reads the file at `path` into memory and opens it as a container.
    ///
    /// Failing to read the file is an [`Io`](ErrorKind::Io) error; a file
    /// that is readable but not a valid container is
    /// [`BadContainer`](ErrorKind::BadContainer).
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref()).or_raise(|| ErrorKind::Io)?;
        Self::from_bytes(bytes)
    }

    /// Opens an in-memory container.
    #[instrument(skip_all, fields(size, root))]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        tracing::Span::current().record("size", bytes.len());
        let zip = ZipArchive::new(Cursor::new(bytes)).or_raise(|| ErrorKind::BadContainer)?;
        let root = match top_level_directory(zip.file_names()) {
            Some(root) => root,
            None => exn::bail!(ErrorKind::BadContainer),
        };
        tracing::Span::current().record("root", root.as_str());
        tracing::debug!(entries = zip.len(), "Opened container");
        Ok(Self { zip, root })
    }

    /// The name of the single top-level directory (without trailing slash).
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Reads the payload of the entry at `path`, relative to the top-level directory.
    #[instrument(level = "debug", skip(self))]
    pub fn read(&mut self, path: &str) -> Result<Vec<u8>> {
        let name = self.entry_name(path)?;
        let mut file = match self.zip.by_name(&name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => exn::bail!(ErrorKind::EntryNotFound(name)),
            Err(e) => return Err(e).or_raise(|| ErrorKind::Io),
        };
        // The declared size comes from the container and can't be trusted
        // for an up-front allocation.
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer).or_raise(|| ErrorKind::Io)?;
        Ok(buffer)
    }

    /// Reads the `index.rdf` manifest.
    pub fn read_manifest(&mut self) -> Result<Vec<u8>> {
        self.read(MANIFEST_NAME)
    }

    fn entry_name(&self, path: &str) -> Result<String> {
        Ok(format!("{}/{}", self.root, normalize_entry_path(path)?))
    }
}

/// Finds the one directory that every entry lives under.
///
/// Returns `None` for an empty container, for entries stored at the root of
/// the container, and for containers holding more than one top-level
/// directory (multi-page MAFF files are not supported).
fn top_level_directory<'a>(names: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut roots = BTreeSet::new();
    for name in names {
        let (root, _) = name.split_once('/')?;
        if root.is_empty() {
            return None;
        }
        roots.insert(root);
    }
    match roots.len() {
        1 => roots.pop_first().map(str::to_string),
        _ => None,
    }
}
