//! Conversion Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use maff_archive::error::ErrorKind as ArchiveErrorKind;
use maff_manifest::error::ErrorKind as ManifestErrorKind;
use std::path::PathBuf;

/// A conversion error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
/// Every variant is fatal for the archive being converted and for nothing
/// else; the batch moves on to the next input.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input could not be read as a MAFF container.
    #[display("archive: {_0}")]
    Archive(#[error(not(source))] ArchiveErrorKind),
    /// The manifest is incomplete or names an unknown charset.
    #[display("manifest: {_0}")]
    Manifest(#[error(not(source))] ManifestErrorKind),
    /// The output document could not be assembled.
    #[display("could not assemble output document")]
    Render,
    /// The output document could not be compressed.
    #[display("could not compress output document")]
    Compression,
    /// Writing the output file failed; no partial output is left behind.
    #[display("could not write {}", _0.display())]
    OutputWrite(#[error(not(source))] PathBuf),
    /// The source modification time could not be copied to the output.
    #[display("could not copy modification time to {}", _0.display())]
    Timestamp(#[error(not(source))] PathBuf),
    /// An input path could not be read while looking for archives.
    #[display("could not search {}", _0.display())]
    Discovery(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ErrorKind::Archive(kind) => kind.is_retryable(),
            ErrorKind::OutputWrite(_) | ErrorKind::Timestamp(_) | ErrorKind::Discovery(_) => true,
            _ => false,
        }
    }
}
