//! Archive Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An archive error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input is not a zip container, or its layout is not a single
    /// top-level directory. Skip this input.
    #[display("not a valid MAFF container")]
    BadContainer,
    /// The requested entry does not exist inside the top-level directory.
    #[display("entry not found: {_0}")]
    EntryNotFound(#[error(not(source))] String),
    /// The requested entry path escapes the top-level directory or is empty.
    #[display("invalid entry path: {_0}")]
    InvalidPath(#[error(not(source))] String),
    /// Reading the container (or one of its entries) failed.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }
}
