//! Entry path normalization.
//!
//! Resource references are relative to the archive's top-level directory.
//! Normalizing them here keeps every read inside that directory.

use crate::error::{ErrorKind, Result};

/// Normalizes a `/`-separated path relative to the top-level directory.
///
/// Empty and `.` segments are dropped, `..` pops the previous segment. A path
/// that would leave the top-level directory, contains a NUL byte, or resolves
/// to nothing is rejected with [`InvalidPath`](crate::error::ErrorKind::InvalidPath).
///
/// # Examples
///
/// ```
/// use maff_archive::normalize_entry_path;
/// assert_eq!(normalize_entry_path("index_files/a.png").unwrap(), "index_files/a.png");
/// assert_eq!(normalize_entry_path("./index_files//b/../a.png").unwrap(), "index_files/a.png");
/// assert!(normalize_entry_path("../index.rdf").is_err());
/// ```
pub fn normalize(path: &str) -> Result<String> {
    let mut segments: Vec<&str> = Vec::new();
    // Backslashes are plain filename characters inside zip entry names.
    for segment in path.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                if segments.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidPath(path.to_string()));
                }
            },
            s if s.contains('\0') => exn::bail!(ErrorKind::InvalidPath(path.to_string())),
            s => segments.push(s),
        }
    }
    if segments.is_empty() {
        exn::bail!(ErrorKind::InvalidPath(path.to_string()));
    }
    Ok(segments.join("/"))
}
