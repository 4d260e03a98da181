//! Finding archives on disk and converting them in bulk.
//!
//! A failure in one archive is logged and counted; it never stops the batch.

use crate::error::{ErrorKind, Result};
use crate::{Options, convert};
use exn::ResultExt;
use maff_compress::Compression;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

pub const ARCHIVE_EXTENSION: &str = "maff";

/// What a batch run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub converted: usize,
    /// Inputs whose output already existed.
    pub skipped: usize,
    pub failed: usize,
    /// Unresolved references across all converted archives.
    pub warnings: usize,
}
impl Summary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Output path for `source`.
///
/// Uncompressed output keeps the archive name (`page.maff` becomes
/// `page.maff.html`); compressed output replaces it (`page.html.bz2`,
/// `page.html.xz`).
pub fn target_path(source: &Path, compression: Compression) -> PathBuf {
    let name = source.file_name().map(OsString::from).unwrap_or_default();
    let mut name = match compression {
        Compression::None => name,
        _ if is_archive(source) => source.file_stem().map(OsString::from).unwrap_or_default(),
        _ => name,
    };
    name.push(".html");
    name.push(compression.extension());
    source.with_file_name(name)
}

/// Returns `true` if `path` has the `.maff` extension (any case).
pub fn is_archive(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
}

/// Lists the archives under `root`, sorted.
///
/// A file is returned as-is whatever its name. A directory is searched
/// recursively for `.maff` files; subdirectories that cannot be read are
/// logged and skipped.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn discover(root: &Path) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(root).or_raise(|| ErrorKind::Discovery(root.to_path_buf()))?;
    if !metadata.is_dir() {
        return Ok(vec![root.to_path_buf()]);
    }
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if dir == root => return Err(e).or_raise(|| ErrorKind::Discovery(root.to_path_buf())),
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "Could not read directory; skipping");
                continue;
            },
        };
        for entry in entries.flatten() {
            let path = entry.path();
            match entry.file_type() {
                Ok(kind) if kind.is_dir() => pending.push(path),
                Ok(_) if is_archive(&path) && path.is_file() => found.push(path),
                _ => {},
            }
        }
    }
    found.sort();
    tracing::debug!(count = found.len(), "Discovered archives");
    Ok(found)
}

/// Converts every archive found under `paths`.
#[instrument(skip_all, fields(inputs = paths.len()))]
pub fn run(paths: &[PathBuf], options: &Options) -> Summary {
    let mut summary = Summary::default();
    for root in paths {
        let sources = match discover(root) {
            Ok(sources) => sources,
            Err(e) => {
                tracing::error!(error = ?e, "Could not search for archives");
                summary.failed += 1;
                continue;
            },
        };
        for source in sources {
            let target = target_path(&source, options.compression);
            if target.exists() && !options.overwrite {
                tracing::info!(source = %source.display(), target = %target.display(), "Output exists; skipping");
                summary.skipped += 1;
                continue;
            }
            tracing::info!(source = %source.display(), "Converting");
            match convert(&source, &target, options) {
                Ok(converted) => {
                    summary.converted += 1;
                    summary.warnings += converted.warnings.len();
                },
                Err(e) => {
                    tracing::error!(source = %source.display(), error = ?e, "Conversion failed");
                    summary.failed += 1;
                },
            }
        }
    }
    tracing::info!(
        converted = summary.converted,
        skipped = summary.skipped,
        failed = summary.failed,
        warnings = summary.warnings,
        "Batch finished"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("dir/page.maff", Compression::None, "dir/page.maff.html")]
    #[case("dir/page.maff", Compression::Bzip2, "dir/page.html.bz2")]
    #[case("dir/page.maff", Compression::Xz, "dir/page.html.xz")]
    #[case("dir/PAGE.MAFF", Compression::Xz, "dir/PAGE.html.xz")]
    #[case("dir/page.zip", Compression::None, "dir/page.zip.html")]
    #[case("dir/page.zip", Compression::Bzip2, "dir/page.zip.html.bz2")]
    #[case("page.v2.maff", Compression::Bzip2, "page.v2.html.bz2")]
    fn test_target_path(#[case] source: &str, #[case] compression: Compression, #[case] expected: &str) {
        assert_eq!(target_path(Path::new(source), compression), PathBuf::from(expected));
    }

    #[rstest]
    #[case("a.maff", true)]
    #[case("a.MaFf", true)]
    #[case("a.maff.html", false)]
    #[case("maff", false)]
    fn test_is_archive(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_archive(Path::new(path)), expected);
    }

    #[test]
    fn discovers_recursively_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("b/c");
        fs::create_dir_all(&nested).unwrap();
        for path in [dir.path().join("z.maff"), nested.join("a.MAFF"), dir.path().join("a.maff")] {
            fs::write(path, b"").unwrap();
        }
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::write(dir.path().join("a.maff.html"), b"").unwrap();
        fs::create_dir(dir.path().join("folder.maff")).unwrap();

        let found = discover(dir.path()).unwrap();
        let expected = vec![dir.path().join("a.maff"), nested.join("a.MAFF"), dir.path().join("z.maff")];
        assert_eq!(found, expected);
    }

    #[test]
    fn explicit_files_are_taken_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("saved.zip");
        fs::write(&file, b"").unwrap();
        assert_eq!(discover(&file).unwrap(), vec![file]);
    }

    #[test]
    fn missing_paths_fail_discovery() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = discover(&missing).unwrap_err();
        assert_eq!(*err, ErrorKind::Discovery(missing));
    }
}
