use crate::Options;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use maff_archive::Archive;
use maff_inline::{Inliner, Warning};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Final output bytes for one archive, plus what happened while inlining.
#[derive(Debug)]
pub struct Rendered {
    pub bytes: Vec<u8>,
    pub warnings: Vec<Warning>,
    /// Number of distinct resources inlined.
    pub resolved: usize,
}

/// Outcome of a successful [`convert`].
#[derive(Debug)]
pub struct Converted {
    pub target: PathBuf,
    pub warnings: Vec<Warning>,
    pub resolved: usize,
    /// Bytes written to `target`.
    pub size: usize,
}

/// Runs the conversion pipeline on an opened archive: manifest, entry
/// document, inlining, assembly, then compression.
#[instrument(skip_all, fields(root = archive.root(), title))]
pub fn render(archive: &mut Archive, options: &Options) -> Result<Rendered> {
    let rdf = from_archive(archive.read_manifest())?;
    let manifest = from_manifest(maff_manifest::parse(&rdf))?;
    tracing::Span::current().record("title", &*manifest.decode(manifest.title()));

    let entry = manifest.entry_document();
    let document = from_archive(archive.read(&entry))?;
    let inlined = Inliner::default().inline(archive, &document, manifest.encoding());

    let assembled =
        maff_render::assemble(options.layout, &manifest, &inlined.document).or_raise(|| ErrorKind::Render)?;
    let bytes = options.compression.compress(&assembled).or_raise(|| ErrorKind::Compression)?;
    Ok(Rendered { bytes, warnings: inlined.warnings, resolved: inlined.resolved })
}

/// Converts the archive at `source` and writes the result to `target`.
///
/// Nothing is written unless the whole archive converts. An existing
/// `target` is replaced; deciding whether to skip it is up to the caller.
#[instrument(skip_all, fields(source = %source.display(), target = %target.display()))]
pub fn convert(source: &Path, target: &Path, options: &Options) -> Result<Converted> {
    let rendered = {
        let mut archive = from_archive(Archive::open(source))?;
        render(&mut archive, options)?
    };
    write(target, &rendered.bytes)?;
    if options.preserve_timestamps {
        copy_modified_time(source, target)?;
    }
    if options.remove_legacy_html {
        remove_legacy_html(source, target);
    }
    tracing::info!(resolved = rendered.resolved, warnings = rendered.warnings.len(), "Converted");
    Ok(Converted {
        target: target.to_path_buf(),
        size: rendered.bytes.len(),
        warnings: rendered.warnings,
        resolved: rendered.resolved,
    })
}

fn write(target: &Path, bytes: &[u8]) -> Result<()> {
    if let Err(e) = fs::write(target, bytes) {
        // Don't leave a truncated document behind.
        let _ = fs::remove_file(target);
        return Err(e).or_raise(|| ErrorKind::OutputWrite(target.to_path_buf()));
    }
    Ok(())
}

fn copy_modified_time(source: &Path, target: &Path) -> Result<()> {
    let error = || ErrorKind::Timestamp(target.to_path_buf());
    let modified = fs::metadata(source).and_then(|metadata| metadata.modified()).or_raise(error)?;
    File::options().write(true).open(target).and_then(|file| file.set_modified(modified)).or_raise(error)
}

/// Older converters wrote `name.html` next to `name.maff`.
fn remove_legacy_html(source: &Path, target: &Path) {
    let legacy = source.with_extension("html");
    if legacy == target || legacy == source || !legacy.is_file() {
        return;
    }
    match fs::remove_file(&legacy) {
        Ok(()) => tracing::info!(path = %legacy.display(), "Removed legacy HTML conversion"),
        Err(e) => tracing::warn!(path = %legacy.display(), error = %e, "Could not remove legacy HTML conversion"),
    }
}

fn from_archive<T>(result: maff_archive::error::Result<T>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) => {
            let kind = (*e).clone();
            Err(e).or_raise(|| ErrorKind::Archive(kind))
        },
    }
}

fn from_manifest<T>(result: maff_manifest::error::Result<T>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) => {
            let kind = (*e).clone();
            Err(e).or_raise(|| ErrorKind::Manifest(kind))
        },
    }
}
