//! Inlining of archived resources.
//!
//! The entry document of a saved page refers to its images, stylesheets,
//! scripts, and fonts with relative `index_files/...` paths. [`Inliner`] finds
//! those references, loads each resource from a [`ResourceSource`], works out
//! its media type with a [`Classifier`], and rewrites the document so every
//! reference becomes a `data:` URI.
//!
//! Problems with individual resources never abort the conversion: they are
//! reported as [`Warning`]s and the reference is left as it was.

pub mod classify;
pub mod data_uri;
pub mod reference;
mod replace;

pub use crate::classify::{Classifier, OCTET_STREAM};
use crate::replace::Replacements;
use encoding_rs::Encoding;
use maff_archive::Archive;
use maff_archive::error::{ErrorKind as ArchiveErrorKind, Result as ArchiveResult};
use std::collections::{HashMap, HashSet};
use tracing::instrument;

/// Anything resources can be loaded from by their path relative to the page.
pub trait ResourceSource {
    fn load(&mut self, path: &str) -> ArchiveResult<Vec<u8>>;
}
impl ResourceSource for Archive {
    fn load(&mut self, path: &str) -> ArchiveResult<Vec<u8>> {
        self.read(path)
    }
}
impl ResourceSource for HashMap<String, Vec<u8>> {
    fn load(&mut self, path: &str) -> ArchiveResult<Vec<u8>> {
        let normalized = maff_archive::normalize_entry_path(path)?;
        match self.get(&normalized) {
            Some(data) => Ok(data.clone()),
            None => exn::bail!(ArchiveErrorKind::EntryNotFound(normalized)),
        }
    }
}

/// A non-fatal problem found while inlining.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum Warning {
    /// The resource could not be loaded; the reference was left untouched.
    #[display("could not inline {reference}: {reason}")]
    MissingResource { reference: String, reason: String },
    /// No strategy recognised the resource; it was inlined as `application/octet-stream`.
    #[display("unknown media type for {reference}")]
    UnknownMediaType { reference: String },
}

/// The result of inlining one document.
#[derive(Debug)]
pub struct Inlined {
    pub document: Vec<u8>,
    pub warnings: Vec<Warning>,
    /// Number of distinct references replaced with a data URI.
    pub resolved: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Inliner {
    classifier: Classifier,
}
impl Inliner {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    /// Rewrites every `index_files/...` reference in `document` into a data URI.
    ///
    /// `encoding` is the charset the page was saved in; references are
    /// decoded with it before being looked up.
    #[instrument(skip_all, fields(size = document.len(), encoding = encoding.name(), references, resolved))]
    pub fn inline<S: ResourceSource + ?Sized>(
        &self,
        source: &mut S,
        document: &[u8],
        encoding: &'static Encoding,
    ) -> Inlined {
        let mut seen = HashSet::new();
        let mut replacements = Replacements::default();
        let mut warnings = Vec::new();

        for raw in reference::scan(document) {
            if !seen.insert(raw) {
                continue;
            }
            let path = reference::decode(raw, encoding);
            let data = match source.load(&path) {
                Ok(data) => data,
                Err(e) => {
                    let warning = Warning::MissingResource { reference: path, reason: (*e).to_string() };
                    tracing::warn!("{warning}");
                    warnings.push(warning);
                    replacements.keep(raw);
                    continue;
                },
            };
            let mime = match self.classifier.classify(&path, &data) {
                Some(mime) => mime,
                None => {
                    let warning = Warning::UnknownMediaType { reference: path.clone() };
                    tracing::warn!("{warning}");
                    warnings.push(warning);
                    OCTET_STREAM.into()
                },
            };
            tracing::debug!(reference = %path, %mime, size = data.len(), "Inlining resource");
            replacements.insert(raw, data_uri::encode(&mime, &data));
        }

        let resolved = replacements.replaced();
        tracing::Span::current().record("references", seen.len());
        tracing::Span::current().record("resolved", resolved);
        Inlined { document: replacements.apply(document), warnings, resolved }
    }
}

/// Inlines with the default [`Classifier`].
pub fn inline<S: ResourceSource + ?Sized>(source: &mut S, document: &[u8], encoding: &'static Encoding) -> Inlined {
    Inliner::default().inline(source, document, encoding)
}
