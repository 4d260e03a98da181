//! Converts MAFF web archives into self-contained HTML documents.
//!
//! A MAFF file is a zip container holding one saved page: an `index.rdf`
//! manifest, the entry document, and its resources under `index_files/`.
//! [`convert`] turns one such archive into a single HTML file in which every
//! resource is inlined as a `data:` URI, optionally compressed. [`batch`]
//! finds archives on disk and converts them in bulk.

pub mod batch;
mod convert;
pub mod error;

pub use crate::convert::{Converted, Rendered, convert, render};
use maff_compress::Compression;
use maff_config::Config;
use maff_render::Layout;

/// Settings for a conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub layout: Layout,
    pub compression: Compression,
    /// Convert even when the output already exists.
    pub overwrite: bool,
    /// Copy the archive's modification time to the output.
    pub preserve_timestamps: bool,
    /// Remove a stale `name.html` left next to `name.maff`.
    pub remove_legacy_html: bool,
}
impl Default for Options {
    fn default() -> Self {
        Self::new(&Config::default(), Compression::None)
    }
}
impl Options {
    /// Options from `config`, writing output with `compression`.
    pub fn new(config: &Config, compression: Compression) -> Self {
        Self {
            layout: config.layout,
            compression,
            overwrite: config.overwrite,
            preserve_timestamps: config.preserve_timestamps,
            remove_legacy_html: config.remove_legacy_html,
        }
    }
}
