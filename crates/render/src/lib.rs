//! Final document assembly.
//!
//! Wraps an inlined entry document and its manifest metadata into one
//! self-contained HTML document, using one of two [`Layout`]s. Placeholders
//! in the embedded templates are replaced literally, one after the other, in
//! a fixed order.

mod assets;
pub mod error;

pub use crate::assets::Templates;
use crate::assets::{BANNER, FRAMESET, METADATA_FRAME};
use crate::error::{Error, ErrorKind, Result};
use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use maff_manifest::Manifest;
use memchr::memmem;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use tracing::instrument;

const CLOSING_HTML: &[u8] = b"</html>";

/// How the converted page is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    /// A frameset with a metadata frame above the page, both as data URIs.
    #[default]
    Framed,
    /// The page itself, with an info bar injected before `</html>`.
    Banner,
}
impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Framed => "framed",
            Layout::Banner => "banner",
        }
    }
}
impl Display for Layout {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
impl FromStr for Layout {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "framed" | "frame" | "frameset" => Ok(Layout::Framed),
            "banner" => Ok(Layout::Banner),
            _ => exn::bail!(ErrorKind::UnknownLayout(s.to_string())),
        }
    }
}
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Layout {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(|e: Error| serde::de::Error::custom(&*e))
    }
}

/// Produces the final output bytes for `document`, ready to be compressed
/// and written.
#[instrument(skip_all, fields(%layout, size = document.len()))]
pub fn assemble(layout: Layout, manifest: &Manifest, document: &[u8]) -> Result<Vec<u8>> {
    match layout {
        Layout::Framed => framed(manifest, document),
        Layout::Banner => banner(manifest, document),
    }
}

fn framed(manifest: &Manifest, document: &[u8]) -> Result<Vec<u8>> {
    let meta = Templates::load(METADATA_FRAME)?;
    let meta = substitute(&meta, b"{charset}", manifest.charset());
    let meta = substitute(&meta, b"{url}", manifest.original_url());
    let meta = substitute(&meta, b"{title}", manifest.title());
    let meta = substitute(&meta, b"{datetime}", manifest.archived_at());

    let frameset = Templates::load(FRAMESET)?;
    let frameset = substitute(&frameset, b"{charset}", manifest.charset());
    let frameset = substitute(&frameset, b"{title}", manifest.title());
    let frameset = substitute(&frameset, b"{frame}", BASE64_STANDARD.encode(document).as_bytes());
    Ok(substitute(&frameset, b"{meta}", BASE64_STANDARD.encode(meta).as_bytes()))
}

fn banner(manifest: &Manifest, document: &[u8]) -> Result<Vec<u8>> {
    let bar = Templates::load(BANNER)?;
    let bar = substitute(&bar, b"{title}", manifest.title());
    let bar = substitute(&bar, b"{url}", manifest.original_url());
    let bar = substitute(&bar, b"{datetime}", manifest.archived_at());

    let mut output = Vec::with_capacity(document.len() + bar.len());
    match rfind_ignore_ascii_case(document, CLOSING_HTML) {
        Some(position) => {
            output.extend_from_slice(&document[..position]);
            output.extend_from_slice(&bar);
            output.extend_from_slice(&document[position..]);
        },
        None => {
            tracing::warn!("Document has no closing </html> tag; appending banner at the end");
            output.extend_from_slice(document);
            output.extend_from_slice(&bar);
        },
    }
    Ok(output)
}

/// Replaces every occurrence of `placeholder` in `template` with `value`.
fn substitute(template: &[u8], placeholder: &[u8], value: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(template.len() + value.len());
    let mut last = 0;
    for position in memmem::find_iter(template, placeholder) {
        output.extend_from_slice(&template[last..position]);
        output.extend_from_slice(value);
        last = position + placeholder.len();
    }
    output.extend_from_slice(&template[last..]);
    output
}

fn rfind_ignore_ascii_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w.eq_ignore_ascii_case(needle))
}
