//! Metadata extraction from MAFF `index.rdf` manifests.
//!
//! [`parse`] pulls the handful of fields a conversion needs out of the
//! manifest. Values are kept as the raw bytes found in the file; the
//! manifest's own `charset` decides how they are turned into text (see
//! [`Manifest::decode`]).

mod consts;
pub mod error;
mod extract;

use crate::error::{ErrorKind, Result};
pub use crate::consts::UNKNOWN_ARCHIVE_TIME;
use encoding_rs::Encoding;
use exn::OptionExt;
use std::borrow::Cow;
use tracing::instrument;

/// Fields extracted from an `index.rdf` manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    title: Vec<u8>,
    original_url: Vec<u8>,
    charset: Vec<u8>,
    index_filename: Vec<u8>,
    archive_time: Option<Vec<u8>>,
    encoding: &'static Encoding,
}
impl Manifest {
    /// Page title, raw bytes.
    pub fn title(&self) -> &[u8] {
        &self.title
    }

    /// URL the page was saved from, raw bytes.
    pub fn original_url(&self) -> &[u8] {
        &self.original_url
    }

    /// Charset label exactly as written in the manifest.
    pub fn charset(&self) -> &[u8] {
        &self.charset
    }

    /// The encoding named by [`charset`](Self::charset).
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Entry document path, raw bytes.
    pub fn index_filename(&self) -> &[u8] {
        &self.index_filename
    }

    pub fn archive_time(&self) -> Option<&[u8]> {
        self.archive_time.as_deref()
    }

    /// Archive timestamp, or `Unknown` when the manifest doesn't record one.
    pub fn archived_at(&self) -> &[u8] {
        self.archive_time().unwrap_or(UNKNOWN_ARCHIVE_TIME)
    }

    /// Decodes bytes using the manifest charset. Malformed sequences are
    /// replaced with U+FFFD.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        self.encoding.decode_without_bom_handling(bytes).0
    }

    /// Entry document path, decoded with the manifest charset.
    pub fn entry_document(&self) -> Cow<'_, str> {
        self.decode(&self.index_filename)
    }
}

/// Extracts the [`Manifest`] fields from raw `index.rdf` bytes.
///
/// # Errors
///
/// - [`MissingField`](ErrorKind::MissingField) if `charset`, `title`,
///   `originalurl` or `indexfilename` is absent.
/// - [`UnknownCharset`](ErrorKind::UnknownCharset) if the charset label is
///   not a known encoding.
///
/// # Examples
///
/// ```
/// let rdf = br#"
///     <MAF:originalurl RDF:resource="http://example.com/"/>
///     <MAF:title RDF:resource="Example"/>
///     <MAF:charset RDF:resource="UTF-8"/>
///     <MAF:indexfilename RDF:resource="index.html"/>
/// "#;
/// let manifest = maff_manifest::parse(rdf).unwrap();
/// assert_eq!(manifest.title(), b"Example");
/// assert_eq!(manifest.entry_document(), "index.html");
/// assert_eq!(manifest.archived_at(), b"Unknown");
/// ```
#[instrument(skip(rdf), fields(rdf_size = rdf.len()))]
pub fn parse(rdf: &[u8]) -> Result<Manifest> {
    let charset = extract::charset(rdf)?;
    let encoding = Encoding::for_label(charset.trim_ascii())
        .ok_or_raise(|| ErrorKind::UnknownCharset(String::from_utf8_lossy(charset).into_owned()))?;
    let manifest = Manifest {
        title: extract::title(rdf)?.to_vec(),
        original_url: extract::original_url(rdf)?.to_vec(),
        charset: charset.to_vec(),
        index_filename: extract::index_filename(rdf)?.to_vec(),
        archive_time: extract::archive_time(rdf).map(<[u8]>::to_vec),
        encoding,
    };
    if manifest.archive_time.is_none() {
        tracing::debug!("Manifest has no archive time");
    }
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const COMPLETE: &[u8] = br#"<?xml version="1.0"?>
<RDF:RDF xmlns:MAF="http://maf.mozdev.org/metadata/rdf#"
         xmlns:NC="http://home.netscape.com/NC-rdf#"
         xmlns:RDF="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <RDF:Description RDF:about="urn:root">
    <MAF:originalurl RDF:resource="http://example.com/page?a=1&amp;b=2"/>
    <MAF:title RDF:resource="Example Page"/>
    <MAF:archivetime RDF:resource="Mon, 19 Oct 2026 10:00:00 +0000"/>
    <MAF:indexfilename RDF:resource="index.html"/>
    <MAF:charset RDF:resource="UTF-8"/>
  </RDF:Description>
</RDF:RDF>
"#;

    #[test]
    fn parses_complete_manifest() {
        let manifest = parse(COMPLETE).unwrap();
        assert_eq!(manifest.title(), b"Example Page");
        assert_eq!(manifest.original_url(), b"http://example.com/page?a=1&amp;b=2");
        assert_eq!(manifest.charset(), b"UTF-8");
        assert_eq!(manifest.encoding(), encoding_rs::UTF_8);
        assert_eq!(manifest.index_filename(), b"index.html");
        assert_eq!(manifest.archived_at(), b"Mon, 19 Oct 2026 10:00:00 +0000");
    }

    #[test]
    fn archive_time_defaults_to_unknown() {
        let rdf = br#"<MAF:title RDF:resource="Example"/>
            <MAF:originalurl RDF:resource="http://example.com"/>
            <MAF:charset RDF:resource="utf-8"/>
            <MAF:indexfilename RDF:resource="index.html"/>"#;
        let manifest = parse(rdf).unwrap();
        assert_eq!(manifest.archive_time(), None);
        assert_eq!(manifest.archived_at(), b"Unknown");
    }

    #[rstest]
    #[case("title")]
    #[case("originalurl")]
    #[case("charset")]
    #[case("indexfilename")]
    fn required_fields_are_fatal(#[case] field: &'static str) {
        let marker = format!("<MAF:{field} ");
        let stripped: Vec<u8> = String::from_utf8(COMPLETE.to_vec())
            .unwrap()
            .lines()
            .filter(|line| !line.contains(&marker))
            .collect::<Vec<_>>()
            .join("\n")
            .into_bytes();
        let err = parse(&stripped).unwrap_err();
        assert_eq!(*err, ErrorKind::MissingField(field));
    }

    #[test]
    fn unknown_charset_is_fatal() {
        let rdf = br#"<MAF:charset RDF:resource="x-klingon"/>"#;
        let err = parse(rdf).unwrap_err();
        assert_eq!(*err, ErrorKind::UnknownCharset("x-klingon".to_string()));
    }

    #[test]
    fn decodes_with_manifest_charset() {
        let rdf = b"<MAF:title RDF:resource=\"Caf\xe9\"/>
            <MAF:originalurl RDF:resource=\"http://example.com\"/>
            <MAF:charset RDF:resource=\"ISO-8859-1\"/>
            <MAF:indexfilename RDF:resource=\"r\xe9sum\xe9.html\"/>";
        let manifest = parse(rdf).unwrap();
        assert_eq!(manifest.decode(manifest.title()), "Café");
        assert_eq!(manifest.entry_document(), "résumé.html");
    }
}
