//! Finding and decoding resource references in the entry document.

use encoding_rs::Encoding;
use memchr::memchr;
use percent_encoding::percent_decode;
use regex::bytes::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Directory (relative to the entry document) that holds saved resources.
pub const RESOURCE_DIRECTORY: &str = "index_files";

static REFERENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r#"(?-u)"({}/[^"\r\n]*)""#, regex::escape(RESOURCE_DIRECTORY))).unwrap()
});

/// Yields every quoted resource reference in `document`, in document order,
/// with any `#fragment` removed. Duplicates are not filtered.
pub fn scan(document: &[u8]) -> impl Iterator<Item = &[u8]> {
    REFERENCE_REGEX
        .captures_iter(document)
        .filter_map(|captures| captures.get(1))
        .map(|m| strip_fragment(m.as_bytes()))
}

/// Drops everything from the first `#` onwards.
pub fn strip_fragment(reference: &[u8]) -> &[u8] {
    match memchr(b'#', reference) {
        Some(position) => &reference[..position],
        None => reference,
    }
}

/// Turns a reference as written in the document into an archive path:
/// percent-decoding, then the document charset, then HTML entities.
///
/// Entities are resolved last, so a numeric reference such as `&#233;` names a
/// Unicode code point rather than a byte in the page charset.
pub fn decode(reference: &[u8], encoding: &'static Encoding) -> String {
    let unescaped: Cow<'_, [u8]> = percent_decode(reference).into();
    let (text, _) = encoding.decode_without_bom_handling(&unescaped);
    html_escape::decode_html_entities(&text).into_owned()
}
