//! Per-field extractors for `index.rdf`.
//!
//! Each field is located by its own marker pattern and captured as the raw
//! bytes between the quotes that follow it. The first match wins. There is no
//! RDF/XML parse.

use crate::consts;
use crate::error::{ErrorKind, Result};
use exn::OptionExt;
use regex::bytes::Regex;

fn capture<'a>(regex: &Regex, rdf: &'a [u8]) -> Option<&'a [u8]> {
    regex.captures(rdf).and_then(|captures| captures.get(1)).map(|m| m.as_bytes())
}

pub(crate) fn title(rdf: &[u8]) -> Result<&[u8]> {
    capture(&consts::TITLE_REGEX, rdf).ok_or_raise(|| ErrorKind::MissingField("title"))
}

pub(crate) fn original_url(rdf: &[u8]) -> Result<&[u8]> {
    capture(&consts::ORIGINAL_URL_REGEX, rdf).ok_or_raise(|| ErrorKind::MissingField("originalurl"))
}

pub(crate) fn charset(rdf: &[u8]) -> Result<&[u8]> {
    capture(&consts::CHARSET_REGEX, rdf).ok_or_raise(|| ErrorKind::MissingField("charset"))
}

pub(crate) fn index_filename(rdf: &[u8]) -> Result<&[u8]> {
    capture(&consts::INDEX_FILENAME_REGEX, rdf).ok_or_raise(|| ErrorKind::MissingField("indexfilename"))
}

/// Optional; absence is not an error.
pub(crate) fn archive_time(rdf: &[u8]) -> Option<&[u8]> {
    capture(&consts::ARCHIVE_TIME_REGEX, rdf)
}
