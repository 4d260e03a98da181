use regex::bytes::Regex;
use std::sync::LazyLock;

/// Fallback value for the optional archive timestamp.
pub const UNKNOWN_ARCHIVE_TIME: &[u8] = b"Unknown";

macro_rules! marker {
    ($name:ident, $field:literal) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(concat!(r#"(?-u)<MAF:"#, $field, r#"\s+RDF:resource="([^"]*)""#)).unwrap()
        });
    };
}

marker!(TITLE_REGEX, "title");
marker!(ORIGINAL_URL_REGEX, "originalurl");
marker!(CHARSET_REGEX, "charset");
marker!(INDEX_FILENAME_REGEX, "indexfilename");
marker!(ARCHIVE_TIME_REGEX, "archivetime");
