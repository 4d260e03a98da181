//! Media type classification for archived resources.
//!
//! Saved resources frequently lack a usable extension, so a media type is
//! found by trying a fixed, ordered list of [`Strategy`] functions and taking
//! the first answer. Each strategy either names a type or declines.
//!
//! 1. `.js` override (`text/javascript`)
//! 2. Extension table on the decoded path
//! 3. Extension table with `_` replaced by `.` (archivers flatten `logo.png`
//!    into `logo_png`)
//! 4. Image magic-byte signatures
//! 5. General content sniffing ([`infer`])
//! 6. The system `file` utility, if installed

mod signature;
mod system;

use std::borrow::Cow;
use tracing::instrument;

/// Media type used when every strategy declines.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A resource to classify: its decoded archive path and its payload.
#[derive(Clone, Copy, Debug)]
pub struct Resource<'a> {
    pub path: &'a str,
    pub data: &'a [u8],
}

/// A single classification heuristic.
pub type Strategy = fn(&Resource<'_>) -> Option<Cow<'static, str>>;

/// Strategies that depend only on the path and payload.
const BUILTIN: [(&str, Strategy); 5] = [
    ("javascript", javascript),
    ("extension", extension),
    ("underscored-extension", underscored_extension),
    ("signature", signature::sniff),
    ("content", content),
];

/// An ordered chain of [`Strategy`] functions.
#[derive(Clone, Debug)]
pub struct Classifier {
    strategies: Vec<(&'static str, Strategy)>,
}
impl Default for Classifier {
    /// The builtin strategies followed by the system `file` utility.
    fn default() -> Self {
        Self::builtin().with_strategy("system", system::sniff)
    }
}
impl Classifier {
    /// Only the strategies that don't depend on the host system. Results are
    /// the same on every machine.
    pub fn builtin() -> Self {
        Self { strategies: BUILTIN.to_vec() }
    }

    /// Appends a strategy to the end of the chain.
    pub fn with_strategy(mut self, name: &'static str, strategy: Strategy) -> Self {
        self.strategies.push((name, strategy));
        self
    }

    /// Returns the first media type any strategy produces, or `None` if they
    /// all decline.
    #[instrument(level = "trace", skip(self, data), fields(size = data.len(), strategy))]
    pub fn classify(&self, path: &str, data: &[u8]) -> Option<Cow<'static, str>> {
        let resource = Resource { path, data };
        self.strategies.iter().find_map(|(name, strategy)| {
            let mime = strategy(&resource)?;
            tracing::Span::current().record("strategy", *name);
            Some(mime)
        })
    }
}

fn underscores_to_dots(path: &str) -> Option<String> {
    path.contains('_').then(|| path.replace('_', "."))
}

fn is_javascript(path: &str) -> bool {
    path.to_ascii_lowercase().ends_with(".js")
}

/// `.js` is always `text/javascript`, whatever the content.
fn javascript(resource: &Resource<'_>) -> Option<Cow<'static, str>> {
    let flattened = underscores_to_dots(resource.path);
    (is_javascript(resource.path) || flattened.as_deref().is_some_and(is_javascript))
        .then_some(Cow::Borrowed("text/javascript"))
}

fn extension(resource: &Resource<'_>) -> Option<Cow<'static, str>> {
    mime_guess::from_path(resource.path).first_raw().map(Cow::Borrowed)
}

fn underscored_extension(resource: &Resource<'_>) -> Option<Cow<'static, str>> {
    let flattened = underscores_to_dots(resource.path)?;
    mime_guess::from_path(flattened).first_raw().map(Cow::Borrowed)
}

fn content(resource: &Resource<'_>) -> Option<Cow<'static, str>> {
    infer::get(resource.data).map(|kind| Cow::Borrowed(kind.mime_type()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";
    const WOFF2: &[u8] = b"wOF2\x00\x01\x00\x00\x00\x00\x00\x00";
    const PDF: &[u8] = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n";

    #[rstest]
    #[case("index_files/app.js", b"", "text/javascript")]
    #[case("index_files/app.JS", PNG, "text/javascript")]
    #[case("index_files/app_js", b"", "text/javascript")]
    #[case("index_files/style.css", b"", "text/css")]
    #[case("index_files/logo.png", b"", "image/png")]
    #[case("index_files/image_png", b"", "image/png")]
    #[case("index_files/page_html", b"", "text/html")]
    #[case("index_files/photo", b"\xff\xd8\xff\xe0\x00\x10JFIF\x00", "image/jpeg")]
    #[case("index_files/logo", PNG, "image/png")]
    #[case("index_files/document", PDF, "application/pdf")]
    fn test_builtin_chain(#[case] path: &str, #[case] data: &[u8], #[case] expected: &str) {
        assert_eq!(Classifier::builtin().classify(path, data).as_deref(), Some(expected));
    }

    #[test]
    fn extension_beats_content() {
        // A PNG payload saved under a .gif name keeps the name's type.
        assert_eq!(Classifier::builtin().classify("index_files/a.gif", PNG).as_deref(), Some("image/gif"));
    }

    #[test]
    fn unknown_resources_decline() {
        assert_eq!(Classifier::builtin().classify("index_files/blob", b"\x00\x01\x02\x03"), None);
    }

    #[test]
    fn classification_is_deterministic() {
        let classifier = Classifier::builtin();
        let first = classifier.classify("index_files/thing_woff", WOFF2);
        for _ in 0..10 {
            assert_eq!(classifier.classify("index_files/thing_woff", WOFF2), first);
        }
    }

    #[test]
    fn custom_strategies_run_last() {
        fn always(_: &Resource<'_>) -> Option<Cow<'static, str>> {
            Some(Cow::Borrowed("application/x-custom"))
        }
        let classifier = Classifier::builtin().with_strategy("always", always);
        assert_eq!(classifier.classify("index_files/blob", b"\x00").as_deref(), Some("application/x-custom"));
        assert_eq!(classifier.classify("index_files/a.png", b"\x00").as_deref(), Some("image/png"));
    }
}
