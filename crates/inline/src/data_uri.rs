use base64::Engine;
use base64::prelude::BASE64_STANDARD;

/// Encodes `data` as a base64 data URI.
///
/// The single space after the comma is part of the output format.
pub fn encode(mime: &str, data: &[u8]) -> String {
    format!("data:{mime};base64, {}", BASE64_STANDARD.encode(data))
}
