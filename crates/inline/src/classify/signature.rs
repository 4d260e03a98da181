//! Magic-byte signatures for image formats.

use super::Resource;
use std::borrow::Cow;

type Matcher = fn(&[u8]) -> bool;

const SIGNATURES: [(Matcher, &str); 13] = [
    (is_jpeg, "image/jpeg"),
    (is_png, "image/png"),
    (is_gif, "image/gif"),
    (is_tiff, "image/tiff"),
    (is_rgb, "image/x-rgb"),
    (is_pbm, "image/x-portable-bitmap"),
    (is_pgm, "image/x-portable-graymap"),
    (is_ppm, "image/x-portable-pixmap"),
    (is_rast, "image/cmu-raster"),
    (is_xbm, "image/x-xbitmap"),
    (is_bmp, "image/bmp"),
    (is_webp, "image/webp"),
    (is_exr, "image/exr"),
];

pub(super) fn sniff(resource: &Resource<'_>) -> Option<Cow<'static, str>> {
    SIGNATURES
        .iter()
        .find(|(matches, _)| matches(resource.data))
        .map(|(_, mime)| Cow::Borrowed(*mime))
}

fn is_jpeg(h: &[u8]) -> bool {
    h.starts_with(b"\xff\xd8\xff") || h.get(6..10).is_some_and(|marker| marker == b"JFIF" || marker == b"Exif")
}

fn is_png(h: &[u8]) -> bool {
    h.starts_with(b"\x89PNG\r\n\x1a\n")
}

fn is_gif(h: &[u8]) -> bool {
    h.starts_with(b"GIF87a") || h.starts_with(b"GIF89a")
}

fn is_tiff(h: &[u8]) -> bool {
    h.starts_with(b"MM\x00*") || h.starts_with(b"II*\x00")
}

/// SGI image file.
fn is_rgb(h: &[u8]) -> bool {
    h.starts_with(b"\x01\xda")
}

/// Netpbm header: `P`, a format digit, then whitespace.
fn is_netpbm(h: &[u8], formats: &[u8; 2]) -> bool {
    matches!(h, [b'P', digit, space, ..] if formats.contains(digit) && b" \t\n\r".contains(space))
}

fn is_pbm(h: &[u8]) -> bool {
    is_netpbm(h, b"14")
}

fn is_pgm(h: &[u8]) -> bool {
    is_netpbm(h, b"25")
}

fn is_ppm(h: &[u8]) -> bool {
    is_netpbm(h, b"36")
}

/// Sun raster file.
fn is_rast(h: &[u8]) -> bool {
    h.starts_with(b"\x59\xa6\x6a\x95")
}

fn is_xbm(h: &[u8]) -> bool {
    h.starts_with(b"#define ")
}

fn is_bmp(h: &[u8]) -> bool {
    h.starts_with(b"BM")
}

fn is_webp(h: &[u8]) -> bool {
    h.starts_with(b"RIFF") && h.get(8..12) == Some(b"WEBP")
}

/// OpenEXR.
fn is_exr(h: &[u8]) -> bool {
    h.starts_with(b"\x76\x2f\x31\x01")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b"\xff\xd8\xff\xdb\x00\x43", "image/jpeg")]
    #[case(b"\x00\x00\x00\x00\x00\x00Exif\x00\x00", "image/jpeg")]
    #[case(b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR", "image/png")]
    #[case(b"GIF89a\x01\x00\x01\x00", "image/gif")]
    #[case(b"GIF87a\x01\x00\x01\x00", "image/gif")]
    #[case(b"II*\x00\x08\x00\x00\x00", "image/tiff")]
    #[case(b"MM\x00*\x00\x00\x00\x08", "image/tiff")]
    #[case(b"\x01\xda\x01\x01", "image/x-rgb")]
    #[case(b"P1\n1 1\n0", "image/x-portable-bitmap")]
    #[case(b"P5 1 1 255 ", "image/x-portable-graymap")]
    #[case(b"P6\t1 1 255 ", "image/x-portable-pixmap")]
    #[case(b"\x59\xa6\x6a\x95\x00", "image/cmu-raster")]
    #[case(b"#define test_width 1\n", "image/x-xbitmap")]
    #[case(b"BM\x36\x00\x00\x00", "image/bmp")]
    #[case(b"RIFF\x24\x00\x00\x00WEBPVP8 ", "image/webp")]
    #[case(b"\x76\x2f\x31\x01\x02\x00", "image/exr")]
    fn test_signatures(#[case] data: &[u8], #[case] expected: &str) {
        let resource = Resource { path: "index_files/blob", data };
        assert_eq!(sniff(&resource).as_deref(), Some(expected));
    }

    #[rstest]
    #[case(b"")]
    #[case(b"P")]
    #[case(b"P7 ")]
    #[case(b"P1x")]
    #[case(b"RIFF\x24\x00\x00\x00WAVEfmt ")]
    #[case(b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>")]
    fn test_no_signature(#[case] data: &[u8]) {
        let resource = Resource { path: "index_files/blob", data };
        assert_eq!(sniff(&resource), None);
    }
}
