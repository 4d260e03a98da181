//! Output compression for converted documents.
//!
//! This crate wraps the supported compression libraries behind a unified
//! [`Compression`] enum, providing:
//!
//! - **Format selection** from configuration strings ([`FromStr`](std::str::FromStr))
//! - **Format detection** from magic bytes ([`Compression::from_magic_bytes`])
//! - **In-memory** compression/decompression ([`Compression::compress`],
//!   [`Compression::decompress`])
//!
//! Bzip2 is the general-purpose filter; XZ is the high-ratio filter and is
//! always written with a CRC32 integrity check at preset 9.

#[cfg(feature = "cli")]
pub mod cli;
mod construct;
pub mod error;
mod ops;
mod util;

/// A supported output compression format.
///
/// Defaults to [`None`](Self::None) (uncompressed).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Uncompressed
    #[default]
    None,
    /// Bzip2 compression (.bz2)
    Bzip2,
    /// XZ/LZMA compression (.xz)
    Xz,
}

#[cfg(test)]
mod tests {
    use crate::Compression;

    #[test]
    fn compression_default() {
        assert_eq!(Compression::default(), Compression::None);
    }
}
