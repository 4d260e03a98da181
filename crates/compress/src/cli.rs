//! Compression CLI Helpers

use crate::Compression;
use crate::error::Error;
use std::str::FromStr;

/// Shape of an optional-value flag such as `--compress[=FORMAT]`.
pub type Flag = Option<Option<String>>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Preference {
    /// Compression format was specified on the command-line
    Explicit(Compression),
    /// Compression flag was enabled on the command-line, but no format was specified
    Implicit,
    /// Compression was omitted from the command-line
    NotSpecified,
}
impl TryFrom<Flag> for Preference {
    type Error = Error;
    fn try_from(value: Flag) -> Result<Self, Self::Error> {
        match value {
            Some(Some(s)) if s.is_empty() => Ok(Self::Implicit),
            Some(Some(s)) => Ok(Self::Explicit(Compression::from_str(&s)?)),
            Some(None) => Ok(Self::Implicit),
            None => Ok(Self::NotSpecified),
        }
    }
}
impl Preference {
    /// Pick the output format: an explicit format wins, a bare flag uses the
    /// configured format, and no flag at all means uncompressed output.
    pub fn resolve(&self, configured: &Compression) -> Compression {
        match self {
            Self::Explicit(c) => *c,
            Self::Implicit => *configured,
            Self::NotSpecified => Compression::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, Preference::NotSpecified)]
    #[case(Some(None), Preference::Implicit)]
    #[case(Some(Some(String::new())), Preference::Implicit)]
    #[case(Some(Some("bz2".to_string())), Preference::Explicit(Compression::Bzip2))]
    #[case(Some(Some("bzip2".to_string())), Preference::Explicit(Compression::Bzip2))]
    #[case(Some(Some("xz".to_string())), Preference::Explicit(Compression::Xz))]
    #[case(Some(Some("lzma".to_string())), Preference::Explicit(Compression::Xz))]
    #[case(Some(Some("none".to_string())), Preference::Explicit(Compression::None))]
    fn test_construct(#[case] flag: Flag, #[case] expected: Preference) {
        let preference: Preference = flag.try_into().unwrap();
        assert_eq!(preference, expected);
    }

    #[test]
    fn test_construct_invalid() {
        let flag = Some(Some("definitely not valid".to_string()));
        let preference: Result<Preference, Error> = flag.try_into();
        assert!(preference.is_err());
    }

    #[rstest]
    #[case(Preference::Explicit(Compression::None), Compression::Bzip2, Compression::None)]
    #[case(Preference::Explicit(Compression::Xz), Compression::Bzip2, Compression::Xz)]
    #[case(Preference::Implicit, Compression::Bzip2, Compression::Bzip2)]
    #[case(Preference::Implicit, Compression::Xz, Compression::Xz)]
    #[case(Preference::NotSpecified, Compression::Bzip2, Compression::None)]
    fn test_resolve(#[case] preference: Preference, #[case] config: Compression, #[case] expected: Compression) {
        assert_eq!(preference.resolve(&config), expected);
    }
}
