//! Document templates embedded into the binary at compile time using
//! [`rust-embed`](rust_embed).

use crate::error::{ErrorKind, Result};
use exn::OptionExt;
use rust_embed::Embed;
use std::borrow::Cow;

pub(crate) const FRAMESET: &str = "frame.html";
pub(crate) const METADATA_FRAME: &str = "meta.html";
pub(crate) const BANNER: &str = "banner.html";

#[derive(Embed)]
#[folder = "../../assets/templates/"]
pub struct Templates;
impl Templates {
    /// Get the content of a builtin template by name.
    pub fn load(name: impl AsRef<str>) -> Result<Cow<'static, [u8]>> {
        let name = name.as_ref();
        Self::get(name).map(|f| f.data).ok_or_raise(|| ErrorKind::AssetNotFound(name.to_string()))
    }

    pub fn exists(name: impl AsRef<str>) -> bool {
        Self::get(name.as_ref()).is_some()
    }
}
