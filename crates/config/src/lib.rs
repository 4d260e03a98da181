//! Layered configuration.
//!
//! Values are resolved from, in increasing priority:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. A config file: either the one passed explicitly, or any of
//!    `config.toml`, `config.yaml` and `config.json` found in the platform
//!    config directory (e.g. `~/.config/maff2html/` on Linux)
//! 3. Environment variables prefixed with `MAFF2HTML_` (e.g.
//!    `MAFF2HTML_COMPRESSION=xz`)
//!
//! Command-line flags are applied on top by the binary.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Toml, Yaml};
use maff_compress::Compression;
use maff_render::Layout;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::instrument;

pub const ENV_PREFIX: &str = "MAFF2HTML_";
const CONFIG_FILES: [&str; 3] = ["config.toml", "config.yaml", "config.json"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Format used when compression is requested without naming one.
    pub compression: Compression,
    pub layout: Layout,
    /// Replace outputs that already exist instead of skipping their input.
    pub overwrite: bool,
    /// Give each output the modification time of its source archive.
    pub preserve_timestamps: bool,
    /// Delete `name.html` next to `name.maff` after a successful conversion.
    pub remove_legacy_html: bool,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            compression: Compression::Bzip2,
            layout: Layout::Framed,
            overwrite: false,
            preserve_timestamps: true,
            remove_legacy_html: false,
        }
    }
}
impl Config {
    /// Loads the configuration, reading `explicit` instead of the default
    /// config files when given.
    #[instrument(level = "debug")]
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::from_figment(Self::figment(explicit)?)
    }

    /// The layered [`Figment`] that [`Config::load`] extracts from.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::new();
        match explicit {
            Some(path) => {
                if !path.is_file() {
                    exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
                }
                figment = merge_file(figment, path);
            },
            None => {
                for path in default_files() {
                    figment = merge_file(figment, &path);
                }
            },
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Invalid)?;
        tracing::debug!(?config, "Configuration loaded");
        Ok(config)
    }
}

/// The platform config directory for this application, if one can be determined.
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "maff2html").map(|dirs| dirs.config_dir().to_path_buf())
}

fn default_files() -> Vec<PathBuf> {
    let Some(dir) = config_dir() else {
        tracing::debug!("No config directory available on this platform");
        return Vec::new();
    };
    CONFIG_FILES.iter().map(|name| dir.join(name)).filter(|path| path.is_file()).collect()
}

/// Merges `path`, picking the format from its extension (TOML if unrecognised).
fn merge_file(figment: Figment, path: &Path) -> Figment {
    tracing::debug!(path = %path.display(), "Reading config file");
    match path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
        Some("json") => figment.merge(Json::file(path)),
        _ => figment.merge(Toml::file(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    #[test]
    fn defaults() {
        let config = Config::from_figment(Figment::new()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.compression, Compression::Bzip2);
        assert_eq!(config.layout, Layout::Framed);
        assert!(config.preserve_timestamps);
        assert!(!config.overwrite);
        assert!(!config.remove_legacy_html);
    }

    // Every test that reads the environment runs inside a `Jail`, which
    // serialises access to it.

    #[rstest]
    #[case("config.toml", "compression = \"xz\"\nlayout = \"banner\"\noverwrite = true\n")]
    #[case("config.yaml", "compression: xz\nlayout: banner\noverwrite: true\n")]
    #[case("config.json", r#"{"compression": "xz", "layout": "banner", "overwrite": true}"#)]
    fn explicit_file_formats(#[case] name: &str, #[case] content: &str) {
        Jail::expect_with(|jail| {
            jail.create_file(name, content)?;
            let path = jail.directory().join(name);
            let config = Config::from_figment(Config::figment(Some(&path)).unwrap()).unwrap();
            assert_eq!(config.compression, Compression::Xz);
            assert_eq!(config.layout, Layout::Banner);
            assert!(config.overwrite);
            assert!(config.preserve_timestamps);
            Ok(())
        });
    }

    #[test]
    fn missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = Config::figment(Some(&path)).unwrap_err();
        assert_eq!(*err, ErrorKind::NotFound(path));
    }

    #[test]
    fn invalid_values() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "compression = \"zip\"\n")?;
            let path = jail.directory().join("config.toml");
            let err = Config::from_figment(Config::figment(Some(&path)).unwrap()).unwrap_err();
            assert_eq!(*err, ErrorKind::Invalid);
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("settings.toml", "compression = \"xz\"\npreserve_timestamps = false\n")?;
            jail.set_env("MAFF2HTML_COMPRESSION", "none");
            jail.set_env("MAFF2HTML_REMOVE_LEGACY_HTML", "true");
            let path = jail.directory().join("settings.toml");
            let config = Config::from_figment(Config::figment(Some(&path)).unwrap()).unwrap();
            assert_eq!(config.compression, Compression::None);
            assert!(!config.preserve_timestamps);
            assert!(config.remove_legacy_html);
            Ok(())
        });
    }
}
