//! Config and font lookup.
//!
//! - Config: `CONFIG_FILE` when set and present, otherwise the `config.yaml`
//!   compiled into the binary. `serve` writes the compiled default to a
//!   configured path that does not exist yet.
//! - Fonts: `.ttf`/`.otf`/`.woff`/`.woff2` files in `FONTS_DIR`, in file name
//!   order. The renderer adds system fonts on top.

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const CONFIG_NAME: &str = "config.yaml";
const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "woff", "woff2"];

#[derive(RustEmbed)]
#[folder = "."]
#[include = "config.yaml"]
struct BundledConfig;

/// Where the active config comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// `CONFIG_FILE` points at a path that does not exist
    MissingFile(PathBuf),
    Bundled,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::MissingFile(path) => {
                write!(f, "embedded ({} not found)", path.display())
            }
            ConfigSource::Bundled => f.write_str("embedded"),
        }
    }
}

/// Paths created by [`AssetLoader::seed_if_configured`].
#[derive(Debug, Default)]
pub struct SeedReport {
    pub config_seeded: bool,
    pub fonts_dir_created: bool,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        !(self.config_seeded || self.fonts_dir_created)
    }
}

pub struct AssetLoader {
    fonts_dir: Option<PathBuf>,
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// `None` means the matching environment variable is unset.
    pub fn new(fonts_dir: Option<PathBuf>, config_file: Option<PathBuf>) -> Self {
        Self {
            fonts_dir,
            config_file,
        }
    }

    pub fn config_source(&self) -> ConfigSource {
        match &self.config_file {
            Some(path) if path.is_file() => ConfigSource::File(path.clone()),
            Some(path) => ConfigSource::MissingFile(path.clone()),
            None => ConfigSource::Bundled,
        }
    }

    pub fn fonts_dir(&self) -> Option<&Path> {
        self.fonts_dir.as_deref()
    }

    /// Font files as `(file name, data)`, ready for fontdb.
    pub fn get_fonts(&self) -> Vec<(String, Cow<'static, [u8]>)> {
        let Some(dir) = &self.fonts_dir else {
            return Vec::new();
        };
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), %e, "Fonts directory not readable");
                return Vec::new();
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| is_font_file(path))
            .collect();
        paths.sort();

        paths
            .into_iter()
            .filter_map(|path| {
                let name = path.file_name()?.to_string_lossy().into_owned();
                match fs::read(&path) {
                    Ok(data) => {
                        tracing::trace!(font = %name, size = data.len(), "Read font");
                        Some((name, Cow::Owned(data)))
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), %e, "Failed to read font");
                        None
                    }
                }
            })
            .collect()
    }

    /// Raw config bytes from the active [`ConfigSource`].
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        match self.config_source() {
            ConfigSource::File(path) => {
                tracing::trace!(path = %path.display(), "Reading config file");
                Ok(Cow::Owned(fs::read(path)?))
            }
            ConfigSource::MissingFile(_) | ConfigSource::Bundled => bundled_config(),
        }
    }

    pub fn read_config_string(&self) -> io::Result<String> {
        String::from_utf8(self.read_config()?.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Create configured paths that don't exist yet.
    ///
    /// A missing config file gets the bundled default, a missing fonts
    /// directory is created empty. Existing paths are never touched.
    pub fn seed_if_configured(&self) -> io::Result<SeedReport> {
        let mut report = SeedReport::default();

        if let Some(dir) = self.fonts_dir.as_deref().filter(|d| !d.exists()) {
            fs::create_dir_all(dir)?;
            report.fonts_dir_created = true;
            tracing::info!(dir = %dir.display(), "Created fonts directory");
        }

        if let ConfigSource::MissingFile(path) = self.config_source() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, bundled_config()?)?;
            report.config_seeded = true;
            tracing::info!(path = %path.display(), "Wrote default config");
        }

        Ok(report)
    }
}

fn bundled_config() -> io::Result<Cow<'static, [u8]>> {
    BundledConfig::get(CONFIG_NAME)
        .map(|file| file.data)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "bundled config.yaml missing"))
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FONT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}
