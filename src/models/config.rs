use crate::assets::AssetLoader;
use crate::models::CanvasSpec;
use luma_dither::{Rgb, DEFAULT_LEVELS};
use serde::Deserialize;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub canvas: CanvasConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub text: TextConfig,
}

/// Output canvas
#[derive(Debug, Deserialize, Clone)]
pub struct CanvasConfig {
    #[serde(default = "default_canvas_width")]
    pub width: u32,

    #[serde(default = "default_canvas_height")]
    pub height: u32,

    /// Background as a hex color
    #[serde(default = "default_background")]
    pub background: String,
}

fn default_canvas_width() -> u32 {
    480
}

fn default_canvas_height() -> u32 {
    800
}

fn default_background() -> String {
    "#ffffff".to_string()
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
            background: default_background(),
        }
    }
}

/// JPEG export settings
#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    /// JPEG quality (1-100)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Quantization levels applied when dithering is on
    #[serde(default = "default_dither_levels")]
    pub dither_levels: u16,

    /// Suggested download filename
    #[serde(default = "default_filename")]
    pub filename: String,
}

fn default_jpeg_quality() -> u8 {
    92
}

fn default_dither_levels() -> u16 {
    DEFAULT_LEVELS
}

fn default_filename() -> String {
    "x4-export.jpg".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: default_jpeg_quality(),
            dither_levels: default_dither_levels(),
            filename: default_filename(),
        }
    }
}

/// Undo/redo history
#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    #[serde(default = "default_max_snapshots")]
    pub max_snapshots: usize,
}

fn default_max_snapshots() -> usize {
    50
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_snapshots: default_max_snapshots(),
        }
    }
}

/// Defaults for new text boxes
#[derive(Debug, Deserialize, Clone)]
pub struct TextConfig {
    #[serde(default = "default_family")]
    pub default_family: String,

    #[serde(default = "default_size")]
    pub default_size: f32,

    /// Text box width used for alignment
    #[serde(default = "default_width")]
    pub default_width: f32,

    /// Families offered to clients
    #[serde(default)]
    pub families: Vec<String>,
}

fn default_family() -> String {
    "Noto Sans".to_string()
}

fn default_size() -> f32 {
    28.0
}

fn default_width() -> f32 {
    200.0
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            default_family: default_family(),
            default_size: default_size(),
            default_width: default_width(),
            families: vec![default_family()],
        }
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(
                        width = config.canvas.width,
                        height = config.canvas.height,
                        jpeg_quality = config.export.jpeg_quality,
                        dither_levels = config.export.dither_levels,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse YAML and replace out-of-range values with their defaults.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config.sanitized())
    }

    fn sanitized(mut self) -> Self {
        if !(1..=100).contains(&self.export.jpeg_quality) {
            tracing::warn!(
                quality = self.export.jpeg_quality,
                "jpeg_quality out of range, using default"
            );
            self.export.jpeg_quality = default_jpeg_quality();
        }
        if !(2..=256).contains(&self.export.dither_levels) {
            tracing::warn!(
                levels = self.export.dither_levels,
                "dither_levels out of range, using default"
            );
            self.export.dither_levels = default_dither_levels();
        }
        if self.history.max_snapshots == 0 {
            self.history.max_snapshots = 1;
        }
        if !(self.text.default_size.is_finite() && self.text.default_size > 0.0) {
            self.text.default_size = default_size();
        }
        if !(self.text.default_width.is_finite() && self.text.default_width > 0.0) {
            self.text.default_width = default_width();
        }
        if !self.text.families.contains(&self.text.default_family) {
            self.text.families.insert(0, self.text.default_family.clone());
        }
        self
    }

    /// Canvas described by the `canvas` section.
    ///
    /// Invalid sizes or colors fall back to the 480x800 white canvas.
    pub fn canvas_spec(&self) -> CanvasSpec {
        let background = match self.canvas.background.parse::<Rgb>() {
            Ok(color) => color,
            Err(e) => {
                tracing::warn!(background = %self.canvas.background, %e, "Invalid background color");
                Rgb::WHITE
            }
        };
        match CanvasSpec::new(self.canvas.width, self.canvas.height, background) {
            Ok(spec) => spec,
            Err(e) => {
                tracing::warn!(%e, "Invalid canvas size, using 480x800");
                CanvasSpec {
                    background,
                    ..CanvasSpec::X4
                }
            }
        }
    }
}
