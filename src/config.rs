//! Social card configuration module.
//!
//! Handles loading, validating, and merging `social.toml`. Stock defaults are
//! overridden by whatever keys the user file specifies.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site_title = "Word of the Day"
//! output_dir = "public/images/social"  # Social image root
//!
//! [colors]
//! primary = "#4f46e5"
//! primary_light = "#a5b4fc"
//! primary_dark = "#312e81"
//!
//! [fonts]
//! regular = "assets/fonts/Inter-Regular.ttf"
//! extra_bold = "assets/fonts/Inter-ExtraBold.ttf"
//!
//! [image]
//! quality = 90       # Quantization quality (1-100)
//! max_colors = 128   # Palette size (2-256)
//!
//! [processing]
//! max_processes = 4  # Max parallel workers (omit for auto = CPU cores)
//!
//! [[pages]]
//! path = "stats"
//! title = "Statistics"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [colors]
//! primary = "#0f766e"
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! ## Render config
//!
//! Rendering code never sees [`SocialConfig`] directly. The orchestrator
//! derives a [`RenderConfig`] (site title + parsed brand colors) once and
//! passes it by reference to every card.

use crate::imaging::{PaletteSize, Quality, Rgba};
use crate::types::PageEntry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default config filename, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "social.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Social card configuration loaded from `social.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SocialConfig {
    /// Site name drawn in the top-left corner of every card.
    pub site_title: String,
    /// Root directory for generated social images.
    pub output_dir: String,
    /// Brand colors for text and the headline gradient.
    pub colors: ColorsConfig,
    /// Font files for the two weights.
    pub fonts: FontsConfig,
    /// Encoder settings.
    pub image: ImageConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
    /// Generic pages that get a card.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<PageEntry>,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            site_title: "Word of the Day".to_string(),
            output_dir: "public/images/social".to_string(),
            colors: ColorsConfig::default(),
            fonts: FontsConfig::default(),
            image: ImageConfig::default(),
            processing: ProcessingConfig::default(),
            pages: Vec::new(),
        }
    }
}

impl SocialConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("colors.primary", &self.colors.primary),
            ("colors.primary_light", &self.colors.primary_light),
            ("colors.primary_dark", &self.colors.primary_dark),
        ] {
            if Rgba::from_hex(value).is_none() {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a hex color like #4f46e5, got {value:?}"
                )));
            }
        }
        if self.image.quality == 0 || self.image.quality > 100 {
            return Err(ConfigError::Validation(
                "image.quality must be 1-100".into(),
            ));
        }
        if !(2..=256).contains(&self.image.max_colors) {
            return Err(ConfigError::Validation(
                "image.max_colors must be 2-256".into(),
            ));
        }
        if self.fonts.regular.is_empty() || self.fonts.extra_bold.is_empty() {
            return Err(ConfigError::Validation(
                "fonts.regular and fonts.extra_bold must be set".into(),
            ));
        }
        if self.output_dir.is_empty() {
            return Err(ConfigError::Validation(
                "output_dir must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Derive the render-time view of this config.
    pub fn render_config(&self) -> Result<RenderConfig, ConfigError> {
        let parse = |key: &str, value: &str| {
            Rgba::from_hex(value).ok_or_else(|| {
                ConfigError::Validation(format!("{key} is not a hex color: {value:?}"))
            })
        };
        Ok(RenderConfig {
            site_title: self.site_title.clone(),
            colors: BrandColors {
                primary: parse("colors.primary", &self.colors.primary)?,
                primary_light: parse("colors.primary_light", &self.colors.primary_light)?,
                primary_dark: parse("colors.primary_dark", &self.colors.primary_dark)?,
            },
        })
    }

    pub fn quality(&self) -> Quality {
        Quality::new(self.image.quality)
    }

    pub fn palette_size(&self) -> PaletteSize {
        PaletteSize::new(self.image.max_colors)
    }
}

/// Brand colors as hex strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorsConfig {
    /// Subtitle color and the middle gradient stop.
    pub primary: String,
    /// Top of the headline gradient.
    pub primary_light: String,
    /// Site title color and the bottom of the headline gradient.
    pub primary_dark: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            primary: "#4f46e5".to_string(),
            primary_light: "#a5b4fc".to_string(),
            primary_dark: "#312e81".to_string(),
        }
    }
}

/// Font file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontsConfig {
    pub regular: String,
    pub extra_bold: String,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            regular: "assets/fonts/Inter-Regular.ttf".to_string(),
            extra_bold: "assets/fonts/Inter-ExtraBold.ttf".to_string(),
        }
    }
}

/// Encoder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageConfig {
    /// Quantization quality (1 = smallest files, 100 = best colors).
    pub quality: u32,
    /// Maximum palette entries per image.
    pub max_colors: usize,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            quality: 90,
            max_colors: 128,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Everything the scene composer needs from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub site_title: String,
    pub colors: BrandColors,
}

/// Parsed brand colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrandColors {
    pub primary: Rgba,
    pub primary_light: Rgba,
    pub primary_dark: Rgba,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SocialConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SocialConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SocialConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file.
///
/// Merges user values on top of stock defaults, rejects unknown keys, and
/// validates the result. A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<SocialConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `social.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Social Card Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Site name drawn in the top-left corner of every card.
site_title = "Word of the Day"

# Root directory for generated images. Word cards go to <output_dir>/<year>/,
# page cards to <output_dir>/pages/.
output_dir = "public/images/social"

# ---------------------------------------------------------------------------
# Brand colors
# ---------------------------------------------------------------------------
[colors]
# Subtitle text and the middle (60%) stop of the headline gradient.
primary = "#4f46e5"
# Top of the headline gradient.
primary_light = "#a5b4fc"
# Site title text and the bottom of the headline gradient.
primary_dark = "#312e81"

# ---------------------------------------------------------------------------
# Fonts (TrueType / OpenType outlines). Both are required at startup.
# ---------------------------------------------------------------------------
[fonts]
regular = "assets/fonts/Inter-Regular.ttf"
extra_bold = "assets/fonts/Inter-ExtraBold.ttf"

# ---------------------------------------------------------------------------
# Encoding
# ---------------------------------------------------------------------------
[image]
# Quantization quality (1 = smallest files, 100 = best colors).
quality = 90

# Maximum palette entries per image (2-256).
max_colors = 128

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Pages
# ---------------------------------------------------------------------------
# Each entry gets a card at <output_dir>/pages/<path with / replaced by ->.png
#
# [[pages]]
# path = "stats"
# title = "Statistics"
# subtitle = "Every word, counted"
"##
}
