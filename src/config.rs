//! Gallery configuration.
//!
//! Handles loading, validating, and merging `gallery.toml`. Stock defaults
//! are overridden by an optional file in the gallery root, and command-line
//! flags override both.
//!
//! ## Config File Location
//!
//! ```text
//! outputs/                     # Gallery root
//! ├── gallery.toml             # Optional; overrides stock defaults
//! ├── 1730000000-fox.png
//! └── 1730000000-fox.json
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! suffixes = [".jpg", ".jpeg", ".png", ".heic"]  # What counts as an image
//! companion_suffixes = [".json"]                 # Deleted along with an image
//! default_max_width = 512                        # Preview width cap (0 = off)
//! enumeration_limit = 1000                       # Files read per listing
//! display_limit = 100                            # Entries shown per listing
//! preview_format = "PNG"                         # Preview encoding
//! preview_quality = 90                           # JPEG/AVIF quality (1-100)
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::imaging::{OutputFormat, PreviewConfig, Quality};
use crate::scan::SuffixSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the per-gallery config file.
pub const CONFIG_FILE: &str = "gallery.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from `gallery.toml`.
///
/// All fields have sensible defaults. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// File suffixes that count as images (case-insensitive).
    pub suffixes: Vec<String>,
    /// Suffixes of sidecar files deleted together with an image.
    pub companion_suffixes: Vec<String>,
    /// Preview width cap when the caller doesn't give one; 0 disables resizing.
    pub default_max_width: u32,
    /// Safety cap on files read per listing, applied before sorting.
    pub enumeration_limit: usize,
    /// Entries presented per listing, applied after sorting.
    pub display_limit: usize,
    /// Encoding for previews (`PNG`, `JPEG`, `WEBP`, `AVIF`, `TIFF`).
    pub preview_format: String,
    /// Quality for lossy preview formats.
    pub preview_quality: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            suffixes: [".jpg", ".jpeg", ".png", ".heic"]
                .into_iter()
                .map(String::from)
                .collect(),
            companion_suffixes: vec![".json".to_string()],
            default_max_width: 512,
            enumeration_limit: 1000,
            display_limit: 100,
            preview_format: "PNG".to_string(),
            preview_quality: 90,
        }
    }
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.suffix_set().is_empty() {
            return Err(ConfigError::Validation(
                "suffixes must name at least one extension".into(),
            ));
        }
        if self.enumeration_limit == 0 {
            return Err(ConfigError::Validation(
                "enumeration_limit must be non-zero".into(),
            ));
        }
        if self.display_limit == 0 {
            return Err(ConfigError::Validation(
                "display_limit must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.preview_quality) {
            return Err(ConfigError::Validation(
                "preview_quality must be 1-100".into(),
            ));
        }
        self.output_format()?;
        Ok(())
    }

    pub fn suffix_set(&self) -> SuffixSet {
        SuffixSet::new(&self.suffixes)
    }

    pub fn output_format(&self) -> Result<OutputFormat, ConfigError> {
        self.preview_format
            .parse()
            .map_err(|e: String| ConfigError::Validation(format!("preview_format: {e}")))
    }

    /// `None` when resizing is switched off.
    pub fn max_width(&self) -> Option<u32> {
        (self.default_max_width > 0).then_some(self.default_max_width)
    }

    /// Preview settings derived from this config.
    pub fn preview(&self) -> Result<PreviewConfig, ConfigError> {
        Ok(PreviewConfig {
            format: self.output_format()?,
            max_width: self.max_width(),
            quality: Quality::new(self.preview_quality),
        })
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GalleryConfig::default()).expect("default config must serialize")
}

/// Overlay the top-level keys of `overlay` on `base`.
///
/// The config is flat, so each key in `overlay` replaces the same key in
/// `base` wholesale and keys only in `base` are kept. A non-table overlay
/// replaces `base` entirely.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            base_table.extend(overlay_table);
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `gallery.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no config file exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<GalleryConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `gallery.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<GalleryConfig, ConfigError> {
    let overlay = load_raw_config(dir)?;
    if overlay.is_some() {
        tracing::debug!(dir = %dir.display(), "loaded {CONFIG_FILE}");
    }
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `gallery.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Gallery Configuration
# =====================
#
# Place this file as gallery.toml in the gallery root. Every key is optional;
# anything left out keeps the default shown here.

# File suffixes that count as images. Matching is case-insensitive and the
# leading dot is optional. HEIC files are listed but cannot be previewed.
suffixes = [".jpg", ".jpeg", ".png", ".heic"]

# Sidecar files deleted together with an image. A file sharing the image's
# stem with one of these suffixes is removed when the image is deleted.
companion_suffixes = [".json"]

# Previews wider than this are downsampled, keeping the aspect ratio.
# Narrower images are never upscaled. 0 turns resizing off.
default_max_width = 512

# Safety cap on how many files one listing reads from disk. Sorting happens
# after this cap, so with more matching files than this a "newest" listing
# covers only the files the walk reached.
enumeration_limit = 1000

# How many entries a listing shows after sorting.
display_limit = 100

# Preview encoding: PNG, JPEG, WEBP, AVIF, or TIFF.
preview_format = "PNG"

# Quality for lossy preview encodings (JPEG, AVIF), 1-100.
preview_quality = 90
"##
}
