//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides what a preview should look like) and the
//! [`backend`](super::backend) (which does the actual pixel work). Tests swap
//! in a mock backend without changing operation logic.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`OutputFormat`]: Encoder to use plus the lower-cased token for the MIME type.
//! - [`TranscodeParams`]: Source file, optional target dimensions, format, quality.

use image::ImageFormat;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Transport encoding for a preview.
///
/// Parsed from a format name such as `"PNG"` or `"jpeg"`. The lower-cased
/// name is kept as given so the MIME subtype matches what the caller asked
/// for (`"JPEG"` → `image/jpeg`, `"jpg"` → `image/jpg`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFormat {
    format: ImageFormat,
    token: String,
}

impl OutputFormat {
    pub fn png() -> Self {
        Self {
            format: ImageFormat::Png,
            token: "png".to_string(),
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        self.format
    }

    /// `image/<token>`.
    pub fn mime_type(&self) -> String {
        format!("image/{}", self.token)
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::png()
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().trim_start_matches('.').to_lowercase();
        let format = ImageFormat::from_extension(&token)
            .filter(|f| f.writing_enabled())
            .ok_or_else(|| format!("unsupported output format: {s}"))?;
        Ok(Self { format, token })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token.to_uppercase())
    }
}

/// Parameters for a decode → resize → encode pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeParams {
    pub source: PathBuf,
    /// Exact output dimensions, or `None` to keep the source size.
    pub resize: Option<(u32, u32)>,
    pub format: OutputFormat,
    pub quality: Quality,
}
