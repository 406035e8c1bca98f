//! Shared test utilities for the genai-gallery test suite.
//!
//! Builds small on-disk fixtures: empty files, synthetic images of a given
//! size, and files with a pinned modification time.
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! write_png(&tmp.path().join("wide.png"), 1000, 500);
//! set_mtime(&tmp.path().join("wide.png"), SystemTime::UNIX_EPOCH);
//! ```

use image::{ImageEncoder, RgbImage, RgbaImage};
use std::fs;
use std::path::Path;
use std::time::SystemTime;

// =========================================================================
// Plain files
// =========================================================================

/// Create an empty file, along with any missing parent directories.
pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"").unwrap();
}

/// Pin a file's modification time.
pub fn set_mtime(path: &Path, time: SystemTime) {
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(time)
        .unwrap();
}

// =========================================================================
// Synthetic images
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Write a gradient PNG of the given size.
pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    gradient(width, height)
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

/// Write a half-transparent RGBA PNG of the given size.
pub fn write_rgba_png(path: &Path, width: u32, height: u32) {
    RgbaImage::from_fn(width, height, |x, _| {
        image::Rgba([200, 100, 50, if x % 2 == 0 { 255 } else { 64 }])
    })
    .save_with_format(path, image::ImageFormat::Png)
    .unwrap();
}

/// Write a gradient JPEG of the given size.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    let file = fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Decode a `data:` URI back into an image, for asserting on output.
pub fn decode_data_uri(uri: &str) -> image::DynamicImage {
    use base64::Engine;
    let (_, payload) = uri.split_once(";base64,").unwrap();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .unwrap();
    image::load_from_memory(&bytes).unwrap()
}
