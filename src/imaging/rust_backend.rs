//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::into_dimensions` (header only) |
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate, format sniffed from content |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → PNG / TIFF | `DynamicImage::write_to` |
//! | Encode → JPEG | `JpegEncoder::new_with_quality` on an RGB8 copy |
//! | Encode → WebP | `WebPEncoder::new_lossless` on an RGBA8 copy |
//! | Encode → AVIF | `AvifEncoder` (rav1e, speed 6) on an RGBA8 copy |
//!
//! HEIC is commonly listed as a gallery suffix but has no decoder here;
//! such files surface as decode errors.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{Quality, TranscodeParams};
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use std::io::{Cursor, ErrorKind};
use std::path::Path;
use std::sync::LazyLock;

/// Extensions whose decoders are compiled in.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Split decoder errors into "couldn't read the file" and "couldn't make sense of it".
///
/// Only called once the file is open. A truncated or malformed stream shows up
/// as an I/O error from the decoder (`UnexpectedEof`, `InvalidData`) and is
/// reported as a decode failure.
fn classify(path: &Path, err: ImageError) -> BackendError {
    match err {
        ImageError::IoError(io)
            if !matches!(io.kind(), ErrorKind::UnexpectedEof | ErrorKind::InvalidData) =>
        {
            BackendError::Io(io)
        }
        other => BackendError::Decode(format!("{}: {}", path.display(), other)),
    }
}

/// Open and sniff an image; the format comes from the content, not the extension.
fn open(path: &Path) -> Result<ImageReader<std::io::BufReader<std::fs::File>>, BackendError> {
    Ok(ImageReader::open(path)?.with_guessed_format()?)
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    open(path)?.decode().map_err(|e| classify(path, e))
}

/// Encode into an in-memory buffer.
fn encode(
    img: &DynamicImage,
    format: ImageFormat,
    quality: Quality,
) -> Result<Vec<u8>, BackendError> {
    let mut buffer = Cursor::new(Vec::new());
    let q = quality.value() as u8;
    let result = match format {
        ImageFormat::Jpeg => {
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, q);
            DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)
        }
        ImageFormat::WebP => {
            let encoder = image::codecs::webp::WebPEncoder::new_lossless(&mut buffer);
            DynamicImage::ImageRgba8(img.to_rgba8()).write_with_encoder(encoder)
        }
        ImageFormat::Avif => {
            let encoder =
                image::codecs::avif::AvifEncoder::new_with_speed_quality(&mut buffer, 6, q);
            DynamicImage::ImageRgba8(img.to_rgba8()).write_with_encoder(encoder)
        }
        other => img.write_to(&mut buffer, other),
    };
    result.map_err(|e| BackendError::Encode(format!("{format:?}: {e}")))?;
    Ok(buffer.into_inner())
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = open(path)?.into_dimensions().map_err(|e| classify(path, e))?;
        Ok(Dimensions { width, height })
    }

    fn transcode(&self, params: &TranscodeParams) -> Result<Vec<u8>, BackendError> {
        let img = load_image(&params.source)?;
        let img = match params.resize {
            Some((width, height)) => img.resize_exact(width, height, FilterType::Lanczos3),
            None => img,
        };
        encode(&img, params.format.image_format(), params.quality)
    }
}
