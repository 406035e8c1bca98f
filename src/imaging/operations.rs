//! High-level image operations.
//!
//! These functions combine path resolution, calculations, and backend
//! execution. They take configuration, compute parameters, and call the
//! backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::fit_to_width;
use super::params::{OutputFormat, Quality, TranscodeParams};
use crate::resolve::{GalleryRoot, PathEscapeError, ResolvedPath};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a preview couldn't be produced.
///
/// Callers are expected to tell [`NotFound`](RenderError::NotFound) (show a
/// "removed" placeholder) apart from [`Decode`](RenderError::Decode) (show a
/// format error).
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    PathEscape(#[from] PathEscapeError),
    #[error("{} is invalid, does not exist, or has been deleted", .0.display())]
    NotFound(PathBuf),
    #[error("Cannot decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("IO error: {0}")]
    Io(std::io::Error),
}

impl RenderError {
    fn from_backend(path: &Path, err: BackendError) -> Self {
        match err {
            BackendError::Io(e)
                if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) =>
            {
                RenderError::NotFound(path.to_path_buf())
            }
            BackendError::Io(e) => RenderError::Io(e),
            BackendError::Decode(reason) => RenderError::Decode {
                path: path.to_path_buf(),
                reason,
            },
            BackendError::Encode(reason) => RenderError::Encode(reason),
        }
    }
}

/// Configuration for preview rendering.
#[derive(Debug, Clone, Default)]
pub struct PreviewConfig {
    pub format: OutputFormat,
    /// Widest preview to produce; `None` keeps the source width.
    pub max_width: Option<u32>,
    pub quality: Quality,
}

/// An encoded preview, ready to inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeResult {
    pub bytes: Vec<u8>,
    /// Full MIME type, e.g. `image/png`.
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
}

impl TranscodeResult {
    /// `data:<mime>;base64,<payload>`, suitable for an `<img src>`.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, BASE64.encode(&self.bytes))
    }
}

/// Plan a transcode without executing it.
///
/// Useful for testing parameter generation.
pub fn plan_transcode(
    source: &ResolvedPath,
    original_dims: (u32, u32),
    config: &PreviewConfig,
) -> TranscodeParams {
    TranscodeParams {
        source: source.as_path().to_path_buf(),
        resize: fit_to_width(original_dims, config.max_width),
        format: config.format.clone(),
        quality: config.quality,
    }
}

/// Resolve, decode, downsample, and re-encode a gallery image.
///
/// The source file is only ever read.
pub fn render(
    backend: &impl ImageBackend,
    root: &GalleryRoot,
    relative: impl AsRef<Path>,
    config: &PreviewConfig,
) -> Result<TranscodeResult, RenderError> {
    let source = root.resolve(relative)?;
    let path = source.as_path();
    if path.is_dir() {
        return Err(RenderError::Decode {
            path: path.to_path_buf(),
            reason: "is a directory".to_string(),
        });
    }

    let dims = backend
        .identify(path)
        .map_err(|e| RenderError::from_backend(path, e))?;
    let params = plan_transcode(&source, (dims.width, dims.height), config);
    let (width, height) = params.resize.unwrap_or((dims.width, dims.height));

    let bytes = backend
        .transcode(&params)
        .map_err(|e| RenderError::from_backend(path, e))?;

    tracing::debug!(
        source = %source.relative().display(),
        width,
        height,
        format = %config.format,
        bytes = bytes.len(),
        "rendered preview"
    );

    Ok(TranscodeResult {
        bytes,
        mime_type: config.format.mime_type(),
        width,
        height,
    })
}
