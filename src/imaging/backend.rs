//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations a preview needs:
//! identify (read dimensions from the header) and transcode (decode, resample,
//! encode to an in-memory buffer).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use a recording mock.

use super::params::TranscodeParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// Neither operation may modify the source file.
pub trait ImageBackend: Sync {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode `params.source`, resample if asked, and return the encoded bytes.
    fn transcode(&self, params: &TranscodeParams) -> Result<Vec<u8>, BackendError>;
}
