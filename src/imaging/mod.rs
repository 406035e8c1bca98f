//! Preview transcoding in pure Rust, with no system image libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Resize** | `resize_exact` with Lanczos3, width-capped, aspect preserved |
//! | **Encode** | PNG, JPEG, TIFF, WebP (lossless), AVIF (rav1e) |
//! | **Inline** | base64 `data:` URI via [`TranscodeResult::data_uri`] |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: [`render`], combining resolution + calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::fit_to_width;
pub use operations::{PreviewConfig, RenderError, TranscodeResult, plan_transcode, render};
pub use params::{OutputFormat, Quality, TranscodeParams};
pub use rust_backend::{RustBackend, supported_input_extensions};
