//! Sidecar generation metadata.
//!
//! Image generators commonly write a JSON file next to each output, sharing
//! the image's stem:
//!
//! ```text
//! outputs/
//! ├── 1730000000-fox.png
//! └── 1730000000-fox.json    {"prompt": "a red fox", "guidance": 3.5, "steps": 4, ...}
//! ```
//!
//! The well-known fields are pulled out into typed values; everything else is
//! kept verbatim in [`SidecarMetadata::extra`]. A field with an unexpected
//! type is treated as absent rather than failing the whole sidecar.
//!
//! Metadata is a nicety for the preview, so every failure mode (no sidecar,
//! unreadable file, invalid JSON, JSON that isn't an object) yields `None`.
//! The sidecar path is derived from the image's [`ResolvedPath`] and then
//! resolved again, so a sidecar symlinked out of the root is never read.

use crate::resolve::{GalleryRoot, ResolvedPath};
use serde::Serialize;
use serde_json::{Map, Value};

/// Suffix of the metadata sidecar written next to each generated image.
pub const SIDECAR_SUFFIX: &str = ".json";

/// Parsed contents of a sidecar file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SidecarMetadata {
    pub prompt: Option<String>,
    pub guidance: Option<f64>,
    pub steps: Option<u64>,
    pub seed: Option<u64>,
    pub model: Option<String>,
    /// Every other top-level key, untouched.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl SidecarMetadata {
    /// Build from a parsed JSON object. Returns `None` for non-objects.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut map) = value else {
            return None;
        };
        let prompt = take_string(&mut map, "prompt");
        let guidance = map.remove("guidance").and_then(|v| v.as_f64());
        let steps = map.remove("steps").and_then(|v| v.as_u64());
        let seed = map.remove("seed").and_then(|v| v.as_u64());
        let model = take_string(&mut map, "model");
        Some(Self {
            prompt,
            guidance,
            steps,
            seed,
            model,
            extra: map,
        })
    }

    /// Parse sidecar JSON text.
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok().and_then(Self::from_value)
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => None,
    }
}

/// Read the `.json` sidecar for an image.
///
/// Given `album/001-photo.png`, looks for `album/001-photo.json` inside the
/// same root.
pub fn read_sidecar(root: &GalleryRoot, image: &ResolvedPath) -> Option<SidecarMetadata> {
    let sidecar = root.resolve(image.sibling_with_suffix(SIDECAR_SUFFIX)).ok()?;
    if sidecar == *image {
        return None;
    }
    let text = std::fs::read_to_string(sidecar.as_path()).ok()?;
    SidecarMetadata::parse(&text)
}
