//! Pure calculation functions for preview dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Dimensions a preview should be resampled to, or `None` to keep the source.
///
/// Only downsamples: when `max_width` is absent, zero, or not strictly less
/// than the source width, the image is left alone. Otherwise the width
/// becomes `max_width` and the height follows the source aspect ratio,
/// rounded to the nearest pixel and never below one.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `max_width` - Largest width the preview may have
///
/// # Returns
/// * `Some((width, height))` - Target dimensions when a resize is needed
pub fn fit_to_width(source: (u32, u32), max_width: Option<u32>) -> Option<(u32, u32)> {
    let (src_w, src_h) = source;
    let max_w = max_width.filter(|&w| w > 0)?;
    if max_w >= src_w {
        return None;
    }
    let h = (max_w as f64 / src_w as f64 * src_h as f64).round() as u32;
    Some((max_w, h.max(1)))
}
