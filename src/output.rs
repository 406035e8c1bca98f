//! CLI output formatting for every gallery command.
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! 001 1730000000-fox.png (just created, 1.2 MB)
//! 002 portraits/owl.jpg (3 hours ago, 845.0 KB)
//!
//! Showing 2 of 2 images
//! Skipped 1 unreadable entry:
//!     Walk error: IO error for operation on locked: Permission denied
//! ```
//!
//! ## Preview
//!
//! ```text
//! 1730000000-fox.png → 512x256 image/png
//!     Prompt: a red fox in the snow, golden hour
//!     Guidance: 3.5
//!     Steps: 4
//! ```
//!
//! ## Delete / Reveal
//!
//! ```text
//! Deleted 1730000000-fox.png
//!     Companion: 1730000000-fox.json
//! 41 images remaining
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no clock reads. Callers pass `now` in.

use crate::gallery::{Listing, Preview};
use crate::lifecycle::DeleteOutcome;
use crate::reveal::RevealOutcome;
use crate::scan::GalleryEntry;
use std::time::{Duration, SystemTime};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

/// Insert `,` between groups of three digits.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Human-readable file size with one decimal place.
fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

/// Describe how long ago something was created.
///
/// ```text
/// < 1 minute   just created
/// < 1 hour     12 min ago
/// < 1 day      3 hours ago
/// otherwise    1,204 days ago
/// ```
pub fn describe_recency(age: Duration) -> String {
    let secs = age.as_secs_f64();
    let rounded = |unit: f64| group_thousands((secs / unit).round() as u64);
    if secs < 60.0 {
        "just created".to_string()
    } else if secs < 3_600.0 {
        format!("{} min ago", rounded(60.0))
    } else if secs < 86_400.0 {
        format!("{} hours ago", rounded(3_600.0))
    } else {
        format!("{} days ago", rounded(86_400.0))
    }
}

/// Age of an mtime relative to `now`. Timestamps in the future count as new.
fn age(modified: SystemTime, now: SystemTime) -> Duration {
    now.duration_since(modified).unwrap_or_default()
}

// ============================================================================
// List
// ============================================================================

/// Format a sorted listing. `total` is the uncapped count, when known.
///
/// Entries the walk could not read are listed last, one per line.
pub fn format_listing(listing: &Listing, total: Option<usize>, now: SystemTime) -> Vec<String> {
    let entries = &listing.entries;
    let mut lines: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{} {} ({}, {})",
                format_index(i + 1),
                entry.path.relative().display(),
                describe_recency(age(entry.modified, now)),
                format_size(entry.size)
            )
        })
        .collect();

    if entries.is_empty() {
        lines.push("No images found".to_string());
    } else {
        lines.push(String::new());
        match total {
            Some(total) if total != entries.len() => lines.push(format!(
                "Showing {} of {}",
                entries.len(),
                plural(total, "image")
            )),
            _ => lines.push(format!("Showing {}", plural(entries.len(), "image"))),
        }
    }

    if !listing.errors.is_empty() {
        let noun = if listing.errors.len() == 1 { "entry" } else { "entries" };
        lines.push(format!("Skipped {} unreadable {}:", listing.errors.len(), noun));
        lines.extend(
            listing
                .errors
                .iter()
                .map(|e| format!("{}{}", indent(1), e)),
        );
    }
    lines
}

pub fn print_listing(listing: &Listing, total: Option<usize>) {
    for line in format_listing(listing, total, SystemTime::now()) {
        println!("{}", line);
    }
}

// ============================================================================
// Preview
// ============================================================================

/// Format a preview header plus its sidecar metadata.
pub fn format_preview(preview: &Preview) -> Vec<String> {
    let image = &preview.image;
    let mut lines = vec![format!(
        "{} → {}x{} {}",
        preview.path.relative().display(),
        image.width,
        image.height,
        image.mime_type
    )];

    let Some(meta) = &preview.metadata else {
        lines.push(format!("{}(no metadata)", indent(1)));
        return lines;
    };
    if let Some(prompt) = &meta.prompt {
        lines.push(format!("{}Prompt: {}", indent(1), truncate_desc(prompt, 120)));
    }
    if let Some(model) = &meta.model {
        lines.push(format!("{}Model: {}", indent(1), model));
    }
    if let Some(guidance) = meta.guidance {
        lines.push(format!("{}Guidance: {}", indent(1), guidance));
    }
    if let Some(steps) = meta.steps {
        lines.push(format!("{}Steps: {}", indent(1), steps));
    }
    if let Some(seed) = meta.seed {
        lines.push(format!("{}Seed: {}", indent(1), seed));
    }
    for (key, value) in &meta.extra {
        lines.push(format!(
            "{}{}: {}",
            indent(1),
            key,
            truncate_desc(&value.to_string(), 80)
        ));
    }
    lines
}

pub fn print_preview(preview: &Preview) {
    for line in format_preview(preview) {
        println!("{}", line);
    }
}

// ============================================================================
// Delete / Reveal
// ============================================================================

/// Format a delete result. `remaining` is the count after deleting, when known.
pub fn format_delete(outcome: &DeleteOutcome, remaining: Option<usize>) -> Vec<String> {
    let mut lines = Vec::new();
    if outcome.deleted {
        lines.push(format!("Deleted {}", outcome.path.relative().display()));
        for companion in &outcome.companions {
            lines.push(format!(
                "{}Companion: {}",
                indent(1),
                companion.relative().display()
            ));
        }
    } else {
        lines.push(format!(
            "{} was already gone",
            outcome.path.relative().display()
        ));
    }
    if let Some(n) = remaining {
        lines.push(format!("{} remaining", plural(n, "image")));
    }
    lines
}

pub fn print_delete(outcome: &DeleteOutcome, remaining: Option<usize>) {
    for line in format_delete(outcome, remaining) {
        println!("{}", line);
    }
}

pub fn format_reveal(outcome: &RevealOutcome) -> String {
    let status = if outcome.ok { "ok" } else { "failed" };
    format!("[{}] {}", status, outcome.detail)
}

pub fn print_reveal(outcome: &RevealOutcome) {
    println!("{}", format_reveal(outcome));
}
