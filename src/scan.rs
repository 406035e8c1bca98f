//! Bounded enumeration of image files below the gallery root.
//!
//! Listing is a two-phase affair:
//!
//! 1. [`list`] walks the root and lazily yields matching files, stopping once
//!    `limit` entries have come out. The cap bounds memory on huge trees.
//! 2. The caller materializes that capped set and orders it with
//!    [`sort_entries`] (newest first, oldest first, or shuffled).
//!
//! Walk order is whatever the filesystem returns, so when a tree holds more
//! matching files than the cap, the sorted result is the newest/oldest *of the
//! files the walk happened to reach*, not necessarily of the whole tree. That
//! is accepted: the cap exists so a runaway directory can't exhaust memory.
//!
//! The limit is inclusive: `list(.., 10)` yields at most ten entries and
//! `list(.., 0)` yields none. Walk errors (unreadable subdirectories and the
//! like) are yielded as `Err` items, not swallowed, and don't count toward the
//! limit. Symlinks are not followed and only regular files are yielded.

use crate::resolve::{GalleryRoot, PathEscapeError, ResolvedPath};
use rand::seq::SliceRandom;
use std::path::Path;
use std::str::FromStr;
use std::time::SystemTime;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    PathEscape(#[from] PathEscapeError),
}

/// Ordered, de-duplicated, case-insensitive set of file suffixes.
///
/// Suffixes are stored lower-cased with a leading dot (`.jpg`), whatever form
/// they were given in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixSet {
    suffixes: Vec<String>,
}

impl SuffixSet {
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for suffix in suffixes {
            let trimmed = suffix.as_ref().trim().trim_start_matches('.');
            if trimmed.is_empty() {
                continue;
            }
            let dotted = format!(".{}", trimmed.to_lowercase());
            if !normalized.contains(&dotted) {
                normalized.push(dotted);
            }
        }
        Self {
            suffixes: normalized,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.suffixes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.suffixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }

    /// Does the file name of `path` end in one of the suffixes?
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.suffixes
                    .iter()
                    .any(|s| s[1..].eq_ignore_ascii_case(ext))
            })
    }
}

/// A matching file discovered by a walk.
#[derive(Debug, Clone)]
pub struct GalleryEntry {
    pub path: ResolvedPath,
    pub modified: SystemTime,
    pub size: u64,
}

/// Lazy walk of the root, yielding at most `limit` matching files.
///
/// The returned iterator is finite and single-use.
pub fn list<'a>(root: &'a GalleryRoot, suffixes: &'a SuffixSet, limit: usize) -> Entries<'a> {
    Entries {
        root,
        suffixes,
        walker: WalkDir::new(root.path()).follow_links(false).into_iter(),
        remaining: limit,
    }
}

/// Iterator returned by [`list`].
pub struct Entries<'a> {
    root: &'a GalleryRoot,
    suffixes: &'a SuffixSet,
    walker: walkdir::IntoIter,
    remaining: usize,
}

impl Entries<'_> {
    fn entry_for(&self, dir_entry: &walkdir::DirEntry) -> Result<GalleryEntry, ScanError> {
        let path = self.root.confine(dir_entry.path())?;
        let metadata = dir_entry.metadata()?;
        Ok(GalleryEntry {
            path,
            modified: metadata.modified()?,
            size: metadata.len(),
        })
    }
}

impl Iterator for Entries<'_> {
    type Item = Result<GalleryEntry, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        loop {
            let dir_entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(ScanError::Walk(e))),
            };
            if !dir_entry.file_type().is_file() || !self.suffixes.matches(dir_entry.path()) {
                continue;
            }
            let item = self.entry_for(&dir_entry);
            if item.is_ok() {
                self.remaining -= 1;
            }
            return Some(item);
        }
    }
}

impl std::iter::FusedIterator for Entries<'_> {}

/// Count every matching file below the root, with no cap.
pub fn count(root: &GalleryRoot, suffixes: &SuffixSet) -> Result<usize, ScanError> {
    let mut total = 0;
    for entry in WalkDir::new(root.path()).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_file() && suffixes.matches(entry.path()) {
            total += 1;
        }
    }
    Ok(total)
}

/// How a materialized listing is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SortOrder {
    /// Most recently modified first
    #[default]
    Newest,
    /// Least recently modified first
    Oldest,
    /// Random order, different on every call
    Shuffled,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "shuffled" | "shuffle" => Ok(Self::Shuffled),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Order entries in place. Ties on mtime fall back to the relative path so
/// the result is deterministic for the two time-based orders.
pub fn sort_entries(entries: &mut [GalleryEntry], order: SortOrder) {
    match order {
        SortOrder::Newest => entries.sort_by(|a, b| {
            b.modified
                .cmp(&a.modified)
                .then_with(|| a.path.relative().cmp(b.path.relative()))
        }),
        SortOrder::Oldest => entries.sort_by(|a, b| {
            a.modified
                .cmp(&b.modified)
                .then_with(|| a.path.relative().cmp(b.path.relative()))
        }),
        SortOrder::Shuffled => entries.shuffle(&mut rand::thread_rng()),
    }
}
