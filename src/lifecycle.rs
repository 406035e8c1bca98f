//! Deleting gallery images together with their sidecar companions.
//!
//! Generated images usually travel with a metadata file sharing their stem
//! (`fox.png` + `fox.json`). Deleting one without the other leaves orphans
//! behind, so [`delete`] always removes the companions it is given.
//!
//! Deleting is idempotent: a path that is already gone is a normal outcome
//! (`deleted: false`), not an error. Two racing deletes of the same file are
//! fine for the same reason; whichever removes it first reports `true`.

use crate::resolve::{GalleryRoot, PathEscapeError, ResolvedPath};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeleteError {
    #[error(transparent)]
    PathEscape(#[from] PathEscapeError),
    #[error("Not a file: {0}")]
    NotAFile(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// What a delete call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// The primary file, resolved.
    pub path: ResolvedPath,
    /// Whether the primary file existed and was removed by this call.
    pub deleted: bool,
    /// Companion files removed alongside it.
    pub companions: Vec<ResolvedPath>,
}

/// Remove a file if it exists, reporting whether it did.
fn remove_if_present(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Delete `relative` and, if it was present, every companion with one of
/// `companion_suffixes` substituted for its extension.
///
/// Companions are best-effort: a missing one is skipped silently, and one
/// that resolves outside the root or fails to delete is logged and skipped.
/// Directories, including the root itself, are refused.
pub fn delete<S: AsRef<str>>(
    root: &GalleryRoot,
    relative: impl AsRef<Path>,
    companion_suffixes: &[S],
) -> Result<DeleteOutcome, DeleteError> {
    let path = root.resolve(relative)?;
    if path.as_path().is_dir() {
        return Err(DeleteError::NotAFile(path.as_path().to_path_buf()));
    }

    if !remove_if_present(path.as_path())? {
        tracing::warn!(path = %path, "does not exist, nothing deleted");
        return Ok(DeleteOutcome {
            path,
            deleted: false,
            companions: Vec::new(),
        });
    }
    tracing::info!(path = %path, "deleted");

    let mut companions = Vec::new();
    for suffix in companion_suffixes {
        let candidate = path.sibling_with_suffix(suffix.as_ref());
        let companion = match root.resolve(&candidate) {
            Ok(resolved) if resolved != path => resolved,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "skipping companion");
                continue;
            }
        };
        match remove_if_present(companion.as_path()) {
            Ok(true) => {
                tracing::debug!(companion = %companion, "deleted companion");
                companions.push(companion);
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(companion = %companion, error = %e, "companion not deleted");
            }
        }
    }

    Ok(DeleteOutcome {
        path,
        deleted: true,
        companions,
    })
}
