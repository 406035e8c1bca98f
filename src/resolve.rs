//! Root confinement for every path a caller hands to the gallery.
//!
//! A [`GalleryRoot`] is an absolute, canonical directory. The only way to get
//! a [`ResolvedPath`] is through [`GalleryRoot::resolve`] (or, for paths that
//! came out of a walk of the root itself, the crate-internal
//! [`GalleryRoot::confine`]). Every filesystem read or write in this crate
//! takes a `ResolvedPath`, so a path that escapes the root cannot reach one.
//!
//! ## Resolution
//!
//! ```text
//! root/ + "album/../img.png"   →  root/img.png          ok
//! root/ + ""                   →  root/                 ok (the root itself)
//! root/ + "../etc/passwd"      →  /etc/passwd           PathEscapeError
//! root/ + "link-to-outside"    →  /elsewhere/target     PathEscapeError
//! root/ + "gone.png"           →  root/gone.png         ok (need not exist)
//! ```
//!
//! `.` and `..` are applied lexically to the joined path first, so
//! `missing/../link/x` means `link/x` and the link is then followed like any
//! other. Canonicalization follows symlinks before the containment check.
//! Paths that do not exist yet keep their missing tail (via
//! `soft-canonicalize`), so a delete of an already-removed file still reports
//! which path it meant.

use std::fmt;
use std::fs;
use std::io;
use soft_canonicalize::soft_canonicalize;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// A relative path could not be proven to stay inside the gallery root.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot escape gallery root to {}", requested.display())]
pub struct PathEscapeError {
    /// The path as the caller supplied it.
    pub requested: PathBuf,
}

/// The confinement boundary: an absolute, canonical directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryRoot {
    path: PathBuf,
}

impl GalleryRoot {
    /// Canonicalize `dir` and check it is a directory.
    pub fn new(dir: impl AsRef<Path>) -> io::Result<Self> {
        let path = fs::canonicalize(dir.as_ref())?;
        if !path.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{} is not a directory", path.display()),
            ));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve a caller-supplied path against the root.
    ///
    /// Fails with [`PathEscapeError`] when the canonical result is neither the
    /// root nor below it, and also when containment cannot be established at
    /// all (unreadable ancestors, dangling symlinks).
    pub fn resolve(&self, relative: impl AsRef<Path>) -> Result<ResolvedPath, PathEscapeError> {
        let relative = relative.as_ref();
        let escape = || PathEscapeError {
            requested: relative.to_path_buf(),
        };

        let joined = normalize_lexically(&self.path.join(relative));
        let canonical = soft_canonicalize(&joined).map_err(|_| escape())?;

        // Anything still a symlink after canonicalization is dangling: its
        // target can't be checked, so it can't be trusted.
        if fs::symlink_metadata(&canonical).is_ok_and(|m| m.file_type().is_symlink()) {
            return Err(escape());
        }

        let inside = canonical
            .strip_prefix(&self.path)
            .map_err(|_| escape())?
            .to_path_buf();

        Ok(ResolvedPath {
            absolute: canonical,
            relative: inside,
        })
    }

    /// Accept a path produced by walking this root without following links.
    ///
    /// Such paths are already canonical apart from the final entry, so only a
    /// lexical containment check is needed.
    pub(crate) fn confine(&self, path: &Path) -> Result<ResolvedPath, PathEscapeError> {
        let escape = || PathEscapeError {
            requested: path.to_path_buf(),
        };
        if path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::CurDir))
        {
            return Err(escape());
        }
        let inside = path.strip_prefix(&self.path).map_err(|_| escape())?;
        Ok(ResolvedPath {
            absolute: path.to_path_buf(),
            relative: inside.to_path_buf(),
        })
    }
}

/// An absolute path proven to lie within (or equal) a [`GalleryRoot`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedPath {
    absolute: PathBuf,
    relative: PathBuf,
}

impl ResolvedPath {
    pub fn as_path(&self) -> &Path {
        &self.absolute
    }

    /// Path relative to the root; empty for the root itself.
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// Root-relative path with `suffix` substituted for the current extension.
    ///
    /// `suffix` may be given with or without its leading dot. The result is a
    /// plain relative path and must go back through [`GalleryRoot::resolve`]
    /// before anything touches it.
    pub fn sibling_with_suffix(&self, suffix: &str) -> PathBuf {
        self.relative.with_extension(suffix.trim_start_matches('.'))
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        &self.absolute
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.absolute.display())
    }
}

/// Apply `.` and `..` components without touching the filesystem.
///
/// Runs before any canonicalization so a `..` can never land on a symlink
/// that was skipped over because an earlier component did not exist.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                normalized.pop();
            }
            Component::CurDir => {}
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn root_with_files() -> (TempDir, GalleryRoot) {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("album/nested")).unwrap();
        fs::write(tmp.path().join("top.png"), b"x").unwrap();
        fs::write(tmp.path().join("album/nested/deep.jpg"), b"x").unwrap();
        let root = GalleryRoot::new(tmp.path()).unwrap();
        (tmp, root)
    }

    #[test]
    fn root_is_canonical() {
        let (tmp, root) = root_with_files();
        assert_eq!(root.path(), fs::canonicalize(tmp.path()).unwrap());
    }

    #[test]
    fn root_must_be_directory() {
        let (tmp, _root) = root_with_files();
        let err = GalleryRoot::new(tmp.path().join("top.png")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotADirectory);
    }

    #[test]
    fn empty_path_resolves_to_root() {
        let (_tmp, root) = root_with_files();
        let resolved = root.resolve("").unwrap();
        assert_eq!(resolved.as_path(), root.path());
        assert_eq!(resolved.relative(), Path::new(""));
    }

    #[test]
    fn nested_file_resolves_inside_root() {
        let (_tmp, root) = root_with_files();
        let resolved = root.resolve("album/nested/deep.jpg").unwrap();
        assert!(resolved.as_path().starts_with(root.path()));
        assert_eq!(resolved.relative(), Path::new("album/nested/deep.jpg"));
    }

    #[test]
    fn dot_segments_that_stay_inside_are_accepted() {
        let (_tmp, root) = root_with_files();
        let resolved = root.resolve("album/./nested/../../top.png").unwrap();
        assert_eq!(resolved.relative(), Path::new("top.png"));
    }

    #[test]
    fn parent_traversal_is_rejected() {
        let (_tmp, root) = root_with_files();
        for attempt in ["..", "../x.png", "album/../../x.png", "album/nested/../../../.."] {
            let err = root.resolve(attempt).unwrap_err();
            assert_eq!(err.requested, PathBuf::from(attempt), "{attempt}");
        }
    }

    #[test]
    fn traversal_through_missing_directory_is_rejected() {
        let (_tmp, root) = root_with_files();
        assert!(root.resolve("missing/../../outside.png").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn traversal_through_missing_dir_into_symlinked_dir_is_rejected() {
        let (tmp, root) = root_with_files();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("secret.png"), b"x").unwrap();
        std::os::unix::fs::symlink(outside.path(), tmp.path().join("linkdir")).unwrap();

        for attempt in [
            "missing/../linkdir/secret.png",
            "missing/deeper/../../linkdir/secret.png",
            "./missing/../linkdir/not-there.png",
        ] {
            assert!(root.resolve(attempt).is_err(), "{attempt}");
        }
    }

    #[test]
    fn traversal_through_missing_dir_that_stays_inside_is_accepted() {
        let (_tmp, root) = root_with_files();
        let resolved = root.resolve("missing/../album/nested/deep.jpg").unwrap();
        assert_eq!(resolved.relative(), Path::new("album/nested/deep.jpg"));
    }

    #[test]
    fn absolute_path_outside_root_is_rejected() {
        let (_tmp, root) = root_with_files();
        let outside = TempDir::new().unwrap();
        assert!(root.resolve(outside.path()).is_err());
    }

    #[test]
    fn missing_file_still_resolves() {
        let (_tmp, root) = root_with_files();
        let resolved = root.resolve("album/gone.png").unwrap();
        assert_eq!(resolved.as_path(), root.path().join("album/gone.png"));
        assert!(!resolved.as_path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_pointing_outside_is_rejected() {
        let (tmp, root) = root_with_files();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("secret.png"), b"x").unwrap();
        std::os::unix::fs::symlink(outside.path().join("secret.png"), tmp.path().join("link.png"))
            .unwrap();
        std::os::unix::fs::symlink(outside.path(), tmp.path().join("linkdir")).unwrap();

        assert!(root.resolve("link.png").is_err());
        assert!(root.resolve("linkdir/secret.png").is_err());
        assert!(root.resolve("linkdir/not-there.png").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_inside_root_is_followed() {
        let (tmp, root) = root_with_files();
        std::os::unix::fs::symlink(tmp.path().join("top.png"), tmp.path().join("alias.png"))
            .unwrap();
        let resolved = root.resolve("alias.png").unwrap();
        assert_eq!(resolved.relative(), Path::new("top.png"));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_rejected() {
        let (tmp, root) = root_with_files();
        std::os::unix::fs::symlink("/definitely/not/here.png", tmp.path().join("dangling.png"))
            .unwrap();
        assert!(root.resolve("dangling.png").is_err());
    }

    #[test]
    fn sibling_with_suffix_swaps_extension() {
        let (_tmp, root) = root_with_files();
        let resolved = root.resolve("album/nested/deep.jpg").unwrap();
        assert_eq!(
            resolved.sibling_with_suffix(".json"),
            PathBuf::from("album/nested/deep.json")
        );
        assert_eq!(
            resolved.sibling_with_suffix("txt"),
            PathBuf::from("album/nested/deep.txt")
        );
    }

    #[test]
    fn confine_accepts_walked_paths_and_rejects_others() {
        let (_tmp, root) = root_with_files();
        let walked = root.path().join("album/nested/deep.jpg");
        assert_eq!(
            root.confine(&walked).unwrap().relative(),
            Path::new("album/nested/deep.jpg")
        );
        assert!(root.confine(&root.path().join("../x.png")).is_err());
        assert!(root.confine(Path::new("/elsewhere/x.png")).is_err());
    }
}
