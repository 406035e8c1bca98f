//! "Show in file manager" for a gallery image.
//!
//! Revealing is a side channel: it only means something on a desktop with a
//! file manager, and it must never get in the way of browsing or deleting.
//! [`reveal`] therefore never fails for reveal reasons. Launch errors, missing
//! commands, and non-zero exits all come back as `ok: false` with a readable
//! detail. The only error is a path that escapes the root, which is rejected
//! before anything is launched.
//!
//! | Platform | Command |
//! |---|---|
//! | macOS | `open -R <file>` |
//! | Windows | `explorer /select,<file>` |
//! | Linux / BSD | `xdg-open <parent dir>` |
//! | anything else | unsupported |
//!
//! Servers and sandboxes use [`NoopRevealer`]; tests use a fake.

use crate::resolve::{GalleryRoot, PathEscapeError, ResolvedPath};
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Capability to focus a file manager window on a file.
pub trait Revealer {
    /// Human-readable name of the file manager, for messages.
    fn name(&self) -> &str;

    /// Open the file manager on `path`.
    fn reveal(&self, path: &Path) -> io::Result<()>;
}

/// Result of a reveal attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealOutcome {
    pub path: ResolvedPath,
    pub ok: bool,
    pub detail: String,
}

/// Resolve `relative` and ask `revealer` to show it.
pub fn reveal(
    revealer: &dyn Revealer,
    root: &GalleryRoot,
    relative: impl AsRef<Path>,
) -> Result<RevealOutcome, PathEscapeError> {
    let path = root.resolve(relative)?;
    let outcome = match revealer.reveal(path.as_path()) {
        Ok(()) => {
            let detail = format!("Opened {} in {}.", path, revealer.name());
            tracing::info!("{detail}");
            RevealOutcome {
                path,
                ok: true,
                detail,
            }
        }
        Err(e) => {
            let detail = format!("Failed to open {} for {}: {}", revealer.name(), path, e);
            tracing::warn!("{detail}");
            RevealOutcome {
                path,
                ok: false,
                detail,
            }
        }
    };
    Ok(outcome)
}

/// Reveals through the desktop's own file manager.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRevealer;

impl SystemRevealer {
    #[cfg(target_os = "macos")]
    fn command(path: &Path) -> io::Result<Command> {
        let mut cmd = Command::new("/usr/bin/open");
        cmd.arg("-R").arg(path);
        Ok(cmd)
    }

    #[cfg(target_os = "windows")]
    fn command(path: &Path) -> io::Result<Command> {
        let mut select = std::ffi::OsString::from("/select,");
        select.push(path.as_os_str());
        let mut cmd = Command::new("explorer.exe");
        cmd.arg(select);
        Ok(cmd)
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    fn command(path: &Path) -> io::Result<Command> {
        // xdg-open has no "select this file" mode; open the containing folder.
        let folder = path.parent().unwrap_or(path);
        let mut cmd = Command::new("xdg-open");
        cmd.arg(folder);
        Ok(cmd)
    }

    #[cfg(not(any(unix, target_os = "windows")))]
    fn command(_path: &Path) -> io::Result<Command> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "no file manager integration on this platform",
        ))
    }
}

impl Revealer for SystemRevealer {
    fn name(&self) -> &str {
        if cfg!(target_os = "macos") {
            "Finder"
        } else if cfg!(target_os = "windows") {
            "Explorer"
        } else {
            "the file manager"
        }
    }

    fn reveal(&self, path: &Path) -> io::Result<()> {
        let status = Self::command(path)?
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        // explorer.exe exits with 1 even when it worked.
        if status.success() || cfg!(target_os = "windows") {
            Ok(())
        } else {
            Err(io::Error::other(format!("file manager exited with {status}")))
        }
    }
}

/// For deployments without a desktop: every reveal reports it is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRevealer;

impl Revealer for NoopRevealer {
    fn name(&self) -> &str {
        "the file manager"
    }

    fn reveal(&self, _path: &Path) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "revealing files is disabled on this host",
        ))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::test_helpers::touch;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records what it was asked to reveal; optionally fails every call.
    #[derive(Default)]
    pub struct FakeRevealer {
        pub revealed: Mutex<Vec<PathBuf>>,
        pub fail_with: Option<io::ErrorKind>,
    }

    impl FakeRevealer {
        pub fn failing(kind: io::ErrorKind) -> Self {
            Self {
                revealed: Mutex::new(Vec::new()),
                fail_with: Some(kind),
            }
        }
    }

    impl Revealer for FakeRevealer {
        fn name(&self) -> &str {
            "FakeFinder"
        }

        fn reveal(&self, path: &Path) -> io::Result<()> {
            self.revealed.lock().unwrap().push(path.to_path_buf());
            match self.fail_with {
                Some(kind) => Err(io::Error::new(kind, "launch failed")),
                None => Ok(()),
            }
        }
    }

    fn setup() -> (TempDir, GalleryRoot) {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("album/fox.png"));
        let root = GalleryRoot::new(tmp.path()).unwrap();
        (tmp, root)
    }

    #[test]
    fn reveal_success_reports_ok() {
        let (_tmp, root) = setup();
        let fake = FakeRevealer::default();

        let outcome = reveal(&fake, &root, "album/fox.png").unwrap();
        assert!(outcome.ok);
        assert!(outcome.detail.contains("FakeFinder"));
        assert_eq!(
            *fake.revealed.lock().unwrap(),
            vec![root.path().join("album/fox.png")]
        );
    }

    #[test]
    fn reveal_failure_is_captured() {
        let (_tmp, root) = setup();
        let fake = FakeRevealer::failing(io::ErrorKind::PermissionDenied);

        let outcome = reveal(&fake, &root, "album/fox.png").unwrap();
        assert!(!outcome.ok);
        assert!(outcome.detail.contains("launch failed"));
        assert_eq!(outcome.path.relative(), Path::new("album/fox.png"));
    }

    #[test]
    fn reveal_escape_never_launches() {
        let (_tmp, root) = setup();
        let fake = FakeRevealer::default();

        assert!(reveal(&fake, &root, "../../etc/passwd").is_err());
        assert!(fake.revealed.lock().unwrap().is_empty());
    }

    #[test]
    fn noop_revealer_degrades_gracefully() {
        let (_tmp, root) = setup();

        let outcome = reveal(&NoopRevealer, &root, "album/fox.png").unwrap();
        assert!(!outcome.ok);
        assert!(outcome.detail.contains("disabled"));
    }
}
