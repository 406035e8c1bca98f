//! The gallery facade: one root directory, its configuration, and every
//! operation a front end needs.
//!
//! ```rust,no_run
//! use genai_gallery::gallery::Gallery;
//! use genai_gallery::scan::SortOrder;
//!
//! let gallery = Gallery::open("outputs")?;
//! let listing = gallery.listing(SortOrder::Newest);
//! for entry in &listing.entries {
//!     println!("{}", entry.path);
//! }
//! for error in &listing.errors {
//!     eprintln!("skipped: {error}");
//! }
//! let preview = gallery.preview("1730000000-fox.png", Some(256))?;
//! println!("{}", preview.image.data_uri());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Every path-taking method resolves its argument against the root first, so
//! nothing here touches a file outside it.

use crate::config::{ConfigError, GalleryConfig, load_config};
use crate::imaging::{
    ImageBackend, OutputFormat, PreviewConfig, RenderError, RustBackend, TranscodeResult, render,
    supported_input_extensions,
};
use crate::lifecycle::{DeleteError, DeleteOutcome, delete};
use crate::metadata::{SidecarMetadata, read_sidecar};
use crate::resolve::{GalleryRoot, PathEscapeError, ResolvedPath};
use crate::reveal::{RevealOutcome, Revealer, reveal};
use crate::scan::{self, Entries, GalleryEntry, ScanError, SortOrder, SuffixSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Gallery root {} is missing or not a directory: {source}", path.display())]
    Root {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A rendered preview plus whatever the generator recorded about it.
#[derive(Debug, Clone)]
pub struct Preview {
    pub path: ResolvedPath,
    pub image: TranscodeResult,
    /// Parsed `<stem>.json` sidecar, when present and valid.
    pub metadata: Option<SidecarMetadata>,
}

/// One sorted page of images plus whatever the walk failed to read.
#[derive(Debug, Default)]
pub struct Listing {
    pub entries: Vec<GalleryEntry>,
    pub errors: Vec<ScanError>,
}

impl Listing {
    /// Split walk results, sort the good ones, and keep the first
    /// `display_limit`. Errors are never truncated.
    pub fn collect(
        items: impl IntoIterator<Item = Result<GalleryEntry, ScanError>>,
        order: SortOrder,
        display_limit: usize,
    ) -> Self {
        let mut listing = Listing::default();
        for item in items {
            match item {
                Ok(entry) => listing.entries.push(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable entry");
                    listing.errors.push(e);
                }
            }
        }
        scan::sort_entries(&mut listing.entries, order);
        listing.entries.truncate(display_limit);
        listing
    }
}

pub struct Gallery<B = RustBackend> {
    root: GalleryRoot,
    config: GalleryConfig,
    suffixes: SuffixSet,
    preview: PreviewConfig,
    backend: B,
}

impl Gallery<RustBackend> {
    /// Open `dir` with the configuration from its `gallery.toml`, if any.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, GalleryError> {
        let config = load_config(dir.as_ref())?;
        Self::new(dir, config)
    }

    /// Open `dir` with an explicit configuration.
    pub fn new(dir: impl AsRef<Path>, config: GalleryConfig) -> Result<Self, GalleryError> {
        Self::with_backend(dir, config, RustBackend::new())
    }
}

impl<B: ImageBackend> Gallery<B> {
    pub fn with_backend(
        dir: impl AsRef<Path>,
        config: GalleryConfig,
        backend: B,
    ) -> Result<Self, GalleryError> {
        let dir = dir.as_ref();
        let root = GalleryRoot::new(dir).map_err(|source| GalleryError::Root {
            path: dir.to_path_buf(),
            source,
        })?;
        config.validate()?;
        let preview = config.preview()?;
        let suffixes = config.suffix_set();
        for suffix in suffixes.iter() {
            let ext = suffix.trim_start_matches('.');
            if !supported_input_extensions().iter().any(|s| *s == ext) {
                tracing::debug!(suffix, "listed but cannot be previewed");
            }
        }
        tracing::debug!(
            root = %root.path().display(),
            suffixes = suffixes.len(),
            "opened gallery"
        );
        Ok(Self {
            root,
            config,
            suffixes,
            preview,
            backend,
        })
    }

    pub fn root(&self) -> &GalleryRoot {
        &self.root
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn resolve(&self, relative: impl AsRef<Path>) -> Result<ResolvedPath, PathEscapeError> {
        self.root.resolve(relative)
    }

    /// Lazy walk capped at the configured enumeration limit.
    pub fn list(&self) -> Entries<'_> {
        scan::list(&self.root, &self.suffixes, self.config.enumeration_limit)
    }

    /// The page a front end shows: the capped walk, sorted, then cut to the
    /// display limit. Unreadable entries come back in [`Listing::errors`].
    pub fn listing(&self, order: SortOrder) -> Listing {
        Listing::collect(self.list(), order, self.config.display_limit)
    }

    /// Every matching file below the root, ignoring the enumeration limit.
    pub fn count(&self) -> Result<usize, ScanError> {
        scan::count(&self.root, &self.suffixes)
    }

    /// Preview settings for one request. `max_width` of `None` falls back to
    /// the configured width; `Some(0)` turns resizing off.
    pub fn preview_config(
        &self,
        max_width: Option<u32>,
        format: Option<OutputFormat>,
    ) -> PreviewConfig {
        let mut config = self.preview.clone();
        if let Some(width) = max_width {
            config.max_width = (width > 0).then_some(width);
        }
        if let Some(format) = format {
            config.format = format;
        }
        config
    }

    pub fn render(
        &self,
        relative: impl AsRef<Path>,
        max_width: Option<u32>,
    ) -> Result<TranscodeResult, RenderError> {
        self.render_with(relative, &self.preview_config(max_width, None))
    }

    pub fn render_with(
        &self,
        relative: impl AsRef<Path>,
        config: &PreviewConfig,
    ) -> Result<TranscodeResult, RenderError> {
        render(&self.backend, &self.root, relative, config)
    }

    /// Render plus sidecar metadata.
    pub fn preview(
        &self,
        relative: impl AsRef<Path>,
        max_width: Option<u32>,
    ) -> Result<Preview, RenderError> {
        let path = self.root.resolve(relative)?;
        let image = self.render(path.relative(), max_width)?;
        let metadata = read_sidecar(&self.root, &path);
        Ok(Preview {
            path,
            image,
            metadata,
        })
    }

    /// Delete an image and its configured companions.
    pub fn delete(&self, relative: impl AsRef<Path>) -> Result<DeleteOutcome, DeleteError> {
        delete(&self.root, relative, self.config.companion_suffixes.as_slice())
    }

    pub fn reveal(
        &self,
        revealer: &dyn Revealer,
        relative: impl AsRef<Path>,
    ) -> Result<RevealOutcome, PathEscapeError> {
        reveal(revealer, &self.root, relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::reveal::tests::FakeRevealer;
    use crate::test_helpers::{set_mtime, touch, write_png};
    use std::fs;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn mock_gallery(tmp: &TempDir, config: GalleryConfig) -> Gallery<MockBackend> {
        Gallery::with_backend(tmp.path(), config, MockBackend::with_dimensions(1000, 500))
            .unwrap()
    }

    #[test]
    fn open_missing_root_fails() {
        let tmp = TempDir::new().unwrap();
        let result = Gallery::open(tmp.path().join("nope"));
        assert!(matches!(result, Err(GalleryError::Root { .. })));
    }

    #[test]
    fn open_file_as_root_fails() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("file.png"));
        let result = Gallery::open(tmp.path().join("file.png"));
        assert!(matches!(result, Err(GalleryError::Root { .. })));
    }

    #[test]
    fn open_reads_gallery_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("gallery.toml"), "display_limit = 3").unwrap();
        let gallery = Gallery::open(tmp.path()).unwrap();
        assert_eq!(gallery.config().display_limit, 3);
    }

    #[test]
    fn invalid_config_rejected() {
        let tmp = TempDir::new().unwrap();
        let config = GalleryConfig {
            suffixes: vec![],
            ..Default::default()
        };
        assert!(matches!(
            Gallery::new(tmp.path(), config),
            Err(GalleryError::Config(_))
        ));
    }

    #[test]
    fn listing_sorts_then_truncates() {
        let tmp = TempDir::new().unwrap();
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        for (i, name) in ["a.png", "b.png", "c.png", "d.png"].iter().enumerate() {
            let path = tmp.path().join(name);
            touch(&path);
            set_mtime(&path, base + Duration::from_secs(i as u64 * 60));
        }
        touch(&tmp.path().join("notes.txt"));
        let gallery = mock_gallery(
            &tmp,
            GalleryConfig {
                display_limit: 2,
                ..Default::default()
            },
        );

        let names: Vec<_> = gallery
            .listing(SortOrder::Newest)
            .entries
            .into_iter()
            .map(|e| e.path.relative().to_path_buf())
            .collect();
        assert_eq!(names, vec![PathBuf::from("d.png"), PathBuf::from("c.png")]);

        let oldest = gallery.listing(SortOrder::Oldest);
        assert_eq!(oldest.entries[0].path.relative(), Path::new("a.png"));
        assert!(oldest.errors.is_empty());
        assert_eq!(gallery.count().unwrap(), 4);
    }

    #[test]
    fn listing_keeps_walk_errors_alongside_entries() {
        let tmp = TempDir::new().unwrap();
        let root = GalleryRoot::new(tmp.path()).unwrap();
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let entry = |name: &str, secs: u64| -> Result<GalleryEntry, ScanError> {
            touch(&tmp.path().join(name));
            Ok(GalleryEntry {
                path: root.confine(&root.path().join(name)).unwrap(),
                modified: base + Duration::from_secs(secs),
                size: 0,
            })
        };
        let items = vec![
            entry("a.png", 0),
            Err(ScanError::Io(std::io::Error::other("locked/ unreadable"))),
            entry("b.png", 60),
            entry("c.png", 120),
            Err(ScanError::Io(std::io::Error::other("vault/ unreadable"))),
        ];

        let listing = Listing::collect(items, SortOrder::Newest, 1);
        assert_eq!(listing.entries.len(), 1);
        assert_eq!(listing.entries[0].path.relative(), Path::new("c.png"));
        let errors: Vec<String> = listing.errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            errors,
            vec!["IO error: locked/ unreadable", "IO error: vault/ unreadable"]
        );
    }

    #[test]
    fn list_respects_enumeration_limit() {
        let tmp = TempDir::new().unwrap();
        for i in 0..6 {
            touch(&tmp.path().join(format!("{i}.jpg")));
        }
        let gallery = mock_gallery(
            &tmp,
            GalleryConfig {
                enumeration_limit: 3,
                ..Default::default()
            },
        );
        assert_eq!(gallery.list().count(), 3);
        assert_eq!(gallery.listing(SortOrder::Shuffled).entries.len(), 3);
        assert_eq!(gallery.count().unwrap(), 6);
    }

    #[test]
    fn render_falls_back_to_configured_width() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("wide.png"));
        let gallery = mock_gallery(&tmp, GalleryConfig::default());

        let result = gallery.render("wide.png", None).unwrap();
        assert_eq!((result.width, result.height), (512, 256));

        let result = gallery.render("wide.png", Some(250)).unwrap();
        assert_eq!((result.width, result.height), (250, 125));

        let result = gallery.render("wide.png", Some(0)).unwrap();
        assert_eq!((result.width, result.height), (1000, 500));
    }

    #[test]
    fn render_with_format_override() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("wide.png"));
        let gallery = mock_gallery(&tmp, GalleryConfig::default());

        let config = gallery.preview_config(Some(100), Some("JPEG".parse().unwrap()));
        let result = gallery.render_with("wide.png", &config).unwrap();
        assert_eq!(result.mime_type, "image/jpeg");

        let ops = gallery.backend.get_operations();
        assert!(matches!(
            &ops[1],
            RecordedOp::Transcode { resize: Some((100, 50)), mime, .. } if mime == "image/jpeg"
        ));
    }

    #[test]
    fn preview_includes_sidecar_metadata() {
        let tmp = TempDir::new().unwrap();
        write_png(&tmp.path().join("fox.png"), 40, 20);
        fs::write(
            tmp.path().join("fox.json"),
            r#"{"prompt": "a red fox", "steps": 4}"#,
        )
        .unwrap();
        let gallery = Gallery::new(tmp.path(), GalleryConfig::default()).unwrap();

        let preview = gallery.preview("fox.png", None).unwrap();
        assert_eq!((preview.image.width, preview.image.height), (40, 20));
        let meta = preview.metadata.unwrap();
        assert_eq!(meta.prompt.as_deref(), Some("a red fox"));
        assert_eq!(meta.steps, Some(4));
    }

    #[test]
    fn preview_without_sidecar() {
        let tmp = TempDir::new().unwrap();
        write_png(&tmp.path().join("fox.png"), 8, 8);
        let gallery = Gallery::new(tmp.path(), GalleryConfig::default()).unwrap();

        let preview = gallery.preview("fox.png", None).unwrap();
        assert!(preview.metadata.is_none());
    }

    #[test]
    fn preview_rejects_escape() {
        let tmp = TempDir::new().unwrap();
        let gallery = mock_gallery(&tmp, GalleryConfig::default());
        assert!(matches!(
            gallery.preview("../x.png", None),
            Err(RenderError::PathEscape(_))
        ));
    }

    #[test]
    fn delete_uses_configured_companions() {
        let tmp = TempDir::new().unwrap();
        for f in ["fox.png", "fox.json", "fox.txt"] {
            touch(&tmp.path().join(f));
        }
        let gallery = mock_gallery(
            &tmp,
            GalleryConfig {
                companion_suffixes: vec![".txt".into()],
                ..Default::default()
            },
        );

        let outcome = gallery.delete("fox.png").unwrap();
        assert!(outcome.deleted);
        assert!(tmp.path().join("fox.json").exists());
        assert!(!tmp.path().join("fox.txt").exists());
        assert!(!gallery.delete("fox.png").unwrap().deleted);
    }

    #[test]
    fn reveal_goes_through_root() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("fox.png"));
        let gallery = mock_gallery(&tmp, GalleryConfig::default());
        let fake = FakeRevealer::default();

        assert!(gallery.reveal(&fake, "fox.png").unwrap().ok);
        assert!(gallery.reveal(&fake, "/etc/passwd").is_err());
        assert_eq!(fake.revealed.lock().unwrap().len(), 1);
    }
}
