//! # GenAI Gallery
//!
//! Browse, preview, and prune a directory of generated images. One directory
//! is the gallery root; everything the gallery reads, renders, or deletes
//! lives inside it, and every caller-supplied path is proven to stay inside
//! before it is touched.
//!
//! # Architecture
//!
//! ```text
//! caller path ──▶ resolve ──▶ ResolvedPath ──┬──▶ imaging   (decode, downsample, encode)
//!                                            ├──▶ lifecycle (delete + companions)
//!                                            ├──▶ reveal    (file manager)
//!                                            └──▶ metadata  (sidecar JSON)
//! root ──▶ scan ──▶ capped walk ──▶ sort ──▶ listing
//! ```
//!
//! [`resolve::ResolvedPath`] can only be built by resolving against a
//! [`resolve::GalleryRoot`], so any function that takes one has containment
//! for free. The [`gallery::Gallery`] facade bundles the root with its
//! configuration and is what front ends use.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`resolve`] | Root confinement: canonical root, `resolve`, `PathEscapeError` |
//! | [`scan`] | Lazy, capped walk for image files; uncapped `count`; sort orders |
//! | [`imaging`] | Pure-Rust preview transcoding: identify, downsample, encode, data URIs |
//! | [`lifecycle`] | Idempotent delete with companion sidecar cleanup |
//! | [`reveal`] | "Show in file manager" behind a swappable `Revealer` |
//! | [`metadata`] | Generation metadata from `.json` sidecars |
//! | [`config`] | `gallery.toml` loading, merging over stock defaults, validation |
//! | [`gallery`] | Facade tying root + config to every operation |
//! | [`output`] | CLI output formatting: listings, previews, delete/reveal results |
//!
//! # Design Decisions
//!
//! ## Cap Before Sort
//!
//! Listing walks at most `enumeration_limit` files and only then sorts. A
//! directory with millions of outputs costs bounded memory, at the price of
//! "newest" meaning newest among the files the walk reached. See [`scan`].
//!
//! ## Previews Never Upscale
//!
//! Images narrower than the requested width are re-encoded at their own size.
//! Downsampling uses Lanczos3 and keeps the aspect ratio.
//!
//! ## Reveal Never Fails The Caller
//!
//! A missing file manager, a headless host, or a crashing launcher all come
//! back as `ok: false` with a message. Only a path escape is an error.

pub mod config;
pub mod gallery;
pub mod imaging;
pub mod lifecycle;
pub mod metadata;
pub mod output;
pub mod resolve;
pub mod reveal;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
