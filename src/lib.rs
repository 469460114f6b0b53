//! # Plex Wallpapers
//!
//! Turns a Plex movie library into a folder of desktop wallpapers. Each movie
//! contributes its background art (the "still") and its poster; the two are
//! composed into one image named after the movie.
//!
//! # Architecture: One Pass Over the Catalog
//!
//! ```text
//! catalog ──▶ filter ──▶ artifact ──▶ output dir
//! (server)   (decide)   (skip | fetch → resize → compose → encode → clean up)
//! ```
//!
//! The catalog is read once, then every item flows through the stages in
//! catalog order, one item at a time. The only state is the output directory
//! itself: file names carry the Plex identifier and file times tell whether a
//! wallpaper is still current.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Library listing over HTTP (or from a file), decoded into [`types::MediaItem`]s |
//! | [`filter`] | Pure accept/reject decision per item: keywords, file path pattern, genres, assets |
//! | [`imaging`] | Decode/encode backend, center-crop resize, poster/still composition |
//! | [`artifact`] | Freshness check, wallpaper generation, stale file clean-up |
//! | [`process`] | The pipeline loop and its [`process::RunReport`] |
//! | [`config`] | `plex-wallpapers.toml` loading, validation, resolution into [`config::Settings`] |
//! | [`naming`] | Title sanitization and `<title> (<year>).<id>.<ext>` file names |
//! | [`types`] | Shared catalog item type |
//! | [`output`] | CLI output formatting of run and check reports |
//!
//! # Design Decisions
//!
//! ## The File Name Is the Index
//!
//! There is no manifest. The `.<id>.<ext>` suffix of a wallpaper ties it to
//! a catalog item, so a renamed movie is handled by writing the new file and
//! deleting every other file with the same suffix. Deleting the output
//! directory is always a safe way to start over.
//!
//! ## Rejections Are Values
//!
//! [`filter::decide`] returns a [`filter::Decision`]; only I/O, HTTP and
//! image failures are errors. A failing item is reported and the run moves on
//! to the next one; only configuration and catalog failures stop a run.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, Lanczos3 resampling and encoding (JPEG, PNG, WebP, TIFF, AVIF)
//! all go through the `image` crate. The binary has no system dependencies.

pub mod artifact;
pub mod catalog;
pub mod config;
pub mod filter;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod types;
