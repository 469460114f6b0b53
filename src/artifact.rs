//! Wallpaper files on disk: when to (re)generate them and what to delete.
//!
//! Each accepted item owns exactly one file in the output directory:
//!
//! ```text
//! wallpapers/
//! ├── foo (2020).42.jpg       # item 42
//! └── bar_baz.7.jpg           # item 7, no year
//! ```
//!
//! The `.<id>.<ext>` suffix ties a file to its item, so when a title changes
//! (and with it the file name), the old file is found by suffix and removed
//! once the new one is written.
//!
//! # Freshness
//!
//! A file is current when its modification time is strictly later than the
//! item's `updated_at` on the server. Current files are left alone: nothing
//! is fetched, decoded or deleted. There is no manifest; the file system is
//! the only state.

use crate::catalog::{CatalogError, Fetcher};
use crate::config::Settings;
use crate::imaging::{BackendError, ImageBackend, compose, resize};
use crate::naming::{artifact_file_name, belongs_to_item};
use crate::types::MediaItem;
use image::RgbImage;
use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("fetching source image failed: {0}")]
    Fetch(#[from] CatalogError),
    #[error("image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no {0} image")]
    MissingAsset(&'static str),
}

/// What happened to one item's artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The wallpaper was generated; `removed` lists deleted stale files.
    Written { path: PathBuf, removed: Vec<PathBuf> },
    /// The existing wallpaper is newer than the item.
    Skipped { path: PathBuf },
    /// Dry run: nothing was fetched, written or deleted.
    Simulated {
        path: PathBuf,
        would_remove: Vec<PathBuf>,
    },
}

/// Where `item`'s wallpaper lives.
pub fn target_path(item: &MediaItem, settings: &Settings) -> PathBuf {
    settings.output_dir.join(artifact_file_name(
        &item.artifact_stem(),
        &item.id,
        &settings.extension,
    ))
}

/// Whether `path` exists and was modified strictly after `updated_at`
/// (seconds since the Unix epoch).
pub fn is_current(path: &Path, updated_at: u64) -> bool {
    let Ok(modified) = path.metadata().and_then(|m| m.modified()) else {
        return false;
    };
    modified > UNIX_EPOCH + Duration::from_secs(updated_at)
}

/// Files directly in `dir` that belong to item `id` with extension `ext`,
/// other than `keep`. Sorted by path. A missing directory has none.
pub fn find_stale(dir: &Path, id: &str, ext: &str, keep: &Path) -> std::io::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut stale = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if belongs_to_item(&name, id, ext) && entry.path() != keep {
            stale.push(entry.into_path());
        }
    }
    stale.sort();
    Ok(stale)
}

/// Bring `item`'s wallpaper up to date.
pub fn reconcile(
    item: &MediaItem,
    fetcher: &impl Fetcher,
    backend: &impl ImageBackend,
    settings: &Settings,
) -> Result<Outcome, ArtifactError> {
    let path = target_path(item, settings);

    if is_current(&path, item.updated_at) {
        debug!(path = %path.display(), "wallpaper is current");
        return Ok(Outcome::Skipped { path });
    }

    if settings.simulated {
        let would_remove = find_stale(&settings.output_dir, &item.id, &settings.extension, &path)?;
        info!(path = %path.display(), "would generate");
        for stale in &would_remove {
            info!(path = %stale.display(), "would remove");
        }
        return Ok(Outcome::Simulated { path, would_remove });
    }

    let wallpaper = render(item, fetcher, backend, settings)?;
    std::fs::create_dir_all(&settings.output_dir)?;
    backend.encode(&wallpaper, &path, settings.format, settings.quality)?;
    info!(path = %path.display(), "generated");

    let removed = find_stale(&settings.output_dir, &item.id, &settings.extension, &path)?;
    for stale in &removed {
        std::fs::remove_file(stale)?;
        info!(path = %stale.display(), "removed stale wallpaper");
    }

    Ok(Outcome::Written { path, removed })
}

fn fetch_image(
    url: &str,
    fetcher: &impl Fetcher,
    backend: &impl ImageBackend,
) -> Result<image::DynamicImage, ArtifactError> {
    let bytes = fetcher.fetch(url)?;
    Ok(backend.decode(&bytes)?)
}

/// Fetch, resize and compose the wallpaper in memory.
fn render(
    item: &MediaItem,
    fetcher: &impl Fetcher,
    backend: &impl ImageBackend,
    settings: &Settings,
) -> Result<RgbImage, ArtifactError> {
    let still_url = item
        .still_url
        .as_deref()
        .ok_or(ArtifactError::MissingAsset("still"))?;
    let still = fetch_image(still_url, fetcher, backend)?;
    let still = resize(
        &still,
        Some(settings.still_width),
        Some(settings.still_height),
    )?
    .to_rgb8();

    let poster = if settings.composition.needs_poster() {
        let poster_url = item
            .poster_url
            .as_deref()
            .ok_or(ArtifactError::MissingAsset("poster"))?;
        let poster = fetch_image(poster_url, fetcher, backend)?;
        Some(resize(&poster, None, Some(settings.poster_height))?.to_rgb8())
    } else {
        None
    };

    Ok(compose(&still, poster.as_ref(), &settings.composition).image)
}
