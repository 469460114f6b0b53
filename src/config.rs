//! Configuration module.
//!
//! Handles loading, validating and resolving the configuration file. Stock
//! defaults are overridden by the user's file, which is in turn overridden by
//! command-line flags (see `main.rs`).
//!
//! ## Configuration Options
//!
//! ```toml
//! [server]
//! url = "http://192.168.0.1:32400"   # mandatory
//! token = "..."                      # mandatory (or PLEX_TOKEN / --token)
//! library_id = "1"                   # mandatory
//!
//! [output]
//! directory = "/home/me/wallpapers"  # mandatory (or --output)
//! format = "jpg"
//! quality = 75
//! simulated = false
//!
//! [filter]
//! forbidden_keywords = []
//! mandatory_genres = []
//! # mandatory_file_path_pattern = "/movies/4k/*"
//!
//! [layout]
//! still_width = 1924
//! still_height = 1080
//! poster_height = 692
//! poster_margin = 0
//! left_poster = "external"           # none | internal | external
//! right_poster = "external"
//! darkness = 0                       # percent
//! ```
//!
//! ## Two Stages
//!
//! [`Config`] mirrors the file: mandatory keys are `Option`s so a partial
//! file still parses and every problem can be reported by name.
//! [`Config::resolve`] turns it into [`Settings`], the immutable value the
//! pipeline runs on, with every mandatory key present and every value
//! checked.
//!
//! Unknown keys are rejected to catch typos early.

use crate::catalog::Server;
use crate::filter::FilterCriteria;
use crate::imaging::{CompositionSpec, OutputFormat, Placement, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("missing setting `{key}`: {help}")]
    Missing {
        key: &'static str,
        help: &'static str,
    },
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration as read from the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Plex server connection.
    pub server: ServerConfig,
    /// Where and how wallpapers are written.
    pub output: OutputConfig,
    /// Which catalog items are processed.
    pub filter: FilterConfig,
    /// Wallpaper geometry.
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    /// File extension and encoder (`jpg`, `png`, `webp`, `tiff`, `avif`).
    pub format: String,
    /// Lossy encoding quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Report what would happen without touching the output directory.
    pub simulated: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            format: "jpg".to_string(),
            quality: 75,
            simulated: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Case-insensitive keywords; a title containing one is skipped.
    pub forbidden_keywords: Vec<String>,
    /// Case-insensitive genres; when non-empty, an item needs at least one.
    pub mandatory_genres: Vec<String>,
    /// `?`/`*` wildcard pattern that at least one media file must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mandatory_file_path_pattern: Option<String>,
}

/// Largest accepted `layout.poster_margin`, in pixels.
pub const MAX_POSTER_MARGIN: u32 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub still_width: u32,
    pub still_height: u32,
    pub poster_height: u32,
    /// Blank band around each poster, in pixels.
    pub poster_margin: u32,
    pub left_poster: Placement,
    pub right_poster: Placement,
    /// Percentage of darkness applied to the whole wallpaper (0-100).
    pub darkness: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            still_width: 1924,
            still_height: 1080,
            poster_height: 692,
            poster_margin: 0,
            left_poster: Placement::External,
            right_poster: Placement::External,
            darkness: 0,
        }
    }
}

impl LayoutConfig {
    /// Channel multiplier derived from `darkness`.
    pub fn brightness(&self) -> f32 {
        1.0 - self.darkness as f32 / 100.0
    }

    pub fn composition(&self) -> CompositionSpec {
        CompositionSpec {
            margin: self.poster_margin,
            left: self.left_poster,
            right: self.right_poster,
            brightness: self.brightness(),
        }
    }
}

/// Validated, fully-resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: Server,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    /// Lower-cased configured format name, used as the file extension.
    pub extension: String,
    pub quality: Quality,
    pub simulated: bool,
    pub criteria: FilterCriteria,
    pub still_width: NonZeroU32,
    pub still_height: NonZeroU32,
    pub poster_height: NonZeroU32,
    pub composition: CompositionSpec,
}

fn require(value: &Option<String>, key: &'static str, help: &'static str) -> Result<String, ConfigError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ConfigError::Missing { key, help }),
    }
}

fn non_zero(value: u32, key: &str) -> Result<NonZeroU32, ConfigError> {
    NonZeroU32::new(value)
        .ok_or_else(|| ConfigError::Validation(format!("{} must be greater than 0", key)))
}

impl Config {
    /// Validate config values are within acceptable ranges.
    ///
    /// Mandatory keys are not checked here; see [`Config::resolve`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if OutputFormat::from_name(&self.output.format).is_none() {
            return Err(ConfigError::Validation(format!(
                "output.format \"{}\" is not supported (jpg, png, webp, tiff, avif)",
                self.output.format
            )));
        }
        if self.layout.darkness > 100 {
            return Err(ConfigError::Validation(
                "layout.darkness must be 0-100".into(),
            ));
        }
        if self.layout.poster_margin > MAX_POSTER_MARGIN {
            return Err(ConfigError::Validation(format!(
                "layout.poster_margin must be at most {}",
                MAX_POSTER_MARGIN
            )));
        }
        non_zero(self.layout.still_width, "layout.still_width")?;
        non_zero(self.layout.still_height, "layout.still_height")?;
        non_zero(self.layout.poster_height, "layout.poster_height")?;
        Ok(())
    }

    /// Check mandatory keys and values, producing run settings.
    pub fn resolve(&self) -> Result<Settings, ConfigError> {
        self.validate()?;

        let server = Server {
            url: require(
                &self.server.url,
                "server.url",
                "root URL of the Plex server (e.g. \"http://192.168.0.1:32400\")",
            )?,
            token: require(
                &self.server.token,
                "server.token",
                "X-Plex-Token used to authenticate on the Plex server",
            )?,
            library_id: require(
                &self.server.library_id,
                "server.library_id",
                "section ID of the library to generate wallpapers from (attribute \"librarySectionID\")",
            )?,
        };
        let output_dir = self
            .output
            .directory
            .clone()
            .filter(|d| !d.as_os_str().is_empty())
            .ok_or(ConfigError::Missing {
                key: "output.directory",
                help: "directory where the wallpaper images are generated",
            })?;

        let criteria = FilterCriteria::new(
            &self.filter.forbidden_keywords,
            &self.filter.mandatory_genres,
            self.filter.mandatory_file_path_pattern.as_deref(),
        )
        .map_err(|e| {
            ConfigError::Validation(format!("filter.mandatory_file_path_pattern: {}", e))
        })?;

        // Both checked by validate()
        let format = OutputFormat::from_name(&self.output.format).ok_or_else(|| {
            ConfigError::Validation(format!("unsupported format {}", self.output.format))
        })?;

        Ok(Settings {
            server,
            output_dir,
            format,
            extension: self.output.format.to_lowercase(),
            quality: Quality::new(self.output.quality),
            simulated: self.output.simulated,
            criteria,
            still_width: non_zero(self.layout.still_width, "layout.still_width")?,
            still_height: non_zero(self.layout.still_height, "layout.still_height")?,
            poster_height: non_zero(self.layout.poster_height, "layout.poster_height")?,
            composition: self.layout.composition(),
        })
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<Config, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a file.
///
/// A missing file yields the stock defaults; mandatory keys are then reported
/// by [`Config::resolve`].
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Plex Wallpapers Configuration
# =============================
# Values shown below are the defaults. Keys marked "mandatory" have no
# default and must be set (here or on the command line).
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Plex server
# ---------------------------------------------------------------------------
[server]
# Root URL of the Plex server (mandatory).
# url = "http://192.168.0.1:32400"

# X-Plex-Token used to authenticate (mandatory).
# Can also be given with --token or the PLEX_TOKEN environment variable.
# token = ""

# Section ID of the library to generate wallpapers from (mandatory).
# It is the "librarySectionID" attribute of any item of that library.
# library_id = "1"

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Directory where wallpapers are generated (mandatory, or --output).
# directory = "/home/me/wallpapers"

# File format: jpg, png, webp, tiff or avif.
format = "jpg"

# Lossy encoding quality (1 = worst, 100 = best). Ignored by lossless formats.
quality = 75

# Report what would be generated/deleted without touching any file.
simulated = false

# ---------------------------------------------------------------------------
# Filtering
# ---------------------------------------------------------------------------
[filter]
# Case-insensitive keywords: a title containing one of them is skipped.
forbidden_keywords = []

# Case-insensitive genres: when not empty, only items tagged with at least
# one of them are processed.
mandatory_genres = []

# Wildcard pattern ('?' = one character, '*' = zero or more) that at least
# one of an item's files must match for it to be processed.
# mandatory_file_path_pattern = "/movies/4k/*"

# ---------------------------------------------------------------------------
# Layout
# ---------------------------------------------------------------------------
[layout]
# Size of the still (background) image, in pixels. The still is center
# cropped to this aspect ratio, then scaled.
still_width = 1924
still_height = 1080

# Height of the poster in pixels; its width follows its aspect ratio.
poster_height = 692

# Blank band around each poster, in pixels (at most 10000).
poster_margin = 0

# Poster placement on each side: "none", "internal" (drawn over the still)
# or "external" (next to the still, widening the wallpaper).
left_poster = "external"
right_poster = "external"

# Percentage of darkness applied to the whole wallpaper.
darkness = 0
"##
}
