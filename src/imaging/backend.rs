//! Image codec backend trait and its error type.
//!
//! The [`ImageBackend`] trait covers the two operations that touch encoded
//! bytes: decoding a fetched source image and encoding a finished wallpaper
//! to disk. Everything between the two (resizing, compositing, brightness)
//! works on decoded pixels and lives in [`operations`](super::operations) and
//! [`compose`](super::compose).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::{OutputFormat, Quality};
use image::{DynamicImage, RgbImage};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid image: {0}")]
    InvalidImage(String),
    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// Trait for image codec backends.
pub trait ImageBackend {
    /// Decode an image from its encoded bytes (JPEG, PNG, ...).
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError>;

    /// Encode `image` in `format` and write it to `path`, replacing any
    /// existing file.
    fn encode(
        &self,
        image: &RgbImage,
        path: &Path,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<(), BackendError>;
}
