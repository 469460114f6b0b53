//! Pure Rust codec backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::load_from_memory` (format sniffed from bytes) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with explicit quality |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e, speed 6) |
//! | Encode → PNG, WebP, TIFF | `RgbImage::write_to` (lossless, quality ignored) |

use super::backend::{BackendError, ImageBackend};
use super::params::{OutputFormat, Quality};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_jpeg(image: &RgbImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let writer = BufWriter::new(File::create(path)?);
    image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality.value() as u8)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| BackendError::Encode(format!("JPEG encode failed: {}", e)))
}

/// Encode and save as AVIF using rav1e (speed=6 for reasonable throughput).
fn encode_avif(image: &RgbImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let writer = BufWriter::new(File::create(path)?);
    image::codecs::avif::AvifEncoder::new_with_speed_quality(writer, 6, quality.value() as u8)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| BackendError::Encode(format!("AVIF encode failed: {}", e)))
}

fn encode_lossless(
    image: &RgbImage,
    path: &Path,
    format: OutputFormat,
) -> Result<(), BackendError> {
    let mut writer = BufWriter::new(File::create(path)?);
    image
        .write_to(&mut writer, format.image_format())
        .map_err(|e| BackendError::Encode(format!("{:?} encode failed: {}", format, e)))
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| BackendError::InvalidImage(format!("Failed to decode: {}", e)))?;
        if img.width() == 0 || img.height() == 0 {
            return Err(BackendError::InvalidImage("image has no pixels".into()));
        }
        Ok(img)
    }

    fn encode(
        &self,
        image: &RgbImage,
        path: &Path,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<(), BackendError> {
        match format {
            OutputFormat::Jpeg => encode_jpeg(image, path, quality),
            OutputFormat::Avif => encode_avif(image, path, quality),
            OutputFormat::Png | OutputFormat::WebP | OutputFormat::Tiff => {
                encode_lossless(image, path, format)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        })
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        gradient(width, height)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decode_png_bytes() {
        let backend = RustBackend::new();
        let img = backend.decode(&png_bytes(200, 150)).unwrap();
        assert_eq!((img.width(), img.height()), (200, 150));
    }

    #[test]
    fn decode_garbage_is_invalid_image() {
        let backend = RustBackend::new();
        let result = backend.decode(b"<html>not an image</html>");
        assert!(matches!(result, Err(BackendError::InvalidImage(_))));
    }

    #[test]
    fn decode_empty_is_invalid_image() {
        let backend = RustBackend::new();
        assert!(matches!(
            backend.decode(&[]),
            Err(BackendError::InvalidImage(_))
        ));
    }

    #[test]
    fn encode_jpeg_roundtrips_dimensions() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.jpg");
        let backend = RustBackend::new();
        backend
            .encode(&gradient(64, 48), &path, OutputFormat::Jpeg, Quality::new(75))
            .unwrap();

        assert_eq!(image::image_dimensions(&path).unwrap(), (64, 48));
    }

    #[test]
    fn encode_png_is_lossless() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.png");
        let source = gradient(32, 16);
        let backend = RustBackend::new();
        backend
            .encode(&source, &path, OutputFormat::Png, Quality::default())
            .unwrap();

        let reread = image::open(&path).unwrap().to_rgb8();
        assert_eq!(reread, source);
    }

    #[test]
    fn encode_overwrites_existing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.png");
        std::fs::write(&path, b"stale contents").unwrap();

        let backend = RustBackend::new();
        backend
            .encode(&gradient(8, 8), &path, OutputFormat::Png, Quality::default())
            .unwrap();

        assert_eq!(image::image_dimensions(&path).unwrap(), (8, 8));
    }

    #[test]
    fn encode_into_missing_directory_is_io_error() {
        let backend = RustBackend::new();
        let result = backend.encode(
            &gradient(8, 8),
            Path::new("/nonexistent/dir/out.jpg"),
            OutputFormat::Jpeg,
            Quality::default(),
        );
        assert!(matches!(result, Err(BackendError::Io(_))));
    }
}
