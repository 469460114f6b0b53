//! High-level image operations.
//!
//! These functions combine the pure [`calculations`](super::calculations)
//! with pixel work from the `image` crate. Every operation returns a new
//! image and leaves its input untouched.

use super::backend::BackendError;
use super::calculations::{center_crop, proportional_height, proportional_width};
use image::DynamicImage;
use image::imageops::FilterType;
use std::num::NonZeroU32;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Resampling filter for every scale step.
const FILTER: FilterType = FilterType::Lanczos3;

/// Resize an image to a target size, cropping to preserve aspect ratio.
///
/// A `None` dimension is "unspecified":
///
/// | width | height | result |
/// |---|---|---|
/// | `None` | `None` | unchanged copy |
/// | `None` | `h` | scaled so height = `h`, width proportional |
/// | `w` | `None` | scaled so width = `w`, height proportional |
/// | `w` | `h` | centered crop to the `w:h` aspect, then scaled to exactly `w`×`h` |
///
/// An image that already has the requested dimensions is returned unchanged.
pub fn resize(
    image: &DynamicImage,
    width: Option<NonZeroU32>,
    height: Option<NonZeroU32>,
) -> Result<DynamicImage> {
    let source = (image.width(), image.height());
    if source.0 == 0 || source.1 == 0 {
        return Err(BackendError::InvalidImage(
            "cannot resize an image with no pixels".into(),
        ));
    }

    match (width.map(NonZeroU32::get), height.map(NonZeroU32::get)) {
        (None, None) => Ok(image.clone()),
        (Some(w), Some(h)) if (w, h) == source => Ok(image.clone()),
        (None, Some(h)) => {
            let w = proportional_width(source, h);
            Ok(image.resize_exact(w, h, FILTER))
        }
        (Some(w), None) => {
            let h = proportional_height(source, w);
            Ok(image.resize_exact(w, h, FILTER))
        }
        (Some(w), Some(h)) => {
            let crop = center_crop(source, (w, h));
            Ok(image
                .crop_imm(crop.x, crop.y, crop.width, crop.height)
                .resize_exact(w, h, FILTER))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn nz(v: u32) -> Option<NonZeroU32> {
        NonZeroU32::new(v)
    }

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }))
    }

    #[test]
    fn unspecified_both_is_identity() {
        let img = gradient(30, 20);
        let out = resize(&img, None, None).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn same_dimensions_is_identity() {
        let img = gradient(30, 20);
        let out = resize(&img, nz(30), nz(20)).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn height_only_scales_proportionally() {
        let img = gradient(1000, 1500);
        let out = resize(&img, None, nz(692)).unwrap();
        assert_eq!((out.width(), out.height()), (461, 692));
    }

    #[test]
    fn width_only_scales_proportionally() {
        let img = gradient(1920, 1080);
        let out = resize(&img, nz(960), None).unwrap();
        assert_eq!((out.width(), out.height()), (960, 540));
    }

    #[test]
    fn both_specified_yields_exact_size() {
        let img = gradient(1920, 1080);
        let out = resize(&img, nz(400), nz(500)).unwrap();
        assert_eq!((out.width(), out.height()), (400, 500));
    }

    #[test]
    fn both_specified_crops_center() {
        // Left third red, middle third green, right third blue.
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(300, 100, |x, _| match x {
            0..100 => Rgb([255, 0, 0]),
            100..200 => Rgb([0, 255, 0]),
            _ => Rgb([0, 0, 255]),
        }));
        // 1:1 target keeps only the middle 100x100 square.
        let out = resize(&img, nz(50), nz(50)).unwrap().to_rgb8();
        let center = out.get_pixel(25, 25);
        assert!(center[1] > 200 && center[0] < 50 && center[2] < 50, "{center:?}");
    }

    #[test]
    fn upscaling_is_allowed() {
        let img = gradient(10, 10);
        let out = resize(&img, nz(40), nz(20)).unwrap();
        assert_eq!((out.width(), out.height()), (40, 20));
    }

    #[test]
    fn input_is_not_modified() {
        let img = gradient(64, 64);
        let copy = img.clone();
        let _ = resize(&img, nz(16), nz(8)).unwrap();
        assert_eq!(img, copy);
    }

    #[test]
    fn empty_image_is_invalid() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        assert!(matches!(
            resize(&img, nz(10), nz(10)),
            Err(BackendError::InvalidImage(_))
        ));
    }
}
