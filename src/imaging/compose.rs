//! Wallpaper composition: one still, up to two copies of the poster.
//!
//! ```text
//!  left EXTERNAL            right INTERNAL
//! ┌────────┬──────────────────────┬────────┐
//! │ poster │        still         │ poster │
//! │ +margin│                      │(drawn  │
//! │        │                      │ over)  │
//! └────────┴──────────────────────┴────────┘
//! ```
//!
//! Layout is decided by [`plan_layout`]; drawing goes through [`Canvas`], a
//! builder that is consumed and returned by every step so no drawing state is
//! shared between steps.

use super::calculations::{Layout, plan_layout};
use super::params::Placement;
use image::{Rgb, RgbImage, imageops};

/// How to arrange and tone the composite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositionSpec {
    /// Blank band around the poster on all four sides.
    pub margin: u32,
    pub left: Placement,
    pub right: Placement,
    /// Channel multiplier in `0.0..=1.0`; `1.0` leaves pixels unchanged.
    pub brightness: f32,
}

impl Default for CompositionSpec {
    fn default() -> Self {
        Self {
            margin: 0,
            left: Placement::External,
            right: Placement::External,
            brightness: 1.0,
        }
    }
}

impl CompositionSpec {
    /// Whether any side draws the poster (and so whether one is needed at all).
    pub fn needs_poster(&self) -> bool {
        self.left.is_drawn() || self.right.is_drawn()
    }
}

/// The composed wallpaper and the layout used to build it.
#[derive(Debug, Clone)]
pub struct CompositionResult {
    pub image: RgbImage,
    pub layout: Layout,
}

/// Owned drawing surface. Each operation takes the canvas by value and
/// returns the updated one.
pub struct Canvas {
    pixels: RgbImage,
}

impl Canvas {
    /// A black canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbImage::from_pixel(width, height, Rgb([0, 0, 0])),
        }
    }

    /// Draw `image` with its top-left corner at `origin`. Parts falling
    /// outside the canvas, including left of or above it, are clipped.
    pub fn layer(mut self, image: &RgbImage, origin: (i64, i64)) -> Self {
        imageops::replace(&mut self.pixels, image, origin.0, origin.1);
        self
    }

    /// Like [`layer`](Self::layer), skipped when `origin` is `None`.
    pub fn layer_at(self, image: &RgbImage, origin: Option<(i64, i64)>) -> Self {
        match origin {
            Some(origin) => self.layer(image, origin),
            None => self,
        }
    }

    /// Multiply every channel by `factor` (clamped to the valid range).
    /// A factor of `1.0` or more is a no-op.
    pub fn darken(mut self, factor: f32) -> Self {
        if factor >= 1.0 {
            return self;
        }
        let factor = factor.max(0.0);
        for channel in self.pixels.iter_mut() {
            *channel = (*channel as f32 * factor).clamp(0.0, 255.0) as u8;
        }
        self
    }

    pub fn finish(self) -> RgbImage {
        self.pixels
    }
}

/// Compose a wallpaper from an already-resized still and poster.
///
/// Draw order: still, right poster, left poster. The same poster bitmap is
/// used on both sides. When `poster` is `None` both placements are treated
/// as [`Placement::None`].
pub fn compose(
    still: &RgbImage,
    poster: Option<&RgbImage>,
    spec: &CompositionSpec,
) -> CompositionResult {
    let (left, right, poster_dims) = match poster {
        Some(p) => (spec.left, spec.right, p.dimensions()),
        None => (Placement::None, Placement::None, (0, 0)),
    };
    let layout = plan_layout(still.dimensions(), poster_dims, spec.margin, left, right);

    let mut canvas = Canvas::new(layout.canvas_width, layout.canvas_height)
        .layer(still, layout.still_origin);
    if let Some(poster) = poster {
        canvas = canvas
            .layer_at(poster, layout.right_poster)
            .layer_at(poster, layout.left_poster);
    }
    let image = canvas.darken(spec.brightness).finish();

    CompositionResult { image, layout }
}
