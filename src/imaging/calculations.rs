//! Pure calculation functions for image geometry.
//!
//! All functions here are pure and testable without any I/O or pixels:
//! proportional scaling, center-crop rectangles and the canvas layout used by
//! the compositor.

use super::params::Placement;

/// A rectangle inside a source image, in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Width that keeps the source aspect ratio at the given height.
///
/// Rounded to the nearest pixel, never below 1.
pub fn proportional_width(source: (u32, u32), target_height: u32) -> u32 {
    let (src_w, src_h) = source;
    let w = (src_w as f64 * target_height as f64 / src_h as f64).round() as u32;
    w.max(1)
}

/// Height that keeps the source aspect ratio at the given width.
pub fn proportional_height(source: (u32, u32), target_width: u32) -> u32 {
    let (src_w, src_h) = source;
    let h = (src_h as f64 * target_width as f64 / src_w as f64).round() as u32;
    h.max(1)
}

/// Largest centered region of `source` with the aspect ratio of `target`.
///
/// First tries the full source width with a height matching the target
/// aspect (cropping top and bottom). If that height does not fit, uses the
/// full source height instead (cropping left and right).
///
/// # Examples
/// ```
/// # use plex_wallpapers::imaging::{center_crop, CropRect};
/// // 4:3 source to 16:9 target: bands removed top and bottom
/// assert_eq!(
///     center_crop((800, 600), (1600, 900)),
///     CropRect { x: 0, y: 75, width: 800, height: 450 }
/// );
/// ```
pub fn center_crop(source: (u32, u32), target: (u32, u32)) -> CropRect {
    let (src_w, src_h) = (source.0 as u64, source.1 as u64);
    let (tgt_w, tgt_h) = (target.0 as u64, target.1 as u64);

    let crop_h = (tgt_h * src_w / tgt_w).max(1);
    if crop_h <= src_h {
        CropRect {
            x: 0,
            y: ((src_h - crop_h) / 2) as u32,
            width: src_w as u32,
            height: crop_h as u32,
        }
    } else {
        let crop_w = (tgt_w * src_h / tgt_h).clamp(1, src_w);
        CropRect {
            x: ((src_w - crop_w) / 2) as u32,
            y: 0,
            width: crop_w as u32,
            height: src_h as u32,
        }
    }
}

/// Canvas arrangement decided by the compositor.
///
/// Positions are top-left corners on the canvas. They are signed: an
/// internal poster wider than the still starts left of the canvas edge and
/// is clipped when drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Poster plus its margin band, `(0, 0)` when no poster is drawn.
    pub poster_block: (u32, u32),
    pub still_origin: (i64, i64),
    pub left_poster: Option<(i64, i64)>,
    pub right_poster: Option<(i64, i64)>,
}

/// Compute the canvas layout for a still and a (resized) poster.
///
/// `poster` is ignored when both placements are [`Placement::None`].
pub fn plan_layout(
    still: (u32, u32),
    poster: (u32, u32),
    margin: u32,
    left: Placement,
    right: Placement,
) -> Layout {
    let any_poster = left.is_drawn() || right.is_drawn();
    let (block_w, block_h) = if any_poster {
        let band = margin.saturating_mul(2);
        (band.saturating_add(poster.0), band.saturating_add(poster.1))
    } else {
        (0, 0)
    };

    let left_extra = if left.is_external() { block_w } else { 0 };
    let right_extra = if right.is_external() { block_w } else { 0 };
    let canvas_width = still.0.saturating_add(left_extra).saturating_add(right_extra);
    let canvas_height = still.1.max(block_h);
    let margin = margin as i64;

    Layout {
        canvas_width,
        canvas_height,
        poster_block: (block_w, block_h),
        still_origin: (left_extra as i64, 0),
        left_poster: left.is_drawn().then_some((margin, margin)),
        right_poster: right
            .is_drawn()
            .then_some((canvas_width as i64 - block_w as i64 + margin, margin)),
    }
}
