//! Image processing: pure Rust on top of the `image` crate.
//!
//! | Operation | Where |
//! |---|---|
//! | **Decode / encode** | [`ImageBackend`] → [`RustBackend`] |
//! | **Resize + center crop** | [`resize`] (Lanczos3) |
//! | **Composite still + posters** | [`compose`] |
//! | **Brightness** | [`Canvas::darken`] |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop and layout math (unit testable)
//! - **Parameters**: Quality, placement and output format types
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Resizing on decoded pixels
//! - **Compose**: Canvas building and brightness

pub mod backend;
mod calculations;
pub mod compose;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{CropRect, Layout, center_crop, plan_layout};
pub use compose::{Canvas, CompositionResult, CompositionSpec, compose};
pub use operations::resize;
pub use params::{OutputFormat, Placement, Quality};
pub use rust_backend::RustBackend;
