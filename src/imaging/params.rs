//! Parameter types for image operations.
//!
//! These types describe *what* to produce, not *how*. They are shared by the
//! configuration layer (which deserializes them), the compositor (which reads
//! placements) and the [`backend`](super::backend) (which encodes).
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 75). Clamped on construction.
//! - [`Placement`]: Where a poster goes on one side of the still.
//! - [`OutputFormat`]: Encoder selected from the configured file extension.

use image::ImageFormat;
use serde::{Deserialize, Serialize};

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(75)
    }
}

/// Poster placement on one side of the still.
///
/// - `None`: no poster on that side.
/// - `Internal`: drawn over the still, inside its bounds.
/// - `External`: the canvas is widened and the poster sits next to the still.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    #[serde(alias = "NONE")]
    None,
    #[serde(alias = "INTERNAL")]
    Internal,
    #[serde(alias = "EXTERNAL")]
    External,
}

impl Placement {
    pub fn is_drawn(self) -> bool {
        self != Placement::None
    }

    pub fn is_external(self) -> bool {
        self == Placement::External
    }
}

/// Encoders the backend can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
    Tiff,
    Avif,
}

impl OutputFormat {
    /// Resolve a configured format name (`"jpg"`, `"PNG"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match ImageFormat::from_extension(name.to_ascii_lowercase())? {
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::WebP => Some(Self::WebP),
            ImageFormat::Tiff => Some(Self::Tiff),
            ImageFormat::Avif => Some(Self::Avif),
            _ => None,
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::WebP => ImageFormat::WebP,
            Self::Tiff => ImageFormat::Tiff,
            Self::Avif => ImageFormat::Avif,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_75() {
        assert_eq!(Quality::default().value(), 75);
    }

    #[test]
    fn placement_predicates() {
        assert!(!Placement::None.is_drawn());
        assert!(Placement::Internal.is_drawn());
        assert!(!Placement::Internal.is_external());
        assert!(Placement::External.is_external());
    }

    #[test]
    fn placement_accepts_both_cases() {
        #[derive(Deserialize)]
        struct Wrapper {
            side: Placement,
        }
        let lower: Wrapper = toml::from_str(r#"side = "internal""#).unwrap();
        let upper: Wrapper = toml::from_str(r#"side = "EXTERNAL""#).unwrap();
        assert_eq!(lower.side, Placement::Internal);
        assert_eq!(upper.side, Placement::External);
    }

    #[test]
    fn format_from_name_is_case_insensitive() {
        assert_eq!(OutputFormat::from_name("jpg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_name("JPEG"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_name("png"), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_name("avif"), Some(OutputFormat::Avif));
    }

    #[test]
    fn format_unknown_names_rejected() {
        assert_eq!(OutputFormat::from_name("bmpx"), None);
        assert_eq!(OutputFormat::from_name(""), None);
    }
}
