//! Shared types used across the pipeline.
//!
//! A [`MediaItem`] is produced by [`catalog`](crate::catalog) decoding and is
//! read (never modified) by the filter, the imaging code and the artifact
//! manager.

use crate::naming::{artifact_stem, sanitize_title};
use std::collections::BTreeSet;

/// One movie (or other video) from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaItem {
    /// Stable catalog identifier (Plex `ratingKey`).
    pub id: String,
    pub title: String,
    /// Title in the original language, preferred for file names when present.
    pub original_title: Option<String>,
    pub year: Option<i32>,
    /// Genre tags, lower-cased.
    pub genres: BTreeSet<String>,
    /// Paths of the media files backing this item, as reported by the server.
    pub file_paths: BTreeSet<String>,
    /// Background image ("still") URL.
    pub still_url: Option<String>,
    /// Cover art ("poster") URL.
    pub poster_url: Option<String>,
    /// Last update on the server, seconds since the Unix epoch.
    pub updated_at: u64,
}

impl MediaItem {
    /// Title used for display, keyword matching and file naming.
    ///
    /// The original title wins unless it sanitizes to nothing (e.g. a title
    /// written entirely in a non-Latin script).
    pub fn display_title(&self) -> &str {
        match &self.original_title {
            Some(original) if !sanitize_title(original).is_empty() => original,
            _ => &self.title,
        }
    }

    pub fn sanitized_title(&self) -> String {
        sanitize_title(self.display_title())
    }

    /// File stem of this item's artifact, e.g. `"foo (2020)"`.
    pub fn artifact_stem(&self) -> String {
        artifact_stem(&self.sanitized_title(), self.year)
    }

    /// Label used in log and report lines.
    pub fn label(&self) -> String {
        match self.year {
            Some(year) => format!("{} ({})", self.display_title(), year),
            None => self.display_title().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, original: Option<&str>, year: Option<i32>) -> MediaItem {
        MediaItem {
            id: "1".into(),
            title: title.into(),
            original_title: original.map(str::to_string),
            year,
            ..Default::default()
        }
    }

    #[test]
    fn display_title_prefers_original() {
        let m = item("The Fabulous Destiny", Some("Le Fabuleux Destin"), None);
        assert_eq!(m.display_title(), "Le Fabuleux Destin");
    }

    #[test]
    fn display_title_falls_back_when_original_sanitizes_empty() {
        let m = item("Spirited Away", Some("千と千尋の神隠し"), None);
        assert_eq!(m.display_title(), "Spirited Away");
    }

    #[test]
    fn artifact_stem_includes_year() {
        let m = item("Foo", None, Some(2020));
        assert_eq!(m.artifact_stem(), "foo (2020)");
    }

    #[test]
    fn label_uses_display_title() {
        let m = item("Foo", None, Some(2020));
        assert_eq!(m.label(), "Foo (2020)");
        assert_eq!(item("Bar", None, None).label(), "Bar");
    }
}
