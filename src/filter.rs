//! Catalog filtering: which items get a wallpaper.
//!
//! [`decide`] runs four checks in a fixed order and stops at the first
//! failure:
//!
//! 1. **Forbidden keywords**: the lower-cased label (display title and
//!    year, as in `foo (2020)`) contains one.
//! 2. **File path pattern**: when configured, at least one of the item's
//!    media files must match it. Items with no files never match.
//! 3. **Mandatory genres**: when configured, the item must carry one.
//! 4. **Assets**: both a still and a poster URL are required.
//!
//! Checks 2 and 3 are skipped entirely when their criteria are empty.
//! Only the last check produces a warning; the others are ordinary,
//! configured exclusions.

use crate::types::MediaItem;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;

/// Why an item was not processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The label contains this (lower-cased) keyword.
    ForbiddenKeyword(String),
    PathPatternMismatch,
    GenreMismatch,
    MissingAsset { still: bool, poster: bool },
}

impl RejectReason {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ForbiddenKeyword(_) => "forbidden_keyword",
            Self::PathPatternMismatch => "path_pattern_mismatch",
            Self::GenreMismatch => "genre_mismatch",
            Self::MissingAsset { .. } => "missing_asset",
        }
    }

    /// Missing assets are reported as warnings and affect the exit code.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::MissingAsset { .. })
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForbiddenKeyword(keyword) => {
                write!(f, "contains forbidden keyword [{}]", keyword.to_uppercase())
            }
            Self::PathPatternMismatch => write!(f, "files don't match the mandatory pattern"),
            Self::GenreMismatch => write!(f, "not tagged with any of the mandatory genres"),
            Self::MissingAsset { still, poster } => {
                let missing = match (still, poster) {
                    (true, true) => "still and poster",
                    (true, false) => "still",
                    _ => "poster",
                };
                write!(f, "image missing: {}", missing)
            }
        }
    }
}

/// Outcome of [`decide`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject(RejectReason),
}

/// A `?`/`*` wildcard pattern over file paths.
///
/// `?` matches exactly one character, `*` zero or more (separators
/// included). Matching is case-insensitive and `/` and `\` are
/// interchangeable, so a pattern written for one platform works with paths
/// reported by a server on another.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Regex,
}

impl PathPattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let mut expr = String::from("(?is)^");
        for c in pattern.chars() {
            match c {
                '*' => expr.push_str(".*"),
                '?' => expr.push('.'),
                '/' | '\\' => expr.push_str(r"[/\\]"),
                other => expr.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
            }
        }
        expr.push('$');
        Ok(Self {
            source: pattern.to_string(),
            regex: Regex::new(&expr)?,
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Filter settings, normalized once at startup.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    /// Lower-cased, in configuration order.
    pub forbidden_keywords: Vec<String>,
    /// Lower-cased. Empty means no genre restriction.
    pub mandatory_genres: BTreeSet<String>,
    pub path_pattern: Option<PathPattern>,
}

impl FilterCriteria {
    /// Build criteria from raw configuration values.
    ///
    /// Keywords and genres are trimmed and lower-cased; blank entries are
    /// dropped. A blank pattern means "no pattern".
    pub fn new(
        forbidden_keywords: &[String],
        mandatory_genres: &[String],
        path_pattern: Option<&str>,
    ) -> Result<Self, regex::Error> {
        let normalize = |values: &[String]| -> Vec<String> {
            values
                .iter()
                .map(|v| v.trim().to_lowercase())
                .filter(|v| !v.is_empty())
                .collect()
        };
        let path_pattern = match path_pattern.map(str::trim) {
            Some(p) if !p.is_empty() => Some(PathPattern::new(p)?),
            _ => None,
        };
        Ok(Self {
            forbidden_keywords: normalize(forbidden_keywords),
            mandatory_genres: normalize(mandatory_genres).into_iter().collect(),
            path_pattern,
        })
    }
}

/// Decide whether `item` should be processed.
pub fn decide(item: &MediaItem, criteria: &FilterCriteria) -> Decision {
    let label = item.label().to_lowercase();
    if let Some(keyword) = criteria
        .forbidden_keywords
        .iter()
        .find(|k| label.contains(k.as_str()))
    {
        return Decision::Reject(RejectReason::ForbiddenKeyword(keyword.clone()));
    }

    if let Some(pattern) = &criteria.path_pattern
        && !item.file_paths.iter().any(|p| pattern.matches(p))
    {
        return Decision::Reject(RejectReason::PathPatternMismatch);
    }

    if !criteria.mandatory_genres.is_empty()
        && !item
            .genres
            .iter()
            .any(|g| criteria.mandatory_genres.contains(&g.to_lowercase()))
    {
        return Decision::Reject(RejectReason::GenreMismatch);
    }

    let still = item.still_url.is_none();
    let poster = item.poster_url.is_none();
    if still || poster {
        return Decision::Reject(RejectReason::MissingAsset { still, poster });
    }

    Decision::Accept
}
