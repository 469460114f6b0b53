//! Centralized filename handling for generated wallpapers.
//!
//! Every artifact follows the same naming pattern:
//!
//! ```text
//! <sanitized title>[ (<year>)].<identifier>.<extension>
//! ```
//!
//! The `.<identifier>.<extension>` suffix is what ties a file to a catalog item.
//! It stays stable when the title changes, so a previous artifact for the same
//! item can be found (and removed) by suffix alone.
//!
//! ## Sanitized Titles
//!
//! Titles are lower-cased, every character outside `[a-z0-9]` becomes `_`,
//! runs of `_` collapse into one and leading/trailing `_` are stripped:
//! - `"The Matrix: Reloaded"` → `"the_matrix_reloaded"`
//! - `"  Amélie  "` → `"am_lie"`
//! - `"!!!"` → `""`

/// Sanitize a display title into a filesystem-safe stem.
pub fn sanitize_title(title: &str) -> String {
    let mut sanitized = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        let mapped = if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            '_'
        };
        if mapped == '_' && sanitized.ends_with('_') {
            continue;
        }
        sanitized.push(mapped);
    }
    sanitized.trim_matches('_').to_string()
}

/// Build the file stem for an item: sanitized title plus optional year.
///
/// - `("foo", Some(2020))` → `"foo (2020)"`
/// - `("foo", None)` → `"foo"`
pub fn artifact_stem(sanitized_title: &str, year: Option<i32>) -> String {
    match year {
        Some(year) => format!("{} ({})", sanitized_title, year),
        None => sanitized_title.to_string(),
    }
}

/// Suffix shared by every artifact of one item: `.<id>.<ext>`.
pub fn artifact_suffix(id: &str, extension: &str) -> String {
    format!(".{}.{}", id, extension)
}

/// Full artifact file name: `<stem>.<id>.<ext>`.
pub fn artifact_file_name(stem: &str, id: &str, extension: &str) -> String {
    format!("{}{}", stem, artifact_suffix(id, extension))
}

/// Whether `file_name` is an artifact of the item `id` in format `extension`.
pub fn belongs_to_item(file_name: &str, id: &str, extension: &str) -> bool {
    file_name.ends_with(&artifact_suffix(id, extension))
}
