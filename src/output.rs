//! CLI output formatting for run and check results.
//!
//! # Information-First Display
//!
//! Every catalog entry leads with its positional index and label (title and
//! year); what happened to it follows as indented context lines. File names
//! are shown relative to the output directory.
//!
//! # Output Format
//!
//! ## Run
//!
//! ```text
//! 001 Foo (2020)
//!     written: foo (2020).42.jpg
//!     removed: foo_(2020).42.jpg
//! 002 Bar
//!     current: bar.7.jpg
//! 003 Baz (2019)
//!     skipped: not tagged with any of the mandatory genres
//! 004 (no identifier: Ghost)
//!     warning: entry has no identifier
//!
//! 1 written, 1 current, 1 skipped, 1 removed, 1 warning
//! ```
//!
//! ## Check
//!
//! ```text
//! 001 Foo (2020)
//!     accepted
//! 002 Baz (2019)
//!     skipped: not tagged with any of the mandatory genres
//!
//! 1 accepted, 1 skipped
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::artifact::Outcome;
use crate::process::{ItemOutcome, RunReport, RunStats};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Context line under an entry header.
fn detail(label: &str, value: impl std::fmt::Display) -> String {
    format!("    {}: {}", label, value)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

/// Header line naming the entry.
fn entry_header(index: usize, item: &ItemOutcome) -> String {
    let name = match item {
        ItemOutcome::Unidentified { title: Some(t) } => format!("(no identifier: {})", t),
        ItemOutcome::Unidentified { title: None } => "(no identifier)".to_string(),
        ItemOutcome::Rejected { label, .. }
        | ItemOutcome::Accepted { label }
        | ItemOutcome::Done { label, .. }
        | ItemOutcome::Failed { label, .. } => label.clone(),
    };
    format!("{} {}", format_index(index), name)
}

/// Context lines for one entry.
fn entry_details(item: &ItemOutcome) -> Vec<String> {
    match item {
        ItemOutcome::Unidentified { .. } => vec![detail("warning", "entry has no identifier")],
        ItemOutcome::Rejected { reason, .. } if reason.is_warning() => {
            vec![detail("warning", reason)]
        }
        ItemOutcome::Rejected { reason, .. } => vec![detail("skipped", reason)],
        ItemOutcome::Accepted { .. } => vec!["    accepted".to_string()],
        ItemOutcome::Failed { error, .. } => vec![detail("failed", error)],
        ItemOutcome::Done { outcome, .. } => match outcome {
            Outcome::Written { path, removed } => std::iter::once(detail("written", file_name(path)))
                .chain(removed.iter().map(|p| detail("removed", file_name(p))))
                .collect(),
            Outcome::Skipped { path } => vec![detail("current", file_name(path))],
            Outcome::Simulated { path, would_remove } => {
                std::iter::once(detail("would write", file_name(path)))
                    .chain(would_remove.iter().map(|p| detail("would remove", file_name(p))))
                    .collect()
            }
        },
    }
}

/// One-line totals; zero counts are left out.
pub fn format_summary(stats: &RunStats) -> String {
    let parts: Vec<String> = [
        (stats.written, "written"),
        (stats.simulated, "simulated"),
        (stats.skipped, "current"),
        (stats.accepted, "accepted"),
        (stats.rejected, "skipped"),
    ]
    .into_iter()
    .filter(|(n, _)| *n > 0)
    .map(|(n, word)| format!("{} {}", n, word))
    .chain((stats.removed > 0).then(|| format!("{} removed", stats.removed)))
    .chain((stats.warnings > 0).then(|| plural(stats.warnings, "warning")))
    .collect();

    if parts.is_empty() {
        "Nothing to do".to_string()
    } else {
        parts.join(", ")
    }
}

/// Format a report: one block per entry, then the summary line.
pub fn format_report(report: &RunReport) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, item) in report.items.iter().enumerate() {
        lines.push(entry_header(i + 1, item));
        lines.extend(entry_details(item));
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format_summary(&report.stats()));
    lines
}

pub fn print_report(report: &RunReport) {
    for line in format_report(report) {
        println!("{}", line);
    }
}
