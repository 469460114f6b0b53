//! The wallpaper pipeline.
//!
//! Walks the catalog in order and, for every entry:
//!
//! ```text
//! entry ──▶ identified? ──▶ filter::decide ──▶ artifact::reconcile
//!              │ no             │ reject              │
//!              ▼                ▼                     ▼
//!          Unidentified      Rejected         Done(Outcome) / Failed
//! ```
//!
//! Items are handled one at a time; a failing item is recorded and the run
//! moves on. Only catalog errors abort a run.
//!
//! [`run`] and [`check`] use the real HTTP fetcher and image backend;
//! [`run_entries`] and [`check_entries`] take them as parameters so the
//! pipeline can be driven from memory in tests.

use crate::artifact::{self, Outcome};
use crate::catalog::{self, CatalogEntry, CatalogError, Fetcher, HttpFetcher};
use crate::config::Settings;
use crate::filter::{Decision, FilterCriteria, RejectReason, decide};
use crate::imaging::{ImageBackend, RustBackend};
use crate::types::MediaItem;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("cannot read the catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Result for one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Entry without an identifier; cannot be named on disk.
    Unidentified { title: Option<String> },
    Rejected { label: String, reason: RejectReason },
    /// Passed the filter (check mode only).
    Accepted { label: String },
    Done { label: String, outcome: Outcome },
    Failed { label: String, error: String },
}

impl ItemOutcome {
    /// Whether this outcome makes the run finish with warnings.
    pub fn is_warning(&self) -> bool {
        match self {
            ItemOutcome::Unidentified { .. } | ItemOutcome::Failed { .. } => true,
            ItemOutcome::Rejected { reason, .. } => reason.is_warning(),
            ItemOutcome::Accepted { .. } | ItemOutcome::Done { .. } => false,
        }
    }
}

/// Summary counts of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub written: usize,
    pub skipped: usize,
    pub simulated: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub warnings: usize,
    pub removed: usize,
}

/// Everything that happened during one run, in catalog order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub items: Vec<ItemOutcome>,
}

/// Process exit status for a run that finished with warnings.
pub const EXIT_WARNINGS: u8 = 2;
/// Process exit status for a run aborted by a fatal error.
pub const EXIT_FATAL: u8 = 1;

impl RunReport {
    pub fn has_warnings(&self) -> bool {
        self.items.iter().any(ItemOutcome::is_warning)
    }

    /// `0` when clean, [`EXIT_WARNINGS`] when any item produced a warning.
    pub fn exit_code(&self) -> u8 {
        if self.has_warnings() { EXIT_WARNINGS } else { 0 }
    }

    pub fn stats(&self) -> RunStats {
        let mut stats = RunStats::default();
        for item in &self.items {
            if item.is_warning() {
                stats.warnings += 1;
            }
            match item {
                ItemOutcome::Done {
                    outcome: Outcome::Written { removed, .. },
                    ..
                } => {
                    stats.written += 1;
                    stats.removed += removed.len();
                }
                ItemOutcome::Done {
                    outcome: Outcome::Skipped { .. },
                    ..
                } => stats.skipped += 1,
                ItemOutcome::Done {
                    outcome: Outcome::Simulated { would_remove, .. },
                    ..
                } => {
                    stats.simulated += 1;
                    stats.removed += would_remove.len();
                }
                ItemOutcome::Accepted { .. } => stats.accepted += 1,
                ItemOutcome::Rejected { reason, .. } if !reason.is_warning() => {
                    stats.rejected += 1
                }
                _ => {}
            }
        }
        stats
    }
}

/// Load the catalog from `catalog_file` when given, else from the server.
pub fn load_entries(
    fetcher: &impl Fetcher,
    settings: &Settings,
    catalog_file: Option<&Path>,
) -> Result<Vec<CatalogEntry>, ProcessError> {
    let entries = match catalog_file {
        Some(path) => {
            info!(file = %path.display(), "reading catalog");
            catalog::load_catalog_file(path, &settings.server)?
        }
        None => {
            info!(url = %settings.server.catalog_location(), "fetching catalog");
            catalog::fetch_catalog(fetcher, &settings.server)?
        }
    };
    info!(entries = entries.len(), "catalog loaded");
    Ok(entries)
}

/// Run the full pipeline against the configured server.
pub fn run(settings: &Settings, catalog_file: Option<&Path>) -> Result<RunReport, ProcessError> {
    let fetcher = HttpFetcher::new();
    let entries = load_entries(&fetcher, settings, catalog_file)?;
    Ok(run_entries(&entries, &fetcher, &RustBackend::new(), settings))
}

/// Report filter decisions only; nothing is fetched besides the catalog.
pub fn check(settings: &Settings, catalog_file: Option<&Path>) -> Result<RunReport, ProcessError> {
    let entries = load_entries(&HttpFetcher::new(), settings, catalog_file)?;
    Ok(check_entries(&entries, &settings.criteria))
}

/// Filter one entry: the item when accepted, otherwise what to record.
fn screen<'a>(
    entry: &'a CatalogEntry,
    criteria: &FilterCriteria,
) -> Result<&'a MediaItem, ItemOutcome> {
    let item = match entry {
        CatalogEntry::Item(item) => item,
        CatalogEntry::Unidentified { title } => {
            warn!(
                title = title.as_deref().unwrap_or("<untitled>"),
                "catalog entry has no identifier, skipped"
            );
            return Err(ItemOutcome::Unidentified {
                title: title.clone(),
            });
        }
    };
    match decide(item, criteria) {
        Decision::Accept => Ok(item),
        Decision::Reject(reason) => {
            let label = item.label();
            if reason.is_warning() {
                warn!(item = %label, "{}", reason);
            } else {
                info!(item = %label, reason = reason.code(), "skipped: {}", reason);
            }
            Err(ItemOutcome::Rejected { label, reason })
        }
    }
}

/// Filter-only pass over already-loaded entries.
pub fn check_entries(entries: &[CatalogEntry], criteria: &FilterCriteria) -> RunReport {
    let items = entries
        .iter()
        .map(|entry| match screen(entry, criteria) {
            Ok(item) => {
                let label = item.label();
                info!(item = %label, "accepted");
                ItemOutcome::Accepted { label }
            }
            Err(outcome) => outcome,
        })
        .collect();
    RunReport { items }
}

/// Filter and reconcile every entry with the given fetcher and backend.
pub fn run_entries(
    entries: &[CatalogEntry],
    fetcher: &impl Fetcher,
    backend: &impl ImageBackend,
    settings: &Settings,
) -> RunReport {
    let mut report = RunReport::default();
    for entry in entries {
        let item = match screen(entry, &settings.criteria) {
            Ok(item) => item,
            Err(outcome) => {
                report.items.push(outcome);
                continue;
            }
        };
        let label = item.label();
        let outcome = match artifact::reconcile(item, fetcher, backend, settings) {
            Ok(outcome) => ItemOutcome::Done { label, outcome },
            Err(e) => {
                warn!(item = %label, "generation failed: {}", e);
                ItemOutcome::Failed {
                    label,
                    error: e.to_string(),
                }
            }
        };
        report.items.push(outcome);
    }
    report
}
