//! End-to-end pipeline runs: config file on disk, catalog payload, real PNG
//! decoding and encoding, output directory inspection.

use image::{ImageFormat, Rgb, RgbImage};
use plex_wallpapers::artifact::Outcome;
use plex_wallpapers::catalog::{self, CatalogEntry, CatalogError, Fetcher};
use plex_wallpapers::config::{self, Settings};
use plex_wallpapers::filter::RejectReason;
use plex_wallpapers::imaging::RustBackend;
use plex_wallpapers::process::{self, ItemOutcome, RunReport};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const STILL_URL: &str = "http://plex:32400/library/metadata/42/art/1?X-Plex-Token=secret";
const POSTER_URL: &str = "http://plex:32400/library/metadata/42/thumb/1?X-Plex-Token=secret";

/// Serves canned responses and records what was asked for.
#[derive(Default)]
struct CannedFetcher {
    responses: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

impl CannedFetcher {
    fn with_images() -> Self {
        let mut fetcher = Self::default();
        fetcher
            .responses
            .insert(STILL_URL.into(), png(320, 180, Rgb([220, 20, 20])));
        fetcher
            .responses
            .insert(POSTER_URL.into(), png(40, 60, Rgb([20, 20, 220])));
        fetcher
    }

    fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Fetcher for CannedFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        self.requests.borrow_mut().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| CatalogError::Status {
                url: url.to_string(),
                status: 404,
                body: String::new(),
            })
    }
}

fn png(width: u32, height: u32, color: Rgb<u8>) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbImage::from_pixel(width, height, color)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn listing(title: &str, genre: &str, updated_at: u64) -> Vec<u8> {
    format!(
        r#"{{"MediaContainer": {{"Metadata": [{{
            "ratingKey": "42",
            "title": "{title}",
            "year": 2020,
            "art": "/library/metadata/42/art/1",
            "thumb": "/library/metadata/42/thumb/1",
            "updatedAt": {updated_at},
            "Genre": [{{"tag": "{genre}"}}],
            "Media": [{{"Part": [{{"file": "/movies/{title}.mkv"}}]}}]
        }}]}}}}"#
    )
    .into_bytes()
}

/// Write a config file into `root` and load it the way the CLI does.
fn settings(root: &Path, extra: &str) -> Settings {
    let path = root.join("plex-wallpapers.toml");
    fs::write(
        &path,
        format!(
            r#"
[server]
url = "http://plex:32400"
token = "secret"
library_id = "1"

[output]
directory = "{}"
format = "png"

[layout]
still_width = 64
still_height = 36
poster_height = 24
poster_margin = 2
left_poster = "external"
right_poster = "none"
{}
"#,
            root.join("out").display(),
            extra
        ),
    )
    .unwrap();
    config::load_config(&path).unwrap().resolve().unwrap()
}

fn run(payload: &[u8], fetcher: &CannedFetcher, settings: &Settings) -> RunReport {
    let entries = catalog::parse_catalog(payload, &settings.server).unwrap();
    process::run_entries(&entries, fetcher, &RustBackend::new(), settings)
}

fn files_of_item(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.to_string_lossy().ends_with(".42.png"))
        .collect();
    files.sort();
    files
}

#[test]
fn generates_composed_wallpaper() {
    let tmp = TempDir::new().unwrap();
    let settings = settings(tmp.path(), "");
    let fetcher = CannedFetcher::with_images();

    let report = run(&listing("Foo", "Action", 1_600_000_000), &fetcher, &settings);

    assert!(!report.has_warnings());
    let path = tmp.path().join("out/foo (2020).42.png");
    assert!(path.exists());
    assert_eq!(fetcher.requests(), vec![STILL_URL, POSTER_URL]);

    // poster 40x60 scaled to 16x24, plus a 2px margin on every side
    let wallpaper = image::open(&path).unwrap().to_rgb8();
    assert_eq!(wallpaper.dimensions(), (64 + 20, 36));
    let margin = wallpaper.get_pixel(0, 0);
    assert_eq!(*margin, Rgb([0, 0, 0]));
    let poster = wallpaper.get_pixel(8, 12);
    assert!(poster[2] > 200 && poster[0] < 50, "poster pixel {:?}", poster);
    let still = wallpaper.get_pixel(50, 18);
    assert!(still[0] > 200 && still[2] < 50, "still pixel {:?}", still);
}

#[test]
fn second_run_fetches_nothing() {
    let tmp = TempDir::new().unwrap();
    let settings = settings(tmp.path(), "");
    let payload = listing("Foo", "Action", 1_600_000_000);
    run(&payload, &CannedFetcher::with_images(), &settings);

    let fetcher = CannedFetcher::with_images();
    let report = run(&payload, &fetcher, &settings);

    assert!(fetcher.requests().is_empty());
    assert!(matches!(
        report.items[0],
        ItemOutcome::Done {
            outcome: Outcome::Skipped { .. },
            ..
        }
    ));
}

#[test]
fn title_change_leaves_one_file() {
    let tmp = TempDir::new().unwrap();
    let settings = settings(tmp.path(), "");
    run(
        &listing("Foo", "Action", 1_600_000_000),
        &CannedFetcher::with_images(),
        &settings,
    );

    // updated on the server after the first wallpaper was written
    let report = run(
        &listing("Foo Returns", "Action", 4_000_000_000),
        &CannedFetcher::with_images(),
        &settings,
    );

    let out = tmp.path().join("out");
    assert_eq!(files_of_item(&out), vec![out.join("foo_returns (2020).42.png")]);
    assert_eq!(report.stats().removed, 1);
}

#[test]
fn genre_mismatch_is_reported_and_nothing_written() {
    let tmp = TempDir::new().unwrap();
    let settings = settings(tmp.path(), "\n[filter]\nmandatory_genres = [\"Comedy\"]\n");
    let fetcher = CannedFetcher::with_images();

    let report = run(&listing("Foo", "Action", 1_600_000_000), &fetcher, &settings);

    match &report.items[0] {
        ItemOutcome::Rejected { reason, .. } => {
            assert_eq!(*reason, RejectReason::GenreMismatch);
            assert_eq!(reason.code(), "genre_mismatch");
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(fetcher.requests().is_empty());
    assert!(!tmp.path().join("out").exists());
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn simulated_run_leaves_directory_untouched() {
    let tmp = TempDir::new().unwrap();
    let mut settings = settings(tmp.path(), "");
    settings.simulated = true;
    let out = tmp.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("old.42.png"), b"x").unwrap();
    let fetcher = CannedFetcher::with_images();

    let report = run(&listing("Foo", "Action", 1_600_000_000), &fetcher, &settings);

    match &report.items[0] {
        ItemOutcome::Done {
            outcome: Outcome::Simulated { path, would_remove },
            ..
        } => {
            assert_eq!(*path, out.join("foo (2020).42.png"));
            assert_eq!(*would_remove, vec![out.join("old.42.png")]);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(fetcher.requests().is_empty());
    assert_eq!(files_of_item(&out), vec![out.join("old.42.png")]);
}

#[test]
fn missing_poster_is_warning() {
    let tmp = TempDir::new().unwrap();
    let settings = settings(tmp.path(), "");
    let payload = br#"{"MediaContainer": {"Metadata": [
        {"ratingKey": "42", "title": "Foo", "art": "/a"},
        {"title": "No Key"}
    ]}}"#;

    let report = run(payload, &CannedFetcher::default(), &settings);

    assert_eq!(report.items.len(), 2);
    assert!(matches!(report.items[1], ItemOutcome::Unidentified { .. }));
    assert_eq!(report.stats().warnings, 2);
    assert_eq!(report.exit_code(), process::EXIT_WARNINGS);
}

#[test]
fn check_on_catalog_file() {
    let tmp = TempDir::new().unwrap();
    let settings = settings(tmp.path(), "\n[filter]\nforbidden_keywords = [\"foo\"]\n");
    let file = tmp.path().join("catalog.json");
    fs::write(&file, listing("Foo", "Action", 0)).unwrap();

    let report = process::check(&settings, Some(&file)).unwrap();

    assert!(matches!(
        &report.items[0],
        ItemOutcome::Rejected {
            reason: RejectReason::ForbiddenKeyword(k),
            ..
        } if k == "foo"
    ));
    assert!(!tmp.path().join("out").exists());
    let entries = catalog::load_catalog_file(&file, &settings.server).unwrap();
    assert!(matches!(entries[0], CatalogEntry::Item(_)));
}
