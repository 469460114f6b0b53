//! Plex catalog access: fetching the library listing and source images.
//!
//! The library is requested as JSON:
//!
//! ```text
//! GET {server}/library/sections/{library}/all?X-Plex-Token={token}
//! Accept: application/json
//! ```
//!
//! and decoded into [`MediaItem`]s. Every field of an entry is optional at
//! this layer; what is missing becomes an absent URL, an empty set or a
//! default, and the [`filter`](crate::filter) decides what that means. Only
//! an entry without an identifier cannot become a `MediaItem`; it is kept as
//! [`CatalogEntry::Unidentified`] so the run can report it.
//!
//! Network access goes through the [`Fetcher`] trait. [`HttpFetcher`] is the
//! production implementation; tests substitute an in-memory one.

use crate::types::MediaItem;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{url} answered HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed catalog: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the catalog lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    /// Root URL, e.g. `http://192.168.0.1:32400`.
    pub url: String,
    pub token: String,
    /// Library section ID.
    pub library_id: String,
}

impl Server {
    /// Library listing URL without credentials (safe to log).
    pub fn catalog_location(&self) -> String {
        format!(
            "{}/library/sections/{}/all",
            self.url.trim_end_matches('/'),
            self.library_id
        )
    }

    /// Library listing URL with the token attached.
    pub fn catalog_url(&self) -> String {
        self.with_token(self.catalog_location())
    }

    /// Turn an image reference from the catalog into a fetchable URL.
    ///
    /// Server-relative references (`/library/metadata/42/art/1600000000`)
    /// are resolved against the server root and authenticated; absolute
    /// URLs are used as-is.
    pub fn resolve(&self, reference: &str) -> String {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return reference.to_string();
        }
        let path = if reference.starts_with('/') {
            reference.to_string()
        } else {
            format!("/{}", reference)
        };
        self.with_token(format!("{}{}", self.url.trim_end_matches('/'), path))
    }

    fn with_token(&self, url: String) -> String {
        let separator = if url.contains('?') { '&' } else { '?' };
        format!("{}{}X-Plex-Token={}", url, separator, self.token)
    }
}

/// Source of bytes for a URL.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, CatalogError>;
}

/// Blocking HTTP fetcher.
///
/// No timeouts beyond the transport defaults are configured.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .user_agent(concat!("plex-wallpapers/", env!("CARGO_PKG_VERSION")))
                .build(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip the query string so tokens never end up in messages.
fn redact(url: &str) -> String {
    url.split('?').next().unwrap_or(url).to_string()
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        debug!(url = %redact(url), "fetching");
        let response = self
            .agent
            .get(url)
            .set("Accept", "application/json")
            .call()
            .map_err(|error| match error {
                ureq::Error::Status(status, response) => CatalogError::Status {
                    url: redact(url),
                    status,
                    body: response.into_string().unwrap_or_default(),
                },
                ureq::Error::Transport(transport) => CatalogError::Transport {
                    url: redact(url),
                    message: transport.to_string(),
                },
            })?;
        let mut bytes = Vec::new();
        response.into_reader().read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

/// One entry of the library listing, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEntry {
    Item(MediaItem),
    /// An entry without `ratingKey`; its title, if any, for reporting.
    Unidentified { title: Option<String> },
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "MediaContainer")]
    container: Container,
}

#[derive(Deserialize)]
struct Container {
    #[serde(rename = "Metadata", default)]
    metadata: Vec<RawItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    rating_key: Option<serde_json::Value>,
    title: Option<String>,
    original_title: Option<String>,
    year: Option<i32>,
    art: Option<String>,
    thumb: Option<String>,
    updated_at: Option<u64>,
    #[serde(rename = "Genre", default)]
    genres: Vec<RawTag>,
    #[serde(rename = "Media", default)]
    media: Vec<RawMedia>,
}

#[derive(Deserialize)]
struct RawTag {
    tag: Option<String>,
}

#[derive(Deserialize)]
struct RawMedia {
    #[serde(rename = "Part", default)]
    parts: Vec<RawPart>,
}

#[derive(Deserialize)]
struct RawPart {
    file: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl RawItem {
    fn into_entry(self, server: &Server) -> CatalogEntry {
        let id = match self.rating_key {
            Some(serde_json::Value::String(s)) if !s.is_empty() => s,
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => return CatalogEntry::Unidentified { title: self.title },
        };
        let genres: BTreeSet<String> = self
            .genres
            .into_iter()
            .filter_map(|g| g.tag)
            .map(|tag| tag.to_lowercase())
            .collect();
        let file_paths: BTreeSet<String> = self
            .media
            .into_iter()
            .flat_map(|m| m.parts)
            .filter_map(|p| p.file)
            .collect();

        CatalogEntry::Item(MediaItem {
            id,
            title: self.title.unwrap_or_default(),
            original_title: non_empty(self.original_title),
            year: self.year,
            genres,
            file_paths,
            still_url: non_empty(self.art).map(|r| server.resolve(&r)),
            poster_url: non_empty(self.thumb).map(|r| server.resolve(&r)),
            updated_at: self.updated_at.unwrap_or(0),
        })
    }
}

/// Decode a library listing payload.
pub fn parse_catalog(bytes: &[u8], server: &Server) -> Result<Vec<CatalogEntry>, CatalogError> {
    let envelope: Envelope = serde_json::from_slice(bytes)?;
    Ok(envelope
        .container
        .metadata
        .into_iter()
        .map(|raw| raw.into_entry(server))
        .collect())
}

/// Fetch and decode the library listing from the server.
pub fn fetch_catalog(
    fetcher: &impl Fetcher,
    server: &Server,
) -> Result<Vec<CatalogEntry>, CatalogError> {
    let bytes = fetcher.fetch(&server.catalog_url())?;
    parse_catalog(&bytes, server)
}

/// Decode a library listing saved to a local file.
pub fn load_catalog_file(path: &Path, server: &Server) -> Result<Vec<CatalogEntry>, CatalogError> {
    let bytes = std::fs::read(path)?;
    parse_catalog(&bytes, server)
}
