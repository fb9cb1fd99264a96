//! Raw endpoint access.
//!
//! A `SeriesSource` only moves bytes: it answers "give me the body of this
//! endpoint" and reports transport failures. Decoding and validation live in
//! `payload` so every source is held to the same structural checks.

use std::future::Future;
use std::path::PathBuf;

use reqwest::Client;
use tracing::debug;

use crate::data::payload;
use crate::data::sample::DemoSource;
use crate::domain::SeriesKind;
use crate::error::FetchError;

/// The read-only endpoints the dashboard consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Historical,
    Predictions,
    Stats,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Historical => "/api/historical",
            Endpoint::Predictions => "/api/predictions",
            Endpoint::Stats => "/api/stats",
        }
    }

    /// File name used by `FileSource`.
    pub fn file_name(self) -> &'static str {
        match self {
            Endpoint::Historical => "historical.json",
            Endpoint::Predictions => "predictions.json",
            Endpoint::Stats => "stats.json",
        }
    }

    pub fn series_kind(self) -> Option<SeriesKind> {
        match self {
            Endpoint::Historical => Some(SeriesKind::Historical),
            Endpoint::Predictions => Some(SeriesKind::Forecast),
            Endpoint::Stats => None,
        }
    }
}

pub trait SeriesSource {
    /// Fetch the raw response body of `endpoint`.
    fn get(&self, endpoint: Endpoint) -> impl Future<Output = Result<Vec<u8>, FetchError>>;

    /// Human-readable origin, for logs and the dashboard header.
    fn describe(&self) -> String;
}

/// The dashboard HTTP API.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

impl SeriesSource for HttpSource {
    async fn get(&self, endpoint: Endpoint) -> Result<Vec<u8>, FetchError> {
        let url = self.url(endpoint);
        debug!(%url, "requesting endpoint");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(format!("request to {url} failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(format!("reading {url} failed: {e}")))?
            .to_vec();

        // The server reports model failures as `500 {success: false, message}`;
        // keep those so the message reaches the user.
        if !status.is_success() && !payload::is_envelope(&body) {
            return Err(FetchError::Protocol(format!("{url} answered with status {status}")));
        }

        Ok(body)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Endpoint payloads saved as JSON files in one directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SeriesSource for FileSource {
    async fn get(&self, endpoint: Endpoint) -> Result<Vec<u8>, FetchError> {
        let path = self.dir.join(endpoint.file_name());
        debug!(path = %path.display(), "reading endpoint file");
        tokio::fs::read(&path)
            .await
            .map_err(|e| FetchError::Transport(format!("failed to read '{}': {e}", path.display())))
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

/// Runtime-selected source.
#[derive(Debug, Clone)]
pub enum AnySource {
    Http(HttpSource),
    File(FileSource),
    Demo(DemoSource),
}

impl SeriesSource for AnySource {
    async fn get(&self, endpoint: Endpoint) -> Result<Vec<u8>, FetchError> {
        match self {
            AnySource::Http(s) => s.get(endpoint).await,
            AnySource::File(s) => s.get(endpoint).await,
            AnySource::Demo(s) => s.get(endpoint).await,
        }
    }

    fn describe(&self) -> String {
        match self {
            AnySource::Http(s) => s.describe(),
            AnySource::File(s) => s.describe(),
            AnySource::Demo(s) => s.describe(),
        }
    }
}
