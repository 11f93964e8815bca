//! LRCLIB HTTP client
//!
//! Handles communication with the LRCLIB lyrics database.
//! See: https://lrclib.net/docs
//!
//! ## Endpoints
//!
//! - `GET /api/get` - signature lookup. Needs `track_name`, optionally
//!   `artist_name`, `album_name` and `duration`. Returns one record or 404.
//! - `GET /api/search` - loose lookup by `q` or by the structured fields.
//!   Returns an array, possibly empty.
//!
//! ## Deadlines and cancellation
//!
//! Every call takes an absolute deadline and a cancellation token. The
//! request (send and body) is raced against both; the loser is dropped,
//! which aborts the in-flight HTTP exchange. Nothing is retried here.

use reqwest::StatusCode;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::adapter;
use crate::error::{Error, Result as AppResult};
use crate::lyrics::domain::{ClientError, LyricsResult, SearchQuery, Track};

/// Public LRCLIB instance
pub const DEFAULT_BASE_URL: &str = "https://lrclib.net/api";

/// User agent string - LRCLIB asks clients to identify themselves
const USER_AGENT: &str = concat!(
    "LyricsMinder/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/lyrics-minder)"
);

/// LRCLIB API client
///
/// Holds no per-request state; share it freely between resolutions.
#[derive(Debug, Clone)]
pub struct LrclibClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl LrclibClient {
    /// Create a client for the public LRCLIB instance
    pub fn new() -> AppResult<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom instance (self-hosted or test server)
    pub fn with_base_url(base_url: impl Into<String>) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Http(e).context("building LRCLIB HTTP client"))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// High-precision lookup: at most one result matching the track signature.
    pub async fn fetch_by_signature(
        &self,
        track: &Track,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> Result<LyricsResult, ClientError> {
        let url = self.signature_url(track);
        tracing::debug!(target: "lrclib", "GET {}", url);
        let body = self.get_body(&url, deadline, cancel).await?;
        adapter::to_signature_result(&body)
    }

    /// Recall-oriented lookup: candidates in service order, never empty on `Ok`.
    pub async fn search(
        &self,
        query: &SearchQuery,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> Result<Vec<LyricsResult>, ClientError> {
        let url = self.search_url(query)?;
        tracing::debug!(target: "lrclib", "GET {}", url);
        let body = self.get_body(&url, deadline, cancel).await?;
        adapter::to_search_results(&body)
    }

    fn signature_url(&self, track: &Track) -> String {
        let mut url = format!(
            "{}/get?track_name={}",
            self.base_url,
            urlencoding::encode(&track.title)
        );
        if let Some(artist) = &track.artist {
            url.push_str(&format!("&artist_name={}", urlencoding::encode(artist)));
        }
        if let Some(album) = &track.album {
            url.push_str(&format!("&album_name={}", urlencoding::encode(album)));
        }
        if let Some(duration) = track.duration_secs.filter(|d| *d > 0) {
            url.push_str(&format!("&duration={}", duration));
        }
        url
    }

    fn search_url(&self, query: &SearchQuery) -> Result<String, ClientError> {
        match query {
            SearchQuery::FreeText(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(ClientError::MalformedRequest(
                        "search text is empty".to_string(),
                    ));
                }
                Ok(format!(
                    "{}/search?q={}",
                    self.base_url,
                    urlencoding::encode(text)
                ))
            }
            SearchQuery::BySignature(track) => {
                if track.title.trim().is_empty() {
                    return Err(ClientError::MalformedRequest(
                        "track title is empty".to_string(),
                    ));
                }
                let mut url = format!(
                    "{}/search?track_name={}",
                    self.base_url,
                    urlencoding::encode(&track.title)
                );
                if let Some(artist) = &track.artist {
                    url.push_str(&format!("&artist_name={}", urlencoding::encode(artist)));
                }
                if let Some(album) = &track.album {
                    url.push_str(&format!("&album_name={}", urlencoding::encode(album)));
                }
                Ok(url)
            }
        }
    }

    /// Issue one GET and return the body of a 200 response.
    async fn get_body(
        &self,
        url: &str,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> Result<String, ClientError> {
        if deadline <= Instant::now() {
            return Err(ClientError::Timeout);
        }

        let url = reqwest::Url::parse(url)
            .map_err(|e| ClientError::MalformedRequest(format!("{url}: {e}")))?;

        let exchange = async {
            let response = self
                .http_client
                .get(url)
                .send()
                .await
                .map_err(classify)?;

            let status = response.status();
            let body = response.text().await.map_err(classify)?;

            match status {
                StatusCode::OK => Ok(body),
                StatusCode::NOT_FOUND => Err(ClientError::NoResult),
                _ => Err(ClientError::ServerRejected {
                    status: status.as_u16(),
                    message: adapter::error_message(&body, status),
                }),
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(target: "lrclib", "Request cancelled");
                Err(ClientError::Cancelled)
            }
            result = tokio::time::timeout_at(deadline, exchange) => match result {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::debug!(target: "lrclib", "Request abandoned at deadline");
                    Err(ClientError::Timeout)
                }
            },
        }
    }
}

/// Map a transport error onto the client taxonomy
fn classify(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout
    } else if err.is_builder() {
        ClientError::MalformedRequest(err.to_string())
    } else {
        ClientError::Network(err.to_string())
    }
}
