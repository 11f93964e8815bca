//! Internal domain models for lyrics resolution.
//!
//! These types are OUR types - they don't change when the lyrics API changes.
//! Wire responses get converted into these types by the LRCLIB adapter.

use serde::{Deserialize, Serialize};

/// Un-normalized track metadata as handed over by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTrack {
    /// Raw title, possibly a file name or path
    pub title: String,
    /// Raw artist name
    pub artist: Option<String>,
    /// Raw album title
    pub album: Option<String>,
    /// Duration in seconds (0 means unknown)
    pub duration_secs: Option<u32>,
    /// Opaque correlation handle, routed back with the outcome
    pub external_id: Option<String>,
}

/// A normalized track, ready to be used as a query key.
///
/// Only produced by [`crate::lyrics::normalize`], which guarantees a
/// non-empty title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Strictly positive when present
    pub duration_secs: Option<u32>,
    pub external_id: Option<String>,
}

impl Track {
    /// Free-text form of the track, used for logging and loose search.
    pub fn display_query(&self) -> String {
        match &self.artist {
            Some(artist) => format!("{} {}", self.title, artist),
            None => self.title.clone(),
        }
    }
}

/// One lyrics candidate returned by the remote service.
///
/// Invariant: at least one of `plain_lyrics` / `synced_lyrics` is present
/// and non-empty. The adapter discards records that break it.
#[derive(Debug, Clone, PartialEq)]
pub struct LyricsResult {
    pub track_name: String,
    pub artist_name: String,
    pub album_name: String,
    pub duration_secs: f64,
    pub plain_lyrics: Option<String>,
    /// Newline separated `[mm:ss.cc] text` lines
    pub synced_lyrics: Option<String>,
}

impl LyricsResult {
    /// Pick the lyrics text for the preferred variant, falling back to
    /// the other variant when the preferred one is missing.
    pub fn lyrics_for(&self, variant: LyricsVariant) -> Option<&str> {
        let (preferred, other) = match variant {
            LyricsVariant::Synced => (&self.synced_lyrics, &self.plain_lyrics),
            LyricsVariant::Plain => (&self.plain_lyrics, &self.synced_lyrics),
        };
        preferred
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| other.as_deref().filter(|s| !s.is_empty()))
    }

    /// Whether time-tagged lyrics are available
    pub fn has_synced(&self) -> bool {
        self.synced_lyrics.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Which lyrics field the host wants surfaced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LyricsVariant {
    #[default]
    Synced,
    Plain,
}

impl std::str::FromStr for LyricsVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "synced" | "sync" | "lrc" => Ok(Self::Synced),
            "plain" | "text" => Ok(Self::Plain),
            other => Err(format!("unknown lyrics variant: {other}")),
        }
    }
}

/// Search input for the recall-oriented lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Free text, sent as `q`
    FreeText(String),
    /// Structured search from a normalized track
    BySignature(Track),
}

/// Errors returned by the lyrics client.
///
/// Always returned as values; the resolver decides what each one means.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server rejected request (HTTP {status}): {message}")]
    ServerRejected { status: u16, message: String },

    #[error("No lyrics found")]
    NoResult,

    #[error("Request cancelled")]
    Cancelled,
}

/// The raw track could not be turned into a usable query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid track: {reason}")]
pub struct InvalidTrackError {
    pub reason: String,
}

impl InvalidTrackError {
    pub fn empty_title(raw: &str) -> Self {
        Self {
            reason: format!("title {raw:?} is empty after normalization"),
        }
    }
}

/// Diagnostic payload of a failed resolution
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureReason {
    #[error("{0}")]
    InvalidTrack(#[from] InvalidTrackError),

    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("server rejected request (HTTP {status}): {message}")]
    ServerRejected { status: u16, message: String },
}

impl FailureReason {
    /// Whether retrying the whole resolution later could help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::ServerRejected { .. })
    }
}

/// The single terminal value of a resolution attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    Success(LyricsResult),
    NotFound,
    TransientFailure(FailureReason),
    Timeout,
    Cancelled,
}

impl ResolutionOutcome {
    /// Map a client error to its terminal outcome.
    ///
    /// `NoResult` maps to `NotFound` here; whether it triggers a fallback
    /// instead is decided by the resolver before calling this.
    pub fn from_client_error(err: ClientError) -> Self {
        match err {
            ClientError::NoResult => Self::NotFound,
            ClientError::Timeout => Self::Timeout,
            ClientError::Cancelled => Self::Cancelled,
            ClientError::Network(msg) => Self::TransientFailure(FailureReason::Network(msg)),
            ClientError::ServerRejected { status, message } => {
                Self::TransientFailure(FailureReason::ServerRejected { status, message })
            }
            ClientError::MalformedRequest(msg) => {
                Self::TransientFailure(FailureReason::MalformedRequest(msg))
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Short label for logs and CLI output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::NotFound => "not found",
            Self::TransientFailure(_) => "failure",
            Self::Timeout => "timeout",
            Self::Cancelled => "cancelled",
        }
    }
}
