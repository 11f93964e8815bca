//! LRCLIB API Data Transfer Objects
//!
//! These types match what the LRCLIB API returns.
//! DO NOT use these types outside the lrclib module - convert to domain types.
//!
//! API Reference: https://lrclib.net/docs
//!
//! Example `/api/get` response (`/api/search` returns an array of these):
//! ```json
//! {
//!   "id": 3396226,
//!   "trackName": "I Want to Live",
//!   "artistName": "Borislav Slavov",
//!   "albumName": "Baldur's Gate 3 (Original Game Soundtrack)",
//!   "duration": 233,
//!   "instrumental": false,
//!   "plainLyrics": "I feel your breath upon my neck\n...",
//!   "syncedLyrics": "[00:17.12] I feel your breath upon my neck\n..."
//! }
//! ```

use serde::{Deserialize, Serialize};

/// A single lyrics record
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricsRecord {
    /// LRCLIB record ID
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub track_name: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub album_name: Option<String>,
    /// Duration in seconds (may be fractional)
    #[serde(default)]
    pub duration: Option<f64>,
    /// True when the record deliberately has no lyrics
    #[serde(default)]
    pub instrumental: bool,
    #[serde(default)]
    pub plain_lyrics: Option<String>,
    #[serde(default)]
    pub synced_lyrics: Option<String>,
}

/// Error body returned with non-200 responses
///
/// ```json
/// {"code": 404, "name": "TrackNotFound", "message": "Failed to find specified track"}
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub name: Option<String>,
    pub message: String,
}
