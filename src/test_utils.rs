//! Test utilities and fixtures for lyrics-minder tests.
//!
//! This module provides common fixtures to reduce boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use lyrics_minder::test_utils::{mock_raw_track, mock_lyrics_result};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let raw = mock_raw_track("Song.mp3");
//!     let result = mock_lyrics_result();
//!     // ... test logic
//! }
//! ```

use crate::lyrics::{LyricsResult, RawTrack, Track};

/// Creates a mock LyricsResult carrying both lyrics variants.
///
/// Use struct update syntax to customize:
///
/// ```ignore
/// let result = LyricsResult {
///     synced_lyrics: None,
///     ..mock_lyrics_result()
/// };
/// ```
pub fn mock_lyrics_result() -> LyricsResult {
    LyricsResult {
        track_name: "Test Song".to_string(),
        artist_name: "Test Artist".to_string(),
        album_name: "Test Album".to_string(),
        duration_secs: 180.0,
        plain_lyrics: Some("First line\nSecond line".to_string()),
        synced_lyrics: Some("[00:01.00] First line\n[00:04.50] Second line".to_string()),
    }
}

/// A plain-lyrics-only result with a distinguishable track name
pub fn mock_plain_result(track_name: &str) -> LyricsResult {
    LyricsResult {
        track_name: track_name.to_string(),
        synced_lyrics: None,
        plain_lyrics: Some(format!("Lyrics of {track_name}")),
        ..mock_lyrics_result()
    }
}

/// A normalized track with title and artist
pub fn mock_track() -> Track {
    Track {
        title: "Test Song".to_string(),
        artist: Some("Test Artist".to_string()),
        album: None,
        duration_secs: Some(180),
        external_id: None,
    }
}

/// A raw track with the given title and a fixed artist
pub fn mock_raw_track(title: &str) -> RawTrack {
    RawTrack {
        title: title.to_string(),
        artist: Some("Test Artist".to_string()),
        album: None,
        duration_secs: Some(180),
        external_id: Some("test-request".to_string()),
    }
}
