//! Adapter layer: Convert LRCLIB DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types,
//! and the only place the "has lyrics" invariant of [`LyricsResult`] is
//! enforced.

use super::dto;
use crate::lyrics::domain::{ClientError, LyricsResult};

/// Convert a single record, discarding it when it carries no lyrics
pub fn to_lyrics_result(record: dto::LyricsRecord) -> Option<LyricsResult> {
    let plain_lyrics = record.plain_lyrics.filter(|s| !s.trim().is_empty());
    let synced_lyrics = record.synced_lyrics.filter(|s| !s.trim().is_empty());

    if plain_lyrics.is_none() && synced_lyrics.is_none() {
        tracing::debug!(
            "Discarding LRCLIB record {:?} without lyrics (instrumental: {})",
            record.id,
            record.instrumental
        );
        return None;
    }

    Some(LyricsResult {
        track_name: record.track_name.unwrap_or_default(),
        artist_name: record.artist_name.unwrap_or_default(),
        album_name: record.album_name.unwrap_or_default(),
        duration_secs: record.duration.unwrap_or_default(),
        plain_lyrics,
        synced_lyrics,
    })
}

/// Convert a `/get` response body
pub fn to_signature_result(body: &str) -> Result<LyricsResult, ClientError> {
    if body.trim().is_empty() {
        return Err(ClientError::NoResult);
    }
    let record: dto::LyricsRecord = serde_json::from_str(body).map_err(|e| {
        tracing::debug!("Unparseable LRCLIB get response: {}", e);
        ClientError::NoResult
    })?;
    to_lyrics_result(record).ok_or(ClientError::NoResult)
}

/// Convert a `/search` response body, keeping service order
pub fn to_search_results(body: &str) -> Result<Vec<LyricsResult>, ClientError> {
    if body.trim().is_empty() {
        return Err(ClientError::NoResult);
    }
    let elements: Vec<serde_json::Value> = serde_json::from_str(body).map_err(|e| {
        tracing::debug!("Unparseable LRCLIB search response: {}", e);
        ClientError::NoResult
    })?;

    // One malformed element must not hide the others
    let results: Vec<_> = elements
        .into_iter()
        .enumerate()
        .filter_map(|(i, element)| match serde_json::from_value::<dto::LyricsRecord>(element) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!("Skipping malformed LRCLIB search element {}: {}", i, e);
                None
            }
        })
        .filter_map(to_lyrics_result)
        .collect();
    if results.is_empty() {
        Err(ClientError::NoResult)
    } else {
        Ok(results)
    }
}

/// Pull a human-readable message out of an error response body
pub fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(error) = serde_json::from_str::<dto::ApiError>(body) {
        return match error.name {
            Some(name) => format!("{}: {}", name, error.message),
            None => error.message,
        };
    }
    let snippet: String = body.trim().chars().take(200).collect();
    if snippet.is_empty() {
        status.canonical_reason().unwrap_or("Unknown").to_string()
    } else {
        snippet
    }
}
