//! Direct search and normalization commands.

use tokio::runtime::Runtime;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::Error;
use crate::lyrics::{
    ClientError, LrclibClient, LyricsResult, SearchQuery, deadline_after, normalize,
};

use super::budget;

/// Free-text search against the lyrics database, listing candidates
pub fn cmd_search(
    rt: &Runtime,
    config: &Config,
    query: &str,
    limit: usize,
    timeout_ms: Option<u64>,
) -> anyhow::Result<()> {
    let client = LrclibClient::with_base_url(&config.lyrics.base_url)?;
    let query = SearchQuery::FreeText(query.trim().to_string());
    let deadline = deadline_after(Instant::now(), budget(config, timeout_ms));

    println!("Searching {} ...", client.base_url());

    let results = rt.block_on(async {
        client
            .search(&query, deadline, &CancellationToken::new())
            .await
    });

    match results {
        Ok(results) => {
            println!("Found {} candidates", results.len());
            println!();
            for (i, result) in results.iter().take(limit).enumerate() {
                println!("{:>2}. {}", i + 1, candidate_line(result));
            }
            if results.len() > limit {
                println!("    ... and {} more", results.len() - limit);
            }
            Ok(())
        }
        Err(ClientError::NoResult) => {
            println!("No candidates found");
            Ok(())
        }
        Err(e) => Err(Error::from(e).context("searching lyrics database").into()),
    }
}

/// Show what normalization makes of raw metadata
pub fn cmd_normalize(
    config: &Config,
    title: &str,
    artist: Option<&str>,
    album: Option<&str>,
) -> anyhow::Result<()> {
    let track = normalize(title, artist, album, &config.filters)?;

    println!("Title:  {}", track.title);
    println!("Artist: {}", track.artist.as_deref().unwrap_or("(none)"));
    println!("Album:  {}", track.album.as_deref().unwrap_or("(none)"));
    Ok(())
}

fn candidate_line(result: &LyricsResult) -> String {
    let kind = if result.has_synced() { "synced" } else { "plain" };
    let total = result.duration_secs.round() as u64;
    format!(
        "{} - {} ({}) [{}:{:02}, {}]",
        result.artist_name,
        result.track_name,
        if result.album_name.is_empty() { "?" } else { result.album_name.as_str() },
        total / 60,
        total % 60,
        kind
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mock_lyrics_result, mock_plain_result};

    #[test]
    fn test_candidate_line_synced() {
        let line = candidate_line(&mock_lyrics_result());
        assert_eq!(line, "Test Artist - Test Song (Test Album) [3:00, synced]");
    }

    #[test]
    fn test_candidate_line_plain() {
        let line = candidate_line(&mock_plain_result("Other"));
        assert!(line.contains("Other"));
        assert!(line.ends_with("plain]"));
    }
}
