//! Lyrics resolution commands.

use std::path::Path;
use std::sync::Arc;

use tokio::runtime::Runtime;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::ResultExt;
use crate::lyrics::{
    ChannelSink, LrclibClient, LyricsResolver, LyricsVariant, NullSink, ProgressSink, RawTrack,
    Resolution, ResolutionOutcome, ResolutionRequest, TracingSink,
};

use super::budget;

/// Resolve lyrics for a single track and print them
pub fn cmd_resolve(
    rt: &Runtime,
    config: &Config,
    track: RawTrack,
    timeout_ms: Option<u64>,
    no_fallback: bool,
    variant: Option<LyricsVariant>,
) -> anyhow::Result<()> {
    let mut resolver_config = config.resolver_config();
    if no_fallback {
        resolver_config.fallback_enabled = false;
    }
    if let Some(variant) = variant {
        resolver_config.preferred_variant = variant;
    }

    let resolution = rt.block_on(async {
        let client = LrclibClient::with_base_url(&config.lyrics.base_url)
            .with_context("building lyrics client")?;

        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_interrupt.cancel();
            }
        });

        let (sink, mut progress) = ChannelSink::new();
        let printer = tokio::spawn(async move {
            while let Some(event) = progress.recv().await {
                eprintln!("  … {}", event.message);
            }
        });

        println!("Resolving: {}", track.title);
        let request = ResolutionRequest::new(track, budget(config, timeout_ms));
        let resolution = LyricsResolver::new(client, resolver_config, sink)
            .resolve(request, cancel)
            .await;

        // The sink was dropped with the resolver, so the printer drains and ends
        let _ = printer.await;
        anyhow::Ok(resolution)
    })?;

    print_resolution(&resolution);
    println!();

    if !resolution.outcome.is_success() {
        std::process::exit(exit_code(&resolution.outcome));
    }
    Ok(())
}

/// Resolve many tracks concurrently, sharing one client
pub fn cmd_resolve_batch(
    rt: &Runtime,
    config: &Config,
    path: &Path,
    jobs: usize,
    timeout_ms: Option<u64>,
    quiet: bool,
) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(path)?;
    let tracks: Vec<RawTrack> = contents
        .lines()
        .enumerate()
        .filter_map(|(i, line)| parse_batch_line(line, i + 1))
        .collect();

    if tracks.is_empty() {
        println!("No tracks listed in {:?}", path);
        return Ok(());
    }

    println!("Resolving {} tracks ({} at a time)...", tracks.len(), jobs.max(1));

    rt.block_on(async {
        let client = Arc::new(
            LrclibClient::with_base_url(&config.lyrics.base_url)
                .with_context("building lyrics client")?,
        );
        let permits = Arc::new(Semaphore::new(jobs.max(1)));
        let sink: Arc<dyn ProgressSink> = if quiet {
            Arc::new(NullSink)
        } else {
            Arc::new(TracingSink)
        };
        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_interrupt.cancel();
            }
        });

        let mut set = JoinSet::new();
        for track in tracks {
            let client = Arc::clone(&client);
            let permits = Arc::clone(&permits);
            let resolver_config = config.resolver_config();
            let request = ResolutionRequest::new(track, budget(config, timeout_ms));
            let sink = Arc::clone(&sink);
            let cancel = cancel.child_token();
            set.spawn(async move {
                let _permit = permits.acquire_owned().await;
                LyricsResolver::new(client, resolver_config, sink)
                    .resolve(request, cancel)
                    .await
            });
        }

        let mut resolutions = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(resolution) => resolutions.push(resolution),
                Err(e) => tracing::error!("Resolution task failed: {}", e),
            }
        }
        resolutions.sort_by(|a, b| a.external_id.cmp(&b.external_id));

        let found = resolutions.iter().filter(|r| r.outcome.is_success()).count();
        for resolution in &resolutions {
            let line = resolution.external_id.as_deref().unwrap_or("?");
            match &resolution.outcome {
                ResolutionOutcome::Success(result) => {
                    let kind = if result.has_synced() { "synced" } else { "plain" };
                    println!(
                        "  ✓ {}: {} - {} [{}]",
                        line, result.artist_name, result.track_name, kind
                    );
                }
                other => println!("  ✗ {}: {}", line, describe(other)),
            }
        }
        println!();
        println!("Found lyrics for {}/{} tracks", found, resolutions.len());
        anyhow::Ok(())
    })
}

/// Parse one batch line. The line number becomes the correlation id.
fn parse_batch_line(line: &str, line_number: usize) -> Option<RawTrack> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (artist, title) = match line.split_once(" - ") {
        Some((artist, title)) => (Some(artist.trim().to_string()), title.trim().to_string()),
        None => (None, line.to_string()),
    };
    Some(RawTrack {
        title,
        artist,
        album: None,
        duration_secs: None,
        external_id: Some(format!("line {:>4}", line_number)),
    })
}

fn print_resolution(resolution: &Resolution) {
    println!();
    match &resolution.outcome {
        ResolutionOutcome::Success(result) => {
            println!("✓ Lyrics found! ({} ms)", resolution.elapsed.as_millis());
            println!();
            println!("  Title:  {}", result.track_name);
            println!("  Artist: {}", result.artist_name);
            if !result.album_name.is_empty() {
                println!("  Album:  {}", result.album_name);
            }
            if let Some(id) = &resolution.external_id {
                println!("  Id:     {}", id);
            }
            println!();
            if let Some(lyrics) = resolution.lyrics() {
                println!("{}", lyrics);
            }
        }
        other => {
            println!("✗ {}", describe(other));
        }
    }
}

/// Human-readable explanation of a non-success outcome
fn describe(outcome: &ResolutionOutcome) -> String {
    match outcome {
        ResolutionOutcome::Success(_) => "lyrics found".to_string(),
        ResolutionOutcome::NotFound => "No lyrics found for this track".to_string(),
        ResolutionOutcome::TransientFailure(reason) if reason.is_retryable() => {
            format!("Lookup failed ({}), try again later", reason)
        }
        ResolutionOutcome::TransientFailure(reason) => format!("Cannot look up track: {}", reason),
        ResolutionOutcome::Timeout => "Timed out waiting for the lyrics database".to_string(),
        ResolutionOutcome::Cancelled => "Cancelled".to_string(),
    }
}

fn exit_code(outcome: &ResolutionOutcome) -> i32 {
    match outcome {
        ResolutionOutcome::Success(_) => 0,
        ResolutionOutcome::NotFound => 1,
        ResolutionOutcome::TransientFailure(_) | ResolutionOutcome::Timeout => 2,
        ResolutionOutcome::Cancelled => 130,
    }
}
