//! CLI command definitions and dispatch.
//!
//! Each group of subcommands is implemented in its own submodule:
//! - `resolve`: Single and batch lyrics resolution
//! - `search`: Free-text search and metadata normalization
//! - `settings`: Config file inspection and creation

mod resolve;
mod search;
mod settings;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config::{self, Config};
use crate::lyrics::LyricsVariant;

pub use resolve::{cmd_resolve, cmd_resolve_batch};
pub use search::{cmd_normalize, cmd_search};
pub use settings::cmd_config;

/// Lyrics Minder CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "LYRICS_MINDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// LRCLIB API root (overrides the config file)
    #[arg(long, global = true, env = "LRCLIB_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Find lyrics for one track
    Resolve {
        /// Track title (file names and paths are cleaned up)
        title: String,
        /// Artist name
        #[arg(short, long)]
        artist: Option<String>,
        /// Album title
        #[arg(short = 'l', long)]
        album: Option<String>,
        /// Track duration in seconds
        #[arg(short, long)]
        duration: Option<u32>,
        /// Correlation id echoed back with the result
        #[arg(long)]
        id: Option<String>,
        /// Total time budget in milliseconds (default from config)
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Don't fall back to search when the exact lookup finds nothing
        #[arg(long)]
        no_fallback: bool,
        /// Lyrics variant to print: synced or plain
        #[arg(long)]
        variant: Option<LyricsVariant>,
    },
    /// Resolve every track listed in a file ("Artist - Title" per line)
    Batch {
        /// File with one track per line; '#' starts a comment
        path: PathBuf,
        /// Number of resolutions running at once
        #[arg(short, long, default_value = "4")]
        jobs: usize,
        /// Total time budget per track in milliseconds (default from config)
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Don't log per-track progress
        #[arg(short, long)]
        quiet: bool,
    },
    /// Free-text search, listing candidates
    Search {
        /// Search text, e.g. "artist title"
        query: String,
        /// Maximum number of candidates to show
        #[arg(short = 'n', long, default_value = "5")]
        limit: usize,
        /// Time budget in milliseconds (default from config)
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Show how track metadata is cleaned before lookup
    Normalize {
        /// Raw track title
        title: String,
        /// Raw artist name
        #[arg(short, long)]
        artist: Option<String>,
        /// Raw album title
        #[arg(short = 'l', long)]
        album: Option<String>,
    },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = effective_config(cli)?;

    match &cli.command {
        Commands::Resolve {
            title,
            artist,
            album,
            duration,
            id,
            timeout_ms,
            no_fallback,
            variant,
        } => {
            let rt = Runtime::new()?;
            let track = crate::lyrics::RawTrack {
                title: title.clone(),
                artist: artist.clone(),
                album: album.clone(),
                duration_secs: *duration,
                external_id: id.clone(),
            };
            cmd_resolve(&rt, &config, track, *timeout_ms, *no_fallback, *variant)
        }
        Commands::Batch {
            path,
            jobs,
            timeout_ms,
            quiet,
        } => {
            let rt = Runtime::new()?;
            cmd_resolve_batch(&rt, &config, path, *jobs, *timeout_ms, *quiet)
        }
        Commands::Search {
            query,
            limit,
            timeout_ms,
        } => {
            let rt = Runtime::new()?;
            cmd_search(&rt, &config, query, *limit, *timeout_ms)
        }
        Commands::Normalize {
            title,
            artist,
            album,
        } => cmd_normalize(&config, title, artist.as_deref(), album.as_deref()),
        Commands::Config { action } => cmd_config(&config, cli.config.as_deref(), action),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Load the config file and apply global overrides
fn effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) if path.exists() => config::load_from(path)?,
        Some(path) => {
            tracing::info!("No config file at {:?}, using defaults", path);
            Config::default()
        }
        None => config::load(),
    };
    if let Some(base_url) = &cli.base_url {
        config.lyrics.base_url = base_url.clone();
    }
    Ok(config)
}

/// Budget from a CLI override or the config
pub(crate) fn budget(config: &Config, timeout_ms: Option<u64>) -> std::time::Duration {
    timeout_ms
        .map(std::time::Duration::from_millis)
        .unwrap_or_else(|| config.budget())
}
