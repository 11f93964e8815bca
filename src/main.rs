//! Lyrics Minder - finds lyrics for tracks in the LRCLIB database.
//!
//! Raw track metadata (often a file name) is cleaned into a query key,
//! looked up by exact signature, and, when that finds nothing, searched
//! for more loosely. Every resolution ends in exactly one outcome within
//! its time budget.

pub mod cli;
pub mod config;
pub mod error;
pub mod lyrics;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("lyrics_minder=info".parse()?))
        .init();

    cli::run_command(&args)
}
