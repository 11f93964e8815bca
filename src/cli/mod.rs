//! Command-line interface for lyrics-minder.
//!
//! The CLI plays the host role for the resolver: it builds requests from
//! arguments, shows progress, and renders the terminal outcome.

mod commands;

pub use commands::{Cli, Commands, ConfigAction, run_command};
