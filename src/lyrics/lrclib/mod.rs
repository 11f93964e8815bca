//! LRCLIB API integration
//!
//! LRCLIB is a free, open lyrics database serving plain and synced (LRC) lyrics.
//! API docs: https://lrclib.net/docs

mod adapter;
mod client;
pub mod dto;

pub use client::{DEFAULT_BASE_URL, LrclibClient};
