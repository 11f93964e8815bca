//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`
//! ([`ClientError`], [`InvalidTrackError`], [`ConfigError`]), while the
//! CLI uses `anyhow` for convenient error propagation.
//!
//! Note that resolution failures are not errors at this level: the resolver
//! always returns a [`crate::lyrics::ResolutionOutcome`]. This type covers
//! setup problems (building the HTTP client, reading config) and direct
//! client calls made outside a resolution.
//!
//! # Example
//!
//! ```ignore
//! use lyrics_minder::error::{Error, Result, ResultExt};
//!
//! fn client_for(config: &Config) -> Result<LrclibClient> {
//!     LrclibClient::with_base_url(&config.lyrics.base_url)
//!         .with_context("connecting to lyrics database")
//! }
//! ```

use crate::config::ConfigError;
use crate::lyrics::{ClientError, InvalidTrackError};

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP stack setup error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Lyrics API error
    #[error("Lyrics API error: {0}")]
    Client(#[from] ClientError),

    /// Track metadata unusable as a query
    #[error(transparent)]
    InvalidTrack(#[from] InvalidTrackError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, ClientError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Client(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, ConfigError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Config(e).context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::from(ClientError::ServerRejected {
            status: 503,
            message: "maintenance".to_string(),
        });
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("maintenance"));
    }

    #[test]
    fn test_invalid_track_is_transparent() {
        let err = Error::from(InvalidTrackError::empty_title(".mp3"));
        assert!(err.to_string().starts_with("Invalid track:"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::from(ClientError::Timeout).context("while searching");
        let msg = err.to_string();
        assert!(msg.contains("while searching"));
        assert!(msg.contains("timed out"));
    }

    #[test]
    fn test_result_ext() {
        let result: std::result::Result<(), ClientError> = Err(ClientError::NoResult);
        let with_ctx = result.with_context("additional context");
        assert!(with_ctx.unwrap_err().to_string().contains("additional context"));

        let result: std::result::Result<(), ConfigError> = Err(ConfigError::NoConfigDir);
        let with_ctx = result.with_context("saving");
        assert!(matches!(with_ctx, Err(Error::WithContext { .. })));
    }
}
