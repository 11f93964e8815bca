//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\lyrics-minder\config.toml
//! - macOS: ~/Library/Application Support/lyrics-minder/config.toml
//! - Linux: ~/.config/lyrics-minder/config.toml
//!
//! The resolver never mutates configuration; it receives a
//! [`ResolverConfig`] snapshot built from this file at request time.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::lyrics::lrclib::DEFAULT_BASE_URL;
use crate::lyrics::{DEFAULT_BUDGET, LyricsVariant, MAX_BUDGET, ResolverConfig, TextFilters};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Lookup behaviour
    pub lyrics: LyricsConfig,

    /// Patterns stripped from track metadata before lookup
    pub filters: TextFilters,
}

/// Lookup settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    /// Search when the exact lookup finds nothing
    pub fallback_enabled: bool,

    /// "synced" or "plain"
    pub preferred_variant: LyricsVariant,

    /// Total time budget per resolution, in seconds
    pub timeout_secs: u64,

    /// LRCLIB API root (change for self-hosted instances)
    pub base_url: String,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            fallback_enabled: true,
            preferred_variant: LyricsVariant::Synced,
            timeout_secs: DEFAULT_BUDGET.as_secs(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Snapshot of the settings a resolution reads
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            fallback_enabled: self.lyrics.fallback_enabled,
            filters: self.filters.clone(),
            preferred_variant: self.lyrics.preferred_variant,
        }
    }

    /// Resolution budget; zero falls back to the default, huge values are clamped
    pub fn budget(&self) -> Duration {
        match self.lyrics.timeout_secs {
            0 => DEFAULT_BUDGET,
            secs => Duration::from_secs(secs).min(MAX_BUDGET),
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lyrics-minder"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Using default configuration");
            Config::default()
        }
    }
}

/// Load configuration from an explicit path, failing on any problem
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let config =
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
    tracing::info!("Loaded config from {:?}", path);
    Ok(config)
}

/// Save configuration to the default location
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)?;
    Ok(path)
}

/// Save configuration to an explicit path
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    // Serialize to pretty TOML
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[lyrics]"));
        assert!(toml.contains("[filters]"));
        assert!(toml.contains("preferred_variant = \"synced\""));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.lyrics.fallback_enabled = false;
        config.lyrics.preferred_variant = LyricsVariant::Plain;
        config.filters.title.push("(official video)".to_string());

        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        // Config with only some fields
        let toml = r#"
[lyrics]
preferred_variant = "plain"

[filters]
artist = ["VEVO"]
"#;
        let config: Config = toml::from_str(toml).unwrap();

        // Specified fields are set
        assert_eq!(config.lyrics.preferred_variant, LyricsVariant::Plain);
        assert_eq!(config.filters.artist, vec!["VEVO".to_string()]);

        // Other fields use defaults
        assert!(config.lyrics.fallback_enabled);
        assert_eq!(config.lyrics.timeout_secs, 10);
        assert_eq!(config.lyrics.base_url, "https://lrclib.net/api");
        assert!(config.filters.title.is_empty());
    }

    #[test]
    fn test_resolver_config_snapshot() {
        let mut config = Config::default();
        config.lyrics.fallback_enabled = false;
        config.filters.album.push("deluxe".to_string());

        let resolver = config.resolver_config();
        assert!(!resolver.fallback_enabled);
        assert_eq!(resolver.filters.album, vec!["deluxe".to_string()]);
        assert_eq!(resolver.preferred_variant, LyricsVariant::Synced);
    }

    #[test]
    fn test_budget_zero_uses_default() {
        let mut config = Config::default();
        config.lyrics.timeout_secs = 0;
        assert_eq!(config.budget(), DEFAULT_BUDGET);
        config.lyrics.timeout_secs = 5;
        assert_eq!(config.budget(), Duration::from_secs(5));
    }

    #[test]
    fn test_huge_timeout_is_clamped() {
        let toml = "[lyrics]\ntimeout_secs = 9223372036854775807\n";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.budget(), MAX_BUDGET);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.lyrics.timeout_secs = 7;
        save_to(&config, &path).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("toml.tmp").exists());
        assert_eq!(load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_from_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(load_from(&missing), Err(ConfigError::Read(..))));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[lyrics\nfallback_enabled = ").unwrap();
        assert!(matches!(load_from(&broken), Err(ConfigError::Parse(..))));
    }
}
