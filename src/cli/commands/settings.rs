//! Config file commands.

use std::path::Path;

use crate::config::{self, Config};
use crate::error::ResultExt;

use super::ConfigAction;

/// Show, locate or create the config file
pub fn cmd_config(
    config: &Config,
    override_path: Option<&Path>,
    action: &ConfigAction,
) -> anyhow::Result<()> {
    let path = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => config::config_path(),
    };

    match action {
        ConfigAction::Show => {
            let contents = toml::to_string_pretty(config)?;
            print!("{}", contents);
        }
        ConfigAction::Path => match &path {
            Some(path) => println!("{}", path.display()),
            None => println!("Could not determine config directory"),
        },
        ConfigAction::Init { force } => {
            let path = path.ok_or(config::ConfigError::NoConfigDir)?;
            if path.exists() && !force {
                println!("Config already exists at {:?} (use --force to overwrite)", path);
                return Ok(());
            }
            let written = match override_path {
                Some(_) => config::save_to(&Config::default(), &path).map(|_| path),
                None => config::save(&Config::default()),
            }
            .with_context("writing default config")?;
            println!("✓ Wrote default config to {:?}", written);
        }
    }
    Ok(())
}
