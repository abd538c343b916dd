//
//  bitbucket-pullrequests
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI configuration commands
//!
//! `get`, `set` and `list` work on the configuration file itself. Environment
//! overrides apply only when commands talk to Bitbucket.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use console::style;

use crate::config::{read_config_file, Config, CONFIG_KEYS};

use super::GlobalOptions;

/// Manage CLI configuration
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get a configuration value
    Get(GetArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// List all configuration values
    #[command(visible_alias = "ls")]
    List,

    /// Show configuration file path
    Path,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration key, e.g. defaults.owner
    pub key: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration key, e.g. defaults.owner
    pub key: String,

    /// Configuration value
    pub value: String,
}

/// Path given with `--config`, or the platform default.
pub(super) fn config_path(global: &GlobalOptions) -> Result<PathBuf> {
    match &global.config {
        Some(path) => Ok(path.clone()),
        None => Config::config_path(),
    }
}

/// Configuration with environment overrides applied, for talking to the API.
pub(super) fn load_config(global: &GlobalOptions) -> Result<Config> {
    Config::load_from(&config_path(global)?)
}

/// Configuration exactly as stored on disk.
fn load_file(path: &std::path::Path) -> Result<Config> {
    match read_config_file(path)? {
        Some(content) => Config::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display())),
        None => Ok(Config::default()),
    }
}

impl ConfigCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let path = config_path(global)?;

        match &self.command {
            ConfigSubcommand::Get(args) => self.get(&path, args, global),
            ConfigSubcommand::Set(args) => self.set(&path, args, global),
            ConfigSubcommand::List => self.list(&path, global),
            ConfigSubcommand::Path => {
                println!("{}", path.display());
                Ok(())
            }
        }
    }

    fn get(&self, path: &std::path::Path, args: &GetArgs, global: &GlobalOptions) -> Result<()> {
        if !CONFIG_KEYS.contains(&args.key.as_str()) {
            anyhow::bail!(
                "Unknown configuration key '{}'. Valid keys: {}",
                args.key,
                CONFIG_KEYS.join(", ")
            );
        }

        let value = load_file(path)?.get(&args.key);

        if global.json {
            let result = serde_json::json!({
                "key": args.key,
                "value": value,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else if let Some(v) = value {
            println!("{}", v);
        }

        Ok(())
    }

    fn set(&self, path: &std::path::Path, args: &SetArgs, global: &GlobalOptions) -> Result<()> {
        let mut config = load_file(path)?;
        config.set(&args.key, args.value.clone())?;
        config.save_to(path)?;

        // Show the stored form so secrets stay redacted.
        let shown = config.get(&args.key).unwrap_or_default();

        if global.json {
            let result = serde_json::json!({
                "success": true,
                "key": args.key,
                "value": shown,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!(
                "{} Set {} = {}",
                style("✓").green(),
                style(&args.key).cyan(),
                shown
            );
        }

        Ok(())
    }

    fn list(&self, path: &std::path::Path, global: &GlobalOptions) -> Result<()> {
        let config = load_file(path)?;

        if global.json {
            let entries: serde_json::Map<String, serde_json::Value> = CONFIG_KEYS
                .iter()
                .map(|key| (key.to_string(), config.get(key).into()))
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        println!();
        println!("{}", style(format!("Configuration ({})", path.display())).bold());
        println!("{}", "-".repeat(50));
        for key in CONFIG_KEYS {
            match config.get(key) {
                Some(value) => println!("  {}: {}", style(key).cyan(), value),
                None => println!("  {}: {}", style(key).cyan(), style("(not set)").dim()),
            }
        }
        println!();

        Ok(())
    }
}
