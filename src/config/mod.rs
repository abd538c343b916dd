//
//  bitbucket-pullrequests
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loading, saving and accessing `bbpr` settings stored as TOML in the
//! platform configuration directory.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/bbpr/config.toml`
//! - **macOS**: `~/Library/Application Support/bbpr/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\bbpr\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! [api]
//! base_url = "https://api.bitbucket.org/2.0"
//! timeout_secs = 30
//!
//! [auth]
//! username = "jane"
//! app_password = "app-password"
//!
//! [defaults]
//! owner = "my-team"
//! repo = "my-repo"
//! ```
//!
//! ## Environment Overrides
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `BITBUCKET_API_URL` | `api.base_url` |
//! | `BITBUCKET_USERNAME` | `auth.username` |
//! | `BITBUCKET_APP_PASSWORD` | `auth.app_password` |
//! | `BITBUCKET_TOKEN` | `auth.token` |
//!
//! ## Submodules
//!
//! - [`file`]: Low-level configuration file I/O operations
//! - [`endpoint`]: Base URL normalization

mod endpoint;
mod file;

pub use endpoint::*;
pub use file::*;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::auth::AuthCredential;

/// Environment variable overriding `api.base_url`.
pub const ENV_API_URL: &str = "BITBUCKET_API_URL";
/// Environment variable overriding `auth.username`.
pub const ENV_USERNAME: &str = "BITBUCKET_USERNAME";
/// Environment variable overriding `auth.app_password`.
pub const ENV_APP_PASSWORD: &str = "BITBUCKET_APP_PASSWORD";
/// Environment variable overriding `auth.token`.
pub const ENV_TOKEN: &str = "BITBUCKET_TOKEN";

/// Keys accepted by [`Config::get`] and [`Config::set`].
pub const CONFIG_KEYS: &[&str] = &[
    "api.base_url",
    "api.timeout_secs",
    "auth.username",
    "auth.app_password",
    "auth.token",
    "defaults.owner",
    "defaults.repo",
];

/// Global configuration container.
///
/// # Examples
///
/// ```rust
/// use bitbucket_pullrequests::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.api.base_url, "https://api.bitbucket.org/2.0");
/// assert!(config.credential().is_none());
/// ```
///
/// # Notes
///
/// - All sections use `#[serde(default)]` so partial files load cleanly
/// - The file is created on first save
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// HTTP settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Credentials.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Default owner and repository for commands.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// HTTP settings for the API client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// API root. Defaults to `https://api.bitbucket.org/2.0`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds. No timeout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

/// Credentials. A token takes precedence over an app password.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AuthConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Fallback owner and repository slug.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
}

impl Config {
    /// Loads the configuration from the default location, then applies
    /// environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads the configuration from `path` (defaults if it does not exist),
    /// then applies environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = match read_config_file(path)? {
            Some(content) => Self::from_toml_str(&content)
                .with_context(|| format!("Invalid configuration in {}", path.display()))?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from TOML text without touching the environment.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        write_config_file(path, &content)
    }

    /// Path of the configuration file for this platform.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Applies overrides from a variable lookup. Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(username) = get(ENV_USERNAME) {
            self.auth.username = Some(username);
        }
        if let Some(password) = get(ENV_APP_PASSWORD) {
            self.auth.app_password = Some(password);
        }
        if let Some(token) = get(ENV_TOKEN) {
            self.auth.token = Some(token);
        }
    }

    /// Normalizes the base URL, failing if it is unusable.
    pub fn validate(&self) -> Result<()> {
        normalize_base_url(&self.api.base_url)?;
        if self.api.timeout_secs == Some(0) {
            bail!("api.timeout_secs must be greater than zero");
        }
        Ok(())
    }

    /// Builds the credential to send with requests, if any is configured.
    pub fn credential(&self) -> Option<AuthCredential> {
        if let Some(token) = &self.auth.token {
            return Some(AuthCredential::bearer(token.clone()));
        }

        match (&self.auth.username, &self.auth.app_password) {
            (Some(username), Some(password)) => {
                Some(AuthCredential::app_password(username.clone(), password.clone()))
            }
            _ => None,
        }
    }

    /// Reads a setting by dotted key. Secrets are never returned in clear.
    pub fn get(&self, key: &str) -> Option<String> {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "********".to_string());

        match key {
            "api.base_url" => Some(self.api.base_url.clone()),
            "api.timeout_secs" => self.api.timeout_secs.map(|t| t.to_string()),
            "auth.username" => self.auth.username.clone(),
            "auth.app_password" => redact(&self.auth.app_password),
            "auth.token" => redact(&self.auth.token),
            "defaults.owner" => self.defaults.owner.clone(),
            "defaults.repo" => self.defaults.repo.clone(),
            _ => None,
        }
    }

    /// Updates a setting by dotted key.
    ///
    /// # Errors
    ///
    /// Fails for unknown keys and for values that do not parse.
    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        match key {
            "api.base_url" => self.api.base_url = normalize_base_url(&value)?,
            "api.timeout_secs" => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("'{value}' is not a number of seconds"))?;
                self.api.timeout_secs = Some(secs);
            }
            "auth.username" => self.auth.username = Some(value),
            "auth.app_password" => self.auth.app_password = Some(value),
            "auth.token" => self.auth.token = Some(value),
            "defaults.owner" => self.defaults.owner = Some(value),
            "defaults.repo" => self.defaults.repo = Some(value),
            _ => bail!(
                "Unknown configuration key '{}'. Valid keys: {}",
                key,
                CONFIG_KEYS.join(", ")
            ),
        }
        self.validate()
    }
}
