//
//  bitbucket-pullrequests
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Pull Requests Library
//!
//! A typed client for the pull request endpoints of the Bitbucket Cloud
//! REST API 2.0, plus the `bbpr` command-line tool built on top of it.
//!
//! ## Overview
//!
//! Every operation takes a [`PullRequestsOptions`](api::cloud::PullRequestsOptions)
//! value naming the repository (and pull request or comment where needed),
//! builds the endpoint URL and JSON body, and hands the request to an
//! [`Executor`](api::Executor). [`BitbucketClient`](api::BitbucketClient) is
//! the HTTP executor; tests substitute their own.
//!
//! ## Module Structure
//!
//! - [`api`]: Executor seam, HTTP client, pull request operations and models
//! - [`auth`]: App password and bearer token credentials
//! - [`config`]: Configuration file and environment overrides
//! - [`cli`]: Command-line interface definitions using clap
//! - [`output`]: Table and JSON output
//! - [`util`]: Utility functions
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bitbucket_pullrequests::api::cloud::PullRequestsOptions;
//! use bitbucket_pullrequests::api::BitbucketClient;
//! use bitbucket_pullrequests::Config;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let mut client = BitbucketClient::from_config(&config.api)?;
//! if let Some(credential) = config.credential() {
//!     client = client.with_auth(credential);
//! }
//!
//! let open = client
//!     .pull_requests()
//!     .list_with_query(&PullRequestsOptions::new("team", "app"), "state=\"OPEN\"")
//!     .await?;
//! for pr in open {
//!     println!("#{} {}", pr.id, pr.title);
//! }
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
pub mod cli;

/// API client for Bitbucket Cloud pull requests.
///
/// Holds the [`Executor`](api::Executor) seam, the reqwest-backed client,
/// the error-payload decoding shared by every response and the pull
/// request operations themselves.
pub mod api;

/// Authentication credentials.
pub mod auth;

/// Configuration file management.
///
/// Stored in platform-specific locations:
/// - Linux: `~/.config/bbpr/config.toml`
/// - macOS: `~/Library/Application Support/bbpr/config.toml`
/// - Windows: `%APPDATA%\bbpr\config.toml`
pub mod config;

/// Output formatting (tables and JSON).
pub mod output;

/// Utility functions and helpers.
pub mod util;

/// Re-export of the main CLI struct for convenient access.
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use bitbucket_pullrequests::Cli;
///
/// let cli = Cli::parse();
/// ```
pub use cli::Cli;

/// Re-export of the configuration struct.
pub use config::Config;

/// Application name, used for the binary and configuration paths.
pub const APP_NAME: &str = "bbpr";

/// Application version, from Cargo.toml.
///
/// # Example
///
/// ```rust
/// use bitbucket_pullrequests::VERSION;
///
/// println!("bbpr version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// # Example
///
/// ```rust,no_run
/// use bitbucket_pullrequests::exit_codes;
/// use std::process;
///
/// process::exit(exit_codes::AUTH_ERROR);
/// ```
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error. Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Invalid usage or arguments.
    pub const USAGE: i32 = 2;

    /// Bitbucket rejected the credentials (401 or 403).
    ///
    /// Set `auth.token`, or `auth.username` and `auth.app_password`.
    pub const AUTH_ERROR: i32 = 4;

    /// The repository, pull request or comment does not exist (404).
    pub const NOT_FOUND: i32 = 8;
}
