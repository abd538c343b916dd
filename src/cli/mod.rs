//
//  bitbucket-pullrequests
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod config;
mod pr;

pub use config::ConfigCommand;
pub use pr::PrCommand;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Work with Bitbucket Cloud pull requests from the command line
#[derive(Parser, Debug)]
#[command(
    name = "bbpr",
    version,
    about = "Work with Bitbucket Cloud pull requests from the command line",
    propagate_version = true,
    after_help = "Use 'bbpr <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Options shared by every command
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Workspace or user owning the repository
    #[arg(long, short = 'o', global = true, env = "BBPR_OWNER")]
    pub owner: Option<String>,

    /// Repository slug
    #[arg(long, short = 'R', global = true, env = "BBPR_REPO")]
    pub repo: Option<String>,

    /// Output JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to an alternative configuration file
    #[arg(long, global = true, env = "BBPR_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Pr(PrCommand),

    /// Show or change configuration
    Config(ConfigCommand),

    /// Print version information
    Version,
}
