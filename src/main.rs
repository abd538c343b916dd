//
//  bitbucket-pullrequests
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bitbucket_pullrequests::api::ApiError;
use bitbucket_pullrequests::cli::{Cli, Commands};
use bitbucket_pullrequests::exit_codes;

#[tokio::main]
async fn main() {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too and go to stdout.
            let code = if e.use_stderr() {
                exit_codes::USAGE
            } else {
                exit_codes::SUCCESS
            };
            if let Err(write_err) = e.print() {
                tracing::debug!(error = %write_err, "failed to print usage message");
            }
            std::process::exit(code);
        }
    };

    match run(cli).await {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_code_for(&e));
        }
    }
}

/// Initialize logging based on environment
fn init_logging() {
    let filter = EnvFilter::try_from_env("BBPR_DEBUG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<ApiError>() {
        Some(api) if api.is_auth_error() => exit_codes::AUTH_ERROR,
        Some(api) if api.is_not_found() => exit_codes::NOT_FOUND,
        _ => exit_codes::ERROR,
    }
}

/// Main command dispatcher
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Pr(cmd) => cmd.run(&cli.global).await,
        Commands::Config(cmd) => cmd.run(&cli.global).await,
        Commands::Version => {
            println!("bbpr version {}", bitbucket_pullrequests::VERSION);
            Ok(())
        }
    }
}
