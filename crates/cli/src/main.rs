// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! till - store diagnostics CLI

mod color;
mod commands;
mod env;
mod exit_error;
mod logging;
mod output;
mod table;

use output::OutputFormat;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{schema, store};
use till_engine::{StoreConfig, StoreManager};

#[derive(Parser)]
#[command(
    name = "till",
    version,
    about = "Till - point-of-sale store versioning and diagnostics"
)]
struct Cli {
    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the store, upgrading and seeding it as needed
    Init,
    /// Initialize, then report version and table counts
    Health,
    /// Delete the store and recreate it empty
    Reset(store::ResetArgs),
    /// Show the tables and indexes of a schema version
    Schema(schema::SchemaArgs),
    /// List registered record migrations
    Migrations,
}

pub(crate) fn cli_command() -> clap::Command {
    use clap::CommandFactory;
    Cli::command()
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let code = e
            .downcast_ref::<exit_error::ExitError>()
            .map_or(1, |c| c.code);
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(code);
    }
}

/// Format an anyhow error, skipping causes already present in the top-level
/// message.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            cli_command().print_help()?;
            println!();
            return Ok(());
        }
    };

    // Registry queries don't touch the store
    match command {
        Commands::Schema(args) => return schema::schema(args, format),
        Commands::Migrations => return schema::migrations(format),
        Commands::Reset(ref args) if !args.yes => {
            return Err(exit_error::ExitError::new(
                1,
                "reset deletes every record; pass --yes to confirm",
            )
            .into());
        }
        _ => {}
    }

    let config = StoreConfig::load()?;
    let _guard = logging::setup_logging(&config)?;
    tracing::info!(state_dir = %config.state_dir.display(), "till starting");
    let manager = StoreManager::from_config(&config)?;

    match command {
        Commands::Init => store::init(&manager, &config, format).await,
        Commands::Health => store::health(&manager, format).await,
        Commands::Reset(_) => store::reset(&manager, &config, format).await,
        Commands::Schema(_) | Commands::Migrations => Ok(()),
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
