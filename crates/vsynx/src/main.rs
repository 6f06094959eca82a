//! vsynx CLI - sync, audit and search editor extensions
//!
//! This is the main entry point for the vsynx command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let session = commands::open_session(&cli).await?;

    match cli.command {
        Commands::Editors(args) => commands::editors::run(args, &session).await,
        Commands::List(args) => commands::list::run(args, &session).await,
        Commands::Audit(args) => commands::audit::run(args, &session).await,
        Commands::Validate(args) => commands::validate::run(args, &session).await,
        Commands::Search(args) => commands::search::run(args, &session).await,
        Commands::Sync(args) => commands::sync::run(args, &session).await,
        Commands::Install(args) => commands::install::install(args, &session).await,
        Commands::InstallSync(args) => commands::install::run(args, &session).await,
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
