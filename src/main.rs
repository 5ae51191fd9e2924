//! tandem binary entry point

mod cli;

use clap::{Parser, Subcommand};
use cli::style::Stylize;
use std::path::PathBuf;
use std::process::ExitCode;
use tandem::release::LibraryKind;
use tracing_subscriber::EnvFilter;

/// Coordinated release automation for version-linked library pairs
#[derive(Parser)]
#[command(name = "tandem", version, long_about = None)]
struct Cli {
    /// Path to the repository (defaults to the current directory)
    #[arg(long, global = true, default_value = ".")]
    path: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Prepare the coordinated release branch: cherry-pick unreleased
    /// changes, bump versions, cut changelogs, commit per library
    Prepare {
        /// Target core library version (e.g. 4.2.0)
        version: String,
        /// Show what would be cherry-picked without making changes
        #[arg(long)]
        dry_run: bool,
    },
    /// Render release notes for one library without touching the tree
    Changelog {
        /// Target core library version
        version: String,
        /// Which library to render notes for
        #[arg(long, value_enum, default_value = "core")]
        library: LibraryKind,
    },
    /// Create the remote release records for both libraries
    Publish {
        /// Target core library version
        version: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Prepare { version, dry_run } => {
            cli::run_prepare(&cli.path, cli::PrepareOptions { version, dry_run }).await
        }
        Command::Changelog { version, library } => {
            cli::run_changelog(&cli.path, &version, library).await
        }
        Command::Publish { version, yes } => {
            cli::run_publish(&cli.path, cli::PublishOptions { version, yes }).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            anstream::eprintln!("{} {error}", "error:".warn());
            ExitCode::FAILURE
        }
    }
}
