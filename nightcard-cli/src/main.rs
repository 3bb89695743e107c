// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `NightCard` CLI - overnight permission cards from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Show the card and its history
//! nightcard
//!
//! # Spend a card
//! nightcard use
//!
//! # Spend a card for a different feeling
//! nightcard use --emotion 委屈
//!
//! # JSON output
//! nightcard --format json --pretty
//!
//! # Start over
//! nightcard reset
//!
//! # Interactive mode
//! nightcard session
//! ```

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use nightcard_store::{LogLevel, SettingsStore};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{card, config, history, key, reset, session, share, use_card};

// ============================================================================
// CLI Definition
// ============================================================================

/// `NightCard` CLI - overnight permission cards.
#[derive(Parser)]
#[command(name = "nightcard")]
#[command(about = "Overnight permission cards from the terminal")]
#[command(long_about = r#"
NightCard gives you three "overnight permission" cards (允许生气隔夜存档卡).
Spend one when a feeling will not settle tonight: it is archived, you get a
short gentle message, and you can deal with it tomorrow.

Examples:
  nightcard                      # Show the card
  nightcard use                  # Spend a card
  nightcard history              # Past uses, newest first
  nightcard reset                # Get 3 cards back and clear history
  nightcard share                # QR code for the web version
  nightcard session              # Interactive mode
"#)]
#[command(version)]
#[command(author = "NightCard Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, shows the card.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Directory holding the saved session.
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Settings file to use.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Never call the generation service.
    #[arg(long, global = true)]
    pub offline: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the card (default if no command specified).
    #[command(visible_alias = "c")]
    Card,

    /// Spend a card and receive a message.
    #[command(visible_alias = "u")]
    Use(use_card::UseArgs),

    /// Show past uses, newest first.
    #[command(visible_alias = "h")]
    History(history::HistoryArgs),

    /// Get 3 cards back and clear the history.
    Reset(reset::ResetArgs),

    /// Show a QR code for sharing.
    #[command(visible_alias = "s")]
    Share,

    /// Interactive mode.
    Session,

    /// Manage configuration.
    Config(config::ConfigArgs),

    /// Manage the API key in the system keychain.
    Key(key::KeyArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// No cards left.
    Exhausted = 2,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, level: LogLevel) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if let Ok(filter) = EnvFilter::try_from_env("NIGHTCARD_LOG") {
        filter
    } else if verbose {
        EnvFilter::new("nightcard=debug,info")
    } else {
        EnvFilter::new(format!("nightcard={level}"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => SettingsStore::load(path.clone()).await,
        None => SettingsStore::load_default().await,
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e}");
            }
            std::process::exit(ExitCode::Error as i32);
        }
    };

    setup_logging(cli.verbose, cli.quiet, settings.log_level().await);
    if let (Some(warning), false) = (settings.load_warning(), cli.quiet) {
        eprintln!("Warning: {warning}, using defaults");
    }

    let result = match &cli.command {
        Some(Commands::Card) | None => card::run(&cli, &settings).await,
        Some(Commands::Use(args)) => use_card::run(args, &cli, &settings).await,
        Some(Commands::History(args)) => history::run(args, &cli, &settings).await,
        Some(Commands::Reset(args)) => reset::run(args, &cli, &settings).await,
        Some(Commands::Share) => share::run(&cli, &settings).await,
        Some(Commands::Session) => session::run(&cli, &settings).await,
        Some(Commands::Config(args)) => config::run(args, &cli, &settings).await,
        Some(Commands::Key(args)) => key::run(args, &cli, &settings).await,
    };

    match result {
        Ok(ExitCode::Success) => Ok(()),
        Ok(code) => std::process::exit(code as i32),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e:#}");
            }
            std::process::exit(ExitCode::Error as i32);
        }
    }
}
