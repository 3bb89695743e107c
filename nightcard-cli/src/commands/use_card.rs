//! Use command - spend a card and show its message.

use anyhow::Result;
use clap::Args;
use nightcard_store::{SettingsStore, SpendOutcome};
use std::io::{IsTerminal, Write, stderr};
use std::time::Duration;
use tracing::info;

use crate::context::{comfort_request, open_session, text_formatter};
use crate::output::{ButtonState, JsonFormatter, SpendOutput};
use crate::{Cli, ExitCode, OutputFormat};

const SPINNER: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Arguments for the use command.
#[derive(Args, Default)]
pub struct UseArgs {
    /// The feeling being archived.
    #[arg(long, short)]
    pub emotion: Option<String>,
}

/// Runs the use command.
pub async fn run(args: &UseArgs, cli: &Cli, settings: &SettingsStore) -> Result<ExitCode> {
    let manager = open_session(cli, settings).await?;
    let settings = settings.get().await;
    let request = comfort_request(args.emotion.as_deref(), &settings);

    info!(emotion = %request.emotion, "Using a card");

    let show_spinner = cli.format == OutputFormat::Text && !cli.quiet && stderr().is_terminal();
    let outcome = if show_spinner {
        let spend = manager.spend(&request);
        tokio::pin!(spend);
        let mut ticker = tokio::time::interval(Duration::from_millis(80));
        let mut frame = 0;
        let outcome = loop {
            tokio::select! {
                outcome = &mut spend => break outcome,
                _ = ticker.tick() => {
                    eprint!("\r{} {}", SPINNER[frame % SPINNER.len()], ButtonState::Archiving.label());
                    stderr().flush()?;
                    frame += 1;
                }
            }
        };
        eprint!("\r\x1b[2K");
        outcome
    } else {
        manager.spend(&request).await
    };

    let remaining = manager.remaining_cards().await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = text_formatter(cli, &settings);
            match &outcome {
                SpendOutcome::Spent(record) => println!("{}", formatter.format_spent(record, remaining)),
                SpendOutcome::Exhausted => println!("{}", formatter.format_exhausted()),
                SpendOutcome::Busy => println!("{}", ButtonState::Archiving.label()),
            }
        }
        OutputFormat::Json => {
            let output = SpendOutput::new(&outcome, remaining);
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    Ok(match outcome {
        SpendOutcome::Spent(_) => ExitCode::Success,
        SpendOutcome::Exhausted => ExitCode::Exhausted,
        SpendOutcome::Busy => ExitCode::Error,
    })
}
