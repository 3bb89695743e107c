//! Reset command - get all cards back and clear the history.

use anyhow::Result;
use clap::Args;
use dialoguer::{Confirm, theme::ColorfulTheme};
use nightcard_store::{ResetApproval, ResetOutcome, SettingsStore};
use tracing::debug;

use crate::context::open_session;
use crate::output::{JsonFormatter, RESET_PROMPT, ResetOutput};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the reset command.
#[derive(Args, Default)]
pub struct ResetArgs {
    /// Skip the confirmation question.
    #[arg(long, short)]
    pub yes: bool,
}

/// Asks the reset question on the terminal.
///
/// Anything other than an explicit yes, including a closed terminal, declines.
pub fn confirm_reset() -> ResetApproval {
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(RESET_PROMPT)
        .default(false)
        .interact()
        .unwrap_or_else(|e| {
            debug!(error = %e, "Confirmation unavailable, treating as declined");
            false
        });
    ResetApproval::from(confirmed)
}

/// Runs the reset command.
pub async fn run(args: &ResetArgs, cli: &Cli, settings: &SettingsStore) -> Result<ExitCode> {
    let manager = open_session(cli, settings).await?;

    let approval = if args.yes {
        ResetApproval::Confirmed
    } else {
        tokio::task::spawn_blocking(confirm_reset).await?
    };

    let outcome = manager.reset(approval).await;
    let remaining = manager.remaining_cards().await;

    match cli.format {
        OutputFormat::Text => {
            if !cli.quiet {
                match outcome {
                    ResetOutcome::Reset => println!("已重新获得 {remaining} 张存档卡"),
                    ResetOutcome::Declined => println!("已取消"),
                    ResetOutcome::Busy => println!("存档中...，请稍后再试"),
                }
            }
        }
        OutputFormat::Json => {
            let output = ResetOutput::new(outcome, remaining);
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    Ok(ExitCode::Success)
}
