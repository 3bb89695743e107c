//! History command - list past uses, newest first.

use anyhow::Result;
use clap::Args;
use nightcard_core::UsageRecord;
use nightcard_store::SettingsStore;

use crate::context::{open_session, text_formatter};
use crate::output::JsonFormatter;
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the history command.
#[derive(Args, Default)]
pub struct HistoryArgs {
    /// Show at most this many entries.
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

/// Runs the history command.
pub async fn run(args: &HistoryArgs, cli: &Cli, settings: &SettingsStore) -> Result<ExitCode> {
    let manager = open_session(cli, settings).await?;
    let state = manager.snapshot().await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = text_formatter(cli, &settings.get().await);
            match formatter.format_history(&state, args.limit) {
                Some(history) => println!("{history}"),
                None if !cli.quiet => println!("还没有存档记录"),
                None => {}
            }
        }
        OutputFormat::Json => {
            let records: Vec<&UsageRecord> = state
                .history_newest_first()
                .take(args.limit.unwrap_or(usize::MAX))
                .collect();
            println!("{}", JsonFormatter::new(cli.pretty).format(&records)?);
        }
    }

    Ok(ExitCode::Success)
}
