//! Card command - show the card and its history.

use anyhow::Result;
use nightcard_store::SettingsStore;

use crate::context::{open_session, text_formatter};
use crate::output::{ButtonState, JsonFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Runs the card command.
pub async fn run(cli: &Cli, settings: &SettingsStore) -> Result<ExitCode> {
    let manager = open_session(cli, settings).await?;
    let state = manager.snapshot().await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = text_formatter(cli, &settings.get().await);
            let button = ButtonState::for_session(&state, manager.is_in_flight());
            println!("{}", formatter.format_card(&state, button));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&state)?);
        }
    }

    Ok(ExitCode::Success)
}
