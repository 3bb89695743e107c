//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use nightcard_store::{Settings, SettingsStore, default_config_dir};
use tracing::info;

use crate::context::data_dir;
use crate::output::JsonFormatter;
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration and data paths.
    Path,

    /// Change one setting.
    Set {
        /// Setting name (e.g. model, default_emotion, offline).
        key: String,
        /// New value.
        value: String,
    },

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli, settings: &SettingsStore) -> Result<ExitCode> {
    match &args.action {
        ConfigAction::Show => show_config(cli, settings).await?,
        ConfigAction::Path => show_paths(cli, settings)?,
        ConfigAction::Set { key, value } => set_value(key, value, cli, settings).await?,
        ConfigAction::Reset => reset_config(cli, settings).await?,
    }
    Ok(ExitCode::Success)
}

async fn show_config(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let settings = store.get().await;

    match cli.format {
        OutputFormat::Text => print!("{}", format_settings(&settings)),
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&settings)?);
        }
    }

    Ok(())
}

fn format_settings(settings: &Settings) -> String {
    let api_key_env = settings.api_key_env.as_deref().unwrap_or("-");
    let mut out = String::new();
    out.push_str("NightCard Configuration\n");
    out.push_str(&"─".repeat(40));
    out.push_str("\n\n");
    for (key, value) in [
        ("model", settings.model.clone()),
        ("temperature", settings.temperature.to_string()),
        ("top_p", settings.top_p.to_string()),
        ("max_message_chars", settings.max_message_chars.to_string()),
        ("default_emotion", settings.default_emotion.clone()),
        ("api_base", settings.api_base.clone()),
        ("request_timeout_secs", settings.request_timeout_secs.to_string()),
        ("share_url", settings.share_url.clone()),
        ("api_key_env", api_key_env.to_string()),
        ("log_level", settings.log_level.to_string()),
        ("use_colors", settings.use_colors.to_string()),
        ("offline", settings.offline.to_string()),
    ] {
        out.push_str(&format!("{key:<22}{value}\n"));
    }
    out
}

fn show_paths(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = store.path();
    let data_dir = data_dir(cli);

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_path.display());
            println!("Data dir:      {}", data_dir.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": settings_path.display().to_string(),
                "data_dir": data_dir.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn set_value(key: &str, value: &str, cli: &Cli, store: &SettingsStore) -> Result<()> {
    store.set_field(key, value).await?;
    store.save().await?;

    info!(key, value, "Setting updated");
    if !cli.quiet {
        println!("{key} set to: {value}");
    }

    Ok(())
}

async fn reset_config(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let path = store.path();

    if tokio::fs::try_exists(path).await? {
        tokio::fs::remove_file(path).await?;
        store.reset_to_defaults().await;
        info!(path = %path.display(), "Settings reset");
        if !cli.quiet {
            println!("Configuration reset to defaults");
        }
    } else if !cli.quiet {
        println!("No configuration file to reset");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_settings_lists_every_key() {
        let output = format_settings(&Settings::default());
        for key in Settings::KEYS {
            assert!(output.contains(key), "missing {key}");
        }
        assert!(output.contains("gemini-3-flash-preview"));
    }
}
