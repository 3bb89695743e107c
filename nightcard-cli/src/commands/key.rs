//! Key command - manage the API key in the system keychain.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use dialoguer::Password;
use nightcard_fetch::host::keychain::{accounts, services};
use nightcard_fetch::{KeychainApi, SystemKeychain};
use nightcard_providers::gemini::DEFAULT_API_KEY_ENV_VARS;
use nightcard_store::SettingsStore;
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the key command.
#[derive(Args)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub action: KeyAction,
}

/// Key subcommands.
#[derive(Subcommand)]
pub enum KeyAction {
    /// Store the API key. Prompts when no value is given.
    Set {
        /// The API key.
        #[arg(long)]
        value: Option<String>,
    },

    /// Remove the stored API key.
    Delete,

    /// Show where the API key would be taken from.
    Status,
}

/// Runs the key command.
pub async fn run(args: &KeyArgs, cli: &Cli, settings: &SettingsStore) -> Result<ExitCode> {
    let keychain = SystemKeychain::new();

    match &args.action {
        KeyAction::Set { value } => set_key(&keychain, value.clone(), cli).await?,
        KeyAction::Delete => delete_key(&keychain, cli).await?,
        KeyAction::Status => {
            let preferred = settings.get().await.api_key_env;
            show_status(&keychain, preferred.as_deref(), cli).await?;
        }
    }

    Ok(ExitCode::Success)
}

async fn set_key(keychain: &dyn KeychainApi, value: Option<String>, cli: &Cli) -> Result<()> {
    let key = match value {
        Some(value) => value,
        None => tokio::task::spawn_blocking(|| {
            Password::new().with_prompt("Gemini API key").interact()
        })
        .await?
        .context("failed to read API key")?,
    };

    let key = key.trim();
    if key.is_empty() {
        bail!("API key is empty");
    }

    keychain
        .set(services::GEMINI, accounts::API_KEY, key)
        .await
        .context("could not store API key in the system keychain")?;

    info!("API key stored");
    if !cli.quiet {
        println!("API key stored in the system keychain");
    }
    Ok(())
}

async fn delete_key(keychain: &dyn KeychainApi, cli: &Cli) -> Result<()> {
    keychain
        .delete(services::GEMINI, accounts::API_KEY)
        .await
        .context("could not remove API key from the system keychain")?;

    info!("API key removed");
    if !cli.quiet {
        println!("API key removed");
    }
    Ok(())
}

/// Names the first environment variable holding an API key.
///
/// `preferred` is checked before the defaults, the same order the provider uses.
fn env_source(preferred: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    preferred
        .into_iter()
        .chain(DEFAULT_API_KEY_ENV_VARS.iter().copied())
        .find(|var| lookup(var).is_some_and(|v| !v.trim().is_empty()))
        .map(ToString::to_string)
}

async fn show_status(keychain: &dyn KeychainApi, preferred: Option<&str>, cli: &Cli) -> Result<()> {
    let source = match env_source(preferred, |var| std::env::var(var).ok()) {
        Some(var) => Some(format!("env:{var}")),
        None if keychain.exists(services::GEMINI, accounts::API_KEY).await => {
            Some("keychain".to_string())
        }
        None => None,
    };

    match cli.format {
        OutputFormat::Text => match &source {
            Some(source) => println!("API key: configured ({source})"),
            None => println!("API key: not configured (offline messages will be used)"),
        },
        OutputFormat::Json => {
            let output = serde_json::json!({
                "configured": source.is_some(),
                "source": source,
            });
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }
    Ok(())
}
