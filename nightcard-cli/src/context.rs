//! Wiring shared by the commands: settings, provider and session.

use anyhow::{Context, Result};
use nightcard_core::{ComfortProvider, ComfortRequest};
use nightcard_fetch::FetchContext;
use nightcard_providers::{ApiKeySource, GeminiComfortProvider, StaticComfortProvider};
use nightcard_store::{
    FileKeyValueStore, SessionManager, SessionStore, Settings, SettingsStore, default_data_dir,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::output::TextFormatter;
use crate::Cli;

/// Returns the directory holding the saved session.
pub fn data_dir(cli: &Cli) -> PathBuf {
    cli.data_dir.clone().unwrap_or_else(default_data_dir)
}

/// Returns true if colors should be used for text output.
pub fn use_colors(cli: &Cli, settings: &Settings) -> bool {
    use std::io::IsTerminal;

    !cli.no_color && settings.use_colors && std::io::stdout().is_terminal()
}

/// Builds a text formatter honoring the color settings.
pub fn text_formatter(cli: &Cli, settings: &Settings) -> TextFormatter {
    TextFormatter::new(use_colors(cli, settings))
}

/// Builds the request for a spent card.
pub fn comfort_request(emotion: Option<&str>, settings: &Settings) -> ComfortRequest {
    ComfortRequest::new(emotion.unwrap_or(&settings.default_emotion))
}

/// Builds the fetch context for talking to the generation service.
///
/// Requests are restricted to the host of the configured API base.
pub fn fetch_context(settings: &Settings) -> Result<FetchContext> {
    let base = url::Url::parse(&settings.api_base)
        .with_context(|| format!("invalid api_base '{}'", settings.api_base))?;
    let host = base
        .host_str()
        .with_context(|| format!("api_base '{}' has no host", settings.api_base))?;

    let ctx = FetchContext::builder()
        .timeout(settings.request_timeout())
        .allowed_domain(host)
        .build()?;
    Ok(ctx)
}

/// Builds the comfort provider the settings ask for.
pub fn provider(cli: &Cli, settings: &Settings) -> Result<Arc<dyn ComfortProvider>> {
    if cli.offline || settings.offline {
        debug!("Offline mode, using static messages");
        return Ok(Arc::new(StaticComfortProvider::offline()));
    }

    let ctx = fetch_context(settings)?;
    let mut credentials = ApiKeySource::new(ctx.keychain.clone());
    if let Some(var) = &settings.api_key_env {
        credentials = credentials.with_preferred_env(var.clone());
    }

    Ok(Arc::new(GeminiComfortProvider::with_credentials(
        settings.gemini_config(),
        &ctx,
        credentials,
    )))
}

/// Opens the saved session.
pub async fn open_session(cli: &Cli, settings: &SettingsStore) -> Result<Arc<SessionManager>> {
    let settings = settings.get().await;
    let provider = provider(cli, &settings)?;

    let dir = data_dir(cli);
    debug!(dir = %dir.display(), provider = provider.name(), "Opening session");
    let store = SessionStore::new(Arc::new(FileKeyValueStore::new(dir)));

    Ok(Arc::new(SessionManager::load(store, provider).await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use nightcard_core::DEFAULT_EMOTION;

    #[test]
    fn test_comfort_request_defaults() {
        let mut settings = Settings::default();
        assert_eq!(comfort_request(None, &settings).emotion, DEFAULT_EMOTION);
        assert_eq!(comfort_request(Some("委屈"), &settings).emotion, "委屈");

        settings.default_emotion = "难过".to_string();
        assert_eq!(comfort_request(None, &settings).emotion, "难过");
    }

    #[test]
    fn test_fetch_context_rejects_bad_base() {
        let mut settings = Settings::default();
        settings.api_base = "not a url".to_string();
        assert!(fetch_context(&settings).is_err());
    }

    #[test]
    fn test_offline_flag_picks_static_provider() {
        let cli = Cli::parse_from(["nightcard", "--offline"]);
        let provider = provider(&cli, &Settings::default()).unwrap();
        assert_eq!(provider.name(), "static");
    }

    #[test]
    fn test_data_dir_override() {
        let cli = Cli::parse_from(["nightcard", "--data-dir", "/tmp/cards"]);
        assert_eq!(data_dir(&cli), PathBuf::from("/tmp/cards"));
    }

    #[tokio::test]
    async fn test_open_session_offline() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from([
            "nightcard",
            "--offline",
            "--data-dir",
            dir.path().to_str().unwrap(),
        ]);
        let settings = SettingsStore::new(dir.path().join("settings.json"));

        let manager = open_session(&cli, &settings).await.unwrap();
        assert_eq!(manager.remaining_cards().await, 3);
        assert_eq!(manager.provider_name(), "static");
    }
}
