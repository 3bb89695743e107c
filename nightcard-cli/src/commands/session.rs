//! Session command - interactive mode.
//!
//! Reads one key per line: `u` use, `h` history, `r` reset, `s` share,
//! `q` quit. Spends run as background tasks so the screen keeps updating
//! while a message is fetched; the view is redrawn on every state change.

use anyhow::{Result, bail};
use nightcard_core::{ComfortRequest, SessionState, UsageRecord};
use nightcard_store::{ResetApproval, ResetOutcome, SessionManager, SettingsStore, SpendOutcome};
use std::io::{Write, stdout};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{debug, info};

use super::share::render_qr;
use crate::context::{comfort_request, open_session, text_formatter};
use crate::output::{ButtonState, RESET_LABEL, RESET_PROMPT, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

const KEYS_HELP: &str = "[u] 点击使用  [h] 存档记录  [r] 重置系统  [s] 分享  [q] 退出";

/// What the screen currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Card,
    History,
    Share,
    ConfirmReset,
}

/// One parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Use,
    History,
    Reset,
    Share,
    Quit,
    Yes,
    Other,
}

impl Key {
    fn parse(line: &str) -> Self {
        match line.trim().to_lowercase().as_str() {
            "u" | "use" => Key::Use,
            "h" | "history" => Key::History,
            "r" | "reset" => Key::Reset,
            "s" | "share" => Key::Share,
            "q" | "quit" | "exit" => Key::Quit,
            "y" | "yes" => Key::Yes,
            _ => Key::Other,
        }
    }
}

struct Screen<'a> {
    formatter: &'a TextFormatter,
    share_url: &'a str,
    qr: &'a str,
}

impl Screen<'_> {
    fn render(
        &self,
        view: View,
        state: &SessionState,
        button: ButtonState,
        latest: Option<&UsageRecord>,
        notice: Option<&str>,
    ) -> String {
        let mut out = match view {
            View::Card | View::ConfirmReset => self.formatter.format_card(state, button),
            View::History => self
                .formatter
                .format_history(state, None)
                .unwrap_or_else(|| "还没有存档记录".to_string()),
            View::Share => self.formatter.format_share(self.share_url, self.qr),
        };

        if view == View::Card {
            if let Some(record) = latest {
                out.push_str("\n\n");
                out.push_str(&self.formatter.format_spent(record, state.remaining_cards()));
            }
        }

        if let Some(notice) = notice {
            out.push_str("\n\n");
            out.push_str(notice);
        }

        out.push_str("\n\n");
        if view == View::ConfirmReset {
            out.push_str(&format!("{RESET_LABEL}: {RESET_PROMPT} [y/N]"));
        } else {
            out.push_str(KEYS_HELP);
        }
        out
    }
}

/// Runs the session command.
pub async fn run(cli: &Cli, settings: &SettingsStore) -> Result<ExitCode> {
    if cli.format == OutputFormat::Json {
        bail!("session is interactive and only supports text output");
    }

    let manager = open_session(cli, settings).await?;
    let settings = settings.get().await;
    let formatter = text_formatter(cli, &settings);
    let qr = render_qr(&settings.share_url)?;
    let screen = Screen {
        formatter: &formatter,
        share_url: &settings.share_url,
        qr: &qr,
    };

    let mut changes = manager.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut spends: JoinSet<SpendOutcome> = JoinSet::new();

    let mut view = View::Card;
    let mut latest: Option<UsageRecord> = None;
    let mut notice: Option<String> = None;

    info!("Interactive session started");

    loop {
        let state = manager.snapshot().await;
        let button = if !spends.is_empty() || manager.is_in_flight() {
            ButtonState::Archiving
        } else {
            ButtonState::for_session(&state, false)
        };

        print!("\x1b[2J\x1b[H");
        println!(
            "{}",
            screen.render(view, &state, button, latest.as_ref(), notice.as_deref())
        );
        stdout().flush()?;

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Input closed");
                    break;
                };
                let key = Key::parse(&line);
                notice = None;

                if view == View::ConfirmReset {
                    let approval = ResetApproval::from(key == Key::Yes);
                    match manager.reset(approval).await {
                        ResetOutcome::Reset => latest = None,
                        ResetOutcome::Declined => {}
                        ResetOutcome::Busy => notice = Some(format!("{}，请稍后再试", ButtonState::Archiving.label())),
                    }
                    view = View::Card;
                    continue;
                }

                match key {
                    Key::Use => {
                        view = View::Card;
                        if state.is_exhausted() && spends.is_empty() {
                            notice = Some(ButtonState::Exhausted.label().to_string());
                            continue;
                        }
                        spawn_spend(&mut spends, &manager, comfort_request(None, &settings));
                    }
                    Key::History => view = View::History,
                    Key::Share => view = View::Share,
                    Key::Reset => view = View::ConfirmReset,
                    Key::Quit => break,
                    Key::Yes | Key::Other => view = View::Card,
                }
            }
            Some(joined) = spends.join_next(), if !spends.is_empty() => {
                match joined? {
                    SpendOutcome::Spent(record) => latest = Some(record),
                    SpendOutcome::Exhausted => notice = Some(ButtonState::Exhausted.label().to_string()),
                    SpendOutcome::Busy => debug!("Overlapping spend rejected"),
                }
            }
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    if !spends.is_empty() {
        println!("{}", ButtonState::Archiving.label());
    }
    for outcome in finish_spends(&mut spends).await? {
        if let SpendOutcome::Spent(record) = outcome {
            println!("{}", formatter.format_spent(&record, manager.remaining_cards().await));
        }
    }

    info!("Interactive session ended");
    Ok(ExitCode::Success)
}

/// Waits for every spend still running so its card is recorded and saved.
async fn finish_spends(spends: &mut JoinSet<SpendOutcome>) -> Result<Vec<SpendOutcome>> {
    let mut outcomes = Vec::with_capacity(spends.len());
    while let Some(joined) = spends.join_next().await {
        outcomes.push(joined?);
    }
    Ok(outcomes)
}

/// Starts a spend in the background.
fn spawn_spend(
    spends: &mut JoinSet<SpendOutcome>,
    manager: &Arc<SessionManager>,
    request: ComfortRequest,
) {
    let manager = Arc::clone(manager);
    spends.spawn(async move { manager.spend(&request).await });
}
