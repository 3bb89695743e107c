//! Text output formatting with pips and colors.

use chrono::{DateTime, Local, TimeZone, Utc};
use nightcard_core::{MAX_CARDS, SessionState, UsageRecord};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

// Pip characters
const PIP_FULL: char = '●';
const PIP_EMPTY: char = '○';

/// Card title.
pub const TITLE: &str = "允许生气隔夜存档卡";

/// Small label under the title.
pub const SUBTITLE: &str = "Overnight Permission";

/// Contract text printed on the card.
pub const CONTRACT: &str =
    "当你此刻无法平复，不必强求和解。这份契约允许你将情绪封存，交给明日处理。";

/// History section heading.
pub const HISTORY_HEADING: &str = "存档记录";

/// Shown under the history list.
pub const SAVED_LOCALLY: &str = "已本地存档";

/// Share panel heading.
pub const SHARE_HEADING: &str = "分享这张卡片";

/// Share panel hint.
pub const SHARE_HINT: &str = "扫一扫，把“隔夜存档卡”带在身边";

/// Share panel dismiss label.
pub const SHARE_DISMISS: &str = "知道了";

/// Reset confirmation question.
pub const RESET_PROMPT: &str = "确定要重新获得 3 张存档卡并清空记录吗？";

/// Reset action label.
pub const RESET_LABEL: &str = "重置系统";

const RULE_WIDTH: usize = 36;

/// What the use button currently offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    /// A card can be used.
    Ready,
    /// A message is being fetched.
    Archiving,
    /// No cards left.
    Exhausted,
}

impl ButtonState {
    /// Derives the button state from the session.
    pub fn for_session(state: &SessionState, in_flight: bool) -> Self {
        if in_flight {
            ButtonState::Archiving
        } else if state.is_exhausted() {
            ButtonState::Exhausted
        } else {
            ButtonState::Ready
        }
    }

    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            ButtonState::Ready => "点击使用",
            ButtonState::Archiving => "存档中...",
            ButtonState::Exhausted => "存档卡已耗尽",
        }
    }
}

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats the card followed by the history list.
    pub fn format_card(&self, state: &SessionState, button: ButtonState) -> String {
        let mut lines = vec![
            self.bold(&self.red(TITLE)),
            self.dim(SUBTITLE),
            String::new(),
            format!(
                "{}  {}",
                self.yellow(&format!("*{}", state.remaining_cards())),
                self.pips(state.remaining_cards())
            ),
            String::new(),
            CONTRACT.to_string(),
            String::new(),
            self.button(button),
        ];

        if let Some(history) = self.format_history(state, None) {
            lines.push(String::new());
            lines.push(history);
        }

        lines.join("\n")
    }

    /// Formats the remaining-card pips, filled for each card left.
    pub fn pips(&self, remaining: u32) -> String {
        let filled = remaining.min(MAX_CARDS) as usize;
        let empty = MAX_CARDS as usize - filled;
        let pips = format!(
            "{}{}",
            PIP_FULL.to_string().repeat(filled),
            PIP_EMPTY.to_string().repeat(empty)
        );
        self.yellow(&pips)
    }

    fn button(&self, button: ButtonState) -> String {
        let label = format!("[ {} ]", button.label());
        match button {
            ButtonState::Ready => self.bold(&label),
            ButtonState::Archiving => self.cyan(&label),
            ButtonState::Exhausted => self.dim(&label),
        }
    }

    /// Formats the history list, newest first.
    ///
    /// Returns `None` when there is nothing to show.
    pub fn format_history(&self, state: &SessionState, limit: Option<usize>) -> Option<String> {
        if state.history().is_empty() {
            return None;
        }

        let mut lines = vec![self.bold(HISTORY_HEADING), self.dim(&"─".repeat(RULE_WIDTH))];
        for record in state
            .history_newest_first()
            .take(limit.unwrap_or(usize::MAX))
        {
            lines.push(self.format_record(record));
        }
        lines.push(self.green(&format!("✓ {SAVED_LOCALLY}")));

        Some(lines.join("\n"))
    }

    /// Formats one history entry.
    pub fn format_record(&self, record: &UsageRecord) -> String {
        self.format_record_in(record, &Local)
    }

    fn format_record_in<Tz>(&self, record: &UsageRecord, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        format!(
            "{}\n  “{}”",
            self.dim(&format_timestamp_in(record.timestamp, tz)),
            record.message()
        )
    }

    /// Formats the message of a freshly spent card.
    pub fn format_spent(&self, record: &UsageRecord, remaining: u32) -> String {
        [
            format!("“{}”", self.bold(record.message())),
            String::new(),
            format!("{}  {}", self.yellow(&format!("*{remaining}")), self.pips(remaining)),
        ]
        .join("\n")
    }

    /// Formats the notice shown when a card was requested but none are left.
    pub fn format_exhausted(&self) -> String {
        self.dim(&format!("[ {} ]", ButtonState::Exhausted.label()))
    }

    /// Formats the share panel around a rendered QR code.
    pub fn format_share(&self, url: &str, qr: &str) -> String {
        [
            self.bold(SHARE_HEADING),
            String::new(),
            qr.trim_end().to_string(),
            String::new(),
            SHARE_HINT.to_string(),
            self.cyan(url),
            String::new(),
            self.dim(&format!("[ {SHARE_DISMISS} ]")),
        ]
        .join("\n")
    }

    // ========================================================================
    // Color Helpers
    // ========================================================================

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

/// Formats a timestamp the way a zh-CN locale shows it, in `tz`.
pub fn format_timestamp_in<Tz>(timestamp: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    timestamp
        .with_timezone(tz)
        .format("%Y年%-m月%-d日 %H:%M")
        .to_string()
}

// ============================================================================
// Tests
// ============================================================================
