//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::{ButtonState, CONTRACT, TITLE, TextFormatter};
    use nightcard_core::{SessionState, UsageRecord};

    fn spent_session(messages: &[&str]) -> SessionState {
        let mut state = SessionState::default();
        for message in messages {
            state.apply_spend(UsageRecord::new(*message));
        }
        state
    }

    #[test]
    fn test_fresh_card() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_card(&SessionState::default(), ButtonState::Ready);

        assert!(output.starts_with(TITLE));
        assert!(output.contains("Overnight Permission"));
        assert!(output.contains("*3  ●●●"));
        assert!(output.contains(CONTRACT));
        assert!(output.contains("[ 点击使用 ]"));
        assert!(!output.contains("存档记录"));
        assert!(!output.contains("已本地存档"));
    }

    #[test]
    fn test_card_with_history() {
        let formatter = TextFormatter::new(false);
        let state = spent_session(&["第一", "第二"]);
        let output = formatter.format_card(&state, ButtonState::Ready);

        assert!(output.contains("*1  ●○○"));
        assert!(output.contains("存档记录"));
        assert!(output.contains("已本地存档"));
    }

    #[test]
    fn test_exhausted_card() {
        let formatter = TextFormatter::new(false);
        let state = spent_session(&["a", "b", "c"]);
        let output = formatter.format_card(&state, ButtonState::for_session(&state, false));

        assert!(output.contains("*0  ○○○"));
        assert!(output.contains("[ 存档卡已耗尽 ]"));
    }

    #[test]
    fn test_archiving_label() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_card(&SessionState::default(), ButtonState::Archiving);
        assert!(output.contains("[ 存档中... ]"));
    }

    #[test]
    fn test_history_newest_first() {
        let formatter = TextFormatter::new(false);
        let state = spent_session(&["第一", "第二", "第三"]);
        let output = formatter.format_history(&state, None).unwrap();

        let third = output.find("第三").unwrap();
        let first = output.find("第一").unwrap();
        assert!(third < first);
    }

    #[test]
    fn test_history_limit() {
        let formatter = TextFormatter::new(false);
        let state = spent_session(&["第一", "第二", "第三"]);
        let output = formatter.format_history(&state, Some(1)).unwrap();

        assert!(output.contains("第三"));
        assert!(!output.contains("第二"));
    }

    #[test]
    fn test_empty_history() {
        let formatter = TextFormatter::new(false);
        assert!(formatter.format_history(&SessionState::default(), None).is_none());
    }

    #[test]
    fn test_share_panel() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_share("https://example.com/", "██\n██\n");

        assert!(output.starts_with("分享这张卡片"));
        assert!(output.contains("扫一扫，把“隔夜存档卡”带在身边"));
        assert!(output.contains("https://example.com/"));
        assert!(output.contains("[ 知道了 ]"));
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::{JsonFormatter, ResetOutput, SpendOutput};
    use nightcard_core::{SessionState, UsageRecord};
    use nightcard_store::{ResetOutcome, SpendOutcome};

    #[test]
    fn test_session_layout() {
        let mut state = SessionState::default();
        state.apply_spend(UsageRecord::new("晚安"));

        let json = JsonFormatter::new(false).format(&state).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["remainingCards"], 2);
        assert_eq!(value["history"][0]["comfortMessage"], "晚安");
        assert!(value["history"][0]["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_spend_output() {
        let outcome = SpendOutcome::Spent(UsageRecord::new("晚安"));
        let json = JsonFormatter::new(false)
            .format(&SpendOutput::new(&outcome, 2))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["outcome"], "spent");
        assert_eq!(value["remainingCards"], 2);
        assert_eq!(value["record"]["comfortMessage"], "晚安");
    }

    #[test]
    fn test_exhausted_output_has_no_record() {
        let json = JsonFormatter::new(false)
            .format(&SpendOutput::new(&SpendOutcome::Exhausted, 0))
            .unwrap();
        assert_eq!(json, r#"{"outcome":"exhausted","remainingCards":0}"#);
    }

    #[test]
    fn test_reset_output() {
        let json = JsonFormatter::new(false)
            .format(&ResetOutput::new(ResetOutcome::Declined, 1))
            .unwrap();
        assert_eq!(json, r#"{"outcome":"declined","remainingCards":1}"#);
    }

    #[test]
    fn test_pretty_output() {
        let json = JsonFormatter::new(true)
            .format(&ResetOutput::new(ResetOutcome::Reset, 3))
            .unwrap();
        assert!(json.contains('\n'));
    }
}
