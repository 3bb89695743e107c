//! Instruction template and sampling parameters.

use nightcard_core::ComfortRequest;
use serde::{Deserialize, Serialize};

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.8;

/// Default nucleus-sampling threshold.
pub const DEFAULT_TOP_P: f32 = 0.95;

/// Default upper bound on message length, in characters.
pub const DEFAULT_MAX_MESSAGE_CHARS: u32 = 50;

/// Parameters sent along with the instruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus-sampling threshold.
    pub top_p: f32,
    /// Length bound written into the instruction.
    pub max_message_chars: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
        }
    }
}

/// Builds the instruction for one spent card.
///
/// The card is named after the emotion ("允许生气隔夜存档卡" for anger). The
/// model is asked for one short, gentle sentence that affirms the feeling
/// and says it is archived, so the user can rest and deal with it tomorrow.
pub fn build_instruction(request: &ComfortRequest, max_message_chars: u32) -> String {
    format!(
        "用户正在使用一张“允许{emotion}隔夜存档卡”。\
         请提供一句简短、温柔且具有安抚力量的话语（{max_message_chars}字以内），\
         肯定他们此刻的情绪并告诉他们：既然已经存档，现在可以安心休息，明天再说。",
        emotion = request.emotion,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_instruction() {
        let text = build_instruction(&ComfortRequest::default(), DEFAULT_MAX_MESSAGE_CHARS);
        assert_eq!(
            text,
            "用户正在使用一张“允许生气隔夜存档卡”。请提供一句简短、温柔且具有安抚力量的话语（50字以内），\
             肯定他们此刻的情绪并告诉他们：既然已经存档，现在可以安心休息，明天再说。"
        );
    }

    #[test]
    fn test_instruction_uses_emotion_and_bound() {
        let text = build_instruction(&ComfortRequest::new("委屈"), 30);
        assert!(text.contains("允许委屈隔夜存档卡"));
        assert!(text.contains("30字以内"));
    }

    #[test]
    fn test_default_params() {
        let params = GenerationParams::default();
        assert!((params.temperature - 0.8).abs() < f32::EPSILON);
        assert!((params.top_p - 0.95).abs() < f32::EPSILON);
        assert_eq!(params.max_message_chars, 50);
    }
}
