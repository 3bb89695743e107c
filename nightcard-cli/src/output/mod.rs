//! Output formatting for CLI.

mod json;
mod text;

pub use json::{JsonFormatter, ResetOutput, SpendOutput};
pub use text::{ButtonState, RESET_LABEL, RESET_PROMPT, TextFormatter};
#[cfg(test)]
mod tests;
