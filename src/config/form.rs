//! Form behavior flags.

use serde::Deserialize;

/// Flags controlling how the intake form behaves.
#[derive(Debug, Clone, Deserialize)]
pub struct FormConfig {
    /// Ask the user to confirm the order before submitting it.
    #[serde(default = "default_ask_confirm")]
    pub ask_confirm: bool,

    /// Reject values that fail per-field validation. Reserved; no field
    /// validation exists yet, so the flag is read but never acted on.
    #[serde(default)]
    pub strict: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            ask_confirm: default_ask_confirm(),
            strict: false,
        }
    }
}

fn default_ask_confirm() -> bool {
    true
}
