//! Environment-driven configuration.
//!
//! Settings come from the process environment (after an optional `.env`
//! file), under the `PIZZA_INTAKE` prefix with `__` separating nested
//! values: `PIZZA_INTAKE__AI__OPENAI_API_KEY` lands in
//! `ai.openai_api_key`, `PIZZA_INTAKE__FORM__ASK_CONFIRM` in
//! `form.ask_confirm`. Everything except the API key has a default.
//!
//! ```no_run
//! use pizza_intake::config::AppConfig;
//!
//! let config = AppConfig::load().expect("configuration readable");
//! config.validate().expect("configuration valid");
//! println!("using model {}", config.ai.model);
//! ```

mod ai;
mod error;
mod form;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use form::FormConfig;

use serde::Deserialize;

/// All settings the crate reads, grouped by concern.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Model backend settings.
    #[serde(default)]
    pub ai: AiConfig,

    /// Form behavior flags.
    #[serde(default)]
    pub form: FormConfig,
}

impl AppConfig {
    /// Reads configuration from `.env` (if present) and the environment.
    ///
    /// Loading is lenient: absent values fall back to their defaults and
    /// only unparseable values fail. Call [`validate`](Self::validate)
    /// afterwards to catch semantically unusable settings.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PIZZA_INTAKE")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        Ok(())
    }
}
