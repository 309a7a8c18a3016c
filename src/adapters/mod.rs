//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Language model backends (OpenAI, mock)

pub mod ai;

pub use ai::{MockLanguageModel, OpenAIConfig, OpenAIModel};
