//! Language model adapters.
//!
//! Implementations of the `LanguageModel` port:
//! - `OpenAIModel` - OpenAI-compatible chat completions over SSE
//! - `MockLanguageModel` - scripted replies for tests

mod mock_model;
mod openai_model;

pub use mock_model::MockLanguageModel;
pub use openai_model::{OpenAIConfig, OpenAIModel};
