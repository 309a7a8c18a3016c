//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `LanguageModel` - Port for text completions from an LLM backend

mod language_model;

pub use language_model::{LanguageModel, ModelError, ModelInfo};
