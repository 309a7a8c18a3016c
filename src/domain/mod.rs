//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `form` - The order form engine (schema, order data, session state,
//!   transcript, prompts, response parsing, receipt rendering)

pub mod form;
pub mod foundation;
