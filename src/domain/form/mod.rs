//! Order form domain module.
//!
//! Holds everything the form knows without a model: the target schema, the
//! partially-filled order, the session state machine, the rolling transcript,
//! the prompt templates, the best-effort response parsers, and the receipt.

mod order;
mod schema;
mod state;
mod transcript;

pub mod parse;
pub mod prompts;
pub mod receipt;
pub mod replies;

pub use order::{CompletedOrder, OrderData};
pub use schema::{FieldDescriptor, FieldName, FormSchema};
pub use state::SessionState;
pub use transcript::{Speaker, Transcript, Turn};
