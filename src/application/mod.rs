//! Application layer - the session service driving the intake form.
//!
//! This layer orchestrates domain operations and coordinates with the
//! language model port. The domain stays free of I/O; everything async
//! lives here or in the adapters.

mod session;

pub use session::{FormSession, TurnError, TurnReply};
