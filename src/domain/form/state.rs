//! Form session state machine.
//!
//! Defines the lifecycle states of an order form conversation and valid
//! transitions between them.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// The lifecycle state of a form session.
///
/// Sessions move through these states from first utterance to closure:
/// - `Collecting`: gathering field values from the conversation
/// - `AwaitingConfirmation`: all fields present, user asked to confirm
/// - `Closed`: order submitted or cancelled, session is read-only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Extracting order fields from user messages.
    #[default]
    Collecting,

    /// Complete order proposed, awaiting a yes/no answer.
    AwaitingConfirmation,

    /// Submitted or cancelled; no further turns are processed.
    Closed,
}

impl SessionState {
    /// Returns true if the session still processes user messages.
    pub fn accepts_input(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Returns true if this is a terminal state.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl StateMachine for SessionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionState::*;
        matches!(
            (self, target),
            // All fields collected, confirmation enabled
            (Collecting, AwaitingConfirmation) |
            // Exit intent, or submit with confirmation disabled
            (Collecting, Closed) |
            // User declined the proposed order, resume collection
            (AwaitingConfirmation, Collecting) |
            // Confirmed submission or exit intent
            (AwaitingConfirmation, Closed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionState::*;
        match self {
            Collecting => vec![AwaitingConfirmation, Closed],
            AwaitingConfirmation => vec![Collecting, Closed],
            Closed => vec![],
        }
    }
}
