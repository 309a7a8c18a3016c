//! Validation failures raised by domain value objects.

use thiserror::Error;

/// Rejections produced while building domain values or moving a session
/// through its lifecycle. The form never validates field content, so the
/// only failures are absent fields and disallowed transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field holds no usable value.
    #[error("required field '{field}' is missing")]
    EmptyField { field: String },

    /// A lifecycle transition the state machine forbids.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

impl ValidationError {
    /// Missing required field, named by its JSON key.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Disallowed state transition, both states rendered for the message.
    pub fn invalid_transition(from: impl Into<String>, to: impl Into<String>) -> Self {
        ValidationError::InvalidTransition {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_names_the_field() {
        let err = ValidationError::empty_field("phone");
        assert_eq!(err.to_string(), "required field 'phone' is missing");
    }

    #[test]
    fn invalid_transition_names_both_states() {
        let err = ValidationError::invalid_transition("Closed", "Collecting");
        assert_eq!(err.to_string(), "invalid transition from Closed to Collecting");
    }
}
