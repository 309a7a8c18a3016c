//! Validated transitions for lifecycle enums.

use super::ValidationError;

/// Contract for enums that behave as small state machines.
///
/// An implementor only declares which transitions exist; the validated
/// [`transition_to`](StateMachine::transition_to) and terminal-state checks
/// come with the trait. Callers are expected to change state exclusively
/// through `transition_to`, so an impossible move always surfaces as a
/// [`ValidationError`] instead of silently corrupting the lifecycle.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// True when moving from `self` to `target` is allowed.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Every state reachable from `self` in one step.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Validates and performs the move to `target`.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if !self.can_transition_to(&target) {
            return Err(ValidationError::invalid_transition(
                format!("{:?}", self),
                format!("{:?}", target),
            ));
        }
        Ok(target)
    }

    /// True when no transition leaves this state.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
