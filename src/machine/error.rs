//! Errors returned when firing a trigger.

use thiserror::Error;

/// Why a fire did not commit. The machine's state is unchanged in both cases.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FireError {
    /// Neither the current state nor any ancestor permits the trigger.
    #[error("Trigger '{trigger}' is not permitted from state '{state}'")]
    InvalidTransition { state: String, trigger: String },

    /// The trigger is permitted but every candidate's guard failed.
    #[error("Trigger '{trigger}' from state '{state}' was rejected by every guard")]
    GuardRejected { state: String, trigger: String },
}

impl FireError {
    pub fn is_guard_rejection(&self) -> bool {
        matches!(self, Self::GuardRejected { .. })
    }
}
