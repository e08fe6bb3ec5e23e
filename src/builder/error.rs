//! Configuration errors raised while building a state machine.

use thiserror::Error;

/// Malformed or ambiguous configuration. Raised only during setup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("State '{state}' is already declared")]
    DuplicateState { state: String },

    #[error("Making '{state}' a substate of '{parent}' would create a cycle")]
    HierarchyCycle { state: String, parent: String },

    #[error("State '{state}' is already a substate of '{existing}', cannot also be a substate of '{requested}'")]
    ParentConflict {
        state: String,
        existing: String,
        requested: String,
    },

    #[error("Trigger '{trigger}' is already permitted unconditionally from '{state}'")]
    AmbiguousDefault { state: String, trigger: String },
}
