//! Committed transition records and the actions that observe them.

use super::state::State;
use super::trigger::Trigger;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Callback run with a committed transition: entry/exit actions, internal
/// transition handlers and completion observers all share this shape.
pub type Action<S, T> = Arc<dyn Fn(&Transition<S, T>) + Send + Sync>;

/// How a committed transition related its source to its destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Moved to a different state
    External,
    /// Left and re-entered the same state
    Reentry,
    /// Ran a handler without leaving the state
    Internal,
}

/// A transition the engine has committed.
///
/// Passed to entry/exit actions, internal handlers and completion observers,
/// and returned from [`StateMachine::fire`](crate::machine::StateMachine::fire).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Transition<S: State, T: Trigger> {
    pub source: S,
    pub destination: S,
    pub trigger: T,
    pub kind: TransitionKind,
}

impl<S: State, T: Trigger> Transition<S, T> {
    /// True when the destination equals the source, whether by reentry,
    /// an explicit self-target, or an internal transition.
    pub fn is_self_transition(&self) -> bool {
        self.source == self.destination
    }
}
