//! State transition history tracking.
//!
//! Provides immutable tracking of committed transitions over time.

use super::state::State;
use super::trigger::Trigger;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single committed transition.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State, T: Trigger> {
    /// The state the machine was in when the trigger fired
    pub from: S,
    /// The state the machine ended up in
    pub to: S,
    /// The trigger that caused the transition
    pub trigger: T,
    /// When the transition was committed
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of committed transitions.
///
/// `record` is the value-style API: it returns a new history and leaves the
/// original untouched. The engine appends in place instead, optionally
/// keeping only the most recent transitions.
///
/// # Example
///
/// ```rust
/// use machinist::core::{State, StateHistory, StateTransition, Trigger};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Lamp { Off, On }
///
/// impl State for Lamp {
///     fn name(&self) -> &str {
///         match self {
///             Self::Off => "Off",
///             Self::On => "On",
///         }
///     }
/// }
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Switch { Flip }
///
/// impl Trigger for Switch {
///     fn name(&self) -> &str { "Flip" }
/// }
///
/// let history = StateHistory::new().record(StateTransition {
///     from: Lamp::Off,
///     to: Lamp::On,
///     trigger: Switch::Flip,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.get_path(), vec![&Lamp::Off, &Lamp::On]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State, T: Trigger> {
    transitions: VecDeque<StateTransition<S, T>>,
}

impl<S: State, T: Trigger> Default for StateHistory<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, T: Trigger> StateHistory<S, T> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: VecDeque::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// The existing history is left untouched.
    pub fn record(&self, transition: StateTransition<S, T>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push_back(transition);
        Self { transitions }
    }

    /// Append in place, then drop the oldest entries beyond `limit`.
    pub(crate) fn push(&mut self, transition: StateTransition<S, T>, limit: Option<usize>) {
        self.transitions.push_back(transition);
        if let Some(limit) = limit {
            while self.transitions.len() > limit {
                self.transitions.pop_front();
            }
        }
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the first transition followed by the
    /// `to` state of each transition. Reentries show up as repeats.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Get the triggers fired, in order.
    pub fn triggers(&self) -> Vec<&T> {
        self.transitions.iter().map(|t| &t.trigger).collect()
    }

    /// Calculate total duration from first to last transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.front(), self.transitions.back()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Get all transitions in commit order.
    pub fn transitions(&self) -> impl ExactSizeIterator<Item = &StateTransition<S, T>> + '_ {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestState {
        Idle,
        Running,
        Paused,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Idle => "Idle",
                Self::Running => "Running",
                Self::Paused => "Paused",
            }
        }
    }

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestTrigger {
        Start,
        Pause,
    }

    impl Trigger for TestTrigger {
        fn name(&self) -> &str {
            match self {
                Self::Start => "Start",
                Self::Pause => "Pause",
            }
        }
    }

    fn step(
        from: TestState,
        to: TestState,
        trigger: TestTrigger,
    ) -> StateTransition<TestState, TestTrigger> {
        StateTransition {
            from,
            to,
            trigger,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<TestState, TestTrigger> = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let history = StateHistory::new();
        let new_history = history.record(step(
            TestState::Idle,
            TestState::Running,
            TestTrigger::Start,
        ));

        assert_eq!(history.len(), 0);
        assert_eq!(new_history.len(), 1);
    }

    #[test]
    fn get_path_returns_state_sequence() {
        let history = StateHistory::new()
            .record(step(TestState::Idle, TestState::Running, TestTrigger::Start))
            .record(step(TestState::Running, TestState::Paused, TestTrigger::Pause));

        assert_eq!(
            history.get_path(),
            vec![&TestState::Idle, &TestState::Running, &TestState::Paused]
        );
        assert_eq!(
            history.triggers(),
            vec![&TestTrigger::Start, &TestTrigger::Pause]
        );
    }

    #[test]
    fn single_transition_has_duration_zero() {
        let history =
            StateHistory::new().record(step(TestState::Idle, TestState::Running, TestTrigger::Start));
        assert_eq!(history.duration(), Some(Duration::from_secs(0)));
    }

    #[test]
    fn history_serializes_correctly() {
        let history =
            StateHistory::new().record(step(TestState::Idle, TestState::Running, TestTrigger::Start));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory<TestState, TestTrigger> =
            serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.len(), 1);
        assert_eq!(
            deserialized.transitions().next().map(|t| &t.trigger),
            Some(&TestTrigger::Start)
        );
    }

    #[test]
    fn push_appends_in_place() {
        let mut history = StateHistory::new();
        history.push(step(TestState::Idle, TestState::Running, TestTrigger::Start), None);
        history.push(step(TestState::Running, TestState::Paused, TestTrigger::Pause), None);
        assert_eq!(history.len(), 2);
        assert_eq!(history.triggers(), vec![&TestTrigger::Start, &TestTrigger::Pause]);
    }

    #[test]
    fn push_keeps_only_the_newest_within_limit() {
        let mut history = StateHistory::new();
        history.push(step(TestState::Idle, TestState::Running, TestTrigger::Start), Some(2));
        history.push(step(TestState::Running, TestState::Paused, TestTrigger::Pause), Some(2));
        history.push(step(TestState::Paused, TestState::Running, TestTrigger::Start), Some(2));

        assert_eq!(history.len(), 2);
        assert_eq!(
            history.get_path(),
            vec![&TestState::Running, &TestState::Paused, &TestState::Running]
        );
    }

    #[test]
    fn zero_limit_keeps_nothing() {
        let mut history = StateHistory::new();
        history.push(step(TestState::Idle, TestState::Running, TestTrigger::Start), Some(0));
        assert!(history.is_empty());
    }
}
