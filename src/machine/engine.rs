//! The hierarchical state machine: fire-time resolution and commit.

use crate::core::{
    Action, State, StateHistory, StateTransition, Target, Transition, TransitionKind,
    TransitionTable, Trigger,
};
use crate::graph::StateGraph;
use crate::machine::error::FireError;
use chrono::Utc;

/// A configured state machine.
///
/// Owns exactly one current state, set at construction and changed only by
/// a committed [`fire`](Self::fire). Build one with
/// [`StateMachineBuilder`](crate::builder::StateMachineBuilder).
pub struct StateMachine<S: State + 'static, T: Trigger + 'static> {
    initial: S,
    current: S,
    table: TransitionTable<S, T>,
    observers: Vec<Action<S, T>>,
    history: StateHistory<S, T>,
    history_limit: Option<usize>,
}

impl<S: State + 'static, T: Trigger + 'static> StateMachine<S, T> {
    pub(crate) fn new(
        initial: S,
        table: TransitionTable<S, T>,
        observers: Vec<Action<S, T>>,
        history_limit: Option<usize>,
    ) -> Self {
        Self {
            current: initial.clone(),
            initial,
            table,
            observers,
            history: StateHistory::new(),
            history_limit,
        }
    }

    /// Get current state (pure)
    pub fn current_state(&self) -> &S {
        &self.current
    }

    /// The state the machine was constructed in.
    pub fn initial_state(&self) -> &S {
        &self.initial
    }

    /// Get transition history (pure)
    pub fn history(&self) -> &StateHistory<S, T> {
        &self.history
    }

    pub fn table(&self) -> &TransitionTable<S, T> {
        &self.table
    }

    /// True if the current state is `state` or one of its substates.
    pub fn is_in_state(&self, state: &S) -> bool {
        self.current == *state || self.table.is_substate_of(&self.current, state)
    }

    /// True iff `ancestor` is `state`'s parent, grandparent, and so on.
    pub fn is_substate_of(&self, state: &S, ancestor: &S) -> bool {
        self.table.is_substate_of(state, ancestor)
    }

    /// A state is terminal when neither it nor any ancestor configures a
    /// single candidate.
    pub fn is_terminal(&self, state: &S) -> bool {
        std::iter::successors(Some(state), |s| self.table.parent_of(s))
            .take(self.table.len().max(1))
            .all(|s| self.table.candidates_of(s).is_empty())
    }

    /// Check if the current state is terminal (pure)
    pub fn is_final(&self) -> bool {
        self.is_terminal(&self.current)
    }

    /// Whether firing `trigger` right now would commit.
    ///
    /// Evaluates guards but changes nothing.
    pub fn can_fire(&self, trigger: &T) -> bool {
        self.select(trigger).is_ok()
    }

    /// Triggers that would commit from the current state right now, in the
    /// order they were first configured along the state's lineage.
    pub fn permitted_triggers(&self) -> Vec<T> {
        let mut triggers: Vec<T> = Vec::new();
        let lineage = std::iter::successors(Some(&self.current), |s| self.table.parent_of(s))
            .take(self.table.len().max(1));
        for owner in lineage {
            for candidate in self.table.candidates_of(owner) {
                if !triggers.contains(&candidate.trigger) {
                    triggers.push(candidate.trigger.clone());
                }
            }
        }
        triggers.retain(|t| self.can_fire(t));
        triggers
    }

    /// Fire `trigger` from the current state.
    ///
    /// Resolution walks from the current state up through its ancestors to
    /// the first one that configures `trigger`, then tries that state's
    /// candidates in declaration order. The first whose guard is absent or
    /// passes wins. On success, exit actions run, then entry actions, then
    /// each completion observer once. On failure nothing runs and the state
    /// is unchanged.
    ///
    /// Callbacks only see the [`Transition`], never the machine, so the new
    /// state and its history entry are stored after every callback has
    /// returned. A panicking callback therefore leaves the machine exactly
    /// as it was before the fire.
    pub fn fire(&mut self, trigger: T) -> Result<Transition<S, T>, FireError> {
        let span = tracing::debug_span!(
            "fire",
            state = self.current.name(),
            trigger = trigger.name()
        );
        let _entered = span.enter();

        let target = match self.select(&trigger) {
            Ok(target) => target,
            Err(err) => {
                tracing::warn!(error = %err, "trigger rejected");
                return Err(err);
            }
        };

        let source = self.current.clone();
        let (destination, kind) = match &target {
            Target::State(destination) if *destination == source => {
                (destination.clone(), TransitionKind::Reentry)
            }
            Target::State(destination) => (destination.clone(), TransitionKind::External),
            // Reentry targets the literal current state, never the ancestor
            // that owned the candidate.
            Target::Reentry => (source.clone(), TransitionKind::Reentry),
            Target::Internal(_) => (source.clone(), TransitionKind::Internal),
        };
        let transition = Transition {
            source,
            destination,
            trigger,
            kind,
        };

        match &target {
            Target::Internal(handler) => handler(&transition),
            _ => self.run_actions(&transition),
        }

        for observer in &self.observers {
            observer(&transition);
        }

        self.current = transition.destination.clone();
        self.history.push(
            StateTransition {
                from: transition.source.clone(),
                to: transition.destination.clone(),
                trigger: transition.trigger.clone(),
                timestamp: Utc::now(),
            },
            self.history_limit,
        );

        tracing::debug!(
            source = transition.source.name(),
            destination = transition.destination.name(),
            kind = ?transition.kind,
            "transition committed"
        );
        Ok(transition)
    }

    /// Export the configured graph, marking the initial state.
    pub fn graph(&self) -> StateGraph {
        StateGraph::from_table(&self.table, &self.initial)
    }

    fn select(&self, trigger: &T) -> Result<Target<S, T>, FireError> {
        let (_, candidates) =
            self.table
                .resolve(&self.current, trigger)
                .ok_or_else(|| FireError::InvalidTransition {
                    state: self.current.name().to_string(),
                    trigger: trigger.name().to_string(),
                })?;

        candidates
            .into_iter()
            .find(|c| c.accepts())
            .map(|c| c.target.clone())
            .ok_or_else(|| FireError::GuardRejected {
                state: self.current.name().to_string(),
                trigger: trigger.name().to_string(),
            })
    }

    fn run_actions(&self, transition: &Transition<S, T>) {
        let indices = (
            self.table.index_of(&transition.source),
            self.table.index_of(&transition.destination),
        );
        let (Some(source), Some(destination)) = indices else {
            return;
        };

        for idx in self.table.exit_path(source, destination) {
            for action in &self.table.node(idx).exit_actions {
                action(transition);
            }
        }

        for idx in self.table.entry_path(source, destination) {
            for action in &self.table.node(idx).entry_actions {
                action(transition);
            }
        }
    }
}
