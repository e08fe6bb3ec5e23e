//! Builder for constructing state machines.

use crate::builder::audit::{audit_table, ConfigIssue};
use crate::builder::error::ConfigError;
use crate::builder::state::StateConfigurator;
use crate::core::{Action, State, TransitionTable, Transition, Trigger};
use crate::machine::StateMachine;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for constructing state machines.
///
/// The initial state is fixed at construction. States are declared with
/// [`declare_state`](Self::declare_state) or implicitly by
/// [`configure`](Self::configure) and by naming them as a transition target.
/// The first configuration error poisons the builder: [`build`](Self::build)
/// then returns that error instead of a machine.
pub struct StateMachineBuilder<S: State + 'static, T: Trigger + 'static> {
    initial: S,
    table: TransitionTable<S, T>,
    observers: Vec<Action<S, T>>,
    history_limit: Option<usize>,
    error: Option<ConfigError>,
}

impl<S: State + 'static, T: Trigger + 'static> StateMachineBuilder<S, T> {
    /// Create a builder whose machine will start in `initial`.
    pub fn new(initial: S) -> Self {
        Self {
            initial,
            table: TransitionTable::new(),
            observers: Vec::new(),
            history_limit: None,
            error: None,
        }
    }

    pub fn initial(&self) -> &S {
        &self.initial
    }

    /// Register a new state, optionally as a substate of `parent`.
    ///
    /// Fails if the state is already declared or would be its own ancestor.
    pub fn declare_state(&mut self, state: S, parent: Option<S>) -> Result<(), ConfigError> {
        let result = self.table.declare(state, parent);
        if let Err(err) = &result {
            self.poison(err.clone());
        }
        result
    }

    /// Start (or resume) configuring `state`.
    pub fn configure(&mut self, state: S) -> StateConfigurator<'_, S, T> {
        StateConfigurator::new(self, state)
    }

    /// Register a completion observer, called once after every committed
    /// transition with the full transition record.
    ///
    /// Observers must not fire the machine themselves.
    pub fn on_transition_completed<F>(&mut self, observer: F) -> &mut Self
    where
        F: Fn(&Transition<S, T>) + Send + Sync + 'static,
    {
        self.observers.push(Arc::new(observer));
        self
    }

    /// Keep only the `limit` most recent transitions in the machine's
    /// history. Unbounded by default.
    pub fn history_limit(&mut self, limit: usize) -> &mut Self {
        self.history_limit = Some(limit);
        self
    }

    /// True iff `ancestor` is `state`'s parent, grandparent, and so on.
    pub fn is_substate_of(&self, state: &S, ancestor: &S) -> bool {
        self.table.is_substate_of(state, ancestor)
    }

    pub fn table(&self) -> &TransitionTable<S, T> {
        &self.table
    }

    /// Collect every structural issue in the configuration so far.
    ///
    /// Issues are advisory: an unreachable state or a shadowed candidate is
    /// legal, but usually a mistake.
    pub fn audit(&self) -> Validation<(), NonEmptyVec<ConfigIssue>> {
        audit_table(&self.table, &self.initial)
    }

    /// Build the state machine.
    ///
    /// Returns the first configuration error recorded, if any.
    pub fn build(mut self) -> Result<StateMachine<S, T>, ConfigError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        self.table.ensure(self.initial.clone());
        tracing::debug!(
            initial = self.initial.name(),
            states = self.table.len(),
            "state machine configured"
        );
        Ok(StateMachine::new(
            self.initial,
            self.table,
            self.observers,
            self.history_limit,
        ))
    }

    pub(crate) fn table_mut(&mut self) -> &mut TransitionTable<S, T> {
        &mut self.table
    }

    pub(crate) fn poison(&mut self, err: ConfigError) {
        tracing::warn!(error = %err, "rejected state machine configuration");
        self.error.get_or_insert(err);
    }
}
