//! Per-state configuration API.

use crate::builder::error::ConfigError;
use crate::builder::machine::StateMachineBuilder;
use crate::core::{Candidate, Guard, State, Target, Transition, Trigger};
use std::sync::Arc;

/// Fluent configurator for one state, returned by
/// [`StateMachineBuilder::configure`].
///
/// Candidates for the same trigger accumulate in call order; that order is the
/// priority at fire time. Configuring the same state again resumes adding to
/// its existing list.
///
/// Fallible methods also record their error on the builder, so a builder that
/// saw any bad declaration refuses to [`build`](StateMachineBuilder::build).
pub struct StateConfigurator<'b, S: State + 'static, T: Trigger + 'static> {
    builder: &'b mut StateMachineBuilder<S, T>,
    state: S,
}

impl<'b, S: State + 'static, T: Trigger + 'static> StateConfigurator<'b, S, T> {
    pub(crate) fn new(builder: &'b mut StateMachineBuilder<S, T>, state: S) -> Self {
        builder.table_mut().ensure(state.clone());
        Self { builder, state }
    }

    /// The state being configured.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Place this state under `parent`. The state inherits every trigger
    /// the parent (or any further ancestor) permits and it does not.
    pub fn substate_of(self, parent: S) -> Result<Self, ConfigError> {
        let result = self.builder.table_mut().set_parent(self.state.clone(), parent);
        self.finish(result)
    }

    /// Permit `trigger` to move unconditionally to `target`.
    pub fn permit(self, trigger: T, target: S) -> Result<Self, ConfigError> {
        self.push(trigger, Target::State(target), None)
    }

    /// Permit `trigger` to move to `target` when `guard` holds at fire time.
    pub fn permit_if(self, trigger: T, target: S, guard: impl Into<Guard>) -> Result<Self, ConfigError> {
        self.push(trigger, Target::State(target), Some(guard.into()))
    }

    /// Permit `trigger` to exit and re-enter the current state.
    pub fn permit_reentry(self, trigger: T) -> Result<Self, ConfigError> {
        self.push(trigger, Target::Reentry, None)
    }

    /// Permit reentry on `trigger` when `guard` holds at fire time.
    pub fn permit_reentry_if(self, trigger: T, guard: impl Into<Guard>) -> Result<Self, ConfigError> {
        self.push(trigger, Target::Reentry, Some(guard.into()))
    }

    /// Handle `trigger` without leaving the state: `handler` runs instead of
    /// exit and entry actions.
    pub fn internal_transition<F>(self, trigger: T, handler: F) -> Result<Self, ConfigError>
    where
        F: Fn(&Transition<S, T>) + Send + Sync + 'static,
    {
        self.push(trigger, Target::Internal(Arc::new(handler)), None)
    }

    /// Guarded form of [`internal_transition`](Self::internal_transition).
    pub fn internal_transition_if<F>(
        self,
        trigger: T,
        guard: impl Into<Guard>,
        handler: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&Transition<S, T>) + Send + Sync + 'static,
    {
        self.push(trigger, Target::Internal(Arc::new(handler)), Some(guard.into()))
    }

    /// Run `action` whenever this state is entered, including on reentry.
    pub fn on_entry<F>(self, action: F) -> Self
    where
        F: Fn(&Transition<S, T>) + Send + Sync + 'static,
    {
        self.builder
            .table_mut()
            .add_entry_action(self.state.clone(), Arc::new(action));
        self
    }

    /// Run `action` whenever this state is exited, including on reentry.
    pub fn on_exit<F>(self, action: F) -> Self
    where
        F: Fn(&Transition<S, T>) + Send + Sync + 'static,
    {
        self.builder
            .table_mut()
            .add_exit_action(self.state.clone(), Arc::new(action));
        self
    }

    fn push(self, trigger: T, target: Target<S, T>, guard: Option<Guard>) -> Result<Self, ConfigError> {
        tracing::trace!(
            state = self.state.name(),
            trigger = trigger.name(),
            destination = ?target,
            guarded = guard.is_some(),
            "permitted transition"
        );
        let candidate = Candidate {
            trigger,
            target,
            guard,
        };
        let result = self.builder.table_mut().add_candidate(self.state.clone(), candidate);
        self.finish(result)
    }

    fn finish(self, result: Result<(), ConfigError>) -> Result<Self, ConfigError> {
        match result {
            Ok(()) => Ok(self),
            Err(err) => {
                self.builder.poison(err.clone());
                Err(err)
            }
        }
    }
}
