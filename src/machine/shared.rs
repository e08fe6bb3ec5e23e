//! A state machine shared between threads.

use crate::core::{State, Transition, Trigger};
use crate::graph::StateGraph;
use crate::machine::engine::StateMachine;
use crate::machine::error::FireError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable handle to one [`StateMachine`] behind a single mutex.
///
/// The whole resolve, guard, commit and notify sequence of a fire runs under
/// the lock, so concurrent callers observe fires one at a time. Observers and
/// actions run under the lock too and must not fire through this handle.
pub struct SharedStateMachine<S: State + 'static, T: Trigger + 'static> {
    inner: Arc<Mutex<StateMachine<S, T>>>,
}

impl<S: State + 'static, T: Trigger + 'static> Clone for SharedStateMachine<S, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: State + 'static, T: Trigger + 'static> SharedStateMachine<S, T> {
    pub fn new(machine: StateMachine<S, T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(machine)),
        }
    }

    pub fn fire(&self, trigger: T) -> Result<Transition<S, T>, FireError> {
        self.lock().fire(trigger)
    }

    /// Snapshot of the current state.
    pub fn current_state(&self) -> S {
        self.lock().current_state().clone()
    }

    pub fn can_fire(&self, trigger: &T) -> bool {
        self.lock().can_fire(trigger)
    }

    pub fn graph(&self) -> StateGraph {
        self.lock().graph()
    }

    /// Run `f` with exclusive access to the machine.
    pub fn with<R>(&self, f: impl FnOnce(&mut StateMachine<S, T>) -> R) -> R {
        f(&mut self.lock())
    }

    // A fire stores its new state only after every callback has returned,
    // so a callback that panicked mid-fire left the machine unchanged.
    fn lock(&self) -> MutexGuard<'_, StateMachine<S, T>> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("recovering state machine after a callback panicked");
            PoisonError::into_inner(poisoned)
        })
    }
}

impl<S: State + 'static, T: Trigger + 'static> From<StateMachine<S, T>> for SharedStateMachine<S, T> {
    fn from(machine: StateMachine<S, T>) -> Self {
        Self::new(machine)
    }
}
