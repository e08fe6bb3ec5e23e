//! Guard predicates for controlling state transitions.
//!
//! A guard is a zero-argument predicate evaluated at fire time. It usually
//! holds a handle to externally owned state (a status register, a flag) and
//! reads it on every check, so the engine always sees the value current at
//! the moment of firing.

use std::fmt;
use std::sync::Arc;

/// Description used when a guard is created without one.
pub const DEFAULT_GUARD_DESCRIPTION: &str = "guarded";

/// Pure predicate that decides whether a candidate transition may be taken.
///
/// Guards must be fast and side-effect free: they run inside the fire path,
/// and for a [`SharedStateMachine`](crate::machine::SharedStateMachine) that
/// means under its lock.
///
/// # Example
///
/// ```rust
/// use machinist::core::Guard;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// let door_closed = Arc::new(AtomicBool::new(false));
/// let handle = Arc::clone(&door_closed);
/// let guard = Guard::described("door closed", move || handle.load(Ordering::SeqCst));
///
/// assert!(!guard.check());
/// door_closed.store(true, Ordering::SeqCst);
/// assert!(guard.check());
/// assert_eq!(guard.description(), "door closed");
/// ```
#[derive(Clone)]
pub struct Guard {
    predicate: Arc<dyn Fn() -> bool + Send + Sync>,
    description: String,
}

impl Guard {
    /// Create a guard from a predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self::described(DEFAULT_GUARD_DESCRIPTION, predicate)
    }

    /// Create a guard with a human readable description for graph labels.
    pub fn described<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
            description: description.into(),
        }
    }

    /// Evaluate the predicate against whatever it observes right now.
    pub fn check(&self) -> bool {
        (self.predicate)()
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl<F> From<F> for Guard
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    fn from(predicate: F) -> Self {
        Guard::new(predicate)
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
