//! Core state machine types.
//!
//! This module contains the building blocks the engine is made of:
//! - State and trigger identities via the `State` and `Trigger` traits
//! - Guard predicates evaluated at fire time
//! - The transition table: hierarchy plus ordered candidates
//! - Committed transition records and their immutable history

mod guard;
mod history;
mod state;
mod table;
mod transition;
mod trigger;

pub use guard::{Guard, DEFAULT_GUARD_DESCRIPTION};
pub use history::{StateHistory, StateTransition};
pub use state::State;
pub use table::{Candidate, Target, TransitionTable};
pub use transition::{Action, Transition, TransitionKind};
pub use trigger::Trigger;
