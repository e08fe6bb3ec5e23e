//! The running state machine.
//!
//! # Key Concepts
//!
//! - **Fire**: resolve a trigger against the current state and its
//!   ancestors, pick the first passing candidate, commit, notify
//! - **Atomicity**: a fire either commits completely and notifies exactly
//!   once, or fails and changes nothing
//! - **Sharing**: [`SharedStateMachine`] puts one lock around the whole fire

mod engine;
mod error;
mod shared;

pub use engine::StateMachine;
pub use error::FireError;
pub use shared::SharedStateMachine;
