//! Machinist: a hierarchical state machine engine
//!
//! States form a forest: a substate inherits every trigger its ancestors
//! permit and it does not. Each state holds an ordered list of candidate
//! transitions per trigger, optionally guarded. Firing a trigger picks the
//! first candidate whose guard passes, commits it, and notifies completion
//! observers exactly once.
//!
//! # Core Concepts
//!
//! - **State / Trigger**: closed catalogs, usually declared with
//!   [`state_enum!`] and [`trigger_enum!`]
//! - **Guards**: zero-argument predicates evaluated at fire time
//! - **Reentry**: exit and re-enter the literal current state
//! - **Graph export**: deterministic DOT and JSON renderings of the table
//!
//! # Example
//!
//! ```rust
//! use machinist::equipment::{Equipment, MachineState, MachineTrigger};
//! use machinist::equipment::error_code::EC_SYSTEM_INIT_FAIL;
//!
//! let mut equipment = Equipment::new()?;
//! equipment.fire(MachineTrigger::OpenServer)?;
//! equipment.fire(MachineTrigger::Connect)?;
//! equipment.complete(MachineTrigger::Init, EC_SYSTEM_INIT_FAIL, "axis fault")?;
//!
//! assert_eq!(equipment.current_state(), MachineState::InitializeFailed);
//! assert!(equipment
//!     .state_machine()
//!     .is_substate_of(&MachineState::InitializeFailed, &MachineState::Abort));
//! # Ok::<(), machinist::Error>(())
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod equipment;
pub mod error;
pub mod graph;
pub mod machine;

// Re-export commonly used types
pub use builder::{ConfigError, StateMachineBuilder};
pub use config::Config;
pub use crate::core::{Guard, State, StateHistory, StateTransition, Transition, TransitionKind, Trigger};
pub use error::{Error, Result};
pub use graph::StateGraph;
pub use machine::{FireError, SharedStateMachine, StateMachine};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging. `RUST_LOG` overrides `level` when set.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_logging(level: &str) -> bool {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
    {
        tracing::debug!(error = %err, "logging already initialized");
        return false;
    }
    true
}
