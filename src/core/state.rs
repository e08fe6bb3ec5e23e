//! Core State trait for state machine states.
//!
//! A state is a plain identity. Its place in the hierarchy and its outgoing
//! transitions live in the transition table, never in the state value itself.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// All methods are pure. States are small, totally ordered identities
/// (usually fieldless enums) that the engine clones freely.
///
/// # Required Traits
///
/// - `Clone`: the engine copies the current state into transition records
/// - `Eq` + `Hash`: states index the transition table
/// - `Debug`: diagnostics
/// - `Serialize` + `Deserialize`: configuration files and graph export
///
/// # Example
///
/// ```rust
/// use machinist::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Valve {
///     Closed,
///     Opening,
///     Open,
///     Jammed,
/// }
///
/// impl State for Valve {
///     fn name(&self) -> &str {
///         match self {
///             Self::Closed => "Closed",
///             Self::Opening => "Opening",
///             Self::Open => "Open",
///             Self::Jammed => "Jammed",
///         }
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Jammed)
///     }
/// }
///
/// assert_eq!(Valve::Opening.name(), "Opening");
/// assert!(Valve::Jammed.is_error());
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display, logging and graph export.
    fn name(&self) -> &str;

    /// Check if this state is declared final by its catalog.
    ///
    /// This is descriptive only. Whether a state is terminal at runtime is
    /// decided by its configured transitions.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}
