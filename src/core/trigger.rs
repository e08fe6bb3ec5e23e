//! Trigger trait for external stimuli.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// A named external stimulus that may cause a transition.
///
/// Triggers carry no payload. The same trigger value may be configured on
/// many states; the engine matches on equality.
pub trait Trigger:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the trigger's name for display, logging and edge labels.
    fn name(&self) -> &str;
}
