//! The configured transition table.
//!
//! States live in a parent-pointer forest stored in declaration order. Each
//! node keeps its outgoing candidates in the order they were permitted, which
//! is also the order they are tried at fire time.

use super::guard::Guard;
use super::state::State;
use super::transition::Action;
use super::trigger::Trigger;
use crate::builder::error::ConfigError;
use std::collections::HashMap;
use std::fmt;

/// Where a candidate leads when it wins.
#[derive(Clone)]
pub enum Target<S: State, T: Trigger> {
    /// Move to the named state
    State(S),
    /// Stay in the state the machine was in when the trigger fired,
    /// running its exit and entry actions
    Reentry,
    /// Stay put and run the handler; no exit or entry actions run
    Internal(Action<S, T>),
}

impl<S: State, T: Trigger> fmt::Debug for Target<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::State(state) => f.debug_tuple("State").field(state).finish(),
            Self::Reentry => f.write_str("Reentry"),
            Self::Internal(_) => f.write_str("Internal"),
        }
    }
}

/// One configured (trigger, optional guard, target) tuple attached to a source state.
#[derive(Clone, Debug)]
pub struct Candidate<S: State, T: Trigger> {
    pub trigger: T,
    pub target: Target<S, T>,
    pub guard: Option<Guard>,
}

impl<S: State, T: Trigger> Candidate<S, T> {
    pub fn is_unconditional(&self) -> bool {
        self.guard.is_none()
    }

    /// Whether this candidate may be taken right now.
    pub fn accepts(&self) -> bool {
        self.guard.as_ref().is_none_or(Guard::check)
    }
}

pub(crate) struct StateNode<S: State, T: Trigger> {
    pub(crate) state: S,
    pub(crate) parent: Option<usize>,
    pub(crate) candidates: Vec<Candidate<S, T>>,
    pub(crate) entry_actions: Vec<Action<S, T>>,
    pub(crate) exit_actions: Vec<Action<S, T>>,
}

impl<S: State, T: Trigger> StateNode<S, T> {
    fn new(state: S) -> Self {
        Self {
            state,
            parent: None,
            candidates: Vec::new(),
            entry_actions: Vec::new(),
            exit_actions: Vec::new(),
        }
    }
}

/// Mapping from each declared state to its parent and outgoing candidates.
pub struct TransitionTable<S: State, T: Trigger> {
    nodes: Vec<StateNode<S, T>>,
    index: HashMap<S, usize>,
}

impl<S: State, T: Trigger> Default for TransitionTable<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, T: Trigger> TransitionTable<S, T> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a state that must not exist yet, optionally under a parent.
    ///
    /// An undeclared parent is declared on the spot, ahead of the child.
    pub fn declare(&mut self, state: S, parent: Option<S>) -> Result<(), ConfigError> {
        if self.index.contains_key(&state) {
            return Err(ConfigError::DuplicateState {
                state: state.name().to_string(),
            });
        }
        if let Some(parent) = &parent {
            if *parent == state {
                return Err(ConfigError::HierarchyCycle {
                    state: state.name().to_string(),
                    parent: parent.name().to_string(),
                });
            }
        }
        let parent_idx = parent.map(|p| self.ensure(p));
        let idx = self.ensure(state);
        self.nodes[idx].parent = parent_idx;
        Ok(())
    }

    /// Return the index of `state`, declaring it with no parent if needed.
    pub(crate) fn ensure(&mut self, state: S) -> usize {
        if let Some(&idx) = self.index.get(&state) {
            return idx;
        }
        let idx = self.nodes.len();
        tracing::trace!(state = state.name(), "declared state");
        self.index.insert(state.clone(), idx);
        self.nodes.push(StateNode::new(state));
        idx
    }

    /// Make `state` a substate of `parent`.
    ///
    /// Setting the same parent again is a no-op. A different parent, or one
    /// that would close a loop, is rejected.
    pub fn set_parent(&mut self, state: S, parent: S) -> Result<(), ConfigError> {
        let cycle = || ConfigError::HierarchyCycle {
            state: state.name().to_string(),
            parent: parent.name().to_string(),
        };
        if state == parent {
            return Err(cycle());
        }
        let idx = self.ensure(state.clone());
        let parent_idx = self.ensure(parent.clone());

        match self.nodes[idx].parent {
            Some(existing) if existing == parent_idx => return Ok(()),
            Some(existing) => {
                return Err(ConfigError::ParentConflict {
                    state: state.name().to_string(),
                    existing: self.nodes[existing].state.name().to_string(),
                    requested: parent.name().to_string(),
                })
            }
            None => {}
        }

        if self.ancestor_indices(parent_idx).any(|a| a == idx) {
            return Err(cycle());
        }
        self.nodes[idx].parent = Some(parent_idx);
        Ok(())
    }

    /// Append a candidate to `state`'s list.
    ///
    /// At most one unconditional candidate per (state, trigger).
    pub fn add_candidate(&mut self, state: S, candidate: Candidate<S, T>) -> Result<(), ConfigError> {
        let idx = self.ensure(state);
        if candidate.is_unconditional()
            && self.nodes[idx]
                .candidates
                .iter()
                .any(|c| c.trigger == candidate.trigger && c.is_unconditional())
        {
            return Err(ConfigError::AmbiguousDefault {
                state: self.nodes[idx].state.name().to_string(),
                trigger: candidate.trigger.name().to_string(),
            });
        }
        if let Target::State(destination) = &candidate.target {
            self.ensure(destination.clone());
        }
        self.nodes[idx].candidates.push(candidate);
        Ok(())
    }

    pub(crate) fn add_entry_action(&mut self, state: S, action: Action<S, T>) {
        let idx = self.ensure(state);
        self.nodes[idx].entry_actions.push(action);
    }

    pub(crate) fn add_exit_action(&mut self, state: S, action: Action<S, T>) {
        let idx = self.ensure(state);
        self.nodes[idx].exit_actions.push(action);
    }

    pub fn contains(&self, state: &S) -> bool {
        self.index.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Declared states in declaration order.
    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.nodes.iter().map(|n| &n.state)
    }

    pub fn parent_of(&self, state: &S) -> Option<&S> {
        let idx = *self.index.get(state)?;
        self.nodes[idx].parent.map(|p| &self.nodes[p].state)
    }

    /// Direct substates of `state`, in declaration order.
    pub fn children_of<'a>(&'a self, state: &'a S) -> impl Iterator<Item = &'a S> + 'a {
        let idx = self.index.get(state).copied();
        self.nodes
            .iter()
            .filter(move |n| idx.is_some() && n.parent == idx)
            .map(|n| &n.state)
    }

    /// The candidates configured directly on `state`, in declaration order.
    pub fn candidates_of(&self, state: &S) -> &[Candidate<S, T>] {
        self.index
            .get(state)
            .map(|&idx| self.nodes[idx].candidates.as_slice())
            .unwrap_or(&[])
    }

    /// True iff `ancestor` is `state`'s parent, grandparent, and so on.
    /// A state is not its own substate.
    pub fn is_substate_of(&self, state: &S, ancestor: &S) -> bool {
        match (self.index.get(state), self.index.get(ancestor)) {
            (Some(&idx), Some(&ancestor_idx)) => self.is_below(idx, ancestor_idx),
            _ => false,
        }
    }

    /// Find the candidate list for `trigger`, walking from `state` up through
    /// its ancestors until one has configured it.
    ///
    /// Returns the index of the state that owns the list along with the
    /// candidates in declaration order.
    pub(crate) fn resolve(&self, state: &S, trigger: &T) -> Option<(usize, Vec<&Candidate<S, T>>)> {
        let start = *self.index.get(state)?;
        std::iter::once(start)
            .chain(self.ancestor_indices(start))
            .find_map(|idx| {
                let matching: Vec<_> = self.nodes[idx]
                    .candidates
                    .iter()
                    .filter(|c| c.trigger == *trigger)
                    .collect();
                (!matching.is_empty()).then_some((idx, matching))
            })
    }

    pub(crate) fn index_of(&self, state: &S) -> Option<usize> {
        self.index.get(state).copied()
    }

    pub(crate) fn node(&self, idx: usize) -> &StateNode<S, T> {
        &self.nodes[idx]
    }

    /// States to exit, innermost first, when moving from `source` to `destination`.
    pub(crate) fn exit_path(&self, source: usize, destination: usize) -> Vec<usize> {
        if source == destination {
            return vec![source];
        }
        std::iter::once(source)
            .chain(self.ancestor_indices(source))
            .take_while(|&idx| idx != destination && !self.is_below(destination, idx))
            .collect()
    }

    /// States to enter, outermost first, when moving from `source` to `destination`.
    pub(crate) fn entry_path(&self, source: usize, destination: usize) -> Vec<usize> {
        if source == destination {
            return vec![destination];
        }
        let mut path: Vec<usize> = std::iter::once(destination)
            .chain(self.ancestor_indices(destination))
            .take_while(|&idx| idx != source && !self.is_below(source, idx))
            .collect();
        path.reverse();
        path
    }

    fn is_below(&self, idx: usize, ancestor: usize) -> bool {
        self.ancestor_indices(idx).any(|a| a == ancestor)
    }

    /// Parent, grandparent, ... of `idx`. Bounded by the table size so a
    /// malformed forest can never loop.
    fn ancestor_indices(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.nodes[idx].parent, move |&p| self.nodes[p].parent)
            .take(self.nodes.len())
    }
}
