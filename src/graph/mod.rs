//! Export of the configured transition graph.
//!
//! [`StateGraph`] is a plain node/edge description of a transition table. It
//! renders to Graphviz DOT for humans and to JSON for tools. Both renderings
//! follow declaration order, so the same configuration always produces the
//! same bytes.

mod dot;

pub use dot::{DotOptions, RankDirection};

use crate::core::{State, Target, TransitionKind, TransitionTable, Trigger};
use serde::{Deserialize, Serialize};

/// A declared state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
    /// Name of the enclosing state, if this is a substate
    pub parent: Option<String>,
    /// Whether the state's catalog marks it as an error state
    pub error: bool,
    /// No candidate is configured on the state or any ancestor
    pub terminal: bool,
}

/// A configured candidate, drawn from its declaring state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub destination: String,
    pub trigger: String,
    /// Guard description, present only for guarded candidates
    pub guard: Option<String>,
    pub kind: TransitionKind,
}

impl GraphEdge {
    pub fn is_guarded(&self) -> bool {
        self.guard.is_some()
    }
}

/// Node and edge description of a configured state machine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateGraph {
    pub initial: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl StateGraph {
    /// Describe `table`, marking `initial` as the starting state.
    ///
    /// Nodes follow state declaration order; edges follow state order and
    /// then candidate order within each state.
    pub fn from_table<S: State, T: Trigger>(table: &TransitionTable<S, T>, initial: &S) -> Self {
        let nodes = table
            .states()
            .map(|state| GraphNode {
                name: state.name().to_string(),
                parent: table.parent_of(state).map(|p| p.name().to_string()),
                error: state.is_error(),
                terminal: std::iter::successors(Some(state), |s| table.parent_of(s))
                    .take(table.len())
                    .all(|s| table.candidates_of(s).is_empty()),
            })
            .collect();

        let edges = table
            .states()
            .flat_map(|state| {
                table.candidates_of(state).iter().map(move |candidate| {
                    let (destination, kind) = match &candidate.target {
                        Target::State(d) if d == state => (d.name(), TransitionKind::Reentry),
                        Target::State(d) => (d.name(), TransitionKind::External),
                        Target::Reentry => (state.name(), TransitionKind::Reentry),
                        Target::Internal(_) => (state.name(), TransitionKind::Internal),
                    };
                    GraphEdge {
                        source: state.name().to_string(),
                        destination: destination.to_string(),
                        trigger: candidate.trigger.name().to_string(),
                        guard: candidate.guard.as_ref().map(|g| g.description().to_string()),
                        kind,
                    }
                })
            })
            .collect();

        Self {
            initial: initial.name().to_string(),
            nodes,
            edges,
        }
    }

    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Edges leaving `name`, in configured order.
    pub fn edges_from<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.source == name)
    }

    /// Direct substates of `name`, in declaration order.
    pub fn children_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a GraphNode> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.parent.as_deref() == Some(name))
    }

    /// Render as Graphviz DOT with default options.
    pub fn to_dot(&self) -> String {
        self.to_dot_with(&DotOptions::default())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
