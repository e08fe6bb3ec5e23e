//! Graphviz DOT rendering.

use super::{GraphNode, StateGraph};
use crate::core::TransitionKind;
use serde::{Deserialize, Serialize};

/// Layout direction of the rendered graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankDirection {
    /// Left to right
    #[default]
    LR,
    /// Top to bottom
    TB,
}

impl RankDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LR => "LR",
            Self::TB => "TB",
        }
    }
}

/// Rendering options for [`StateGraph::to_dot_with`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DotOptions {
    pub rank_direction: RankDirection,
}

impl StateGraph {
    /// Render as Graphviz DOT.
    ///
    /// Substates are drawn inside a cluster named after their parent, which
    /// also holds the parent's own node. Guarded edges carry the guard
    /// description in brackets; internal transitions are dashed self-loops.
    pub fn to_dot_with(&self, options: &DotOptions) -> String {
        let mut dot = "digraph {\n".to_string();
        dot.push_str("  compound=true;\n");
        dot.push_str(&format!("  rankdir={};\n", options.rank_direction.as_str()));
        dot.push_str("  node [shape=Mrecord];\n\n");

        for root in self.nodes.iter().filter(|n| n.parent.is_none()) {
            self.write_state(&mut dot, root, 1);
        }
        dot.push('\n');

        for edge in &self.edges {
            let mut label = edge.trigger.clone();
            if let Some(guard) = &edge.guard {
                label.push_str(&format!(" [{guard}]"));
            }
            let style = match edge.kind {
                TransitionKind::Internal => ", style=dashed",
                TransitionKind::External | TransitionKind::Reentry => "",
            };
            dot.push_str(&format!(
                "  {} -> {} [label={}{}];\n",
                quote(&edge.source),
                quote(&edge.destination),
                quote(&label),
                style
            ));
        }

        dot.push_str("\n  __init [label=\"\", shape=point];\n");
        dot.push_str(&format!("  __init -> {};\n", quote(&self.initial)));
        dot.push_str("}\n");
        dot
    }

    fn write_state(&self, dot: &mut String, node: &GraphNode, depth: usize) {
        let indent = "  ".repeat(depth);
        let children: Vec<&GraphNode> = self.children_of(&node.name).collect();

        if children.is_empty() {
            dot.push_str(&format!("{indent}{};\n", node_line(node)));
            return;
        }

        dot.push_str(&format!(
            "{indent}subgraph {} {{\n",
            quote(&format!("cluster_{}", node.name))
        ));
        dot.push_str(&format!("{indent}  label={};\n", quote(&node.name)));
        dot.push_str(&format!("{indent}  {};\n", node_line(node)));
        for child in children {
            self.write_state(dot, child, depth + 1);
        }
        dot.push_str(&format!("{indent}}}\n"));
    }
}

fn node_line(node: &GraphNode) -> String {
    let mut attrs = vec![format!("label={}", quote(&node.name))];
    if node.error {
        attrs.push("style=filled".to_string());
        attrs.push("fillcolor=\"#f4cccc\"".to_string());
    }
    if node.terminal {
        attrs.push("peripheries=2".to_string());
    }
    format!("{} [{}]", quote(&node.name), attrs.join(", "))
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}
