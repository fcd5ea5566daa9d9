//! Upstream dependency resolution.
//!
//! Given a node being configured, finds the prior steps whose outputs can
//! feed it. With edges on the canvas this follows the graph: every user node
//! with an edge into the target. On an edge-less canvas it falls back to
//! positional inference over the authoring order: the predecessor of the
//! node at index `i` is the node at index `i - 1`.
//!
//! The positional fallback is deliberate bootstrapping behavior carried over
//! from the designer this engine was extracted from; it means the resolver
//! can answer differently for the same node depending on whether any edge
//! exists anywhere on the canvas. Tests pin both modes.

use serde_json::Value;

use crate::{
    canvas::flowgraph::FlowGraph,
    model::{Edge, Node},
};

/// Attributes surfaced to a step's configuration form: the flattened inputs
/// and declared output names of its predecessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpstreamAttributes {
    /// key/value pairs from each predecessor's `schema_data.inputs`
    pub inputs: Vec<(String, Value)>,
    /// names from each predecessor's `schema_data.outputs.object_keys`
    pub outputs: Vec<String>,
}

/// Logical predecessor set of `id`, always excluding `start`/`end`.
pub(crate) fn upstream_nodes(
    nodes: &[Node],
    edges: &[Edge],
    id: &str,
) -> Vec<Node> {
    let user_nodes: Vec<&Node> = nodes.iter().filter(|node| !node.is_reserved()).collect();

    if edges.is_empty() {
        // positional fallback for a canvas with no connections yet
        let Some(index) = user_nodes.iter().position(|node| node.id == id) else {
            return Vec::new();
        };
        if index == 0 {
            return Vec::new();
        }
        return vec![user_nodes[index - 1].clone()];
    }

    let graph = FlowGraph::new(nodes, edges);
    let predecessor_ids = graph.predecessors(id);
    user_nodes.into_iter().filter(|node| predecessor_ids.contains(&node.id)).cloned().collect()
}

/// Collects the attributes every predecessor of `id` makes available.
pub(crate) fn upstream_attributes(
    nodes: &[Node],
    edges: &[Edge],
    id: &str,
) -> UpstreamAttributes {
    let mut attributes = UpstreamAttributes::default();
    for node in upstream_nodes(nodes, edges, id) {
        for (key, value) in &node.schema_data.inputs {
            attributes.inputs.push((key.clone(), value.clone()));
        }
        attributes.outputs.extend(node.schema_data.outputs.object_keys.iter().cloned());
    }
    attributes
}
