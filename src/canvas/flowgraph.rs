//! Directed-graph view of a canvas snapshot.
//!
//! Wraps the node/edge collections in a petgraph `DiGraph` for traversal:
//! the reachability checker walks it breadth-first from `start`, and the
//! upstream resolver asks it for predecessors. The view is rebuilt from the
//! snapshot on demand and never mutates canvas state.

use std::collections::HashMap;

use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::Bfs,
};
use serde::Serialize;

use crate::model::{Edge, EdgeId, END_NODE_ID, Node, NodeId, START_NODE_ID};

/// Read-only diagnostic produced by pipeline validation.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FlowDiagnostics {
    /// the permanent start node is present
    pub has_start: bool,
    /// the permanent end node is present
    pub has_end: bool,
    /// a breadth-first walk from `start` reaches `end`
    pub has_valid_path: bool,
    pub node_count: usize,
    pub edge_count: usize,
}

/// Traversal view over one snapshot.
pub struct FlowGraph {
    graph: DiGraph<NodeId, EdgeId>,
    index: HashMap<NodeId, NodeIndex>,
}

impl FlowGraph {
    /// Builds the view. Edges whose endpoints are not in the node collection
    /// carry no traversal meaning and are skipped.
    pub fn new(
        nodes: &[Node],
        edges: &[Edge],
    ) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        for node in nodes {
            let idx = graph.add_node(node.id.clone());
            index.insert(node.id.clone(), idx);
        }
        for edge in edges {
            if let (Some(&source), Some(&target)) = (index.get(&edge.source), index.get(&edge.target)) {
                graph.add_edge(source, target, edge.id.clone());
            }
        }

        Self { graph, index }
    }

    /// Ids of nodes with an edge into `id`, in graph insertion order.
    pub fn predecessors(
        &self,
        id: &str,
    ) -> Vec<NodeId> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        let mut ids: Vec<NodeId> = self.graph.neighbors_directed(idx, Direction::Incoming).map(|pred| self.graph[pred].clone()).collect();
        // neighbors_directed yields most-recent first
        ids.reverse();
        ids
    }

    /// Whether a breadth-first walk from `start` reaches `end`.
    pub fn start_reaches_end(&self) -> bool {
        let (Some(&start), Some(&end)) = (self.index.get(START_NODE_ID), self.index.get(END_NODE_ID)) else {
            return false;
        };
        let mut bfs = Bfs::new(&self.graph, start);
        while let Some(idx) = bfs.next(&self.graph) {
            if idx == end {
                return true;
            }
        }
        false
    }
}

/// Validates end-to-end reachability of the authored pipeline.
pub(crate) fn diagnose(
    nodes: &[Node],
    edges: &[Edge],
) -> FlowDiagnostics {
    let graph = FlowGraph::new(nodes, edges);
    FlowDiagnostics {
        has_start: nodes.iter().any(|node| node.id == START_NODE_ID),
        has_end: nodes.iter().any(|node| node.id == END_NODE_ID),
        has_valid_path: graph.start_reaches_end(),
        node_count: nodes.len(),
        edge_count: edges.len(),
    }
}
