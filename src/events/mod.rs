//! Event types for canvas subscriptions.
//!
//! The store broadcasts an event after every committed mutation (including
//! undo/redo restores and document loads) and on selection changes, so
//! renderers can mirror the live `{nodes, edges, selected_node_id}` without
//! polling.

use crate::model::{Edge, Node, NodeId};

/// Notification published to canvas subscribers.
#[derive(Debug, Clone)]
pub enum CanvasEvent {
    /// The node/edge collections changed; carries the committed snapshot.
    GraphChanged {
        nodes: Vec<Node>,
        edges: Vec<Edge>,
    },
    /// The selection moved to another node, or was cleared.
    SelectionChanged {
        selected: Option<NodeId>,
    },
}
