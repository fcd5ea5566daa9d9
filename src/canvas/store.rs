//! The canvas store: the single source of truth for the pipeline graph.
//!
//! All collaborators — renderer, palette, configuration forms, persistence —
//! hold a cloned handle to the same store. Reads return snapshots; the only
//! legal mutation surface is the replace/select/undo/redo API and the node
//! lifecycle operations built on top of it. Every mutation runs to
//! completion on the caller's thread and is atomic: observers always see
//! the collections of some committed snapshot.
//!
//! Invalid gestures (self-loops, duplicate edges, branch fan-out overflow,
//! deleting `start`/`end`, unknown ids, out-of-range undo/redo) are silent:
//! state is left unchanged and the return value says whether anything
//! happened.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::{
    ShareLock,
    canvas::{
        connect::{self, ConnectOutcome},
        flowgraph::{self, FlowDiagnostics},
        state::{CanvasAction, CanvasState, Snapshot},
        upstream::{self, UpstreamAttributes},
    },
    common::Broadcast,
    config::CanvasConfig,
    events::CanvasEvent,
    model::{BlockTemplate, Edge, Node, NodeId, NodePatch, NodeType, PipelineModel, Position, is_reserved_id},
    utils,
};

/// Shared handle to the canvas state and its undo/redo history.
#[derive(Clone)]
pub struct CanvasStore {
    state: ShareLock<CanvasState>,
    events: Arc<Broadcast<CanvasEvent>>,
    config: CanvasConfig,
}

impl CanvasStore {
    /// Creates a store seeded with the permanent `start`/`end` nodes.
    pub fn new() -> Self {
        Self::with_config(CanvasConfig::default())
    }

    pub fn with_config(config: CanvasConfig) -> Self {
        Self {
            state: ShareLock::new(CanvasState::seeded(&config).into()),
            events: Arc::new(Broadcast::new()),
            config,
        }
    }

    // ---- read side ----

    pub fn nodes(&self) -> Vec<Node> {
        self.state.read().unwrap().nodes.clone()
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.state.read().unwrap().edges.clone()
    }

    pub fn selected_node_id(&self) -> Option<NodeId> {
        self.state.read().unwrap().selected_node_id.clone()
    }

    /// Resolves the weak selection reference against the live nodes.
    pub fn selected_node(&self) -> Option<Node> {
        let state = self.state.read().unwrap();
        let selected = state.selected_node_id.as_deref()?;
        state.nodes.iter().find(|node| node.id == selected).cloned()
    }

    pub fn current_step(&self) -> Option<usize> {
        self.state.read().unwrap().current_step
    }

    pub fn history_len(&self) -> usize {
        self.state.read().unwrap().history.len()
    }

    /// The live collections, for persistence collaborators.
    pub fn snapshot(&self) -> Snapshot {
        self.state.read().unwrap().snapshot()
    }

    /// Serializable pipeline document of the live collections.
    pub fn to_model(&self) -> PipelineModel {
        let snapshot = self.snapshot();
        PipelineModel::new(snapshot.nodes, snapshot.edges)
    }

    /// Live nodes of the given step type.
    pub fn nodes_by_type(
        &self,
        kind: NodeType,
    ) -> Vec<Node> {
        self.state.read().unwrap().nodes.iter().filter(|node| node.kind == kind).cloned().collect()
    }

    /// subscribe to canvas events
    pub fn subscribe(&self) -> flume::Receiver<CanvasEvent> {
        self.events.subscribe()
    }

    // ---- mutation API ----

    pub fn replace_nodes(
        &self,
        nodes: Vec<Node>,
    ) {
        trace!("replace nodes ({})", nodes.len());
        self.dispatch(CanvasAction::ReplaceNodes(nodes));
        self.publish_graph();
    }

    pub fn replace_edges(
        &self,
        edges: Vec<Edge>,
    ) {
        trace!("replace edges ({})", edges.len());
        self.dispatch(CanvasAction::ReplaceEdges(edges));
        self.publish_graph();
    }

    /// Moves the selection; never touches history.
    pub fn select_node(
        &self,
        id: Option<NodeId>,
    ) {
        self.dispatch(CanvasAction::SelectNode(id.clone()));
        self.events.publish(CanvasEvent::SelectionChanged { selected: id });
    }

    /// Steps the history cursor back one snapshot. Returns whether it moved.
    pub fn undo(&self) -> bool {
        let before = self.current_step();
        self.dispatch(CanvasAction::Undo);
        let moved = self.current_step() != before;
        if moved {
            trace!("undo -> step {:?}", self.current_step());
            self.publish_graph();
        }
        moved
    }

    /// Steps the history cursor forward one snapshot. Returns whether it moved.
    pub fn redo(&self) -> bool {
        let before = self.current_step();
        self.dispatch(CanvasAction::Redo);
        let moved = self.current_step() != before;
        if moved {
            trace!("redo -> step {:?}", self.current_step());
            self.publish_graph();
        }
        moved
    }

    // ---- node lifecycle ----

    /// Adds a node from a palette template at the drop position, stamped
    /// with the current wall clock.
    pub fn add_node(
        &self,
        template: &BlockTemplate,
        position: Position,
    ) -> NodeId {
        self.add_node_stamped(template, position, utils::time_millis())
    }

    /// Adds a node with an explicit drop timestamp, which determines the
    /// synthesized id.
    pub fn add_node_stamped(
        &self,
        template: &BlockTemplate,
        position: Position,
        at_millis: i64,
    ) -> NodeId {
        let node = Node::from_template(template, position, at_millis);
        let id = node.id.clone();
        let mut nodes = self.nodes();
        nodes.push(node);
        self.replace_nodes(nodes);
        id
    }

    /// Applies a partial update to one node. Unknown ids are a no-op and
    /// leave the history untouched.
    pub fn update_node(
        &self,
        id: &str,
        patch: &NodePatch,
    ) -> bool {
        let mut nodes = self.nodes();
        let Some(node) = nodes.iter_mut().find(|node| node.id == id) else {
            debug!("update ignored, unknown node {}", id);
            return false;
        };
        patch.apply(node);
        self.replace_nodes(nodes);
        true
    }

    /// Deletes a node and every edge touching it. The permanent
    /// `start`/`end` nodes and unknown ids are refused.
    pub fn delete_node(
        &self,
        id: &str,
    ) -> bool {
        if is_reserved_id(id) {
            debug!("delete refused for reserved node {}", id);
            return false;
        }
        let (nodes, edges, selected) = {
            let state = self.state.read().unwrap();
            (state.nodes.clone(), state.edges.clone(), state.selected_node_id.clone())
        };
        if !nodes.iter().any(|node| node.id == id) {
            debug!("delete ignored, unknown node {}", id);
            return false;
        }

        let nodes: Vec<Node> = nodes.into_iter().filter(|node| node.id != id).collect();
        let edges: Vec<Edge> = edges.into_iter().filter(|edge| edge.source != id && edge.target != id).collect();
        self.replace_nodes(nodes);
        self.replace_edges(edges);
        if selected.as_deref() == Some(id) {
            self.select_node(None);
        }
        true
    }

    /// Duplicates a node with a fresh identity, stamped with the current
    /// wall clock.
    pub fn duplicate_node(
        &self,
        id: &str,
    ) -> Option<NodeId> {
        self.duplicate_node_stamped(id, utils::time_millis())
    }

    /// Duplicates a node with an explicit timestamp. The clone keeps all
    /// data except its id and position (offset on both axes); incident
    /// edges are never copied. `start`/`end` and unknown ids are refused.
    pub fn duplicate_node_stamped(
        &self,
        id: &str,
        at_millis: i64,
    ) -> Option<NodeId> {
        if is_reserved_id(id) {
            debug!("duplicate refused for reserved node {}", id);
            return None;
        }
        let mut nodes = self.nodes();
        let source = nodes.iter().find(|node| node.id == id)?.clone();

        let mut duplicated = source.clone();
        duplicated.id = format!("{}-copy-{}", id, at_millis);
        duplicated.position = source.position.offset(self.config.duplicate_offset, self.config.duplicate_offset);
        let new_id = duplicated.id.clone();

        nodes.push(duplicated);
        self.replace_nodes(nodes);
        Some(new_id)
    }

    // ---- connection validator ----

    /// Validates and commits a connect gesture between two nodes.
    pub fn connect(
        &self,
        source: &str,
        target: &str,
    ) -> ConnectOutcome {
        let (nodes, edges) = {
            let state = self.state.read().unwrap();
            (state.nodes.clone(), state.edges.clone())
        };
        match connect::build_edge(&nodes, &edges, source, target) {
            Ok(edge) => {
                let id = edge.id.clone();
                let mut edges = edges;
                edges.push(edge);
                self.replace_edges(edges);
                ConnectOutcome::Connected(id)
            }
            Err(rejection) => {
                debug!("connect {} -> {} rejected: {}", source, target, rejection.as_ref());
                ConnectOutcome::Rejected(rejection)
            }
        }
    }

    // ---- bulk operations ----

    /// Replaces the canvas with a loaded pipeline document, committed as an
    /// authored edit (a `replace_nodes` + `replace_edges` pair), not a
    /// history-exempt reset.
    pub fn load(
        &self,
        model: PipelineModel,
    ) {
        self.replace_nodes(model.nodes);
        self.replace_edges(model.edges);
    }

    /// Drops every user node and edge, keeping only `start`/`end`.
    pub fn reset(&self) {
        let kept: Vec<Node> = self.nodes().into_iter().filter(|node| node.is_reserved()).collect();
        self.replace_nodes(kept);
        self.replace_edges(Vec::new());
    }

    /// Reorders the node collection to the given id order. Unknown ids are
    /// skipped; nodes not mentioned keep their relative order at the end.
    /// The order feeds the upstream resolver's positional fallback.
    pub fn reorder_nodes(
        &self,
        ids: &[&str],
    ) {
        let nodes = self.nodes();
        let mut reordered: Vec<Node> = ids.iter().filter_map(|id| nodes.iter().find(|node| node.id == *id).cloned()).collect();
        let mentioned: Vec<&str> = reordered.iter().map(|node| node.id.as_str()).collect();
        let remaining: Vec<Node> = nodes.iter().filter(|node| !mentioned.contains(&node.id.as_str())).cloned().collect();
        reordered.extend(remaining);
        self.replace_nodes(reordered);
    }

    // ---- read-side queries ----

    /// Validates start-to-end reachability of the authored pipeline.
    pub fn validate(&self) -> FlowDiagnostics {
        let state = self.state.read().unwrap();
        flowgraph::diagnose(&state.nodes, &state.edges)
    }

    /// Logical predecessors of a node; see the upstream resolver's
    /// dual-mode contract.
    pub fn upstream_nodes(
        &self,
        id: &str,
    ) -> Vec<Node> {
        let state = self.state.read().unwrap();
        upstream::upstream_nodes(&state.nodes, &state.edges, id)
    }

    /// Input/output attributes available to a node being configured.
    pub fn upstream_attributes(
        &self,
        id: &str,
    ) -> UpstreamAttributes {
        let state = self.state.read().unwrap();
        upstream::upstream_attributes(&state.nodes, &state.edges, id)
    }

    fn dispatch(
        &self,
        action: CanvasAction,
    ) {
        let mut state = self.state.write().unwrap();
        *state = state.reduce(action, self.config.history_limit);
    }

    fn publish_graph(&self) {
        let state = self.state.read().unwrap();
        self.events.publish(CanvasEvent::GraphChanged {
            nodes: state.nodes.clone(),
            edges: state.edges.clone(),
        });
    }
}

impl Default for CanvasStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::canvas::connect::ConnectRejection;

    fn block(id: &str) -> BlockTemplate {
        BlockTemplate::new(id, NodeType::Block, id)
    }

    fn store_with_block(at_millis: i64) -> (CanvasStore, NodeId) {
        let store = CanvasStore::new();
        let id = store.add_node_stamped(&block("block-1"), Position::new(200.0, 200.0), at_millis);
        (store, id)
    }

    #[test]
    fn test_add_node_from_template() {
        let (store, id) = store_with_block(1700000000000);
        assert_eq!(id, "block-1-1700000000000");
        assert_eq!(store.nodes().len(), 3);
        assert_eq!(store.history_len(), 1);
    }

    #[test]
    fn test_connect_linear_pipeline() {
        let (store, id) = store_with_block(7);
        assert!(store.connect("start", &id).is_connected());
        assert!(store.connect(&id, "end").is_connected());

        let edge_ids: Vec<String> = store.edges().iter().map(|e| e.id.clone()).collect();
        assert_eq!(edge_ids, vec!["start-block-1-7".to_string(), "block-1-7-end".to_string()]);
        assert!(store.validate().has_valid_path);
    }

    #[test]
    fn test_connect_rejections_leave_state_unchanged() {
        let (store, id) = store_with_block(7);
        store.connect("start", &id);
        let before = store.snapshot();

        assert_eq!(store.connect(&id, &id), ConnectOutcome::Rejected(ConnectRejection::SelfLoop));
        assert_eq!(store.connect("start", &id), ConnectOutcome::Rejected(ConnectRejection::DuplicateEdge));
        assert_eq!(store.connect(&id, "ghost"), ConnectOutcome::Rejected(ConnectRejection::UnknownEndpoint));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_branch_conversion_and_fan_out_bound() {
        let (store, id) = store_with_block(7);
        let a = store.add_node_stamped(&block("block-a"), Position::default(), 8);
        let b = store.add_node_stamped(&block("block-b"), Position::default(), 9);

        let patch = NodePatch {
            kind: Some(NodeType::Branch),
            condition: Some(String::new()),
            ..NodePatch::default()
        };
        assert!(store.update_node(&id, &patch));

        assert!(store.connect(&id, &a).is_connected());
        assert!(store.connect(&id, &b).is_connected());
        let labels: Vec<String> = store.edges().into_iter().filter_map(|e| e.label).map(|l| l.as_ref().to_string()).collect();
        assert_eq!(labels, vec!["true".to_string(), "false".to_string()]);

        let third = store.connect(&id, "end");
        assert_eq!(third, ConnectOutcome::Rejected(ConnectRejection::BranchLimitReached));
        assert_eq!(store.edges().len(), 2);
    }

    #[test]
    fn test_delete_cascades_and_clears_selection() {
        let (store, id) = store_with_block(7);
        store.connect("start", &id);
        store.connect(&id, "end");
        store.select_node(Some(id.clone()));

        assert!(store.delete_node(&id));
        assert!(store.nodes().iter().all(|n| n.id != id));
        assert!(store.edges().is_empty());
        assert!(store.selected_node_id().is_none());
    }

    #[test]
    fn test_delete_refuses_reserved_and_unknown() {
        let store = CanvasStore::new();
        let before = store.history_len();
        assert!(!store.delete_node("start"));
        assert!(!store.delete_node("end"));
        assert!(!store.delete_node("ghost"));
        assert_eq!(store.history_len(), before);
        assert_eq!(store.nodes().len(), 2);
    }

    #[test]
    fn test_duplicate_keeps_original_untouched() {
        let (store, id) = store_with_block(7);
        let patch = NodePatch {
            schema_data: Some(json!({ "inputs": { "url": "https://a.example" } }).as_object().unwrap().clone()),
            ..NodePatch::default()
        };
        store.update_node(&id, &patch);
        store.connect("start", &id);
        let original = store.nodes().iter().find(|n| n.id == id).cloned().unwrap();

        let copy_id = store.duplicate_node_stamped(&id, 99).unwrap();
        assert_eq!(copy_id, "block-1-7-copy-99");

        let nodes = store.nodes();
        let copy = nodes.iter().find(|n| n.id == copy_id).unwrap();
        assert_eq!(copy.schema_data, original.schema_data);
        assert_eq!(copy.kind, original.kind);
        assert_eq!(copy.position, original.position.offset(100.0, 100.0));
        // original is byte-for-byte unchanged and keeps its edges to itself
        assert_eq!(nodes.iter().find(|n| n.id == id).unwrap(), &original);
        assert!(store.edges().iter().all(|e| e.source != copy_id && e.target != copy_id));
    }

    #[test]
    fn test_duplicate_refuses_reserved_and_unknown() {
        let store = CanvasStore::new();
        assert!(store.duplicate_node_stamped("start", 1).is_none());
        assert!(store.duplicate_node_stamped("end", 1).is_none());
        assert!(store.duplicate_node_stamped("ghost", 1).is_none());
        assert_eq!(store.nodes().len(), 2);
    }

    #[test]
    fn test_update_unknown_node_leaves_history_untouched() {
        let store = CanvasStore::new();
        assert!(!store.update_node("ghost", &NodePatch::default()));
        assert_eq!(store.history_len(), 0);
    }

    #[test]
    fn test_undo_redo_walk() {
        let store = CanvasStore::new();
        store.add_node_stamped(&block("block-1"), Position::default(), 1);
        let after_first = store.nodes();
        store.add_node_stamped(&block("block-2"), Position::default(), 2);
        let after_second = store.nodes();
        store.add_node_stamped(&block("block-3"), Position::default(), 3);

        assert!(store.undo());
        assert!(store.undo());
        assert_eq!(store.nodes(), after_first);
        // oldest reachable snapshot
        assert!(!store.undo());

        assert!(store.redo());
        assert_eq!(store.nodes(), after_second);
    }

    #[test]
    fn test_redo_at_newest_returns_false() {
        let store = CanvasStore::new();
        store.add_node_stamped(&block("block-1"), Position::default(), 1);
        assert!(!store.redo());
    }

    #[test]
    fn test_load_is_an_authored_edit() {
        let (store, id) = store_with_block(7);
        let saved = store.to_model();

        let other = CanvasStore::new();
        other.load(saved.clone());
        assert_eq!(other.nodes().len(), 3);
        assert_eq!(other.history_len(), 2);

        // undo walks back through the load like any other edit
        assert!(other.undo());
        assert_eq!(other.edges(), saved.edges);
        assert!(other.nodes().iter().any(|n| n.id == id));
    }

    #[test]
    fn test_round_trip_through_document() {
        let (store, id) = store_with_block(7);
        store.connect("start", &id);
        let json = store.to_model().to_json().unwrap();

        let reloaded = CanvasStore::new();
        reloaded.load(PipelineModel::from_json(&json).unwrap());
        assert_eq!(reloaded.snapshot(), store.snapshot());
    }

    #[test]
    fn test_reset_keeps_only_reserved_nodes() {
        let (store, id) = store_with_block(7);
        store.connect("start", &id);
        store.reset();

        let ids: Vec<String> = store.nodes().iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids, vec!["start".to_string(), "end".to_string()]);
        assert!(store.edges().is_empty());
    }

    #[test]
    fn test_reorder_feeds_positional_fallback() {
        let store = CanvasStore::new();
        let a = store.add_node_stamped(&block("block-a"), Position::default(), 1);
        let b = store.add_node_stamped(&block("block-b"), Position::default(), 2);

        assert_eq!(store.upstream_nodes(&b)[0].id, a);
        store.reorder_nodes(&[b.as_str(), a.as_str()]);
        assert_eq!(store.upstream_nodes(&a)[0].id, b);
        assert!(store.upstream_nodes(&b).is_empty());
    }

    #[test]
    fn test_nodes_by_type() {
        let store = CanvasStore::new();
        store.add_node_stamped(&BlockTemplate::new("branch-default", NodeType::Branch, "Branch"), Position::default(), 1);
        let branches = store.nodes_by_type(NodeType::Branch);
        assert_eq!(branches.len(), 1);
        assert_eq!(store.nodes_by_type(NodeType::Loop).len(), 0);
    }

    #[test]
    fn test_selected_node_is_a_weak_reference() {
        let (store, id) = store_with_block(7);
        store.select_node(Some(id.clone()));
        assert_eq!(store.selected_node().unwrap().id, id);

        // stale id resolves to nothing
        store.select_node(Some("ghost".to_string()));
        assert!(store.selected_node().is_none());
    }

    #[test]
    fn test_subscribers_see_commits_and_selection() {
        let store = CanvasStore::new();
        let events = store.subscribe();

        let id = store.add_node_stamped(&block("block-1"), Position::default(), 1);
        match events.try_recv().unwrap() {
            CanvasEvent::GraphChanged { nodes, .. } => assert_eq!(nodes.len(), 3),
            other => panic!("unexpected event: {:?}", other),
        }

        store.select_node(Some(id.clone()));
        match events.try_recv().unwrap() {
            CanvasEvent::SelectionChanged { selected } => assert_eq!(selected, Some(id)),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_rejected_gesture_publishes_nothing() {
        let store = CanvasStore::new();
        let events = store.subscribe();
        store.connect("start", "start");
        assert!(!store.undo());
        assert!(events.try_recv().is_err());
    }
}
