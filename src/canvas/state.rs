//! Canvas state and the pure reducer behind the mutation API.
//!
//! The state pairs the live node/edge collections with a linear undo/redo
//! history: an ordered vector of snapshots plus a cursor. Every replace
//! action truncates the history after the cursor, appends a snapshot, and
//! advances the cursor — the classic linear-undo scheme. Undo and redo only
//! move the cursor and restore the addressed snapshot; out-of-range moves
//! leave the state untouched.

use serde::{Deserialize, Serialize};

use crate::{
    config::CanvasConfig,
    model::{END_NODE_ID, Edge, Node, NodeId, NodeType, SchemaData, START_NODE_ID},
};

/// An immutable `{nodes, edges}` pair captured for undo/redo and persistence.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Actions accepted by the reducer; the only way canvas state ever changes.
#[derive(Debug, Clone)]
pub enum CanvasAction {
    ReplaceNodes(Vec<Node>),
    ReplaceEdges(Vec<Edge>),
    SelectNode(Option<NodeId>),
    Undo,
    Redo,
}

/// The canonical canvas state.
///
/// `current_step` is unset until the first commit; after that it always
/// addresses a valid history index. Undo therefore stops at the first
/// committed snapshot rather than the pristine seeded canvas, matching the
/// designer this engine was extracted from.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasState {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub history: Vec<Snapshot>,
    pub current_step: Option<usize>,
    /// weak selection reference, re-resolved against `nodes` on every read
    pub selected_node_id: Option<NodeId>,
}

impl CanvasState {
    /// A fresh canvas: exactly the permanent `start` and `end` nodes, no
    /// edges, empty history.
    pub fn seeded(config: &CanvasConfig) -> Self {
        Self {
            nodes: vec![
                seed_node(START_NODE_ID, NodeType::Start, "Start", config.start_position.x, config.start_position.y),
                seed_node(END_NODE_ID, NodeType::End, "End", config.end_position.x, config.end_position.y),
            ],
            edges: Vec::new(),
            history: Vec::new(),
            current_step: None,
            selected_node_id: None,
        }
    }

    /// Pure state transition: `(state, action) -> state`.
    pub fn reduce(
        &self,
        action: CanvasAction,
        history_limit: Option<usize>,
    ) -> Self {
        match action {
            CanvasAction::ReplaceNodes(nodes) => {
                let mut next = self.clone();
                next.nodes = nodes;
                next.commit(history_limit);
                next
            }
            CanvasAction::ReplaceEdges(edges) => {
                let mut next = self.clone();
                next.edges = edges;
                next.commit(history_limit);
                next
            }
            CanvasAction::SelectNode(selected) => {
                let mut next = self.clone();
                next.selected_node_id = selected;
                next
            }
            CanvasAction::Undo => match self.current_step {
                Some(step) if step > 0 => self.restored(step - 1),
                _ => self.clone(),
            },
            CanvasAction::Redo => match self.current_step {
                Some(step) if step + 1 < self.history.len() => self.restored(step + 1),
                _ => self.clone(),
            },
        }
    }

    /// Truncates the history after the cursor, appends the live collections
    /// as a new snapshot, and advances the cursor. Enforces the optional
    /// history bound by dropping the oldest snapshots.
    fn commit(
        &mut self,
        history_limit: Option<usize>,
    ) {
        match self.current_step {
            Some(step) => self.history.truncate(step + 1),
            None => self.history.clear(),
        }
        self.history.push(Snapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        });

        if let Some(limit) = history_limit {
            let limit = limit.max(1);
            while self.history.len() > limit {
                self.history.remove(0);
            }
        }
        self.current_step = Some(self.history.len() - 1);
    }

    fn restored(
        &self,
        step: usize,
    ) -> Self {
        let snapshot = &self.history[step];
        Self {
            nodes: snapshot.nodes.clone(),
            edges: snapshot.edges.clone(),
            history: self.history.clone(),
            current_step: Some(step),
            selected_node_id: self.selected_node_id.clone(),
        }
    }

    /// The live collections as a snapshot, for persistence collaborators.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }
}

fn seed_node(
    id: &str,
    kind: NodeType,
    label: &str,
    x: f64,
    y: f64,
) -> Node {
    Node {
        id: id.to_string(),
        kind,
        variant: None,
        label: label.to_string(),
        position: crate::model::Position::new(x, y),
        condition: None,
        iterator: None,
        schema_data: SchemaData {
            label: label.to_string(),
            id: id.to_string(),
            kind,
            ..SchemaData::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockTemplate, Position};

    fn seeded() -> CanvasState {
        CanvasState::seeded(&CanvasConfig::default())
    }

    fn user_node(id: &str) -> Node {
        let template = BlockTemplate::new(id, NodeType::Block, id);
        Node::from_template(&template, Position::default(), 1)
    }

    fn with_extra_node(
        state: &CanvasState,
        id: &str,
    ) -> Vec<Node> {
        let mut nodes = state.nodes.clone();
        nodes.push(user_node(id));
        nodes
    }

    #[test]
    fn test_seeded_canvas_has_only_start_and_end() {
        let state = seeded();
        let ids: Vec<&str> = state.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["start", "end"]);
        assert!(state.edges.is_empty());
        assert!(state.history.is_empty());
        assert!(state.current_step.is_none());
    }

    #[test]
    fn test_replace_nodes_appends_snapshot() {
        let state = seeded();
        let nodes = with_extra_node(&state, "a");
        let next = state.reduce(CanvasAction::ReplaceNodes(nodes.clone()), None);

        assert_eq!(next.nodes, nodes);
        assert_eq!(next.history.len(), 1);
        assert_eq!(next.current_step, Some(0));
        assert_eq!(next.history[0].nodes, nodes);
        assert_eq!(next.history[0].edges, state.edges);
    }

    #[test]
    fn test_undo_at_first_snapshot_is_noop() {
        let state = seeded();
        let state = state.reduce(CanvasAction::ReplaceNodes(with_extra_node(&state, "a")), None);
        let undone = state.reduce(CanvasAction::Undo, None);
        assert_eq!(undone, state);
    }

    #[test]
    fn test_redo_at_newest_snapshot_is_noop() {
        let state = seeded();
        let state = state.reduce(CanvasAction::ReplaceNodes(with_extra_node(&state, "a")), None);
        let redone = state.reduce(CanvasAction::Redo, None);
        assert_eq!(redone, state);
    }

    #[test]
    fn test_three_commits_two_undos_one_redo() {
        // spec-style walk: nodes after two undos equal the first commit,
        // one redo returns to the second.
        let s0 = seeded();
        let n1 = with_extra_node(&s0, "a");
        let s1 = s0.reduce(CanvasAction::ReplaceNodes(n1.clone()), None);
        let mut n2 = n1.clone();
        n2.push(user_node("b"));
        let s2 = s1.reduce(CanvasAction::ReplaceNodes(n2.clone()), None);
        let mut n3 = n2.clone();
        n3.push(user_node("c"));
        let s3 = s2.reduce(CanvasAction::ReplaceNodes(n3), None);

        let undone = s3.reduce(CanvasAction::Undo, None).reduce(CanvasAction::Undo, None);
        assert_eq!(undone.nodes, n1);
        assert_eq!(undone.current_step, Some(0));

        let redone = undone.reduce(CanvasAction::Redo, None);
        assert_eq!(redone.nodes, n2);
        assert_eq!(redone.current_step, Some(1));
    }

    #[test]
    fn test_commit_after_undo_truncates_redo_branch() {
        let s0 = seeded();
        let s1 = s0.reduce(CanvasAction::ReplaceNodes(with_extra_node(&s0, "a")), None);
        let s2 = s1.reduce(CanvasAction::ReplaceNodes(with_extra_node(&s1, "b")), None);
        assert_eq!(s2.history.len(), 2);

        let undone = s2.reduce(CanvasAction::Undo, None);
        let diverged = undone.reduce(CanvasAction::ReplaceNodes(with_extra_node(&undone, "c")), None);

        assert_eq!(diverged.history.len(), 2);
        assert_eq!(diverged.current_step, Some(1));
        // the old second snapshot is gone
        assert!(diverged.history[1].nodes.iter().any(|n| n.id.starts_with("c")));
        let redone = diverged.reduce(CanvasAction::Redo, None);
        assert_eq!(redone, diverged);
    }

    #[test]
    fn test_undo_redo_symmetry() {
        let mut state = seeded();
        let mut expected = Vec::new();
        for id in ["a", "b", "c", "d"] {
            let nodes = with_extra_node(&state, id);
            state = state.reduce(CanvasAction::ReplaceNodes(nodes.clone()), None);
            expected.push(nodes);
        }
        let final_snapshot = state.snapshot();

        for _ in 0..4 {
            state = state.reduce(CanvasAction::Undo, None);
        }
        for _ in 0..4 {
            state = state.reduce(CanvasAction::Redo, None);
        }
        assert_eq!(state.snapshot(), final_snapshot);
    }

    #[test]
    fn test_history_limit_drops_oldest() {
        let mut state = seeded();
        for id in ["a", "b", "c", "d", "e"] {
            let nodes = with_extra_node(&state, id);
            state = state.reduce(CanvasAction::ReplaceNodes(nodes), Some(3));
        }
        assert_eq!(state.history.len(), 3);
        assert_eq!(state.current_step, Some(2));
        // the newest snapshot is the live state
        assert_eq!(state.history[2].nodes, state.nodes);
    }

    #[test]
    fn test_select_does_not_touch_history() {
        let state = seeded();
        let selected = state.reduce(CanvasAction::SelectNode(Some("start".to_string())), None);
        assert_eq!(selected.selected_node_id.as_deref(), Some("start"));
        assert!(selected.history.is_empty());
        assert!(selected.current_step.is_none());
    }
}
