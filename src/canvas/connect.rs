//! Connection validation for user connect gestures.
//!
//! Decides whether a candidate `(source, target)` pair may become an edge
//! and what label/styling it receives. Branch sources hand out at most two
//! edges, labeled `true` then `false`; converge targets get an animated,
//! highlighted edge regardless of the source type. Both rules may apply to
//! the same edge when a branch connects into a converge.

use crate::model::{Edge, EdgeId, EdgeLabel, EdgeStyle, LabelStyle, Node, NodeType, STROKE_CONVERGE, STROKE_FALSE, STROKE_TRUE};

/// Why a connect gesture was refused. The state is unchanged in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ConnectRejection {
    /// `source == target`
    SelfLoop,
    /// an edge with this exact `(source, target)` already exists
    DuplicateEdge,
    /// one of the endpoints is not a node on the canvas
    UnknownEndpoint,
    /// the branch source already has two outgoing edges
    BranchLimitReached,
}

/// Result of [`connect`](crate::CanvasStore::connect).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// The edge was committed; carries its id.
    Connected(EdgeId),
    /// The gesture was refused and nothing changed.
    Rejected(ConnectRejection),
}

impl ConnectOutcome {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectOutcome::Connected(_))
    }
}

/// Validates a candidate connection and builds the edge it would commit.
pub(crate) fn build_edge(
    nodes: &[Node],
    edges: &[Edge],
    source: &str,
    target: &str,
) -> Result<Edge, ConnectRejection> {
    if source == target {
        return Err(ConnectRejection::SelfLoop);
    }
    if edges.iter().any(|edge| edge.source == source && edge.target == target) {
        return Err(ConnectRejection::DuplicateEdge);
    }

    let source_node = nodes.iter().find(|node| node.id == source).ok_or(ConnectRejection::UnknownEndpoint)?;
    let target_node = nodes.iter().find(|node| node.id == target).ok_or(ConnectRejection::UnknownEndpoint)?;

    let mut edge = Edge::plain(source, target);

    if source_node.kind == NodeType::Branch {
        let fan_out = edges.iter().filter(|edge| edge.source == source).count();
        if fan_out >= 2 {
            return Err(ConnectRejection::BranchLimitReached);
        }
        let (label, color) = if fan_out == 0 {
            (EdgeLabel::True, STROKE_TRUE)
        } else {
            (EdgeLabel::False, STROKE_FALSE)
        };
        edge.label = Some(label);
        edge.style = Some(EdgeStyle {
            stroke: color.to_string(),
        });
        edge.label_style = Some(LabelStyle {
            fill: color.to_string(),
        });
    }

    // Converge highlighting applies on top of branch labeling and wins the
    // stroke color.
    if target_node.kind == NodeType::Converge {
        edge.animated = true;
        edge.style = Some(EdgeStyle {
            stroke: STROKE_CONVERGE.to_string(),
        });
    }

    Ok(edge)
}
