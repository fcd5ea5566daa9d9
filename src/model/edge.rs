//! Edge definitions for the pipeline canvas.
//!
//! Edges are directed connections between two existing node ids. Their label
//! and styling are assigned by the connection validator, never free-form:
//! branch sources hand out true/false labels, converge targets animate their
//! incoming edges.

use serde::{Deserialize, Serialize};

use crate::model::node::NodeId;

/// edge id, derived as `<source>-<target>`
pub type EdgeId = String;

/// Stroke color of the first (affirmative) branch edge.
pub const STROKE_TRUE: &str = "#22c55e";
/// Stroke color of the second (negative) branch edge.
pub const STROKE_FALSE: &str = "#ef4444";
/// Stroke color of edges flowing into a converge node.
pub const STROKE_CONVERGE: &str = "#3b82f6";

/// Branch edge label.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EdgeLabel {
    True,
    False,
}

/// Stroke styling applied by the connection validator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EdgeStyle {
    pub stroke: String,
}

/// Label styling, colored to match the edge stroke.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LabelStyle {
    pub fill: String,
}

/// Arrowhead marker rendered at the target end of every edge.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EdgeMarker {
    #[serde(rename = "type")]
    pub kind: String,
    pub width: u32,
    pub height: u32,
}

impl Default for EdgeMarker {
    fn default() -> Self {
        Self {
            kind: "arrowclosed".to_string(),
            width: 20,
            height: 20,
        }
    }
}

/// A directed connection between two canvas nodes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Edge {
    /// edge id
    pub id: EdgeId,
    /// id of the source node
    pub source: NodeId,
    /// id of the target node, never equal to `source`
    pub target: NodeId,
    /// branch label, assigned by the connection validator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<EdgeLabel>,
    /// converge highlight
    #[serde(default)]
    pub animated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<EdgeStyle>,
    #[serde(rename = "labelStyle", default, skip_serializing_if = "Option::is_none")]
    pub label_style: Option<LabelStyle>,
    /// user-created edges are always deletable
    #[serde(default = "deletable_default")]
    pub deletable: bool,
    #[serde(rename = "markerEnd", default)]
    pub marker_end: EdgeMarker,
}

fn deletable_default() -> bool {
    true
}

impl Edge {
    /// Deterministic edge id for a `(source, target)` pair.
    pub fn derive_id(
        source: &str,
        target: &str,
    ) -> EdgeId {
        format!("{}-{}", source, target)
    }

    /// Creates a plain unlabeled edge with default styling.
    pub fn plain(
        source: &str,
        target: &str,
    ) -> Self {
        Self {
            id: Self::derive_id(source, target),
            source: source.to_string(),
            target: target.to_string(),
            label: None,
            animated: false,
            style: None,
            label_style: None,
            deletable: true,
            marker_end: EdgeMarker::default(),
        }
    }
}
