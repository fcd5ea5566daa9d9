//! Node definitions for the pipeline canvas.
//!
//! A node is a typed step on the canvas. Two ids are reserved and permanent:
//! `start` and `end` — they are seeded into every fresh canvas and can never
//! be deleted or duplicated.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::template::BlockTemplate;

/// node id
pub type NodeId = String;

/// Reserved id of the seeded start node.
pub const START_NODE_ID: &str = "start";
/// Reserved id of the seeded end node.
pub const END_NODE_ID: &str = "end";

/// Step type of a canvas node.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeType {
    Start,
    End,
    /// Plain execution step; the default for palette blocks that carry no type.
    #[default]
    Block,
    /// Conditional split with up to two labeled (true/false) outgoing edges.
    Branch,
    /// Merge point; incoming edges are highlighted.
    Converge,
    /// Parallel fan-out step.
    Simultaneous,
    /// Repeated execution over an iterator.
    Loop,
}

/// 2D canvas coordinate, owned exclusively by the node.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(
        x: f64,
        y: f64,
    ) -> Self {
        Self { x, y }
    }

    /// Returns this position shifted by the given delta on both axes.
    pub fn offset(
        &self,
        dx: f64,
        dy: f64,
    ) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Output descriptor inside a node's schema data.
///
/// `object_keys` lists the names of the values a step produces; downstream
/// steps surface them as available attributes. Unknown fields are preserved
/// verbatim so externally authored documents survive round trips.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Outputs {
    #[serde(rename = "objectKeys", default, skip_serializing_if = "Vec::is_empty")]
    pub object_keys: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-step configuration document.
///
/// The canvas treats this as opaque apart from `inputs` and `outputs`, which
/// the upstream resolver reads. All keys the core does not model are kept in
/// `extra` and written back unchanged on save.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SchemaData {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// input key/value mapping configured by the step form
    #[serde(default)]
    pub inputs: Map<String, Value>,
    /// output descriptor
    #[serde(default)]
    pub outputs: Outputs,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SchemaData {
    /// Shallow-merges a key/value document into this schema data.
    ///
    /// Patch entries overwrite existing keys at the top level only. A patch
    /// that produces an undeserializable document leaves the schema data
    /// unchanged.
    pub fn merge(
        &mut self,
        patch: &Map<String, Value>,
    ) {
        let Ok(Value::Object(mut doc)) = serde_json::to_value(&*self) else {
            return;
        };
        for (key, value) in patch {
            doc.insert(key.clone(), value.clone());
        }
        match serde_json::from_value(Value::Object(doc)) {
            Ok(merged) => *self = merged,
            Err(e) => tracing::debug!("schema data patch discarded: {}", e),
        }
    }
}

/// A typed step on the pipeline canvas.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Node {
    /// node id, unique within the canvas
    pub id: NodeId,
    /// step type
    #[serde(rename = "type")]
    pub kind: NodeType,
    /// visual/handle-layout subtype
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// display name
    pub label: String,
    /// canvas coordinate
    pub position: Position,
    /// branch condition expression, present only on branch nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// loop iterator expression, present only on loop nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterator: Option<String>,
    /// step configuration document
    #[serde(rename = "schemaData", default)]
    pub schema_data: SchemaData,
}

impl Node {
    /// Synthesizes a node from a palette template dropped at `position`.
    ///
    /// The id is `<template-id>-<at_millis>`, so the drop timestamp makes
    /// repeated drops of the same template distinct.
    pub fn from_template(
        template: &BlockTemplate,
        position: Position,
        at_millis: i64,
    ) -> Self {
        let id = format!("{}-{}", template.id, at_millis);
        let schema_data = SchemaData {
            label: template.label.clone(),
            id: template.id.clone(),
            kind: template.kind,
            variant: template.variant.clone(),
            ..SchemaData::default()
        };

        Self {
            id,
            kind: template.kind,
            variant: template.variant.clone(),
            label: template.label.clone(),
            position,
            condition: (template.kind == NodeType::Branch).then(String::new),
            iterator: (template.kind == NodeType::Loop).then(String::new),
            schema_data,
        }
    }

    /// Whether this is one of the permanent `start`/`end` bookkeeping nodes.
    pub fn is_reserved(&self) -> bool {
        is_reserved_id(&self.id)
    }
}

/// Whether an id names one of the permanent `start`/`end` nodes.
pub fn is_reserved_id(id: &str) -> bool {
    id == START_NODE_ID || id == END_NODE_ID
}

/// Partial node update applied by [`update_node`](crate::CanvasStore::update_node).
///
/// Scalar fields replace the node's fields wholesale when present; the
/// `schema_data` document is shallow-merged instead of replaced.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct NodePatch {
    #[serde(rename = "type")]
    pub kind: Option<NodeType>,
    pub variant: Option<String>,
    pub label: Option<String>,
    pub position: Option<Position>,
    pub condition: Option<String>,
    pub iterator: Option<String>,
    #[serde(rename = "schemaData")]
    pub schema_data: Option<Map<String, Value>>,
}

impl NodePatch {
    /// Applies this patch to a node in place.
    pub fn apply(
        &self,
        node: &mut Node,
    ) {
        if let Some(kind) = self.kind {
            node.kind = kind;
        }
        if let Some(variant) = &self.variant {
            node.variant = Some(variant.clone());
        }
        if let Some(label) = &self.label {
            node.label = label.clone();
        }
        if let Some(position) = self.position {
            node.position = position;
        }
        if let Some(condition) = &self.condition {
            node.condition = Some(condition.clone());
        }
        if let Some(iterator) = &self.iterator {
            node.iterator = Some(iterator.clone());
        }
        if let Some(patch) = &self.schema_data {
            node.schema_data.merge(patch);
        }
    }
}
