//! Serialized pipeline document.
//!
//! `{nodes, edges}` is the exact shape round-tripped through external
//! storage (typically a `pipeline.json` pushed to a repository host). The
//! core never performs the I/O itself; persistence collaborators read a
//! snapshot, serialize it, and later hand a deserialized document back to
//! [`CanvasStore::load`](crate::CanvasStore::load).

use serde::{Deserialize, Serialize};

use crate::{
    PipecraftError, Result,
    model::{edge::Edge, node::Node},
};

/// The persisted `{nodes, edges}` pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PipelineModel {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl PipelineModel {
    pub fn new(
        nodes: Vec<Node>,
        edges: Vec<Edge>,
    ) -> Self {
        Self { nodes, edges }
    }

    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str::<PipelineModel>(s).map_err(|e| PipecraftError::Pipeline(format!("invalid pipeline document: {}", e)))
    }

    /// Pretty-printed document, the format pushed to repository hosts.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(PipecraftError::from)
    }
}
