//! Palette block templates.
//!
//! Templates are the read-only descriptors behind the draggable palette: a
//! drop gesture hands one of these to [`add_node`](crate::CanvasStore::add_node)
//! together with the drop position. The built-in catalog mirrors the palette
//! shipped with the designer; hosts may define their own templates as well.

use serde::{Deserialize, Serialize};

use crate::model::node::NodeType;

/// A draggable palette entry.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BlockTemplate {
    /// template id, the prefix of every node id synthesized from it
    pub id: String,
    /// step type of nodes created from this template
    #[serde(rename = "type", default)]
    pub kind: NodeType,
    /// visual/handle-layout subtype
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// display name
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// palette category this template is listed under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl BlockTemplate {
    pub fn new(
        id: &str,
        kind: NodeType,
        label: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            kind,
            label: label.to_string(),
            ..Self::default()
        }
    }

    fn catalog_entry(
        id: &str,
        kind: NodeType,
        variant: &str,
        label: &str,
        category: &str,
        description: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            kind,
            variant: Some(variant.to_string()),
            label: label.to_string(),
            icon: Some("/assets/palette_child.svg".to_string()),
            description: Some(description.to_string()),
            category: Some(category.to_string()),
        }
    }
}

/// A palette category grouping related templates.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BlockCategory {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub blocks: Vec<BlockTemplate>,
}

/// The built-in palette catalog.
pub fn block_catalog() -> Vec<BlockCategory> {
    vec![
        BlockCategory {
            id: "flow-control".to_string(),
            label: "Flow Control".to_string(),
            description: Some("Blocks for controlling the flow of execution".to_string()),
            blocks: vec![
                BlockTemplate::catalog_entry(
                    "branch-default",
                    NodeType::Branch,
                    "default",
                    "Branch",
                    "flow-control",
                    "Split flow into two paths based on a condition",
                ),
                BlockTemplate::catalog_entry(
                    "branch-alternative",
                    NodeType::Branch,
                    "diamond",
                    "Branch (Alternative)",
                    "flow-control",
                    "Alternative branch style with different handle positions",
                ),
                BlockTemplate::catalog_entry(
                    "converge-default",
                    NodeType::Converge,
                    "default",
                    "Converge",
                    "flow-control",
                    "Merge multiple paths into one",
                ),
                BlockTemplate::catalog_entry(
                    "converge-circular",
                    NodeType::Converge,
                    "circular",
                    "Converge (Circular)",
                    "flow-control",
                    "Circular style converge node",
                ),
            ],
        },
        BlockCategory {
            id: "execution".to_string(),
            label: "Execution".to_string(),
            description: Some("Blocks for parallel and repeated execution".to_string()),
            blocks: vec![
                BlockTemplate::catalog_entry(
                    "simultaneous-default",
                    NodeType::Simultaneous,
                    "default",
                    "Simultaneous",
                    "execution",
                    "Execute multiple paths in parallel",
                ),
                BlockTemplate::catalog_entry(
                    "simultaneous-compact",
                    NodeType::Simultaneous,
                    "compact",
                    "Simultaneous (Compact)",
                    "execution",
                    "Compact version of simultaneous execution",
                ),
                BlockTemplate::catalog_entry(
                    "loop-default",
                    NodeType::Loop,
                    "default",
                    "Loop",
                    "execution",
                    "Repeat execution in a loop",
                ),
                BlockTemplate::catalog_entry(
                    "loop-square",
                    NodeType::Loop,
                    "square",
                    "Loop (Square)",
                    "execution",
                    "Square variant of loop block",
                ),
            ],
        },
        BlockCategory {
            id: "basic".to_string(),
            label: "Basic".to_string(),
            description: Some("Basic flow blocks".to_string()),
            blocks: vec![
                BlockTemplate::catalog_entry(
                    "block-default",
                    NodeType::Block,
                    "default",
                    "Block",
                    "basic",
                    "Standard block for basic operations",
                ),
                BlockTemplate::catalog_entry(
                    "block-wide",
                    NodeType::Block,
                    "wide",
                    "Wide Block",
                    "basic",
                    "Wider block for complex operations",
                ),
            ],
        },
    ]
}

/// Looks up a template in the built-in catalog by id.
pub fn find_template(id: &str) -> Option<BlockTemplate> {
    block_catalog().into_iter().flat_map(|category| category.blocks).find(|template| template.id == id)
}
