mod edge;
mod node;
mod pipeline;
mod template;

pub use edge::{Edge, EdgeId, EdgeLabel, EdgeMarker, EdgeStyle, LabelStyle, STROKE_CONVERGE, STROKE_FALSE, STROKE_TRUE};
pub use node::{END_NODE_ID, Node, NodeId, NodePatch, NodeType, Outputs, Position, START_NODE_ID, SchemaData, is_reserved_id};
pub use pipeline::PipelineModel;
pub use template::{BlockCategory, BlockTemplate, block_catalog, find_template};
