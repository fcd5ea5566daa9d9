mod connect;
mod flowgraph;
mod state;
mod store;
mod upstream;

pub use connect::{ConnectOutcome, ConnectRejection};
pub use flowgraph::{FlowDiagnostics, FlowGraph};
pub use state::{CanvasAction, CanvasState, Snapshot};
pub use store::CanvasStore;
pub use upstream::UpstreamAttributes;
