//! # Pipecraft
//!
//! Pipecraft is an embeddable pipeline graph state engine: the headless core
//! behind a visual drag-and-drop pipeline designer. It keeps the node/edge
//! graph consistent, enforces per-node-type connection rules, supports
//! linear undo/redo, resolves upstream data dependencies between steps, and
//! validates start-to-end reachability.
//!
//! ## Core Features
//!
//! - **Single Source of Truth**: a reducer-driven store holding the canonical
//!   node/edge collections and their snapshot history
//! - **Connection Rules**: branch fan-out with true/false labeling, converge
//!   highlighting, self-loop and duplicate rejection
//! - **Node Lifecycle**: add from palette templates, partial update, cascading
//!   delete, duplicate with fresh identity
//! - **Pure Queries**: upstream attribute resolution and breadth-first
//!   reachability validation over the live snapshot
//!
//! ## Quick Start
//!
//! ```rust
//! use pipecraft::{CanvasStore, Position, find_template};
//!
//! let store = CanvasStore::new();
//! let template = find_template("block-default").unwrap();
//!
//! let id = store.add_node(&template, Position::new(400.0, 200.0));
//! store.connect("start", &id);
//! store.connect(&id, "end");
//!
//! assert!(store.validate().has_valid_path);
//! ```
//!
//! The store never performs I/O: persistence collaborators call
//! [`CanvasStore::to_model`] to serialize and [`CanvasStore::load`] to
//! restore, and renderers follow the live state through
//! [`CanvasStore::subscribe`].

mod canvas;
mod common;
mod config;
mod error;
mod events;
mod model;
mod utils;

use std::sync::{Arc, RwLock};

pub use canvas::{CanvasAction, CanvasState, CanvasStore, ConnectOutcome, ConnectRejection, FlowDiagnostics, FlowGraph, Snapshot, UpstreamAttributes};
pub use config::CanvasConfig;
pub use error::PipecraftError;
pub use events::CanvasEvent;
pub use model::*;
pub use utils::time_millis;

/// Result type alias for Pipecraft operations.
pub type Result<T> = std::result::Result<T, PipecraftError>;

/// Thread-safe shared lock wrapper using Arc<RwLock<T>>.
pub(crate) type ShareLock<T> = Arc<RwLock<T>>;
