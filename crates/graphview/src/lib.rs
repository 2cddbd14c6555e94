//! Decision inventory graph view.
//!
//! Holds a read-only decision graph and the part of it currently expanded
//! onto the canvas. Expanding a node lays its children out radially around the
//! root; collapsing removes everything below it.

mod bulk;
mod cancellation;
mod config;
mod edge;
mod error;
mod graph;
mod inventory;
mod model;
mod node;
mod render;

pub use bulk::BulkOutcome;
pub use cancellation::CancellationToken;
pub use config::InventoryConfig;
pub use edge::VisibleEdge;
pub use error::InventoryError;
pub use graph::VisibleGraph;
pub use inventory::{FitOptions, Inventory, InventoryEvent, ViewRequest};
pub use model::{Category, Classifier, Graph, GraphEdge, GraphNode, build_children_map};
pub use node::VisibleNode;
pub use render::{
    CharWidthMeasure, RenderEdge, RenderNode, RenderScene, TextMeasure, base_size,
    computed_size, display_title, icon_for,
};
