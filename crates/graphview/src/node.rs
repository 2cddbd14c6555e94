use inventory_layout::{Footprint, Position, Shape, Size};
use serde::{Deserialize, Serialize};

use crate::model::Category;

/// A node currently on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibleNode {
    pub id: String,
    pub position: Position,
    /// Distance from the root in the visible graph.
    pub depth: usize,
    pub shape: Shape,
    pub category: Category,
    pub expanded: bool,
    /// Children in the full graph, visible or not.
    pub child_count: usize,
    /// Footprint estimate used for collision checks.
    pub size: Size,
    pub title: String,
}

impl VisibleNode {
    pub fn footprint(&self) -> Footprint {
        Footprint {
            center: self.position,
            size: self.size,
            shape: self.shape,
        }
    }

    pub fn is_root(&self) -> bool {
        self.depth == 0
    }
}
