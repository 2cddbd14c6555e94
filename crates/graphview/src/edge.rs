use inventory_layout::{Direction, Handle};
use serde::{Deserialize, Serialize};

/// Connector between two visible nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_handle: Handle,
    pub target_handle: Handle,
}

impl VisibleEdge {
    /// Edge leaving `source` toward `direction`; handles follow the direction.
    ///
    /// The id carries the source length so ids stay unique when node ids
    /// themselves contain dashes.
    pub fn new(source: &str, target: &str, direction: Direction) -> Self {
        let (source_handle, target_handle) = direction.handles();
        Self {
            id: format!("e-{}:{source}-{target}", source.len()),
            source: source.to_string(),
            target: target.to_string(),
            source_handle,
            target_handle,
        }
    }

    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}
