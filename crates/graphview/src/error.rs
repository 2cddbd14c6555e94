use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("graph has no resolvable root node")]
    NoRootFound,
    #[error("node `{0}` is not in the visible graph")]
    UnknownNode(String),
    #[error("invalid root marker pattern: {0}")]
    InvalidRootMarker(#[from] regex::Error),
    #[error("visible graph did not settle within {cycles} cycles")]
    Unsettled { cycles: usize },
}
