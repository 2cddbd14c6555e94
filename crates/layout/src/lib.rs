//! Geometry for the decision inventory: where children go when a node
//! expands, when two nodes collide, and how to frame the result.

mod layout;
mod overlap;
mod types;
mod viewport;

pub use layout::{ChildSpec, Placement};
pub use overlap::{Resolution, check_overlap, find_overlap};
pub use types::*;
pub use viewport::{
    Bounds, Viewport, ZoomRange, center_on, expand_all_zoom, fit_bounds, fit_padding,
};
