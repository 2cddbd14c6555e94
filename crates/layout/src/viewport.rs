use serde::{Deserialize, Serialize};

use crate::types::*;

/// Axis-aligned box around a set of footprints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn of<'a>(footprints: impl IntoIterator<Item = &'a Footprint>) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        for f in footprints {
            let half_w = f.size.width / 2.0;
            let half_h = f.size.height / 2.0;
            let b = bounds.get_or_insert(Bounds {
                min_x: f64::INFINITY,
                min_y: f64::INFINITY,
                max_x: f64::NEG_INFINITY,
                max_y: f64::NEG_INFINITY,
            });
            b.min_x = b.min_x.min(f.center.x - half_w);
            b.min_y = b.min_y.min(f.center.y - half_h);
            b.max_x = b.max_x.max(f.center.x + half_w);
            b.max_y = b.max_y.max(f.center.y + half_h);
        }
        bounds
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Position {
        Position {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }
}

/// Zoom and pan that map canvas coordinates onto a container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub zoom: f64,
    /// Screen position of the canvas origin.
    pub pan: Position,
}

impl Viewport {
    pub fn to_screen(&self, p: Position) -> Position {
        Position {
            x: p.x * self.zoom + self.pan.x,
            y: p.y * self.zoom + self.pan.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self { min: 0.1, max: 2.0 }
    }
}

impl ZoomRange {
    /// Bounds `zoom` to the range. Unlike `f64::clamp` this never panics on a
    /// range loaded with `min > max`; `max` wins.
    pub fn clamp(self, zoom: f64) -> f64 {
        zoom.max(self.min).min(self.max)
    }
}

/// Relative padding for a fit: the more nodes, the tighter the frame.
///
/// East-growing focus gets extra room because host chrome usually sits on
/// that side of the viewport.
pub fn fit_padding(node_count: usize, focus: Option<Direction>) -> f64 {
    let base = match node_count {
        0..=3 => 0.5,
        4..=8 => 0.35,
        9..=20 => 0.25,
        21..=50 => 0.15,
        _ => 0.1,
    };
    match focus {
        Some(Direction::East) => base + 0.15,
        _ => base,
    }
}

/// Zoom used after expanding everything: shrinks with the square root of the
/// node count, bounded by `range`.
pub fn expand_all_zoom(node_count: usize, range: ZoomRange) -> f64 {
    let count = node_count.max(1) as f64;
    range.clamp(2.2 / count.sqrt())
}

/// Fits `bounds` into `container`, keeping `padding` (a fraction of the
/// container) free on every side.
pub fn fit_bounds(bounds: &Bounds, container: Size, padding: f64, range: ZoomRange) -> Viewport {
    let padding = padding.clamp(0.0, 0.9);
    let available_width = container.width * (1.0 - padding);
    let available_height = container.height * (1.0 - padding);

    let content_width = bounds.width().max(1.0);
    let content_height = bounds.height().max(1.0);

    let zoom = (available_width / content_width)
        .min(available_height / content_height);
    let zoom = range.clamp(zoom);

    center_on(bounds.center(), container, zoom)
}

/// Viewport that shows `point` in the middle of `container` at `zoom`.
pub fn center_on(point: Position, container: Size, zoom: f64) -> Viewport {
    Viewport {
        zoom,
        pan: Position {
            x: container.width / 2.0 - point.x * zoom,
            y: container.height / 2.0 - point.y * zoom,
        },
    }
}
