use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn square(side: f64) -> Self {
        Self {
            width: side,
            height: side,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Point at `radius` from `self` along `angle` (radians, screen space: +y is down).
    pub fn offset_polar(&self, angle: f64, radius: f64) -> Position {
        Position {
            x: self.x + radius * angle.cos(),
            y: self.y + radius * angle.sin(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circular,
    Rectangular,
}

/// Space a node occupies on the canvas, centred on `center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub center: Position,
    pub size: Size,
    pub shape: Shape,
}

/// The four expansion directions, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    East,
    South,
    West,
    North,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
    ];

    /// Slot `index mod 4` of the cardinal table.
    pub fn from_slot(index: usize) -> Direction {
        Self::ALL[index % 4]
    }

    pub fn unit(self) -> (f64, f64) {
        match self {
            Direction::East => (1.0, 0.0),
            Direction::South => (0.0, 1.0),
            Direction::West => (-1.0, 0.0),
            Direction::North => (0.0, -1.0),
        }
    }

    pub fn angle(self) -> f64 {
        use std::f64::consts::{FRAC_PI_2, PI};
        match self {
            Direction::East => 0.0,
            Direction::South => FRAC_PI_2,
            Direction::West => PI,
            Direction::North => 3.0 * FRAC_PI_2,
        }
    }

    /// Nearest cardinal direction to an arbitrary angle.
    pub fn nearest(angle: f64) -> Direction {
        let turn = std::f64::consts::FRAC_PI_2;
        let slot = (angle.rem_euclid(std::f64::consts::TAU) / turn).round() as usize;
        Direction::from_slot(slot)
    }

    /// Direction of `to` as seen from `from`, snapped to the nearest cardinal.
    pub fn between(from: &Position, to: &Position) -> Direction {
        Direction::nearest((to.y - from.y).atan2(to.x - from.x))
    }

    /// Connector pair used by every edge leaving a node in this direction.
    pub fn handles(self) -> (Handle, Handle) {
        match self {
            Direction::East => (Handle::EastSource, Handle::WestTarget),
            Direction::South => (Handle::SouthSource, Handle::NorthTarget),
            Direction::West => (Handle::WestSource, Handle::EastTarget),
            Direction::North => (Handle::NorthSource, Handle::SouthTarget),
        }
    }
}

/// Side of a shape a connector attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Handle {
    EastSource,
    SouthSource,
    WestSource,
    NorthSource,
    EastTarget,
    SouthTarget,
    WestTarget,
    NorthTarget,
}

impl Handle {
    pub fn as_str(self) -> &'static str {
        match self {
            Handle::EastSource => "east-source",
            Handle::SouthSource => "south-source",
            Handle::WestSource => "west-source",
            Handle::NorthSource => "north-source",
            Handle::EastTarget => "east-target",
            Handle::SouthTarget => "south-target",
            Handle::WestTarget => "west-target",
            Handle::NorthTarget => "north-target",
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Handle::EastSource | Handle::EastTarget => Direction::East,
            Handle::SouthSource | Handle::SouthTarget => Direction::South,
            Handle::WestSource | Handle::WestTarget => Direction::West,
            Handle::NorthSource | Handle::NorthTarget => Direction::North,
        }
    }
}

/// Which way a subtree grows: one cardinal arm, or every arm for the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    All,
    Toward(Direction),
}

impl Branch {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Branch::All => None,
            Branch::Toward(direction) => Some(direction),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Radius of the ring around the root.
    pub root_radius: f64,
    /// Radius of the first ring around any other node.
    pub base_radius: f64,
    /// Added to the radius for every level of nesting.
    pub depth_increment: f64,
    /// Extra distance that keeps end decisions outside their siblings.
    pub end_decision_offset: f64,
    pub fan_spread_degrees: f64,
    pub circle_safety: f64,
    pub rect_safety: f64,
    pub buffer: f64,
    pub sibling_push: f64,
    pub existing_push: f64,
    pub max_resolution_steps: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            root_radius: 320.0,
            base_radius: 260.0,
            depth_increment: 40.0,
            end_decision_offset: 140.0,
            fan_spread_degrees: 36.0,
            circle_safety: 1.2,
            rect_safety: 1.3,
            buffer: 75.0,
            sibling_push: 1.3,
            existing_push: 1.5,
            max_resolution_steps: 256,
        }
    }
}

impl LayoutConfig {
    pub fn normal_radius(&self, depth: usize, is_root: bool) -> f64 {
        let base = if is_root {
            self.root_radius
        } else {
            self.base_radius
        };
        base + depth as f64 * self.depth_increment
    }

    pub fn end_decision_radius(&self, depth: usize, is_root: bool) -> f64 {
        self.normal_radius(depth, is_root) + self.end_decision_offset
    }
}
