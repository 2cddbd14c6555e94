use std::f64::consts::TAU;

use crate::types::*;

/// What placement needs to know about a child before it exists.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChildSpec {
    /// End decisions sit on an outer ring.
    pub terminal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Position,
    /// Side of the parent the connector leaves from.
    pub direction: Direction,
}

impl LayoutConfig {
    /// Positions for the children of a node at `parent`, in input order.
    ///
    /// `Branch::All` lays the children around the root: the first four on the
    /// cardinal axes, the rest at evenly divided angles around the circle.
    /// Any other branch fans the children around that branch's axis, keeping
    /// end decisions on a ring of their own.
    pub fn place_children(
        &self,
        parent: Position,
        branch: Branch,
        depth: usize,
        children: &[ChildSpec],
    ) -> Vec<Placement> {
        match branch {
            Branch::All => self.place_around_root(parent, depth, children),
            Branch::Toward(direction) => self.place_along(parent, direction, depth, children),
        }
    }

    fn place_around_root(
        &self,
        parent: Position,
        depth: usize,
        children: &[ChildSpec],
    ) -> Vec<Placement> {
        let count = children.len();
        children
            .iter()
            .enumerate()
            .map(|(index, child)| {
                let radius = self.radius_for(child, depth, true);
                if index < 4 {
                    let direction = Direction::from_slot(index);
                    Placement {
                        position: on_axis(parent, direction, radius),
                        direction,
                    }
                } else {
                    let angle = TAU * index as f64 / count as f64;
                    Placement {
                        position: parent.offset_polar(angle, radius),
                        direction: Direction::nearest(angle),
                    }
                }
            })
            .collect()
    }

    fn place_along(
        &self,
        parent: Position,
        direction: Direction,
        depth: usize,
        children: &[ChildSpec],
    ) -> Vec<Placement> {
        let inner: Vec<usize> = (0..children.len())
            .filter(|&i| !children[i].terminal)
            .collect();
        let outer: Vec<usize> = (0..children.len())
            .filter(|&i| children[i].terminal)
            .collect();

        let mut placements = vec![
            Placement {
                position: parent,
                direction,
            };
            children.len()
        ];

        for (group, radius) in [
            (&inner, self.normal_radius(depth, false)),
            (&outer, self.end_decision_radius(depth, false)),
        ] {
            for (slot, &index) in group.iter().enumerate() {
                placements[index].position =
                    self.fan_position(parent, direction, radius, slot, group.len());
            }
        }

        placements
    }

    fn fan_position(
        &self,
        parent: Position,
        direction: Direction,
        radius: f64,
        slot: usize,
        count: usize,
    ) -> Position {
        if count <= 1 {
            // Exactly on the axis; no trigonometry drift for the common case.
            return on_axis(parent, direction, radius);
        }
        let spread = self.fan_spread_degrees.to_radians();
        let step = spread / (count - 1) as f64;
        let angle = direction.angle() - spread / 2.0 + step * slot as f64;
        parent.offset_polar(angle, radius)
    }

    fn radius_for(&self, child: &ChildSpec, depth: usize, is_root: bool) -> f64 {
        if child.terminal {
            self.end_decision_radius(depth, is_root)
        } else {
            self.normal_radius(depth, is_root)
        }
    }
}

fn on_axis(parent: Position, direction: Direction, radius: f64) -> Position {
    let (dx, dy) = direction.unit();
    Position {
        x: parent.x + dx * radius,
        y: parent.y + dy * radius,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs(count: usize) -> Vec<ChildSpec> {
        vec![ChildSpec::default(); count]
    }

    #[test]
    fn test_root_children_take_cardinal_slots() {
        let config = LayoutConfig::default();
        let origin = Position::new(0.0, 0.0);
        let placed = config.place_children(origin, Branch::All, 0, &specs(4));
        let r = config.root_radius;

        assert_eq!(placed[0].position, Position::new(r, 0.0));
        assert_eq!(placed[1].position, Position::new(0.0, r));
        assert_eq!(placed[2].position, Position::new(-r, 0.0));
        assert_eq!(placed[3].position, Position::new(0.0, -r));
        assert_eq!(placed[1].direction, Direction::South);
    }

    #[test]
    fn test_single_child_sits_on_axis() {
        let config = LayoutConfig::default();
        let parent = Position::new(-320.0, 0.0);
        let placed = config.place_children(parent, Branch::Toward(Direction::West), 1, &specs(1));
        let r = config.normal_radius(1, false);

        assert_eq!(placed[0].position, Position::new(-320.0 - r, 0.0));
        assert_eq!(placed[0].direction, Direction::West);
    }

    #[test]
    fn test_fan_stays_within_spread() {
        let config = LayoutConfig::default();
        let parent = Position::new(100.0, 50.0);
        let placed = config.place_children(parent, Branch::Toward(Direction::South), 2, &specs(5));
        let half = config.fan_spread_degrees.to_radians() / 2.0 + 1e-9;

        let mut last = f64::NEG_INFINITY;
        for p in &placed {
            let angle = (p.position.y - parent.y).atan2(p.position.x - parent.x);
            assert!((angle - Direction::South.angle()).abs() <= half);
            assert!(angle > last, "fan must be index ordered");
            last = angle;
        }
    }

    #[test]
    fn test_end_decisions_use_outer_ring() {
        let config = LayoutConfig::default();
        let parent = Position::new(0.0, 0.0);
        let children = [
            ChildSpec { terminal: false },
            ChildSpec { terminal: true },
            ChildSpec { terminal: false },
        ];
        let placed = config.place_children(parent, Branch::Toward(Direction::East), 1, &children);

        let inner = config.normal_radius(1, false);
        let outer = config.end_decision_radius(1, false);
        assert!((placed[0].position.distance(&parent) - inner).abs() < 1e-6);
        assert!((placed[2].position.distance(&parent) - inner).abs() < 1e-6);
        // Lone terminal lands on the axis.
        assert_eq!(placed[1].position, Position::new(outer, 0.0));
    }
}
