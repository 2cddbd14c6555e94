use crate::types::*;

/// Outcome of an overlap resolution run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Number of pushes applied.
    pub steps: usize,
    /// The step budget ran out before the layout was clean. Positions are best-effort.
    pub exhausted: bool,
}

enum Bound {
    Circle { radius: f64 },
    Rect { half_width: f64, half_height: f64 },
}

fn bound(footprint: &Footprint, config: &LayoutConfig) -> Bound {
    match footprint.shape {
        Shape::Circular => Bound::Circle {
            radius: footprint.size.width.max(footprint.size.height) / 2.0 * config.circle_safety,
        },
        Shape::Rectangular => Bound::Rect {
            half_width: footprint.size.width / 2.0 * config.rect_safety,
            half_height: footprint.size.height / 2.0 * config.rect_safety,
        },
    }
}

/// Whether two footprints, inflated by their safety factors, come closer than
/// the shared buffer.
pub fn check_overlap(a: &Footprint, b: &Footprint, config: &LayoutConfig) -> bool {
    let dx = (a.center.x - b.center.x).abs();
    let dy = (a.center.y - b.center.y).abs();
    let buffer = config.buffer;

    match (bound(a, config), bound(b, config)) {
        (Bound::Circle { radius: ra }, Bound::Circle { radius: rb }) => {
            a.center.distance(&b.center) < ra + rb + buffer
        }
        (
            Bound::Rect {
                half_width: wa,
                half_height: ha,
            },
            Bound::Rect {
                half_width: wb,
                half_height: hb,
            },
        ) => dx < wa + wb + buffer && dy < ha + hb + buffer,
        (
            Bound::Circle { radius },
            Bound::Rect {
                half_width,
                half_height,
            },
        )
        | (
            Bound::Rect {
                half_width,
                half_height,
            },
            Bound::Circle { radius },
        ) => dx < radius + half_width + buffer && dy < radius + half_height + buffer,
    }
}

/// First overlapping pair in `footprints`, if any.
pub fn find_overlap(footprints: &[Footprint], config: &LayoutConfig) -> Option<(usize, usize)> {
    for i in 0..footprints.len() {
        for j in (i + 1)..footprints.len() {
            if check_overlap(&footprints[i], &footprints[j], config) {
                return Some((i, j));
            }
        }
    }
    None
}

/// Moves `footprint` away from `origin` along its own ray.
fn push_away(footprint: &mut Footprint, origin: Position, factor: f64, fallback: f64) {
    let dx = footprint.center.x - origin.x;
    let dy = footprint.center.y - origin.y;
    if dx.abs() < f64::EPSILON && dy.abs() < f64::EPSILON {
        footprint.center.x += fallback;
        return;
    }
    footprint.center = Position {
        x: origin.x + dx * factor,
        y: origin.y + dy * factor,
    };
}

impl LayoutConfig {
    /// Separates the footprints of one expansion batch.
    ///
    /// Only `fresh` moves. New nodes are first separated from each other, then
    /// from everything already on the canvas; rounds repeat until nothing moves
    /// or `max_resolution_steps` pushes have been spent.
    pub fn resolve_overlaps(
        &self,
        parent: Position,
        fresh: &mut [Footprint],
        existing: &[Footprint],
    ) -> Resolution {
        let mut steps = 0;
        let exhausted = |steps| Resolution {
            steps,
            exhausted: true,
        };

        loop {
            let mut moved = false;

            // Siblings against each other: the later one yields.
            let mut i = 0;
            while i < fresh.len() {
                let mut j = i + 1;
                while j < fresh.len() {
                    if check_overlap(&fresh[i], &fresh[j], self) {
                        if steps >= self.max_resolution_steps {
                            return exhausted(steps);
                        }
                        push_away(&mut fresh[j], parent, self.sibling_push, self.buffer);
                        steps += 1;
                        moved = true;
                        j = i + 1;
                        continue;
                    }
                    j += 1;
                }
                i += 1;
            }

            // New against old: only the new node moves, and the scan restarts.
            for node in fresh.iter_mut() {
                let mut k = 0;
                while k < existing.len() {
                    if check_overlap(node, &existing[k], self) {
                        if steps >= self.max_resolution_steps {
                            return exhausted(steps);
                        }
                        push_away(node, parent, self.existing_push, self.buffer);
                        steps += 1;
                        moved = true;
                        k = 0;
                        continue;
                    }
                    k += 1;
                }
            }

            if !moved {
                return Resolution {
                    steps,
                    exhausted: false,
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn circle(x: f64, y: f64, d: f64) -> Footprint {
        Footprint {
            center: Position::new(x, y),
            size: Size::square(d),
            shape: Shape::Circular,
        }
    }

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Footprint {
        Footprint {
            center: Position::new(x, y),
            size: Size::new(w, h),
            shape: Shape::Rectangular,
        }
    }

    #[test]
    fn test_circle_pair_uses_buffer() {
        let config = LayoutConfig::default();
        // Radii 60 each after safety, plus 75 buffer: threshold 195.
        let a = circle(0.0, 0.0, 100.0);
        assert!(check_overlap(&a, &circle(190.0, 0.0, 100.0), &config));
        assert!(!check_overlap(&a, &circle(200.0, 0.0, 100.0), &config));
    }

    #[test]
    fn test_rect_pair_needs_both_axes() {
        let config = LayoutConfig::default();
        let a = rect(0.0, 0.0, 100.0, 40.0);
        // Vertical threshold: 26 + 26 + 75 = 127.
        assert!(check_overlap(&a, &rect(0.0, 120.0, 100.0, 40.0), &config));
        assert!(!check_overlap(&a, &rect(0.0, 130.0, 100.0, 40.0), &config));
        // Close vertically, far horizontally.
        assert!(!check_overlap(&a, &rect(300.0, 0.0, 100.0, 40.0), &config));
    }

    #[test]
    fn test_mixed_pair_is_symmetric() {
        let config = LayoutConfig::default();
        let c = circle(0.0, 0.0, 100.0);
        let r = rect(190.0, 0.0, 100.0, 40.0);
        assert_eq!(
            check_overlap(&c, &r, &config),
            check_overlap(&r, &c, &config)
        );
        assert!(check_overlap(&c, &r, &config));
    }

    #[test]
    fn test_siblings_are_pushed_apart() {
        let config = LayoutConfig::default();
        let parent = Position::new(0.0, 0.0);
        let mut fresh = [rect(300.0, 0.0, 180.0, 60.0), rect(300.0, 40.0, 180.0, 60.0)];
        let before = fresh[1].center.distance(&parent);

        let resolution = config.resolve_overlaps(parent, &mut fresh, &[]);

        assert!(!resolution.exhausted);
        assert!(resolution.steps > 0);
        assert!(!check_overlap(&fresh[0], &fresh[1], &config));
        assert!(fresh[1].center.distance(&parent) > before);
        assert_eq!(fresh[0].center, Position::new(300.0, 0.0));
    }

    #[test]
    fn test_budget_is_respected() {
        let config = LayoutConfig {
            max_resolution_steps: 1,
            ..Default::default()
        };
        let parent = Position::new(0.0, 0.0);
        let mut fresh = [
            rect(100.0, 0.0, 180.0, 60.0),
            rect(101.0, 0.0, 180.0, 60.0),
            rect(102.0, 0.0, 180.0, 60.0),
        ];
        let resolution = config.resolve_overlaps(parent, &mut fresh, &[]);
        assert!(resolution.exhausted);
        assert_eq!(resolution.steps, 1);
    }

    fn footprint_strategy() -> impl Strategy<Value = Footprint> {
        (
            -800.0f64..800.0,
            -800.0f64..800.0,
            40.0f64..220.0,
            30.0f64..120.0,
            any::<bool>(),
        )
            .prop_map(|(x, y, w, h, round)| {
                if round {
                    circle(x, y, w)
                } else {
                    rect(x, y, w, h)
                }
            })
    }

    proptest! {
        /// After a clean resolution no new node overlaps anything.
        #[test]
        fn prop_resolution_leaves_no_overlap(
            mut fresh in proptest::collection::vec(footprint_strategy(), 1..6),
            existing in proptest::collection::vec(footprint_strategy(), 0..6),
        ) {
            let config = LayoutConfig::default();
            let parent = Position::new(0.0, 0.0);
            let resolution = config.resolve_overlaps(parent, &mut fresh, &existing);
            prop_assume!(!resolution.exhausted);

            for (i, a) in fresh.iter().enumerate() {
                for b in fresh.iter().skip(i + 1) {
                    prop_assert!(!check_overlap(a, b, &config));
                }
                for b in &existing {
                    prop_assert!(!check_overlap(a, b, &config));
                }
            }
        }
    }
}
