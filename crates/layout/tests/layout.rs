use inventory_layout::*;

fn footprint(p: Placement, size: Size, shape: Shape) -> Footprint {
    Footprint {
        center: p.position,
        size,
        shape,
    }
}

#[test]
fn test_root_with_six_children() {
    let config = LayoutConfig::default();
    let root = Position::new(0.0, 0.0);
    let placed = config.place_children(root, Branch::All, 0, &[ChildSpec::default(); 6]);
    let r = config.root_radius;

    for (index, direction) in Direction::ALL.iter().enumerate() {
        let (dx, dy) = direction.unit();
        assert_eq!(placed[index].position, Position::new(dx * r, dy * r));
        assert_eq!(placed[index].direction, *direction);
    }

    // Fifth and sixth share the circle evenly: 240 and 300 degrees.
    for (index, degrees) in [(4usize, 240.0f64), (5, 300.0)] {
        let expected = root.offset_polar(degrees.to_radians(), r);
        assert!((placed[index].position.x - expected.x).abs() < 1e-9);
        assert!((placed[index].position.y - expected.y).abs() < 1e-9);
        // Both point up and to the side; the connector snaps to north.
        assert_eq!(placed[index].direction, Direction::North);
        assert_eq!(
            placed[index].direction.handles(),
            (Handle::NorthSource, Handle::SouthTarget)
        );
    }
}

#[test]
fn test_single_child_west_branch() {
    let config = LayoutConfig::default();
    let node = Position::new(-320.0, 0.0);
    let placed = config.place_children(
        node,
        Branch::Toward(Direction::West),
        1,
        &[ChildSpec::default()],
    );
    let normal = config.normal_radius(1, false);

    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].position.x, node.x - normal);
    assert_eq!(placed[0].position.y, node.y);
}

#[test]
fn test_overlapping_siblings_are_separated() {
    let config = LayoutConfig::default();
    let parent = Position::new(0.0, 0.0);
    let size = Size::new(180.0, 120.0);

    let placed = config.place_children(
        parent,
        Branch::Toward(Direction::East),
        1,
        &[ChildSpec::default(); 2],
    );
    let mut fresh: Vec<Footprint> = placed
        .into_iter()
        .map(|p| footprint(p, size, Shape::Rectangular))
        .collect();
    assert!(check_overlap(&fresh[0], &fresh[1], &config));
    let before = fresh[1].center.distance(&parent);

    let resolution = config.resolve_overlaps(parent, &mut fresh, &[]);

    assert!(!resolution.exhausted);
    assert!(!check_overlap(&fresh[0], &fresh[1], &config));
    assert!(fresh[1].center.distance(&parent) > before);
}

#[test]
fn test_new_nodes_clear_existing_ones() {
    let config = LayoutConfig::default();
    let parent = Position::new(0.0, 0.0);
    let existing = [
        Footprint {
            center: parent,
            size: Size::square(160.0),
            shape: Shape::Circular,
        },
        Footprint {
            center: Position::new(300.0, 0.0),
            size: Size::new(180.0, 60.0),
            shape: Shape::Rectangular,
        },
    ];
    let mut fresh = [Footprint {
        center: Position::new(280.0, 10.0),
        size: Size::new(180.0, 60.0),
        shape: Shape::Rectangular,
    }];

    let resolution = config.resolve_overlaps(parent, &mut fresh, &existing);

    assert!(!resolution.exhausted);
    assert!(find_overlap(&[fresh[0], existing[0]], &config).is_none());
    assert!(find_overlap(&[fresh[0], existing[1]], &config).is_none());
}

#[test]
fn test_fit_focus_on_subset() {
    let config = LayoutConfig::default();
    let root = Position::new(0.0, 0.0);
    let placed = config.place_children(root, Branch::All, 0, &[ChildSpec::default(); 4]);
    let footprints: Vec<Footprint> = placed
        .into_iter()
        .map(|p| footprint(p, Size::square(120.0), Shape::Circular))
        .collect();

    let bounds = Bounds::of(&footprints).expect("non-empty");
    let container = Size::new(1200.0, 800.0);
    let padding = fit_padding(footprints.len(), None);
    let viewport = fit_bounds(&bounds, container, padding, ZoomRange::default());

    let top_left = viewport.to_screen(Position::new(bounds.min_x, bounds.min_y));
    let bottom_right = viewport.to_screen(Position::new(bounds.max_x, bounds.max_y));
    assert!(top_left.x >= 0.0 && top_left.y >= 0.0);
    assert!(bottom_right.x <= container.width && bottom_right.y <= container.height);
}
