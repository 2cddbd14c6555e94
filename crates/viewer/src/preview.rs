//! Static SVG preview of a render scene.

use graphview::{Category, RenderScene};
use inventory_layout::{Bounds, Footprint, Shape};
use svg::Document;
use svg::node::element::{Circle, Group, Line, Rectangle, Text};

const MARGIN: f64 = 40.0;

fn fill_for(category: Category) -> &'static str {
    match category {
        Category::Root => "#1f3a5f",
        Category::KeyParadigm => "#3d6fa8",
        Category::StrategicInquiry => "#5b8fc7",
        Category::GuidingInquiry => "#8fb3dc",
        Category::Scenario => "#e8eef6",
        Category::Kpi => "#f4e3c1",
        Category::EndDecision => "#f1c9c1",
    }
}

fn text_color(category: Category) -> &'static str {
    match category {
        Category::Root | Category::KeyParadigm | Category::StrategicInquiry => "white",
        _ => "#1a1a1a",
    }
}

pub fn render_svg(scene: &RenderScene) -> Document {
    let footprints: Vec<Footprint> = scene
        .nodes
        .iter()
        .map(|n| Footprint {
            center: n.position,
            size: n.size,
            shape: n.shape,
        })
        .collect();
    let (x, y, width, height) = match Bounds::of(&footprints) {
        Some(b) => (
            b.min_x - MARGIN,
            b.min_y - MARGIN,
            b.width() + 2.0 * MARGIN,
            b.height() + 2.0 * MARGIN,
        ),
        None => (0.0, 0.0, 100.0, 100.0),
    };

    let mut document = Document::new()
        .set("viewBox", (x, y, width, height))
        .set("width", width)
        .set("height", height)
        .add(
            Rectangle::new()
                .set("x", x)
                .set("y", y)
                .set("width", "100%")
                .set("height", "100%")
                .set("fill", "white"),
        );

    // Edges first so nodes paint over their ends.
    for edge in &scene.edges {
        let (Some(source), Some(target)) = (scene.node(&edge.source), scene.node(&edge.target))
        else {
            continue;
        };
        document = document.add(
            Line::new()
                .set("id", edge.id.as_str())
                .set("data-source-handle", edge.source_handle.as_str())
                .set("data-target-handle", edge.target_handle.as_str())
                .set("x1", source.position.x)
                .set("y1", source.position.y)
                .set("x2", target.position.x)
                .set("y2", target.position.y)
                .set("stroke", "#8a8a8a")
                .set("stroke-width", 2),
        );
    }

    for node in &scene.nodes {
        let fill = fill_for(node.category);
        let mut group = Group::new()
            .set("id", node.id.as_str())
            .set("class", node.category.as_str());
        group = match node.shape {
            Shape::Circular => group.add(
                Circle::new()
                    .set("cx", node.position.x)
                    .set("cy", node.position.y)
                    .set("r", node.size.width / 2.0)
                    .set("fill", fill)
                    .set("stroke", "black"),
            ),
            Shape::Rectangular => group.add(
                Rectangle::new()
                    .set("x", node.position.x - node.size.width / 2.0)
                    .set("y", node.position.y - node.size.height / 2.0)
                    .set("width", node.size.width)
                    .set("height", node.size.height)
                    .set("rx", 8)
                    .set("fill", fill)
                    .set("stroke", "black"),
            ),
        };
        group = group.add(
            Text::new(node.title.as_str())
                .set("x", node.position.x)
                .set("y", node.position.y + 5.0)
                .set("font-family", "Arial")
                .set("font-size", 12)
                .set("text-anchor", "middle")
                .set("fill", text_color(node.category)),
        );
        if node.expand_affordance_visible {
            let marker = if node.expanded { "−" } else { "+" };
            group = group.add(
                Text::new(marker)
                    .set("x", node.position.x)
                    .set("y", node.position.y + node.size.height / 2.0 - 6.0)
                    .set("font-family", "Arial")
                    .set("font-size", 14)
                    .set("text-anchor", "middle")
                    .set("fill", text_color(node.category)),
            );
        }
        document = document.add(group);
    }

    document
}
