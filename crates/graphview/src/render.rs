//! Turns the visible graph into plain records a renderer can draw.
//!
//! Nothing in here keeps state; any drawing backend can consume a
//! [`RenderScene`].

use inventory_layout::{Handle, Position, Shape, Size};
use serde::Serialize;

use crate::graph::VisibleGraph;
use crate::model::Category;

const TEXT_PADDING: f64 = 24.0;
const TITLE_LIMIT: usize = 80;

/// Measures rendered text. Hosts with real font metrics plug theirs in.
pub trait TextMeasure {
    fn measure(&self, text: &str) -> Size;
}

/// Fixed-advance estimate that wraps at `wrap_width`.
#[derive(Debug, Clone, Copy)]
pub struct CharWidthMeasure {
    pub char_width: f64,
    pub line_height: f64,
    pub wrap_width: f64,
}

impl Default for CharWidthMeasure {
    fn default() -> Self {
        Self {
            char_width: 7.2,
            line_height: 18.0,
            wrap_width: 220.0,
        }
    }
}

impl TextMeasure for CharWidthMeasure {
    fn measure(&self, text: &str) -> Size {
        let raw = text.chars().count() as f64 * self.char_width;
        if raw <= self.wrap_width {
            return Size::new(raw, self.line_height);
        }
        let lines = (raw / self.wrap_width).ceil();
        Size::new(self.wrap_width, lines * self.line_height)
    }
}

/// Starting size of a shape before it grows around its title.
pub fn base_size(category: Category, shape: Shape) -> Size {
    match (shape, category) {
        (Shape::Circular, Category::Root) => Size::square(160.0),
        (Shape::Circular, _) => Size::square(120.0),
        (Shape::Rectangular, Category::Kpi) => Size::new(180.0, 64.0),
        (Shape::Rectangular, Category::EndDecision) => Size::new(220.0, 80.0),
        (Shape::Rectangular, _) => Size::new(200.0, 72.0),
    }
}

/// Size of the drawn shape. Circles stay round and grow to hold the text's
/// diagonal; rectangles grow each side on its own.
pub fn computed_size(
    category: Category,
    shape: Shape,
    title: &str,
    measure: &dyn TextMeasure,
) -> Size {
    let base = base_size(category, shape);
    let text = measure.measure(title);
    match shape {
        Shape::Circular => {
            let diagonal = (text.width.powi(2) + text.height.powi(2)).sqrt();
            Size::square(base.width.max(diagonal + TEXT_PADDING))
        }
        Shape::Rectangular => Size::new(
            base.width.max(text.width + TEXT_PADDING),
            base.height.max(text.height + TEXT_PADDING),
        ),
    }
}

/// First non-empty line of the content, whitespace collapsed and shortened.
pub fn display_title(content: &str) -> String {
    let line = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default();
    let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= TITLE_LIMIT {
        return collapsed;
    }
    let mut short: String = collapsed.chars().take(TITLE_LIMIT - 1).collect();
    short.push('…');
    short
}

pub fn icon_for(category: Category) -> &'static str {
    match category {
        Category::Root => "compass",
        Category::KeyParadigm => "key",
        Category::StrategicInquiry => "chess-knight",
        Category::GuidingInquiry => "signpost",
        Category::Scenario => "git-branch",
        Category::Kpi => "gauge",
        Category::EndDecision => "flag",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: String,
    pub shape: Shape,
    pub position: Position,
    pub size: Size,
    pub category: Category,
    pub title: String,
    pub icon: &'static str,
    pub expanded: bool,
    pub expand_affordance_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_handle: Handle,
    pub target_handle: Handle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderScene {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

impl RenderScene {
    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

pub fn render_scene(visible: &VisibleGraph, measure: &dyn TextMeasure) -> RenderScene {
    let nodes = visible
        .nodes()
        .iter()
        .map(|node| RenderNode {
            id: node.id.clone(),
            shape: node.shape,
            position: node.position,
            size: computed_size(node.category, node.shape, &node.title, measure),
            category: node.category,
            title: node.title.clone(),
            icon: icon_for(node.category),
            expanded: node.expanded,
            expand_affordance_visible: node.child_count > 0,
        })
        .collect();

    let edges = visible
        .edges()
        .iter()
        .map(|edge| RenderEdge {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            source_handle: edge.source_handle,
            target_handle: edge.target_handle,
        })
        .collect();

    RenderScene { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_stays_round() {
        let measure = CharWidthMeasure::default();
        let long = "A fairly long key paradigm title that needs wrapping";
        let size = computed_size(Category::KeyParadigm, Shape::Circular, long, &measure);
        assert_eq!(size.width, size.height);
        assert!(size.width > base_size(Category::KeyParadigm, Shape::Circular).width);
    }

    #[test]
    fn test_rectangle_grows_per_axis() {
        let measure = CharWidthMeasure::default();
        let short = computed_size(Category::Scenario, Shape::Rectangular, "Short", &measure);
        assert_eq!(short, base_size(Category::Scenario, Shape::Rectangular));

        let long = "x".repeat(120);
        let size = computed_size(Category::Scenario, Shape::Rectangular, &long, &measure);
        // 864px of text wraps into 4 lines of 220px.
        assert_eq!(size.width, 244.0);
        assert_eq!(size.height, 4.0 * 18.0 + TEXT_PADDING);
    }

    #[test]
    fn test_display_title() {
        assert_eq!(display_title("\n  Grow   share \nsecond line"), "Grow share");
        let long = "word ".repeat(40);
        let title = display_title(&long);
        assert_eq!(title.chars().count(), TITLE_LIMIT);
        assert!(title.ends_with('…'));
        assert_eq!(display_title(""), "");
    }
}
