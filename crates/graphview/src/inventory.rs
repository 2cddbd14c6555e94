use std::collections::HashSet;

use inventory_layout::{
    Bounds, ChildSpec, Direction, Position, Shape, Size, Viewport, center_on, fit_bounds,
    fit_padding,
};
use serde::Serialize;

use crate::config::InventoryConfig;
use crate::edge::VisibleEdge;
use crate::error::InventoryError;
use crate::graph::VisibleGraph;
use crate::model::{Category, Classifier, Graph};
use crate::node::VisibleNode;
use crate::render::{self, CharWidthMeasure, RenderScene, TextMeasure};

/// Something the host should do with its viewport once it gets the chance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ViewRequest {
    /// Frame the listed nodes; an empty list means everything.
    Fit {
        focus: Vec<String>,
        padding: f64,
        delay_ms: u64,
    },
    Center {
        node: String,
        zoom: f64,
        delay_ms: u64,
    },
}

/// Observable outcome of a transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InventoryEvent {
    Expanded { node: String, added: Vec<String> },
    Collapsed { node: String, removed: Vec<String> },
    /// Expansion of a node without children in the full graph.
    LeafReached { node: String },
    /// Expansion refused; the node was flipped back to collapsed.
    DepthLimitReached { node: String, depth: usize },
    /// Positions of this expansion are best-effort.
    OverlapResolutionExhausted { node: String, steps: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Expand,
    Collapse,
}

/// Options for [`Inventory::fit_to_view`].
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    /// Nodes to frame; empty frames the whole visible graph.
    pub focus: Vec<String>,
    /// Overrides the count-based padding heuristic.
    pub padding: Option<f64>,
    pub container: Size,
}

impl FitOptions {
    pub fn all(container: Size) -> Self {
        Self {
            focus: Vec::new(),
            padding: None,
            container,
        }
    }
}

/// The decision inventory: a read-only graph plus the part of it currently
/// expanded onto the canvas.
///
/// Every mutation is followed by a settle: pending transitions are processed
/// one per cycle, in node insertion order, until none remain. A node is
/// pending expansion when it is marked expanded but has no outgoing visible
/// edge, and pending collapse when it is marked collapsed but still has one.
#[derive(Debug)]
pub struct Inventory {
    graph: Graph,
    config: InventoryConfig,
    classifier: Classifier,
    root_id: String,
    visible: VisibleGraph,
    pub(crate) processed: HashSet<String>,
    view_requests: Vec<ViewRequest>,
    events: Vec<InventoryEvent>,
}

impl Inventory {
    pub fn new(graph: Graph, config: InventoryConfig) -> Result<Self, InventoryError> {
        let classifier = Classifier::from_config(&config)?;
        let root = classifier.find_root_node(&graph)?;
        let root_id = root.id.clone();

        if graph.has_cycle() {
            tracing::warn!("decision graph contains a cycle; expansion stops at revisited nodes");
        }
        let shared = graph.shared_nodes();
        if !shared.is_empty() {
            tracing::warn!(
                count = shared.len(),
                "nodes with several parents are shown under the first parent expanded"
            );
        }

        let title = render::display_title(&root.content);
        let measure = CharWidthMeasure::default();
        let root_node = VisibleNode {
            id: root_id.clone(),
            position: Position::new(0.0, 0.0),
            depth: 0,
            shape: Shape::Circular,
            category: Category::Root,
            expanded: true,
            child_count: graph.children(&root_id).len(),
            size: render::computed_size(Category::Root, Shape::Circular, &title, &measure),
            title,
        };
        tracing::info!(
            root = %root_id,
            nodes = graph.len(),
            edges = graph.edges().len(),
            "decision inventory loaded"
        );

        let mut visible = VisibleGraph::new();
        visible.push_node(root_node);

        let mut inventory = Self {
            graph,
            config,
            classifier,
            root_id,
            visible,
            processed: HashSet::new(),
            view_requests: Vec::new(),
            events: Vec::new(),
        };
        inventory.settle()?;
        Ok(inventory)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    pub fn visible(&self) -> &VisibleGraph {
        &self.visible
    }

    pub(crate) fn visible_mut(&mut self) -> &mut VisibleGraph {
        &mut self.visible
    }

    pub fn nodes(&self) -> &[VisibleNode] {
        self.visible.nodes()
    }

    pub fn edges(&self) -> &[VisibleEdge] {
        self.visible.edges()
    }

    pub fn node(&self, id: &str) -> Option<&VisibleNode> {
        self.visible.node(id)
    }

    /// Drains the viewport requests queued since the last call.
    pub fn take_view_requests(&mut self) -> Vec<ViewRequest> {
        std::mem::take(&mut self.view_requests)
    }

    /// Drains the transition events queued since the last call.
    pub fn take_events(&mut self) -> Vec<InventoryEvent> {
        std::mem::take(&mut self.events)
    }

    /// Flips a node's expanded flag and settles. Returns the flag afterwards,
    /// which may already have been reverted by the depth limit.
    pub fn toggle_expand(&mut self, id: &str) -> Result<bool, InventoryError> {
        let current = self
            .visible
            .node(id)
            .map(|n| n.expanded)
            .ok_or_else(|| InventoryError::UnknownNode(id.to_string()))?;
        self.set_expanded(id, !current)
    }

    pub fn set_expanded(&mut self, id: &str, expanded: bool) -> Result<bool, InventoryError> {
        let node = self
            .visible
            .node_mut(id)
            .ok_or_else(|| InventoryError::UnknownNode(id.to_string()))?;
        node.expanded = expanded;
        self.settle()?;
        Ok(self.visible.node(id).is_some_and(|n| n.expanded))
    }

    fn pending(visible: &VisibleGraph, node: &VisibleNode) -> Option<Transition> {
        match (node.expanded, visible.has_outgoing(&node.id)) {
            (true, false) => Some(Transition::Expand),
            (false, true) => Some(Transition::Collapse),
            _ => None,
        }
    }

    /// One reactive cycle: processes at most one pending node.
    ///
    /// Ids stay in the processed set while their transition is still pending,
    /// so a no-op expansion is not retried every cycle; they are released as
    /// soon as the visible edges agree with the flag again.
    pub fn step(&mut self) -> bool {
        let Some((id, transition)) = self.next_pending() else {
            return false;
        };

        self.processed.insert(id.clone());
        match transition {
            Transition::Expand => self.expand_node(&id),
            Transition::Collapse => self.collapse_node(&id),
        }
        true
    }

    /// Releases settled ids from the processed set and returns the first
    /// pending node that is not parked.
    fn next_pending(&mut self) -> Option<(String, Transition)> {
        let visible = &self.visible;
        self.processed.retain(|id| {
            visible
                .node(id)
                .is_some_and(|n| Self::pending(visible, n).is_some())
        });

        self.visible.nodes().iter().find_map(|n| {
            if self.processed.contains(&n.id) {
                return None;
            }
            Self::pending(&self.visible, n).map(|t| (n.id.clone(), t))
        })
    }

    /// Runs cycles until nothing is pending. Returns the number of transitions.
    ///
    /// Up to `max_sync_cycles` transitions are allowed; the error is only
    /// returned when work is still pending after that many.
    pub fn settle(&mut self) -> Result<usize, InventoryError> {
        let limit = self.config.max_sync_cycles;
        let mut cycles = 0;
        while self.step() {
            cycles += 1;
            if cycles >= limit && self.next_pending().is_some() {
                tracing::error!(cycles, "visible graph keeps changing, giving up");
                return Err(InventoryError::Unsettled { cycles });
            }
        }
        Ok(cycles)
    }

    fn expand_node(&mut self, id: &str) {
        let Some(node) = self.visible.node(id) else {
            return;
        };
        let depth = node.depth;
        let origin = node.position;

        if depth >= self.config.max_depth {
            tracing::info!(node = id, depth, "depth limit reached, expansion reverted");
            if let Some(node) = self.visible.node_mut(id) {
                node.expanded = false;
            }
            self.events.push(InventoryEvent::DepthLimitReached {
                node: id.to_string(),
                depth,
            });
            return;
        }

        let all_children = self.graph.children(id);
        if all_children.is_empty() {
            tracing::debug!(node = id, "nothing to expand");
            if let Some(node) = self.visible.node_mut(id) {
                node.child_count = 0;
            }
            self.events.push(InventoryEvent::LeafReached {
                node: id.to_string(),
            });
            return;
        }

        let children: Vec<String> = all_children
            .iter()
            .filter(|child| !self.visible.contains(child))
            .cloned()
            .collect();
        if children.is_empty() {
            tracing::debug!(node = id, "children already visible elsewhere");
            return;
        }

        let is_root = id == self.root_id;
        let branch = self.visible.branch_of(id, &self.root_id);
        let measure = CharWidthMeasure::default();

        let mut fresh: Vec<VisibleNode> = children
            .iter()
            .map(|child| {
                let category = self.classifier.categorize_node(child, &self.graph);
                let shape = if is_root || category == Category::Root {
                    Shape::Circular
                } else {
                    Shape::Rectangular
                };
                let content = self
                    .graph
                    .node(child)
                    .map(|n| n.content.as_str())
                    .unwrap_or_default();
                let title = render::display_title(content);
                VisibleNode {
                    id: child.clone(),
                    position: origin,
                    depth: depth + 1,
                    shape,
                    category,
                    expanded: false,
                    child_count: self.graph.children(child).len(),
                    size: render::computed_size(category, shape, &title, &measure),
                    title,
                }
            })
            .collect();

        let specs: Vec<ChildSpec> = fresh
            .iter()
            .map(|n| ChildSpec {
                terminal: n.category.is_terminal(),
            })
            .collect();
        let placements = self
            .config
            .layout
            .place_children(origin, branch, depth, &specs);
        for (node, placement) in fresh.iter_mut().zip(&placements) {
            node.position = placement.position;
        }

        let mut footprints: Vec<_> = fresh.iter().map(VisibleNode::footprint).collect();
        let existing = self.visible.footprints();
        let resolution = self
            .config
            .layout
            .resolve_overlaps(origin, &mut footprints, &existing);
        if resolution.exhausted {
            tracing::warn!(
                node = id,
                steps = resolution.steps,
                "overlap resolution gave up, keeping best-effort positions"
            );
            self.events.push(InventoryEvent::OverlapResolutionExhausted {
                node: id.to_string(),
                steps: resolution.steps,
            });
        }

        let added: Vec<String> = fresh.iter().map(|n| n.id.clone()).collect();
        for ((mut node, placement), footprint) in
            fresh.into_iter().zip(&placements).zip(&footprints)
        {
            node.position = footprint.center;
            self.visible
                .push_edge(VisibleEdge::new(id, &node.id, placement.direction));
            self.visible.push_node(node);
        }

        tracing::debug!(
            node = id,
            added = added.len(),
            steps = resolution.steps,
            "expanded"
        );

        let mut focus = vec![id.to_string()];
        focus.extend(added.iter().cloned());
        self.request_fit(focus, branch.direction());
        self.events.push(InventoryEvent::Expanded {
            node: id.to_string(),
            added,
        });
    }

    fn collapse_node(&mut self, id: &str) {
        let removed = self.visible.descendants(&[id]);
        let doomed: HashSet<String> = removed.iter().cloned().collect();
        self.visible.remove_nodes(&doomed);
        tracing::debug!(node = id, removed = removed.len(), "collapsed");

        if let Some(parent) = self.visible.parent_of(id).map(str::to_string) {
            let mut focus = vec![parent.clone()];
            focus.extend(
                self.visible
                    .children_of(&parent)
                    .into_iter()
                    .map(str::to_string),
            );
            let direction = self.visible.branch_of(&parent, &self.root_id).direction();
            self.request_fit(focus, direction);
        }

        self.events.push(InventoryEvent::Collapsed {
            node: id.to_string(),
            removed,
        });
    }

    pub(crate) fn request_fit(&mut self, focus: Vec<String>, direction: Option<Direction>) {
        let padding = fit_padding(self.visible.len(), direction);
        self.view_requests.push(ViewRequest::Fit {
            focus,
            padding,
            delay_ms: self.config.fit_delay_ms,
        });
    }

    pub(crate) fn request_center(&mut self, node: String, zoom: f64) {
        self.view_requests.push(ViewRequest::Center {
            node,
            zoom,
            delay_ms: self.config.fit_delay_ms,
        });
    }

    /// Zoom and pan that frame the focused nodes inside the container.
    /// `None` when none of the focused nodes is visible.
    pub fn fit_to_view(&self, options: &FitOptions) -> Option<Viewport> {
        let focused: Vec<&VisibleNode> = if options.focus.is_empty() {
            self.visible.nodes().iter().collect()
        } else {
            options
                .focus
                .iter()
                .filter_map(|id| self.visible.node(id))
                .collect()
        };
        let first = focused.first()?;
        let footprints: Vec<_> = focused.iter().map(|n| n.footprint()).collect();
        let bounds = Bounds::of(&footprints)?;

        let padding = options.padding.unwrap_or_else(|| {
            let direction = self.visible.branch_of(&first.id, &self.root_id).direction();
            fit_padding(self.visible.len(), direction)
        });
        Some(fit_bounds(&bounds, options.container, padding, self.config.zoom))
    }

    /// Applies a queued request to a container of the given size.
    pub fn resolve_view(&self, request: &ViewRequest, container: Size) -> Option<Viewport> {
        match request {
            ViewRequest::Fit { focus, padding, .. } => self.fit_to_view(&FitOptions {
                focus: focus.clone(),
                padding: Some(*padding),
                container,
            }),
            ViewRequest::Center { node, zoom, .. } => self
                .visible
                .node(node)
                .map(|n| center_on(n.position, container, *zoom)),
        }
    }

    pub fn render_scene(&self, measure: &dyn TextMeasure) -> RenderScene {
        render::render_scene(&self.visible, measure)
    }
}
