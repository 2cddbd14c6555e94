use std::collections::{HashMap, HashSet, VecDeque};

use inventory_layout::{Branch, Direction, Footprint};

use crate::edge::VisibleEdge;
use crate::node::VisibleNode;

/// The working set of nodes and edges on the canvas, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct VisibleGraph {
    nodes: Vec<VisibleNode>,
    edges: Vec<VisibleEdge>,
    index: HashMap<String, usize>,
}

impl VisibleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[VisibleNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[VisibleEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&VisibleNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut VisibleNode> {
        self.index.get(id).map(|&i| &mut self.nodes[i])
    }

    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    pub fn edge_ids(&self) -> Vec<&str> {
        self.edges.iter().map(|e| e.id.as_str()).collect()
    }

    pub(crate) fn push_node(&mut self, node: VisibleNode) {
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    pub(crate) fn push_edge(&mut self, edge: VisibleEdge) {
        self.edges.push(edge);
    }

    pub fn has_outgoing(&self, id: &str) -> bool {
        self.edges.iter().any(|e| e.source == id)
    }

    pub fn children_of(&self, id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.source == id)
            .map(|e| e.target.as_str())
            .collect()
    }

    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.edges
            .iter()
            .find(|e| e.target == id)
            .map(|e| e.source.as_str())
    }

    /// Every node reachable from `roots` over visible edges, roots excluded
    /// unless one is reachable from another. Breadth-first, each id once.
    pub fn descendants(&self, roots: &[&str]) -> Vec<String> {
        let mut seen: HashSet<&str> = roots.iter().copied().collect();
        let mut queue: VecDeque<&str> = roots.iter().copied().collect();
        let mut found = Vec::new();
        let mut reported: HashSet<&str> = HashSet::new();

        while let Some(current) = queue.pop_front() {
            for edge in self.edges.iter().filter(|e| e.source == current) {
                let target = edge.target.as_str();
                if reported.insert(target) {
                    found.push(target.to_string());
                }
                if seen.insert(target) {
                    queue.push_back(target);
                }
            }
        }

        found
    }

    /// Drops the given nodes and every edge touching them.
    pub(crate) fn remove_nodes(&mut self, ids: &HashSet<String>) {
        if ids.is_empty() {
            return;
        }
        self.nodes.retain(|n| !ids.contains(&n.id));
        self.edges
            .retain(|e| !ids.contains(&e.source) && !ids.contains(&e.target));
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
    }

    /// Arm of the layout a node belongs to, read off the edge that leaves the
    /// root on the way down to it. The root itself grows every way.
    pub fn branch_of(&self, id: &str, root: &str) -> Branch {
        if id == root {
            return Branch::All;
        }
        let mut current = id;
        let mut hops = 0;
        while let Some(edge) = self.edges.iter().find(|e| e.target == current) {
            if edge.source == root {
                return Branch::Toward(edge.source_handle.direction());
            }
            current = edge.source.as_str();
            hops += 1;
            if hops > self.edges.len() {
                break;
            }
        }

        // Detached from the root: go by where the node sits.
        match (self.node(root), self.node(id)) {
            (Some(r), Some(n)) => Branch::Toward(Direction::between(&r.position, &n.position)),
            _ => Branch::Toward(Direction::East),
        }
    }

    pub fn footprints(&self) -> Vec<Footprint> {
        self.nodes.iter().map(VisibleNode::footprint).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use inventory_layout::{Position, Shape, Size};

    fn node(id: &str, depth: usize, x: f64, y: f64) -> VisibleNode {
        VisibleNode {
            id: id.to_string(),
            position: Position::new(x, y),
            depth,
            shape: Shape::Rectangular,
            category: Category::KeyParadigm,
            expanded: false,
            child_count: 0,
            size: Size::new(100.0, 40.0),
            title: id.to_string(),
        }
    }

    fn chain() -> VisibleGraph {
        let mut graph = VisibleGraph::new();
        graph.push_node(node("r", 0, 0.0, 0.0));
        graph.push_node(node("a", 1, 0.0, 300.0));
        graph.push_node(node("b", 2, 0.0, 600.0));
        graph.push_node(node("c", 3, 0.0, 900.0));
        graph.push_node(node("d", 1, 300.0, 0.0));
        graph.push_edge(VisibleEdge::new("r", "a", Direction::South));
        graph.push_edge(VisibleEdge::new("a", "b", Direction::South));
        graph.push_edge(VisibleEdge::new("b", "c", Direction::South));
        graph.push_edge(VisibleEdge::new("r", "d", Direction::East));
        graph
    }

    #[test]
    fn test_descendants_are_multi_level() {
        let graph = chain();
        assert_eq!(graph.descendants(&["a"]), vec!["b", "c"]);
        assert_eq!(graph.descendants(&["r"]).len(), 4);
        // Overlapping roots are reported once.
        assert_eq!(graph.descendants(&["a", "b"]), vec!["b", "c"]);
    }

    #[test]
    fn test_remove_drops_touching_edges() {
        let mut graph = chain();
        let doomed: HashSet<String> = ["b".to_string(), "c".to_string()].into();
        graph.remove_nodes(&doomed);

        assert_eq!(graph.node_ids(), vec!["r", "a", "d"]);
        assert_eq!(graph.edge_ids(), vec!["e-1:r-a", "e-1:r-d"]);
        assert!(!graph.has_outgoing("a"));
        assert_eq!(graph.node("d").map(|n| n.depth), Some(1));
    }

    #[test]
    fn test_branch_follows_root_edge() {
        let graph = chain();
        assert_eq!(graph.branch_of("r", "r"), Branch::All);
        assert_eq!(graph.branch_of("c", "r"), Branch::Toward(Direction::South));
        assert_eq!(graph.branch_of("d", "r"), Branch::Toward(Direction::East));
        assert_eq!(graph.parent_of("c"), Some("b"));
        assert_eq!(graph.children_of("r"), vec!["a", "d"]);
    }
}
