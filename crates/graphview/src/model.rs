//! The immutable decision graph and the lookups the inventory needs from it.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::InventoryConfig;
use crate::error::InventoryError;

/// Semantic role of a node in the decision graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Root,
    KeyParadigm,
    StrategicInquiry,
    GuidingInquiry,
    Scenario,
    Kpi,
    EndDecision,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Root,
        Category::KeyParadigm,
        Category::StrategicInquiry,
        Category::GuidingInquiry,
        Category::Scenario,
        Category::Kpi,
        Category::EndDecision,
    ];

    /// Used when a node carries no usable type.
    pub const FALLBACK: Category = Category::KeyParadigm;

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Root => "root",
            Category::KeyParadigm => "keyParadigm",
            Category::StrategicInquiry => "strategicInquiry",
            Category::GuidingInquiry => "guidingInquiry",
            Category::Scenario => "scenario",
            Category::Kpi => "kpi",
            Category::EndDecision => "endDecision",
        }
    }

    /// Accepts `keyParadigm`, `key_paradigm`, `key-paradigm` and any casing.
    pub fn parse(raw: &str) -> Option<Category> {
        let wanted: String = raw
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().to_lowercase() == wanted)
    }

    pub fn is_terminal(self) -> bool {
        self == Category::EndDecision
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub content: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

impl GraphEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Ordered child ids per node id. Every node gets an entry, leaves an empty one.
/// Edges that reference unknown nodes are skipped.
pub fn build_children_map(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
) -> HashMap<String, Vec<String>> {
    let mut children: HashMap<String, Vec<String>> = nodes
        .iter()
        .map(|node| (node.id.clone(), Vec::new()))
        .collect();

    for edge in edges {
        if !children.contains_key(&edge.target) {
            tracing::warn!(
                source = %edge.source,
                target = %edge.target,
                "edge points at an unknown node, ignoring"
            );
            continue;
        }
        match children.get_mut(&edge.source) {
            Some(targets) => targets.push(edge.target.clone()),
            None => tracing::warn!(
                source = %edge.source,
                target = %edge.target,
                "edge leaves an unknown node, ignoring"
            ),
        }
    }

    children
}

/// Read-only decision graph. Lookups are built once on construction.
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    index: HashMap<String, usize>,
    children: HashMap<String, Vec<String>>,
}

impl Graph {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        let mut seen = HashSet::new();
        let nodes: Vec<GraphNode> = nodes
            .into_iter()
            .filter(|node| {
                let fresh = seen.insert(node.id.clone());
                if !fresh {
                    tracing::warn!(node = %node.id, "duplicate node id, keeping the first");
                }
                fresh
            })
            .collect();

        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.clone(), i))
            .collect();
        let children = build_children_map(&nodes, &edges);

        Self {
            nodes,
            edges,
            index,
            children,
        }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn children(&self, id: &str) -> &[String] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn children_map(&self) -> &HashMap<String, Vec<String>> {
        &self.children
    }

    fn topology(&self) -> DiGraph<usize, ()> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        for i in 0..self.nodes.len() {
            graph.add_node(i);
        }
        for (source, targets) in &self.children {
            let s = NodeIndex::new(self.index[source]);
            for target in targets {
                graph.add_edge(s, NodeIndex::new(self.index[target]), ());
            }
        }
        graph
    }

    pub fn has_cycle(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.topology())
    }

    /// Ids of nodes with more than one parent.
    pub fn shared_nodes(&self) -> Vec<&str> {
        let topology = self.topology();
        topology
            .node_indices()
            .filter(|&n| {
                topology
                    .neighbors_directed(n, petgraph::Direction::Incoming)
                    .count()
                    > 1
            })
            .map(|n| self.nodes[topology[n]].id.as_str())
            .collect()
    }

    /// Number of edges on the longest shortest path from `root`.
    pub fn max_depth(&self, root: &str) -> usize {
        let Some(&start) = self.index.get(root) else {
            return 0;
        };
        let topology = self.topology();
        petgraph::algo::dijkstra(&topology, NodeIndex::new(start), None, |_| 1usize)
            .into_values()
            .max()
            .unwrap_or(0)
    }
}

/// Decides which node is the root and what role every node plays.
#[derive(Debug, Clone)]
pub struct Classifier {
    marker: Regex,
    root_id: String,
}

impl Classifier {
    pub fn new(marker: &str, root_id: impl Into<String>) -> Result<Self, InventoryError> {
        Ok(Self {
            marker: Regex::new(marker)?,
            root_id: root_id.into(),
        })
    }

    pub fn from_config(config: &InventoryConfig) -> Result<Self, InventoryError> {
        Self::new(&config.root_marker, config.root_id.clone())
    }

    pub fn is_root_content(&self, content: &str) -> bool {
        self.marker.is_match(content)
    }

    /// Marker content first, then the well-known id, then the first node with
    /// children, then simply the first node.
    pub fn find_root_node<'g>(&self, graph: &'g Graph) -> Result<&'g GraphNode, InventoryError> {
        let nodes = graph.nodes();
        nodes
            .iter()
            .find(|node| self.is_root_content(&node.content))
            .or_else(|| graph.node(&self.root_id))
            .or_else(|| {
                nodes
                    .iter()
                    .find(|node| !graph.children(&node.id).is_empty())
            })
            .or_else(|| nodes.first())
            .ok_or(InventoryError::NoRootFound)
    }

    pub fn categorize_node(&self, id: &str, graph: &Graph) -> Category {
        let Some(node) = graph.node(id) else {
            tracing::debug!(node = id, "categorizing a node outside the graph");
            return Category::FALLBACK;
        };
        if self.is_root_content(&node.content) {
            return Category::Root;
        }
        match node.kind.as_deref().map(str::trim) {
            None | Some("") => Category::FALLBACK,
            Some(raw) => Category::parse(raw).unwrap_or_else(|| {
                tracing::warn!(
                    node = id,
                    kind = raw,
                    fallback = Category::FALLBACK.as_str(),
                    "unknown node type, using fallback category"
                );
                Category::FALLBACK
            }),
        }
    }
}
