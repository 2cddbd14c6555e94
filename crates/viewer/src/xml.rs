//! Decision graph loading from XML.
//!
//! Two dialects are understood, and may be mixed in one document:
//!
//! ```xml
//! <graph>
//!   <node id="root" content="Decision Inventory"/>
//!   <node id="a" type="keyParadigm"><content>Grow share</content></node>
//!   <edge source="root" target="a"/>
//! </graph>
//! ```
//!
//! and draw.io style cells, where `vertex="1"` cells are nodes and
//! `edge="1"` cells are edges.

use anyhow::{Context, Result};
use graphview::{Graph, GraphEdge, GraphNode};
use regex::Regex;
use roxmltree::Node;

pub fn parse_graph(content: &str) -> Result<Graph> {
    let doc = roxmltree::Document::parse(content).context("malformed XML")?;
    let markup = Regex::new(r"<[^>]*>").context("markup pattern")?;

    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    for element in doc.descendants().filter(|n| n.is_element()) {
        match element.tag_name().name() {
            "node" => {
                let Some(id) = element.attribute("id") else {
                    tracing::warn!(pos = element.range().start, "node without id, skipped");
                    continue;
                };
                let mut node = GraphNode::new(id, node_content(element));
                if let Some(kind) = element.attribute("type") {
                    node = node.with_kind(kind);
                }
                nodes.push(node);
            }
            "edge" => {
                if let Some(edge) = edge_between(element) {
                    edges.push(edge);
                }
            }
            "mxCell" if element.attribute("vertex") == Some("1") => {
                let Some(id) = element.attribute("id") else {
                    continue;
                };
                let value = element.attribute("value").unwrap_or_default();
                let value = value.replace("<br>", "\n");
                let text = markup.replace_all(&value, "");
                let mut node = GraphNode::new(id, text.trim());
                if let Some(kind) = element.attribute("type").or_else(|| style_kind(element)) {
                    node = node.with_kind(kind);
                }
                nodes.push(node);
            }
            "mxCell" if element.attribute("edge") == Some("1") => {
                if let Some(edge) = edge_between(element) {
                    edges.push(edge);
                }
            }
            _ => {}
        }
    }

    tracing::debug!(nodes = nodes.len(), edges = edges.len(), "parsed decision graph");
    Ok(Graph::new(nodes, edges))
}

/// `content` attribute, then a `<content>` child, then the element's own text.
fn node_content(element: Node) -> String {
    if let Some(content) = element.attribute("content") {
        return content.to_string();
    }
    if let Some(child) = element
        .children()
        .find(|c| c.is_element() && c.tag_name().name() == "content")
    {
        return collect_text(child);
    }
    element
        .children()
        .filter(|n| n.is_text())
        .filter_map(|t| t.text())
        .collect::<String>()
        .trim()
        .to_string()
}

fn collect_text(element: Node) -> String {
    element
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|t| t.text())
        .collect::<String>()
        .trim()
        .to_string()
}

fn edge_between(element: Node) -> Option<GraphEdge> {
    match (element.attribute("source"), element.attribute("target")) {
        (Some(source), Some(target)) => Some(GraphEdge::new(source, target)),
        _ => {
            tracing::warn!(
                pos = element.range().start,
                "edge without source or target, skipped"
            );
            None
        }
    }
}

/// `type=...` entry of a draw.io style string.
fn style_kind<'a>(element: Node<'a, '_>) -> Option<&'a str> {
    element
        .attribute("style")?
        .split(';')
        .filter_map(|entry| entry.split_once('='))
        .find(|(key, _)| key.trim() == "type")
        .map(|(_, value)| value.trim())
}
