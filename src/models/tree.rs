use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::Node;

/// A directed parent/child relation: `from` is the parent of `to`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

/// A full product tree snapshot: a flat node list plus parent/child edges.
///
/// The edges are intended to form a forest over the nodes but nothing
/// enforces that; diagnostics report violations instead. Node-list order
/// is significant: it determines the emission order of roots in the XML
/// export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductTree {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl ProductTree {
    /// Lookup table from node id to node. Later duplicates of an id win,
    /// matching the snapshot-replacement semantics of imports.
    pub fn node_map(&self) -> HashMap<&str, &Node> {
        self.nodes.iter().map(|n| (n.id.as_str(), n)).collect()
    }

    /// Child lists keyed by parent id, taken from the raw edge list
    /// without checking that either endpoint names a known node.
    pub fn children_by_parent(&self) -> HashMap<&str, Vec<&str>> {
        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in &self.edges {
            children
                .entry(edge.from.as_str())
                .or_default()
                .push(edge.to.as_str());
        }
        children
    }

    /// Every id that appears as an edge target.
    pub fn edge_targets(&self) -> HashSet<&str> {
        self.edges.iter().map(|e| e.to.as_str()).collect()
    }

    /// Nodes filtered by type, keeping node-list order.
    pub fn nodes_of_kind(&self, kind: super::NodeKind) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.kind() == Some(kind)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> Node {
        Node {
            id: id.to_string(),
            title: id.to_string(),
            ..Node::default()
        }
    }

    fn edge(from: &str, to: &str) -> Edge {
        Edge {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    #[test]
    fn children_keep_edge_list_order() {
        let tree = ProductTree {
            nodes: vec![node("a"), node("b"), node("c")],
            edges: vec![edge("a", "c"), edge("a", "b")],
        };
        let children = tree.children_by_parent();
        assert_eq!(children["a"], vec!["c", "b"]);
    }

    #[test]
    fn snapshot_deserializes_with_missing_sections() {
        let tree: ProductTree = serde_json::from_str("{}").unwrap();
        assert!(tree.nodes.is_empty());
        assert!(tree.edges.is_empty());
    }
}
