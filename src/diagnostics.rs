//! Structural diagnostics over a tree snapshot.
//!
//! Backs the debug endpoint: root discovery, duplicate-title detection,
//! circular-reference detection, and a hierarchy summary. The edges are
//! taken as-is; an edge naming an unknown node still counts here, unlike
//! the XML export which drops it.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::ProductTree;

/// The debug payload for a tree snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeDiagnostics {
    pub total_nodes: usize,
    pub total_edges: usize,
    /// Ids of nodes that never appear as an edge target, node-list order.
    pub root_nodes: Vec<String>,
    pub duplicates: Vec<DuplicateTitle>,
    /// Ids of nodes whose downward traversal revisits a node. A node that
    /// merely reaches a cycle is flagged too, not only cycle members.
    pub circular_references: Vec<String>,
    /// Distinct titles in order of first appearance.
    pub node_titles: Vec<String>,
    pub hierarchy_summary: HierarchySummary,
}

/// A repeated title and the first two node ids that carry it.
///
/// Only one pair is reported per title: the first-seen id and the second
/// occurrence. Further repeats of the same title are not listed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateTitle {
    pub title: String,
    pub nodes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchySummary {
    pub nodes_with_children: usize,
    pub leaf_nodes: usize,
}

/// Analyze the snapshot's structure.
pub fn diagnose(tree: &ProductTree) -> TreeDiagnostics {
    let children = tree.children_by_parent();
    let targets = tree.edge_targets();

    let root_nodes: Vec<String> = tree
        .nodes
        .iter()
        .filter(|n| !targets.contains(n.id.as_str()))
        .map(|n| n.id.clone())
        .collect();

    let mut first_seen: HashMap<&str, &str> = HashMap::new();
    let mut node_titles: Vec<String> = Vec::new();
    let mut reported: HashSet<&str> = HashSet::new();
    let mut duplicates: Vec<DuplicateTitle> = Vec::new();
    for node in &tree.nodes {
        let title = node.title.as_str();
        match first_seen.get(title) {
            Some(&first_id) => {
                if reported.insert(title) {
                    duplicates.push(DuplicateTitle {
                        title: title.to_string(),
                        nodes: vec![first_id.to_string(), node.id.clone()],
                    });
                }
            }
            None => {
                first_seen.insert(title, node.id.as_str());
                node_titles.push(title.to_string());
            }
        }
    }

    let circular_references = find_circular_references(tree, &children);

    let nodes_with_children = children.values().filter(|c| !c.is_empty()).count();
    let leaf_nodes = tree
        .nodes
        .iter()
        .filter(|n| children.get(n.id.as_str()).is_none_or(|c| c.is_empty()))
        .count();

    TreeDiagnostics {
        total_nodes: tree.nodes.len(),
        total_edges: tree.edges.len(),
        root_nodes,
        duplicates,
        circular_references,
        node_titles,
        hierarchy_summary: HierarchySummary {
            nodes_with_children,
            leaf_nodes,
        },
    }
}

/// Run a depth-first walk from every node and flag the start id as soon
/// as any node is revisited within that walk.
fn find_circular_references(
    tree: &ProductTree,
    children: &HashMap<&str, Vec<&str>>,
) -> Vec<String> {
    let mut flagged = Vec::new();
    for node in &tree.nodes {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = vec![node.id.as_str()];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                flagged.push(node.id.clone());
                break;
            }
            if let Some(kids) = children.get(current) {
                stack.extend(kids.iter().copied());
            }
        }
    }
    flagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Edge, Node};

    fn node(id: &str, title: &str) -> Node {
        Node {
            id: id.to_string(),
            title: title.to_string(),
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
    fn roots_are_nodes_that_are_never_targets() {
        let tree = ProductTree {
            nodes: vec![node("a", "A"), node("b", "B"), node("c", "C")],
            edges: vec![edge("a", "b")],
        };
        let diag = diagnose(&tree);
        assert_eq!(diag.root_nodes, vec!["a", "c"]);
        assert_eq!(diag.total_nodes, 3);
        assert_eq!(diag.total_edges, 1);
    }

    #[test]
    fn one_duplicate_pair_per_repeated_title() {
        let tree = ProductTree {
            nodes: vec![node("a", "X"), node("b", "X"), node("c", "X")],
            edges: vec![],
        };
        let diag = diagnose(&tree);
        assert_eq!(diag.duplicates.len(), 1);
        assert_eq!(diag.duplicates[0].title, "X");
        assert_eq!(diag.duplicates[0].nodes, vec!["a", "b"]);
        assert_eq!(diag.node_titles, vec!["X"]);
    }

    #[test]
    fn two_node_cycle_flags_both_nodes() {
        let tree = ProductTree {
            nodes: vec![node("a", "A"), node("b", "B")],
            edges: vec![edge("a", "b"), edge("b", "a")],
        };
        let diag = diagnose(&tree);
        assert_eq!(diag.circular_references, vec!["a", "b"]);
    }

    #[test]
    fn node_feeding_into_a_cycle_is_flagged_too() {
        // c -> a -> b -> a: c is not a cycle member but its walk revisits.
        let tree = ProductTree {
            nodes: vec![node("a", "A"), node("b", "B"), node("c", "C")],
            edges: vec![edge("a", "b"), edge("b", "a"), edge("c", "a")],
        };
        let diag = diagnose(&tree);
        assert!(diag.circular_references.contains(&"c".to_string()));
    }

    #[test]
    fn acyclic_tree_has_no_circular_references() {
        let tree = ProductTree {
            nodes: vec![node("a", "A"), node("b", "B"), node("c", "C")],
            edges: vec![edge("a", "b"), edge("a", "c")],
        };
        assert!(diagnose(&tree).circular_references.is_empty());
    }

    #[test]
    fn hierarchy_summary_counts_parents_and_leaves() {
        let tree = ProductTree {
            nodes: vec![node("a", "A"), node("b", "B"), node("c", "C")],
            edges: vec![edge("a", "b"), edge("a", "c")],
        };
        let diag = diagnose(&tree);
        assert_eq!(diag.hierarchy_summary.nodes_with_children, 1);
        assert_eq!(diag.hierarchy_summary.leaf_nodes, 2);
    }

    #[test]
    fn empty_tree_diagnoses_cleanly() {
        let diag = diagnose(&ProductTree::default());
        assert_eq!(diag.total_nodes, 0);
        assert!(diag.root_nodes.is_empty());
        assert!(diag.duplicates.is_empty());
        assert!(diag.circular_references.is_empty());
    }
}
