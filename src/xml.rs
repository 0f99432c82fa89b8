//! Nested XML export of a tree snapshot.
//!
//! The flat node/edge list is reconstructed into a forest and emitted as
//! nested markup: element tags come from each node's `type`, roots are
//! nodes that never appear as an edge target, and children follow edge
//! list order. Emission is iterative with a per-root visited set, so a
//! snapshot that violates the forest invariant still terminates.
//!
//! Text content and attribute values are interpolated raw: titles or
//! descriptions containing markup-significant characters corrupt the
//! output. Known limitation, kept for format compatibility.

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use crate::models::{Node, ProductTree};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Render the snapshot as an XML document wrapped in `<product_tree>`.
pub fn render_xml(tree: &ProductTree) -> String {
    let node_map = tree.node_map();

    // Child lists restricted to edges whose endpoints both resolve.
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut targets: HashSet<&str> = HashSet::new();
    for edge in &tree.edges {
        let (from, to) = (edge.from.as_str(), edge.to.as_str());
        if node_map.contains_key(from) && node_map.contains_key(to) {
            children.entry(from).or_default().push(to);
            targets.insert(to);
        }
    }

    let mut seen_roots: HashSet<&str> = HashSet::new();
    let roots: Vec<&str> = tree
        .nodes
        .iter()
        .map(|n| n.id.as_str())
        .filter(|id| !targets.contains(id) && seen_roots.insert(*id))
        .collect();

    let mut out = String::from(XML_DECLARATION);
    out.push_str("<product_tree>\n");
    for root in roots {
        render_subtree(&mut out, root, &node_map, &children);
    }
    out.push_str("</product_tree>");
    out
}

/// One pending emission step. A node is opened, then its children are
/// visited, then its closing tag is written.
enum Step<'a> {
    Open(&'a str, usize),
    Close(&'a str, usize),
}

fn render_subtree(
    out: &mut String,
    root: &str,
    node_map: &HashMap<&str, &Node>,
    children: &HashMap<&str, Vec<&str>>,
) {
    // Explicit stack instead of recursion, and a visited set per root so
    // cyclic edge lists cannot loop or overflow.
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<Step> = vec![Step::Open(root, 1)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Open(id, depth) => {
                if !visited.insert(id) {
                    continue;
                }
                let Some(&node) = node_map.get(id) else {
                    continue;
                };
                let indent = "  ".repeat(depth);
                let _ = writeln!(out, "{}<{}{}>", indent, node.node_type, attributes(node));
                let _ = writeln!(out, "{}  <title>{}</title>", indent, node.title);
                if let Some(description) = node.description.as_deref() {
                    if !description.is_empty() {
                        let _ = writeln!(
                            out,
                            "{}  <description>{}</description>",
                            indent, description
                        );
                    }
                }
                stack.push(Step::Close(node.node_type.as_str(), depth));
                if let Some(kids) = children.get(id) {
                    for kid in kids.iter().rev().copied() {
                        stack.push(Step::Open(kid, depth + 1));
                    }
                }
            }
            Step::Close(tag, depth) => {
                let _ = writeln!(out, "{}</{}>", "  ".repeat(depth), tag);
            }
        }
    }
}

/// Attribute string for a node: `status`, `priority`, `team`, `owner`,
/// `effort` in that fixed order, each only when non-empty.
fn attributes(node: &Node) -> String {
    let mut out = String::new();
    let fields = [
        ("status", node.status.as_deref()),
        ("priority", node.priority.as_deref()),
        ("team", node.team.as_deref()),
        ("owner", node.owner.as_deref()),
        ("effort", node.effort.as_deref()),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            if !value.is_empty() {
                let _ = write!(out, " {}=\"{}\"", name, value);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Edge;

    fn node(id: &str, node_type: &str, title: &str) -> Node {
        Node {
            id: id.to_string(),
            title: title.to_string(),
            node_type: node_type.to_string(),
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
    fn single_root_round_trip() {
        let tree = ProductTree {
            nodes: vec![node("p1", "product", "Billing")],
            edges: vec![],
        };
        let xml = render_xml(&tree);
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <product_tree>\n  <product>\n    <title>Billing</title>\n  </product>\n\
             </product_tree>"
        );
    }

    #[test]
    fn children_nest_under_parents_in_edge_order() {
        let tree = ProductTree {
            nodes: vec![
                node("p1", "product", "Billing"),
                node("g1", "goal", "Reduce churn"),
                node("g2", "goal", "Grow ARPU"),
            ],
            edges: vec![edge("p1", "g1"), edge("p1", "g2")],
        };
        let xml = render_xml(&tree);
        let g1 = xml.find("Reduce churn").unwrap();
        let g2 = xml.find("Grow ARPU").unwrap();
        assert!(g1 < g2);
        assert!(xml.contains("  <product>\n"));
        assert!(xml.contains("    <goal>\n      <title>Reduce churn</title>\n    </goal>\n"));
    }

    #[test]
    fn empty_attributes_are_omitted_but_title_never_is() {
        let mut n = node("w1", "work_item", "Ship it");
        n.status = Some("in_progress".to_string());
        n.team = Some(String::new());
        n.effort = Some("3d".to_string());
        let tree = ProductTree {
            nodes: vec![n],
            edges: vec![],
        };
        let xml = render_xml(&tree);
        assert!(xml.contains("<work_item status=\"in_progress\" effort=\"3d\">"));
        assert!(!xml.contains("team="));
        assert!(!xml.contains("priority="));
        assert!(xml.contains("<title>Ship it</title>"));
    }

    #[test]
    fn attribute_order_is_fixed() {
        let mut n = node("w1", "work_item", "Ship it");
        n.effort = Some("3d".to_string());
        n.status = Some("active".to_string());
        n.owner = Some("sam".to_string());
        let tree = ProductTree {
            nodes: vec![n],
            edges: vec![],
        };
        let xml = render_xml(&tree);
        assert!(xml.contains("<work_item status=\"active\" owner=\"sam\" effort=\"3d\">"));
    }

    #[test]
    fn description_is_optional() {
        let mut n = node("g1", "goal", "Reduce churn");
        n.description = Some("Keep paying users paying".to_string());
        let tree = ProductTree {
            nodes: vec![n, node("g2", "goal", "Bare")],
            edges: vec![],
        };
        let xml = render_xml(&tree);
        assert!(xml.contains("<description>Keep paying users paying</description>"));
        assert_eq!(xml.matches("<description>").count(), 1);
    }

    #[test]
    fn edges_to_unknown_nodes_are_ignored() {
        let tree = ProductTree {
            nodes: vec![node("p1", "product", "Billing")],
            edges: vec![edge("p1", "ghost"), edge("ghost", "p1")],
        };
        let xml = render_xml(&tree);
        // The ghost edge neither creates a child nor demotes the root.
        assert!(xml.contains("<product>"));
        assert!(!xml.contains("ghost"));
    }

    #[test]
    fn cyclic_edges_terminate() {
        // A root feeding into a cycle: emission must not loop forever.
        let tree = ProductTree {
            nodes: vec![
                node("r", "product", "Root"),
                node("a", "goal", "A"),
                node("b", "goal", "B"),
            ],
            edges: vec![edge("r", "a"), edge("a", "b"), edge("b", "a")],
        };
        let xml = render_xml(&tree);
        assert_eq!(xml.matches("<title>A</title>").count(), 1);
        assert_eq!(xml.matches("<title>B</title>").count(), 1);
        assert!(xml.ends_with("</product_tree>"));
    }

    #[test]
    fn empty_tree_renders_just_the_wrapper() {
        let xml = render_xml(&ProductTree::default());
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<product_tree>\n</product_tree>"
        );
    }
}
