use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{Vec2, vec2};

use super::node::{MindmapNode, find_node};

/// A node of the currently visible set, with its distance from the subtree root.
#[derive(Clone, Debug)]
pub struct VisibleNode {
    pub node: Arc<MindmapNode>,
    pub depth: usize,
    /// Last known position, if the document carries one.
    pub position: Option<Vec2>,
    /// Only the traversal root is pinned.
    pub fixed: Option<Vec2>,
}

impl VisibleNode {
    pub fn id(&self) -> &str {
        &self.node.id
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

/// Follows `drill_path` from the full root. Each segment is looked up anywhere
/// below the current candidate; segments that do not resolve are skipped.
pub fn resolve_root(tree: &Arc<MindmapNode>, drill_path: &[String]) -> Arc<MindmapNode> {
    let mut current = Arc::clone(tree);
    for id in drill_path {
        if let Some(found) = find_node(&current, id) {
            current = Arc::clone(found);
        }
    }
    current
}

/// Pre-order listing of `root` and every descendant not hidden by a collapsed
/// ancestor. A collapsed node is itself listed; only its subtree is hidden.
pub fn visible_nodes(
    root: &Arc<MindmapNode>,
    collapsed: &HashSet<String>,
    center: Vec2,
) -> Vec<VisibleNode> {
    fn traverse(
        node: &Arc<MindmapNode>,
        depth: usize,
        collapsed: &HashSet<String>,
        center: Vec2,
        out: &mut Vec<VisibleNode>,
    ) {
        let position = match (node.x, node.y) {
            (Some(x), Some(y)) => Some(vec2(x as f32, y as f32)),
            _ => None,
        };

        out.push(VisibleNode {
            node: Arc::clone(node),
            depth,
            position,
            fixed: (depth == 0).then_some(center),
        });

        if collapsed.contains(&node.id) {
            return;
        }

        for child in node.children() {
            traverse(child, depth + 1, collapsed, center, out);
        }
    }

    let mut nodes = Vec::with_capacity(root.node_count());
    traverse(root, 0, collapsed, center, &mut nodes);
    nodes
}

/// Parent-to-child edges of the same traversal, restricted to ids in `visible_ids`.
pub fn visible_edges(
    root: &MindmapNode,
    collapsed: &HashSet<String>,
    visible_ids: &HashSet<&str>,
) -> Vec<Edge> {
    fn traverse(
        node: &MindmapNode,
        collapsed: &HashSet<String>,
        visible_ids: &HashSet<&str>,
        out: &mut Vec<Edge>,
    ) {
        if collapsed.contains(&node.id) {
            return;
        }

        for child in node.children() {
            if visible_ids.contains(child.id.as_str()) {
                out.push(Edge {
                    source: node.id.clone(),
                    target: child.id.clone(),
                });
            }
            traverse(child, collapsed, visible_ids, out);
        }
    }

    let mut edges = Vec::new();
    traverse(root, collapsed, visible_ids, &mut edges);
    edges
}
