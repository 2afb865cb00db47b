use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the mindmap tree.
///
/// Children are shared through `Arc` so that rewriting a single node only
/// rebuilds the path from the root down to it; every untouched subtree is
/// reused as-is by the new tree value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MindmapNode {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Arc<MindmapNode>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// Partial field changes emitted by the details panel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeUpdate {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
}

impl NodeUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.summary.is_none() && self.description.is_none()
    }

    pub fn apply_to(&self, node: &mut MindmapNode) {
        if let Some(title) = &self.title {
            node.title.clone_from(title);
        }
        if let Some(summary) = &self.summary {
            node.summary = Some(summary.clone());
        }
        if let Some(description) = &self.description {
            node.description = Some(description.clone());
        }
    }
}

impl MindmapNode {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            summary: None,
            description: None,
            category: None,
            children: None,
            metadata: None,
            x: None,
            y: None,
        }
    }

    pub fn with_children(mut self, children: Vec<MindmapNode>) -> Self {
        self.children = Some(children.into_iter().map(Arc::new).collect());
        self
    }

    pub fn children(&self) -> &[Arc<MindmapNode>] {
        self.children.as_deref().unwrap_or_default()
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    /// Text shown in the hover tooltip.
    pub fn tooltip_text(&self) -> &str {
        self.summary
            .as_deref()
            .filter(|summary| !summary.is_empty())
            .unwrap_or(&self.title)
    }

    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(|child| child.node_count())
            .sum::<usize>()
    }
}

/// Pre-order depth-first search for `id` below (and including) `root`.
pub fn find_node<'a>(root: &'a Arc<MindmapNode>, id: &str) -> Option<&'a Arc<MindmapNode>> {
    if root.id == id {
        return Some(root);
    }

    root.children()
        .iter()
        .find_map(|child| find_node(child, id))
}

pub fn collect_ids(root: &MindmapNode, ids: &mut HashSet<String>) {
    ids.insert(root.id.clone());
    for child in root.children() {
        collect_ids(child, ids);
    }
}

/// Ids of every node that has at least one child.
pub fn collect_internal_ids(root: &MindmapNode) -> HashSet<String> {
    fn walk(node: &MindmapNode, ids: &mut HashSet<String>) {
        if !node.has_children() {
            return;
        }

        ids.insert(node.id.clone());
        for child in node.children() {
            walk(child, ids);
        }
    }

    let mut ids = HashSet::new();
    walk(root, &mut ids);
    ids
}

/// Rebuilds the path from `root` to the node with `id`, applying `edit` to that
/// node. Returns `None` when the id is not present.
pub fn rewrite_node(
    root: &Arc<MindmapNode>,
    id: &str,
    edit: &mut dyn FnMut(&mut MindmapNode),
) -> Option<Arc<MindmapNode>> {
    if root.id == id {
        let mut updated = MindmapNode::clone(root);
        edit(&mut updated);
        return Some(Arc::new(updated));
    }

    let children = root.children.as_ref()?;
    for (index, child) in children.iter().enumerate() {
        if let Some(rewritten) = rewrite_node(child, id, edit) {
            let mut next_children = children.clone();
            next_children[index] = rewritten;

            let mut updated = MindmapNode::clone(root);
            updated.children = Some(next_children);
            return Some(Arc::new(updated));
        }
    }

    None
}

pub fn update_node(
    root: &Arc<MindmapNode>,
    id: &str,
    update: &NodeUpdate,
) -> Option<Arc<MindmapNode>> {
    rewrite_node(root, id, &mut |node: &mut MindmapNode| update.apply_to(node))
}

/// Appends `child` as the last child of the node with `parent_id`.
pub fn append_child(
    root: &Arc<MindmapNode>,
    parent_id: &str,
    child: MindmapNode,
) -> Option<Arc<MindmapNode>> {
    let child = Arc::new(child);
    rewrite_node(root, parent_id, &mut |node: &mut MindmapNode| {
        node.children
            .get_or_insert_with(Vec::new)
            .push(Arc::clone(&child));
    })
}
