use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::Vec2;
use tracing::debug;

use crate::mindmap::{
    MindmapNode, NodeUpdate, append_child, collect_ids, collect_internal_ids, find_node,
    resolve_root, update_node,
};
use crate::util::unique_node_id;

/// Owner of the tree and of the UI state derived views depend on.
///
/// Collections are replaced rather than edited in place, and `revision` moves
/// whenever something the layout depends on changes.
pub(in crate::app) struct Session {
    tree: Arc<MindmapNode>,
    selection: Option<Arc<MindmapNode>>,
    collapsed: Arc<HashSet<String>>,
    drill_path: Arc<[String]>,
    viewport: Vec2,
    revision: u64,
    pending_save: Option<Arc<MindmapNode>>,
}

impl Session {
    pub(in crate::app) fn new(tree: Arc<MindmapNode>, viewport: Vec2) -> Self {
        Self {
            tree,
            selection: None,
            collapsed: Arc::default(),
            drill_path: Arc::from(Vec::new()),
            viewport,
            revision: 0,
            pending_save: None,
        }
    }

    pub(in crate::app) fn tree(&self) -> &Arc<MindmapNode> {
        &self.tree
    }

    pub(in crate::app) fn selection(&self) -> Option<&Arc<MindmapNode>> {
        self.selection.as_ref()
    }

    pub(in crate::app) fn selected_id(&self) -> Option<&str> {
        self.selection.as_deref().map(|node| node.id.as_str())
    }

    pub(in crate::app) fn collapsed(&self) -> &Arc<HashSet<String>> {
        &self.collapsed
    }

    pub(in crate::app) fn drill_path(&self) -> &[String] {
        &self.drill_path
    }

    pub(in crate::app) fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub(in crate::app) fn revision(&self) -> u64 {
        self.revision
    }

    pub(in crate::app) fn current_root(&self) -> Arc<MindmapNode> {
        resolve_root(&self.tree, &self.drill_path)
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Replaces the selection with the node `id`; unknown ids are ignored.
    pub(in crate::app) fn select(&mut self, id: &str) -> bool {
        let Some(node) = find_node(&self.tree, id) else {
            return false;
        };

        self.selection = Some(Arc::clone(node));
        true
    }

    pub(in crate::app) fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Collapses or expands `id`. Leaves and unknown ids are left alone.
    pub(in crate::app) fn toggle_collapsed(&mut self, id: &str) -> bool {
        let has_children = find_node(&self.tree, id).is_some_and(|node| node.has_children());
        if !has_children {
            return false;
        }

        let mut next = HashSet::clone(&self.collapsed);
        if !next.remove(id) {
            next.insert(id.to_owned());
        }
        self.collapsed = Arc::new(next);
        self.bump();
        true
    }

    pub(in crate::app) fn expand_all(&mut self) {
        if self.collapsed.is_empty() {
            return;
        }

        self.collapsed = Arc::default();
        self.bump();
    }

    pub(in crate::app) fn collapse_all(&mut self) {
        let next = collect_internal_ids(&self.tree);
        if next == *self.collapsed {
            return;
        }

        self.collapsed = Arc::new(next);
        self.bump();
    }

    pub(in crate::app) fn can_drill_down(&self) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|node| node.has_children())
    }

    pub(in crate::app) fn can_drill_up(&self) -> bool {
        !self.drill_path.is_empty()
    }

    pub(in crate::app) fn drill_down(&mut self) -> bool {
        if !self.can_drill_down() {
            return false;
        }
        let Some(selected) = self.selection.take() else {
            return false;
        };

        let mut next = self.drill_path.to_vec();
        next.push(selected.id.clone());
        debug!(node = %selected.id, depth = next.len(), "drill down");
        self.drill_path = Arc::from(next);
        self.bump();
        true
    }

    pub(in crate::app) fn drill_up(&mut self) -> bool {
        let Some((_, rest)) = self.drill_path.split_last() else {
            return false;
        };

        self.drill_path = Arc::from(rest.to_vec());
        self.selection = None;
        debug!(depth = self.drill_path.len(), "drill up");
        self.bump();
        true
    }

    /// Appends a placeholder leaf below the selected node and returns its id.
    pub(in crate::app) fn add_child_to_selection(&mut self) -> Option<String> {
        let parent_id = self.selected_id()?.to_owned();

        let mut taken = HashSet::new();
        collect_ids(&self.tree, &mut taken);
        let id = unique_node_id(&taken);

        let mut child = MindmapNode::new(id.clone(), "New Node");
        child.summary = Some("Click to edit this node".to_owned());
        child.description = Some("Add your description here".to_owned());
        child.category = Some("default".to_owned());
        child.children = Some(Vec::new());

        let tree = append_child(&self.tree, &parent_id, child)?;
        self.replace_tree(tree);
        debug!(parent = %parent_id, node = %id, "added node");
        Some(id)
    }

    /// Merges `update` into the node `id`, mirroring it into the selection.
    pub(in crate::app) fn update_node(&mut self, id: &str, update: &NodeUpdate) -> bool {
        if update.is_empty() {
            return false;
        }
        let Some(tree) = update_node(&self.tree, id, update) else {
            return false;
        };

        self.replace_tree(tree);
        true
    }

    fn replace_tree(&mut self, tree: Arc<MindmapNode>) {
        self.tree = tree;
        if let Some(selected_id) = self.selected_id().map(str::to_owned) {
            self.selection = find_node(&self.tree, &selected_id).cloned();
        }
        self.pending_save = Some(Arc::clone(&self.tree));
        self.bump();
    }

    pub(in crate::app) fn set_viewport(&mut self, viewport: Vec2) -> bool {
        if (viewport - self.viewport).length_sq() < 0.25 {
            return false;
        }

        self.viewport = viewport;
        self.bump();
        true
    }

    /// Tree to hand to the save worker, if an edit happened since the last call.
    pub(in crate::app) fn take_pending_save(&mut self) -> Option<Arc<MindmapNode>> {
        self.pending_save.take()
    }
}
