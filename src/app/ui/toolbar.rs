use eframe::egui::{self, Align, Layout, Ui};
use tracing::error;

use crate::mindmap::export_tree;
use crate::util::ellipsize;

use super::super::ViewModel;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum ToolbarIntent {
    ExpandAll,
    CollapseAll,
    DrillDown,
    DrillUp,
    AddNode,
    FitView,
    Download,
}

impl ViewModel {
    pub(in crate::app) fn draw_toolbar(&mut self, ui: &mut Ui) {
        let mut intent = None;

        ui.horizontal(|ui| {
            ui.heading("Mindmap Explorer");
            ui.separator();

            if ui.button("Expand all").clicked() {
                intent = Some(ToolbarIntent::ExpandAll);
            }
            if ui.button("Collapse all").clicked() {
                intent = Some(ToolbarIntent::CollapseAll);
            }

            ui.separator();
            let drill_down = ui
                .add_enabled(self.session.can_drill_down(), egui::Button::new("Drill down"))
                .on_disabled_hover_text("Select a node with children first.");
            if drill_down.clicked() {
                intent = Some(ToolbarIntent::DrillDown);
            }
            if ui
                .add_enabled(self.session.can_drill_up(), egui::Button::new("Drill up"))
                .clicked()
            {
                intent = Some(ToolbarIntent::DrillUp);
            }

            ui.separator();
            let add_node = ui
                .add_enabled(self.session.selection().is_some(), egui::Button::new("Add node"))
                .on_hover_text("Append a new child to the selected node.");
            if add_node.clicked() {
                intent = Some(ToolbarIntent::AddNode);
            }
            if ui.button("Fit view").clicked() {
                intent = Some(ToolbarIntent::FitView);
            }
            if ui
                .button("Download")
                .on_hover_text(format!(
                    "Write the tree to {}",
                    self.export_dir.join(&self.export_name).display()
                ))
                .clicked()
            {
                intent = Some(ToolbarIntent::Download);
            }

            ui.separator();
            ui.add(
                egui::TextEdit::singleline(&mut self.search)
                    .hint_text("Search titles")
                    .desired_width(180.0),
            );

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(self.status_text())
                    .on_hover_text(format!("Saving to {}", self.data_file.display()));
            });
        });

        if let Some(intent) = intent {
            self.apply_toolbar_intent(intent);
        }
    }

    pub(in crate::app) fn apply_toolbar_intent(&mut self, intent: ToolbarIntent) {
        match intent {
            ToolbarIntent::ExpandAll => self.session.expand_all(),
            ToolbarIntent::CollapseAll => self.session.collapse_all(),
            ToolbarIntent::DrillDown => {
                self.session.drill_down();
            }
            ToolbarIntent::DrillUp => {
                self.session.drill_up();
            }
            ToolbarIntent::AddNode => {
                if let Some(id) = self.session.add_child_to_selection() {
                    self.status = Some(format!("Added {id}"));
                }
            }
            ToolbarIntent::FitView => self.fit_to_view(),
            ToolbarIntent::Download => self.export_current_tree(),
        }
    }

    fn export_current_tree(&mut self) {
        match export_tree(self.session.tree(), &self.export_dir, &self.export_name) {
            Ok(path) => self.status = Some(format!("Exported {}", path.display())),
            Err(export_error) => {
                error!(error = %export_error, "failed to export mindmap");
                self.status = Some(format!("Export failed: {export_error}"));
            }
        }
    }

    fn status_text(&self) -> String {
        let mut parts = Vec::new();

        if let Some(graph) = &self.graph {
            parts.push(format!("{} nodes, {} edges", graph.nodes.len(), graph.edges.len()));
        }
        if self.session.can_drill_up() {
            let root = self.session.current_root();
            parts.push(format!(
                "root: {} (level {})",
                ellipsize(&root.title, 24),
                self.session.drill_path().len()
            ));
        }
        if let Some(selected) = self.session.selection() {
            parts.push(format!("selected: {}", ellipsize(&selected.title, 24)));
        }
        if let Some(status) = &self.status {
            parts.push(status.clone());
        }

        parts.join("  |  ")
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use super::*;
    use crate::config::{Config, LayoutSettings};
    use crate::mindmap::{MindmapNode, TreeStore, find_node};

    fn model(dir: &Path) -> ViewModel {
        let tree = MindmapNode::new("root", "Root").with_children(vec![
            MindmapNode::new("a", "A"),
            MindmapNode::new("b", "B").with_children(vec![MindmapNode::new("b1", "B1")]),
        ]);
        let config = Config {
            data_file: dir.join("mindmap.json"),
            export_dir: dir.to_path_buf(),
            export_name: "export.json".to_owned(),
            layout: LayoutSettings::default(),
        };
        ViewModel::new(Arc::new(tree), &config)
    }

    #[test]
    fn download_writes_export_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut model = model(dir.path());
        model.apply_toolbar_intent(ToolbarIntent::Download);

        let written = std::fs::read_to_string(dir.path().join("export.json")).expect("export written");
        assert!(written.contains("\n  \"title\": \"Root\""));
        assert!(model.status.as_deref().is_some_and(|status| status.starts_with("Exported")));
    }

    #[test]
    fn add_node_is_saved_in_the_background() {
        let dir = tempfile::tempdir().expect("tempdir");
        let data_file = dir.path().join("mindmap.json");
        let mut model = model(dir.path());

        model.session.select("a");
        model.apply_toolbar_intent(ToolbarIntent::AddNode);
        let tree = model.session.take_pending_save().expect("edit pending");
        model.saver.submit(tree);
        model.saver.shutdown();

        let saved = Arc::new(TreeStore::new(data_file).load().expect("saved tree loads"));
        let parent = find_node(&saved, "a").expect("parent kept");
        assert_eq!(parent.children().len(), 1);
        assert_eq!(parent.children()[0].title, "New Node");
    }

    #[test]
    fn failed_save_keeps_the_edit_in_memory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").expect("write fixture");
        let mut model = model(&blocker);
        assert_eq!(model.data_file, blocker.join("mindmap.json"));

        model.session.select("a");
        model.apply_toolbar_intent(ToolbarIntent::AddNode);
        let tree = model.session.take_pending_save().expect("edit pending");
        model.saver.submit(tree);
        model.saver.shutdown();

        assert!(!model.data_file.exists());
        let parent = find_node(model.session.tree(), "a").expect("parent kept");
        assert_eq!(parent.children().len(), 1);
        assert_eq!(parent.children()[0].title, "New Node");
        assert_eq!(model.session.selected_id(), Some("a"));
        assert!(model.session.can_drill_down());
        assert!(model.status.as_deref().is_some_and(|status| status.starts_with("Added")));
    }

    #[test]
    fn drill_intents_follow_enablement() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut model = model(dir.path());

        model.apply_toolbar_intent(ToolbarIntent::DrillUp);
        model.session.select("b1");
        model.apply_toolbar_intent(ToolbarIntent::DrillDown);
        assert!(model.session.drill_path().is_empty());

        model.session.select("b");
        model.apply_toolbar_intent(ToolbarIntent::DrillDown);
        assert_eq!(model.session.drill_path(), ["b".to_string()]);
        assert!(model.status_text().contains("root: B"));

        model.apply_toolbar_intent(ToolbarIntent::DrillUp);
        assert!(model.session.drill_path().is_empty());
    }

    #[test]
    fn fit_view_without_layout_is_a_no_op() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut model = model(dir.path());
        model.apply_toolbar_intent(ToolbarIntent::FitView);
        assert!(!model.camera.is_animating());

        model.rebuild_layout_graph();
        model.apply_toolbar_intent(ToolbarIntent::FitView);
        assert!(model.camera.is_animating());
    }
}
