use std::sync::Arc;

use eframe::egui::{self, Align2, Context, vec2};

use crate::config::Config;
use crate::mindmap::{MindmapNode, TreeStore};

use super::super::camera::Camera;
use super::super::persist::SaveWorker;
use super::super::physics::LayoutEngine;
use super::super::session::Session;
use super::super::{HoverState, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(tree: Arc<MindmapNode>, config: &Config) -> Self {
        Self {
            session: Session::new(tree, vec2(1200.0, 800.0)),
            saver: SaveWorker::spawn(TreeStore::new(config.data_file.clone())),
            data_file: config.data_file.clone(),
            export_dir: config.export_dir.clone(),
            export_name: config.export_name.clone(),
            layout: config.layout,
            engine: LayoutEngine::default(),
            camera: Camera::default(),
            graph: None,
            built_revision: None,
            hover: HoverState::default(),
            search: String::new(),
            search_match_cache: None,
            draft: None,
            status: None,
        }
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("toolbar")
            .resizable(false)
            .show(ctx, |ui| self.draw_toolbar(ui));

        egui::SidePanel::left("layout_controls")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| self.draw_controls(ui));

        // Floats over the graph so opening it never resizes the layout viewport.
        let graph_area = ctx.available_rect();
        if self.session.selection().is_some() {
            egui::Window::new("Node Details")
                .id(egui::Id::new("details"))
                .title_bar(false)
                .resizable(false)
                .collapsible(false)
                .default_width(340.0)
                .constrain_to(graph_area)
                .anchor(Align2::RIGHT_TOP, vec2(-12.0, 12.0))
                .show(ctx, |ui| self.draw_details(ui));
        } else {
            self.draft = None;
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));

        if let Some(tree) = self.session.take_pending_save() {
            self.saver.submit(tree);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use eframe::egui::{Event, Modifiers, PointerButton, Pos2, RawInput, Rect, pos2};

    use super::*;
    use crate::config::LayoutSettings;

    use super::super::super::EditDraft;
    use super::super::super::render_utils::world_to_screen;

    const SCREEN: Rect = Rect::from_min_max(Pos2::ZERO, pos2(1280.0, 800.0));

    fn model(dir: &Path) -> ViewModel {
        let branch = |id: &str, leaves: usize| {
            MindmapNode::new(id, id.to_uppercase()).with_children(
                (1..=leaves)
                    .map(|leaf| MindmapNode::new(format!("{id}{leaf}"), format!("{id}{leaf}")))
                    .collect(),
            )
        };
        let tree = MindmapNode::new("root", "Root").with_children(vec![
            branch("a", 2),
            branch("b", 2),
            branch("c", 2),
            branch("d", 1),
        ]);
        let config = Config {
            data_file: dir.join("mindmap.json"),
            export_dir: dir.to_path_buf(),
            export_name: "export.json".to_owned(),
            layout: LayoutSettings::default(),
        };
        ViewModel::new(Arc::new(tree), &config)
    }

    struct Harness {
        ctx: Context,
        time: f64,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                ctx: Context::default(),
                time: 0.0,
            }
        }

        fn frame(&mut self, model: &mut ViewModel, events: Vec<Event>) {
            self.time += 1.0 / 60.0;
            let input = RawInput {
                screen_rect: Some(SCREEN),
                time: Some(self.time),
                events,
                ..Default::default()
            };
            let _ = self.ctx.run(input, |ctx| model.show(ctx));
        }

        fn button(&mut self, model: &mut ViewModel, pos: Pos2, pressed: bool) {
            self.frame(
                model,
                vec![Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed,
                    modifiers: Modifiers::default(),
                }],
            );
        }
    }

    /// The graph fills the screen below the toolbar and right of the controls.
    fn screen_position(model: &ViewModel, id: &str) -> Pos2 {
        let rect = Rect::from_min_max(SCREEN.max - model.session.viewport(), SCREEN.max);
        let graph = model.graph.as_ref().expect("layout built");
        let node = graph
            .nodes
            .iter()
            .find(|node| node.node.id == id)
            .expect("node visible");
        world_to_screen(rect, model.camera.pan, model.camera.zoom, node.position)
    }

    #[test]
    fn double_click_on_unselected_node_toggles_it() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut model = model(dir.path());
        let mut harness = Harness::new();
        for _ in 0..400 {
            harness.frame(&mut model, Vec::new());
        }
        assert!(model.session.selection().is_none());

        let target = ["a", "b", "c", "d"]
            .into_iter()
            .min_by(|left, right| {
                screen_position(&model, left)
                    .x
                    .total_cmp(&screen_position(&model, right).x)
            })
            .expect("branches visible");
        let pos = screen_position(&model, target);
        let viewport = model.session.viewport();

        harness.frame(&mut model, vec![Event::PointerMoved(pos)]);
        harness.button(&mut model, pos, true);
        harness.button(&mut model, pos, false);
        assert_eq!(model.session.selected_id(), Some(target));
        assert_eq!(model.session.viewport(), viewport);
        assert!((screen_position(&model, target) - pos).length() < 1.0);

        harness.button(&mut model, pos, true);
        harness.button(&mut model, pos, false);
        assert!(model.session.collapsed().contains(target));
        assert_eq!(model.camera.zoom, 1.0);
    }

    #[test]
    fn draft_is_dropped_once_selection_clears() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut model = model(dir.path());
        let mut harness = Harness::new();

        model.session.select("a");
        model.draft = Some(EditDraft {
            node_id: "a".to_owned(),
            title: "Edited".to_owned(),
            ..Default::default()
        });
        harness.frame(&mut model, Vec::new());
        assert!(model.draft.is_some());

        model.session.clear_selection();
        harness.frame(&mut model, Vec::new());
        model.session.select("a");
        harness.frame(&mut model, Vec::new());
        assert!(model.draft.is_none());
    }
}
