use eframe::egui::{self, Ui};

use crate::config::LayoutSettings;

use super::super::ViewModel;
use super::super::physics::ForceConfig;

fn layout_slider(
    ui: &mut Ui,
    value: &mut f32,
    range: std::ops::RangeInclusive<f32>,
    step: f32,
    label: &str,
    hint: &str,
) -> bool {
    ui.add(egui::Slider::new(value, range).step_by(step as f64).text(label))
        .on_hover_text(hint)
        .changed()
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Layout");
        ui.separator();
        ui.add_space(4.0);

        let mut changed = false;
        changed |= layout_slider(
            ui,
            &mut self.layout.link_distance,
            20.0..=400.0,
            5.0,
            "Link distance",
            "Preferred length of parent-child edges.",
        );
        changed |= layout_slider(
            ui,
            &mut self.layout.charge,
            -2000.0..=0.0,
            10.0,
            "Charge",
            "Negative values push nodes apart.",
        );
        changed |= layout_slider(
            ui,
            &mut self.layout.collision_radius,
            0.0..=150.0,
            1.0,
            "Collision radius",
            "Minimum clearance kept around every node.",
        );
        changed |= layout_slider(
            ui,
            &mut self.layout.ring_spacing,
            40.0..=400.0,
            5.0,
            "Ring spacing",
            "Distance between depth rings around the root.",
        );

        if changed {
            self.engine.reheat(ForceConfig::from(self.layout));
        }

        ui.add_space(4.0);
        ui.checkbox(&mut self.layout.keep_positions, "Keep positions on change")
            .on_hover_text("Start new layouts from where nodes were instead of from scratch.");

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui.button("Restart layout").clicked() {
                self.restart_layout();
            }
            if ui.button("Defaults").clicked() {
                self.layout = LayoutSettings {
                    keep_positions: self.layout.keep_positions,
                    ..LayoutSettings::default()
                };
                self.restart_layout();
            }
        });

        ui.separator();
        let alpha = self.graph.as_ref().map_or(0.0, |graph| graph.alpha);
        if self.engine.is_running() {
            ui.label(format!("Simulation running (alpha {alpha:.3})"));
        } else {
            ui.label("Simulation settled");
        }
        ui.label(format!("Zoom: {:.0}%", self.camera.zoom * 100.0));
    }

    /// Throws away the current layout and starts a new one over the same visible set.
    pub(in crate::app) fn restart_layout(&mut self) {
        self.reseed_layout(false);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use eframe::egui::Vec2;

    use super::*;
    use crate::config::Config;
    use crate::mindmap::MindmapNode;

    fn positions(model: &ViewModel) -> Vec<(String, Vec2)> {
        model
            .graph
            .as_ref()
            .expect("layout built")
            .nodes
            .iter()
            .map(|node| (node.node.id.clone(), node.position))
            .collect()
    }

    #[test]
    fn restart_ignores_carried_positions() {
        let dir = tempfile::tempdir().expect("tempdir");
        let tree = MindmapNode::new("root", "Root").with_children(vec![
            MindmapNode::new("a", "A"),
            MindmapNode::new("b", "B"),
            MindmapNode::new("c", "C"),
        ]);
        let config = Config {
            data_file: dir.path().join("mindmap.json"),
            export_dir: dir.path().to_path_buf(),
            export_name: "export.json".to_owned(),
            layout: LayoutSettings {
                keep_positions: true,
                ..LayoutSettings::default()
            },
        };
        let mut model = ViewModel::new(Arc::new(tree), &config);
        let center = model.session.viewport() * 0.5;

        model.rebuild_layout_graph();
        let graph = model.graph.as_mut().expect("layout built");
        while model.engine.advance(50, |tick| {
            graph.apply_tick(tick);
        }) {}
        let settled = positions(&model);
        assert!(
            settled
                .iter()
                .skip(1)
                .all(|(_, position)| (*position - center).length() > 60.0)
        );

        model.rebuild_layout_graph();
        assert_eq!(positions(&model), settled);

        model.restart_layout();
        assert!(
            positions(&model)
                .iter()
                .skip(1)
                .all(|(_, position)| (*position - center).length() < 40.0)
        );
    }
}
