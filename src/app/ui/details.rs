use eframe::egui::{self, Align, Layout, RichText, Ui};
use serde_json::Value;

use crate::mindmap::{MindmapNode, NodeUpdate};

use super::super::{EditDraft, ViewModel};

enum DetailsAction {
    Close,
    Edit,
    Save,
    Cancel,
}

impl EditDraft {
    fn from_node(node: &MindmapNode) -> Self {
        Self {
            node_id: node.id.clone(),
            title: node.title.clone(),
            summary: node.summary.clone().unwrap_or_default(),
            description: node.description.clone().unwrap_or_default(),
        }
    }

    /// Only the fields that differ from `node`.
    fn to_update(&self, node: &MindmapNode) -> NodeUpdate {
        let changed = |draft: &str, current: Option<&str>| {
            (draft != current.unwrap_or_default()).then(|| draft.to_owned())
        };

        NodeUpdate {
            title: changed(&self.title, Some(node.title.as_str())),
            summary: changed(&self.summary, node.summary.as_deref()),
            description: changed(&self.description, node.description.as_deref()),
        }
    }
}

fn metadata_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        let Some(node) = self.session.selection().cloned() else {
            return;
        };
        if self
            .draft
            .as_ref()
            .is_some_and(|draft| draft.node_id != node.id)
        {
            self.draft = None;
        }

        let mut action = None;

        ui.horizontal(|ui| {
            ui.heading("Node Details");
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("×").on_hover_text("Clear selection").clicked() {
                    action = Some(DetailsAction::Close);
                }
            });
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .id_salt("details_scroll")
            .auto_shrink([false, true])
            .max_height(420.0)
            .show(ui, |ui| {
                if let Some(draft) = self.draft.as_mut() {
                    ui.label(RichText::new("Title").strong());
                    ui.text_edit_singleline(&mut draft.title);
                    ui.add_space(6.0);
                    ui.label(RichText::new("Summary").strong());
                    ui.add(egui::TextEdit::multiline(&mut draft.summary).desired_rows(3));
                    ui.add_space(6.0);
                    ui.label(RichText::new("Description").strong());
                    ui.add(egui::TextEdit::multiline(&mut draft.description).desired_rows(5));
                } else {
                    ui.label(RichText::new("Title").strong());
                    ui.label(node.title.as_str());
                    ui.add_space(6.0);
                    ui.label(RichText::new("Summary").strong());
                    ui.label(node.summary.as_deref().unwrap_or("No summary available"));
                    ui.add_space(6.0);
                    ui.label(RichText::new("Description").strong());
                    ui.label(
                        node.description
                            .as_deref()
                            .unwrap_or("No description available"),
                    );
                }

                if let Some(metadata) = &node.metadata {
                    ui.add_space(6.0);
                    ui.label(RichText::new("Metadata").strong());
                    egui::Grid::new("metadata_grid")
                        .num_columns(2)
                        .striped(true)
                        .show(ui, |ui| {
                            for (key, value) in metadata {
                                ui.label(format!("{key}:"));
                                ui.label(metadata_text(value));
                                ui.end_row();
                            }
                        });
                }

                ui.add_space(6.0);
                ui.label(RichText::new("Statistics").strong());
                egui::Grid::new("stats_grid").num_columns(2).show(ui, |ui| {
                    ui.label("Children:");
                    ui.label(node.children().len().to_string());
                    ui.end_row();
                    ui.label("Node ID:");
                    ui.label(node.id.as_str());
                    ui.end_row();
                    if let Some(category) = &node.category {
                        ui.label("Category:");
                        ui.label(category.as_str());
                        ui.end_row();
                    }
                });
            });

        ui.separator();
        ui.horizontal(|ui| {
            if self.draft.is_some() {
                if ui.button("Save").clicked() {
                    action = Some(DetailsAction::Save);
                }
                if ui.button("Cancel").clicked() {
                    action = Some(DetailsAction::Cancel);
                }
            } else if ui.button("Edit").clicked() {
                action = Some(DetailsAction::Edit);
            }
        });

        match action {
            Some(DetailsAction::Close) => {
                self.draft = None;
                self.session.clear_selection();
            }
            Some(DetailsAction::Edit) => self.draft = Some(EditDraft::from_node(&node)),
            Some(DetailsAction::Save) => {
                if let Some(draft) = self.draft.take() {
                    let update = draft.to_update(&node);
                    self.session.update_node(&node.id, &update);
                }
            }
            Some(DetailsAction::Cancel) => self.draft = None,
            None => {}
        }
    }
}
