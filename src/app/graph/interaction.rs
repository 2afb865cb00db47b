use eframe::egui::{self, Pos2, Rect, Ui, Vec2};

use super::super::render_utils::{ellipse_contains, screen_to_world};
use super::super::session::Session;
use super::super::{LayoutGraph, ViewModel};

/// Pointer state for the node under the cursor.
#[derive(Clone, Debug, Default, PartialEq)]
pub(in crate::app) enum HoverState {
    #[default]
    Idle,
    Hovered {
        id: String,
        tooltip: String,
        /// Where the pointer entered the node; the tooltip stays there.
        anchor: Pos2,
    },
}

impl HoverState {
    /// Feeds the current hit test result. Returns true on enter or leave.
    pub(in crate::app) fn update(&mut self, hit: Option<(&str, &str)>, pointer: Option<Pos2>) -> bool {
        let next = match (hit, pointer) {
            (Some((id, tooltip)), Some(pointer)) => {
                if self.hovered_id() == Some(id) {
                    return false;
                }
                Self::Hovered {
                    id: id.to_owned(),
                    tooltip: tooltip.to_owned(),
                    anchor: pointer,
                }
            }
            _ => Self::Idle,
        };

        let changed = next != *self;
        *self = next;
        changed
    }

    pub(in crate::app) fn hovered_id(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Hovered { id, .. } => Some(id.as_str()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum ClickKind {
    Single,
    Double,
}

pub(in crate::app) fn classify_click(response: &egui::Response) -> Option<ClickKind> {
    if response.double_clicked() {
        Some(ClickKind::Double)
    } else if response.clicked() {
        Some(ClickKind::Single)
    } else {
        None
    }
}

/// Single click selects; double click toggles the node's children.
pub(in crate::app) fn apply_node_click(session: &mut Session, kind: ClickKind, id: &str) {
    match kind {
        ClickKind::Single => {
            session.select(id);
        }
        ClickKind::Double => {
            session.toggle_collapsed(id);
        }
    }
}

/// Topmost node whose ellipse contains `pointer`.
pub(in crate::app) fn hit_test(
    graph: &LayoutGraph,
    rect: Rect,
    pan: Vec2,
    zoom: f32,
    pointer: Pos2,
) -> Option<usize> {
    let world = screen_to_world(rect, pan, zoom, pointer).to_pos2();
    graph
        .nodes
        .iter()
        .enumerate()
        .rev()
        .find(|(_, node)| ellipse_contains(node.position.to_pos2(), node.half_size, world))
        .map(|(index, _)| index)
}

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let (scroll, pinch) = ui.input(|input| (input.raw_scroll_delta.y, input.zoom_delta()));
        let mut factor = pinch;
        if scroll.abs() > f32::EPSILON {
            factor *= (scroll * 0.002).exp2();
        }
        if (factor - 1.0).abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        self.camera.zoom_at((pointer - rect.min).to_pos2(), factor);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Primary)
            || response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.camera.pan_by(response.drag_delta());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use eframe::egui::{pos2, vec2};

    use super::*;
    use crate::mindmap::MindmapNode;

    fn session() -> Session {
        let tree = MindmapNode::new("root", "R").with_children(vec![
            MindmapNode::new("A", "A"),
            MindmapNode::new("B", "B").with_children(vec![MindmapNode::new("B1", "B1")]),
        ]);
        Session::new(Arc::new(tree), vec2(800.0, 600.0))
    }

    #[test]
    fn hover_enters_stays_and_leaves() {
        let mut hover = HoverState::default();
        assert!(!hover.update(None, Some(pos2(1.0, 1.0))));

        assert!(hover.update(Some(("A", "summary of A")), Some(pos2(10.0, 20.0))));
        assert_eq!(hover.hovered_id(), Some("A"));

        assert!(!hover.update(Some(("A", "summary of A")), Some(pos2(15.0, 25.0))));
        let HoverState::Hovered { anchor, tooltip, .. } = &hover else {
            panic!("expected hovered state");
        };
        assert_eq!(*anchor, pos2(10.0, 20.0));
        assert_eq!(tooltip, "summary of A");

        assert!(hover.update(Some(("B", "B")), Some(pos2(40.0, 40.0))));
        assert_eq!(hover.hovered_id(), Some("B"));

        assert!(hover.update(None, Some(pos2(400.0, 400.0))));
        assert_eq!(hover, HoverState::Idle);
    }

    #[test]
    fn pointer_leaving_the_surface_resets_hover() {
        let mut hover = HoverState::default();
        hover.update(Some(("A", "A")), Some(pos2(0.0, 0.0)));
        assert!(hover.update(Some(("A", "A")), None));
        assert_eq!(hover, HoverState::Idle);
    }

    #[test]
    fn single_click_selects_without_toggling() {
        let mut session = session();
        apply_node_click(&mut session, ClickKind::Single, "B");
        assert_eq!(session.selected_id(), Some("B"));
        assert!(session.collapsed().is_empty());
    }

    #[test]
    fn double_click_toggles_but_keeps_selection() {
        let mut session = session();
        apply_node_click(&mut session, ClickKind::Single, "A");
        apply_node_click(&mut session, ClickKind::Double, "B");
        assert!(session.collapsed().contains("B"));
        assert_eq!(session.selected_id(), Some("A"));

        apply_node_click(&mut session, ClickKind::Double, "B");
        assert!(session.collapsed().is_empty());
    }

    #[test]
    fn double_click_on_leaf_changes_nothing() {
        let mut session = session();
        let revision = session.revision();
        apply_node_click(&mut session, ClickKind::Double, "B1");
        assert!(session.collapsed().is_empty());
        assert_eq!(session.revision(), revision);
    }
}
