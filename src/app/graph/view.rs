use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Shape, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::super::render_utils::{
    EDGE_COLOR, SELECTED_COLOR, blend_color, dim_color, draw_background, ellipse_visible,
    world_to_screen,
};
use super::super::{SearchMatchCache, ViewModel};
use super::interaction::{ClickKind, HoverState, apply_node_click, classify_click, hit_test};

const TICKS_PER_FRAME: usize = 1;
const SEARCH_HIGHLIGHT: Color32 = Color32::from_rgb(103, 196, 255);

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

impl ViewModel {
    fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        let graph = self.graph.as_ref()?;
        if let Some(cached) = &self.search_match_cache
            && cached.generation == graph.generation
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matcher = SkimMatcherV2::default();
        let matches = graph
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| fuzzy_match_score(&matcher, &node.node.title, query).is_some())
            .map(|(index, _)| index)
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            generation: graph.generation,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    pub(in crate::app) fn fit_to_view(&mut self) {
        let Some(bounds) = self.graph.as_ref().and_then(|graph| graph.bounds()) else {
            return;
        };

        if let Some((pan, zoom)) = super::super::camera::fit_target(bounds, self.session.viewport()) {
            self.camera.animate_to(pan, zoom);
        }
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());

        self.session.set_viewport(rect.size());
        if self.built_revision != Some(self.session.revision()) {
            self.rebuild_layout_graph();
        }

        let frame_delta_seconds = ui.input(|input| input.stable_dt).min(0.1);
        self.camera.update(frame_delta_seconds);
        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        let painter = ui.painter_at(rect);
        let pan = self.camera.pan;
        let zoom = self.camera.zoom;
        draw_background(&painter, rect, pan, zoom);

        let simulation_running = match self.graph.as_mut() {
            Some(graph) => self
                .engine
                .advance(TICKS_PER_FRAME, |tick| {
                    graph.apply_tick(tick);
                }),
            None => false,
        };
        if simulation_running || self.camera.is_animating() || response.dragged() {
            ui.ctx().request_repaint();
        }

        let search_matches = self.cached_search_matches();
        let Some(graph) = self.graph.as_ref() else {
            return;
        };

        let pointer = ui.input(|input| input.pointer.hover_pos()).filter(|pos| rect.contains(*pos));
        let hovered = pointer.and_then(|pointer| hit_test(graph, rect, pan, zoom, pointer));
        let hit = hovered.map(|index| {
            let node = &graph.nodes[index].node;
            (node.id.as_str(), node.tooltip_text())
        });
        self.hover.update(hit, pointer);
        if hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        let selected_id = self.session.selected_id();
        let search_active = search_matches.as_ref().is_some_and(|matches| !matches.is_empty());

        let edge_stroke = Stroke::new((2.0 * zoom).max(0.5), EDGE_COLOR);
        for &(source, target) in &graph.edges {
            let start = world_to_screen(rect, pan, zoom, graph.nodes[source].position);
            let end = world_to_screen(rect, pan, zoom, graph.nodes[target].position);
            painter.line_segment([start, end], edge_stroke);
        }

        for (index, graph_node) in graph.nodes.iter().enumerate() {
            let center = world_to_screen(rect, pan, zoom, graph_node.position);
            let radius = graph_node.half_size * zoom;
            if !ellipse_visible(rect, center, radius) {
                continue;
            }

            let is_selected = selected_id == Some(graph_node.node.id.as_str());
            let is_match = search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&index));

            let fill = if is_match {
                blend_color(graph_node.fill, SEARCH_HIGHLIGHT, 0.55)
            } else if search_active {
                dim_color(graph_node.fill, 0.45)
            } else {
                graph_node.fill
            };

            if is_selected {
                for ring in 1..=4 {
                    let spread = ring as f32 * 2.5 * zoom;
                    let alpha = 70 - ring * 15;
                    painter.add(Shape::ellipse_stroke(
                        center,
                        radius + vec2(spread, spread),
                        Stroke::new(2.5 * zoom, Color32::from_rgba_unmultiplied(255, 215, 0, alpha)),
                    ));
                }
            }

            painter.add(Shape::ellipse_filled(center, radius, fill));
            let outline = if is_selected {
                Stroke::new(3.0 * zoom, SELECTED_COLOR)
            } else {
                Stroke::new(zoom, Color32::WHITE)
            };
            painter.add(Shape::ellipse_stroke(center, radius, outline));

            let font_size = graph_node.font_size * zoom;
            if font_size >= 4.0 {
                painter.text(
                    center,
                    Align2::CENTER_CENTER,
                    &graph_node.node.title,
                    FontId::proportional(font_size),
                    Color32::WHITE,
                );
            }
        }

        if let HoverState::Hovered { tooltip, anchor, .. } = &self.hover {
            let galley = painter.layout(
                tooltip.clone(),
                FontId::proportional(12.0),
                Color32::from_gray(235),
                260.0,
            );
            let origin = *anchor + vec2(10.0, -10.0);
            let frame = egui::Rect::from_min_size(origin, galley.size()).expand(6.0);
            painter.rect_filled(frame, 4.0, Color32::from_rgba_unmultiplied(20, 24, 32, 235));
            painter.galley(origin, galley, Color32::from_gray(235));
        }

        let clicked_node = hovered.map(|index| graph.nodes[index].node.id.clone());
        let click = classify_click(&response);
        match (click, clicked_node) {
            (Some(kind), Some(id)) => apply_node_click(&mut self.session, kind, &id),
            (Some(ClickKind::Single), None) => self.session.clear_selection(),
            (Some(ClickKind::Double), None) => {
                if let Some(pointer) = pointer {
                    self.camera.zoom_at((pointer - rect.min).to_pos2(), 2.0);
                }
            }
            (None, _) => {}
        }
    }
}
