use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use eframe::egui::{Pos2, Rect, Vec2};

use crate::mindmap::{Edge, VisibleNode, visible_edges, visible_nodes};

use super::super::physics::{ForceConfig, Tick};
use super::super::render_utils::{node_fill, node_half_size};
use super::super::{GraphNode, LayoutGraph, ViewModel};

impl LayoutGraph {
    /// Styles every visible node once; only positions change afterwards.
    pub(in crate::app) fn new(
        generation: u64,
        nodes: &[VisibleNode],
        edges: &[Edge],
        initial: &HashMap<String, Vec2>,
        fallback: Vec2,
    ) -> Self {
        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id(), index))
            .collect::<HashMap<_, _>>();

        let edges = edges
            .iter()
            .filter_map(|edge| {
                Some((
                    *index_by_id.get(edge.source.as_str())?,
                    *index_by_id.get(edge.target.as_str())?,
                ))
            })
            .collect();

        let nodes = nodes
            .iter()
            .map(|visible| GraphNode {
                node: Arc::clone(&visible.node),
                position: initial.get(visible.id()).copied().unwrap_or(fallback),
                half_size: node_half_size(&visible.node.title, visible.depth),
                fill: node_fill(visible.node.category.as_deref(), visible.depth),
                font_size: if visible.depth == 0 { 14.0 } else { 12.0 },
            })
            .collect();

        Self {
            generation,
            alpha: 1.0,
            nodes,
            edges,
        }
    }

    /// Copies tick positions in; ticks from an older simulation are dropped.
    pub(in crate::app) fn apply_tick(&mut self, tick: &Tick<'_>) -> bool {
        if tick.generation != self.generation || tick.positions.len() != self.nodes.len() {
            return false;
        }

        for (node, position) in self.nodes.iter_mut().zip(tick.positions) {
            node.position = *position;
        }
        self.alpha = tick.alpha;
        true
    }

    /// World-space box around every node shape.
    pub(in crate::app) fn bounds(&self) -> Option<Rect> {
        self.nodes
            .iter()
            .map(|node| Rect::from_center_size(Pos2::ZERO + node.position, node.half_size * 2.0))
            .reduce(|acc, rect| acc.union(rect))
    }
}

impl ViewModel {
    /// Derives the visible set from the session and restarts the layout on it.
    pub(in crate::app) fn rebuild_layout_graph(&mut self) {
        self.reseed_layout(self.layout.keep_positions);
    }

    pub(in crate::app) fn reseed_layout(&mut self, carry_positions: bool) {
        let root = self.session.current_root();
        let collapsed = Arc::clone(self.session.collapsed());
        let center = self.session.viewport() * 0.5;

        let nodes = visible_nodes(&root, &collapsed, center);
        let visible_ids = nodes.iter().map(VisibleNode::id).collect::<HashSet<_>>();
        let edges = visible_edges(&root, &collapsed, &visible_ids);

        let previous = carry_positions.then(|| self.engine.positions_by_id());
        let generation = self.engine.reseed(
            &nodes,
            &edges,
            center,
            ForceConfig::from(self.layout),
            previous.as_ref(),
        );

        self.graph = Some(LayoutGraph::new(
            generation,
            &nodes,
            &edges,
            &self.engine.positions_by_id(),
            center,
        ));
        self.built_revision = Some(self.session.revision());
        self.search_match_cache = None;
        self.hover = Default::default();
    }
}
