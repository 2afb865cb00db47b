mod forces;
mod quadtree;

use std::collections::HashMap;
use std::f32::consts::PI;

use eframe::egui::{Vec2, vec2};
use tracing::debug;

use crate::config::LayoutSettings;
use crate::mindmap::{Edge, VisibleNode};

use forces::{
    CollisionParams, accumulate_charge, accumulate_collisions, apply_centering, apply_links,
    apply_radial, link_weights,
};
use quadtree::QuadNode;

const BARNES_HUT_THETA_SQ: f32 = 0.81;
const INITIAL_RADIUS: f32 = 10.0;

/// Force parameters of one simulation run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct ForceConfig {
    pub(in crate::app) link_distance: f32,
    pub(in crate::app) charge: f32,
    pub(in crate::app) collision_radius: f32,
    pub(in crate::app) collision_strength: f32,
    pub(in crate::app) ring_spacing: f32,
    pub(in crate::app) radial_strength: f32,
    pub(in crate::app) center_strength: f32,
    pub(in crate::app) velocity_decay: f32,
    pub(in crate::app) alpha_min: f32,
    pub(in crate::app) alpha_decay: f32,
}

impl From<LayoutSettings> for ForceConfig {
    fn from(settings: LayoutSettings) -> Self {
        let alpha_min = 0.001;
        Self {
            link_distance: settings.link_distance,
            charge: settings.charge,
            collision_radius: settings.collision_radius,
            collision_strength: 1.0,
            ring_spacing: settings.ring_spacing,
            radial_strength: 0.1,
            center_strength: 1.0,
            velocity_decay: 0.4,
            alpha_min,
            // Reaches `alpha_min` after 300 ticks.
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
        }
    }
}

impl Default for ForceConfig {
    fn default() -> Self {
        LayoutSettings::default().into()
    }
}

/// Positions after one simulation step.
pub(in crate::app) struct Tick<'a> {
    pub(in crate::app) generation: u64,
    pub(in crate::app) positions: &'a [Vec2],
    pub(in crate::app) alpha: f32,
}

struct Simulation {
    ids: Vec<String>,
    depths: Vec<f32>,
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    fixed: Vec<Option<Vec2>>,
    links: Vec<(usize, usize)>,
    link_weights: Vec<(f32, f32)>,
    center: Vec2,
    alpha: f32,
    config: ForceConfig,
    predicted: Vec<Vec2>,
    collision_deltas: Vec<Vec2>,
}

impl Simulation {
    fn new(
        nodes: &[VisibleNode],
        edges: &[Edge],
        center: Vec2,
        config: ForceConfig,
        previous: Option<&HashMap<String, Vec2>>,
    ) -> Self {
        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id(), index))
            .collect::<HashMap<_, _>>();

        let links = edges
            .iter()
            .filter_map(|edge| {
                let source = *index_by_id.get(edge.source.as_str())?;
                let target = *index_by_id.get(edge.target.as_str())?;
                (source != target).then_some((source, target))
            })
            .collect::<Vec<_>>();
        let link_weights = link_weights(&links, nodes.len());

        let initial_angle = PI * (3.0 - 5.0_f32.sqrt());
        let positions = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                if let Some(fixed) = node.fixed {
                    return fixed;
                }
                if let Some(position) = previous.and_then(|previous| previous.get(node.id())) {
                    return *position;
                }
                if let Some(position) = node.position {
                    return position;
                }

                let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
                let angle = index as f32 * initial_angle;
                center + vec2(angle.cos(), angle.sin()) * radius
            })
            .collect::<Vec<_>>();

        Self {
            ids: nodes.iter().map(|node| node.id().to_owned()).collect(),
            depths: nodes.iter().map(|node| node.depth as f32).collect(),
            velocities: vec![Vec2::ZERO; nodes.len()],
            fixed: nodes.iter().map(|node| node.fixed).collect(),
            positions,
            links,
            link_weights,
            center,
            alpha: 1.0,
            config,
            predicted: Vec::with_capacity(nodes.len()),
            collision_deltas: Vec::with_capacity(nodes.len()),
        }
    }

    fn is_running(&self) -> bool {
        self.alpha >= self.config.alpha_min && !self.positions.is_empty()
    }

    fn step(&mut self) {
        let config = self.config;
        self.alpha += -self.alpha * config.alpha_decay;
        let alpha = self.alpha;

        apply_links(
            &self.links,
            &self.link_weights,
            config.link_distance,
            alpha,
            &self.positions,
            &mut self.velocities,
        );

        if let Some(cells) = QuadNode::build(&self.positions) {
            let scaled_charge = config.charge * alpha;
            for (index, velocity) in self.velocities.iter_mut().enumerate() {
                accumulate_charge(
                    &cells,
                    index,
                    &self.positions,
                    scaled_charge,
                    BARNES_HUT_THETA_SQ,
                    velocity,
                );
            }
        }

        apply_centering(&mut self.positions, self.center, config.center_strength);

        if config.collision_radius > 0.0 {
            self.predicted.clear();
            self.predicted.extend(
                self.positions
                    .iter()
                    .zip(&self.velocities)
                    .map(|(position, velocity)| *position + *velocity),
            );
            self.collision_deltas.clear();
            self.collision_deltas.resize(self.positions.len(), Vec2::ZERO);

            if let Some(cells) = QuadNode::build(&self.predicted) {
                accumulate_collisions(
                    &cells,
                    &cells,
                    true,
                    &self.predicted,
                    CollisionParams {
                        radius: config.collision_radius,
                        strength: config.collision_strength,
                    },
                    &mut self.collision_deltas,
                );
            }
            for (velocity, delta) in self.velocities.iter_mut().zip(&self.collision_deltas) {
                *velocity += *delta;
            }
        }

        apply_radial(
            &self.depths,
            config.ring_spacing,
            self.center,
            config.radial_strength,
            alpha,
            &self.positions,
            &mut self.velocities,
        );

        let retain = 1.0 - config.velocity_decay;
        for ((position, velocity), fixed) in self
            .positions
            .iter_mut()
            .zip(self.velocities.iter_mut())
            .zip(&self.fixed)
        {
            match fixed {
                Some(fixed) => {
                    *position = *fixed;
                    *velocity = Vec2::ZERO;
                }
                None => {
                    *velocity *= retain;
                    *position += *velocity;
                }
            }
        }
    }
}

/// Owns the running simulation for the current visible set.
///
/// Every reseed or teardown advances `generation`; ticks carry the generation
/// they were produced under so consumers can drop anything older.
#[derive(Default)]
pub(in crate::app) struct LayoutEngine {
    generation: u64,
    simulation: Option<Simulation>,
}

impl LayoutEngine {
    pub(in crate::app) fn is_running(&self) -> bool {
        self.simulation
            .as_ref()
            .is_some_and(Simulation::is_running)
    }

    /// Discards the current simulation and starts a fresh one over `nodes`.
    pub(in crate::app) fn reseed(
        &mut self,
        nodes: &[VisibleNode],
        edges: &[Edge],
        center: Vec2,
        config: ForceConfig,
        previous: Option<&HashMap<String, Vec2>>,
    ) -> u64 {
        self.teardown();
        self.simulation = Some(Simulation::new(nodes, edges, center, config, previous));
        debug!(
            generation = self.generation,
            nodes = nodes.len(),
            edges = edges.len(),
            carried = previous.is_some(),
            "layout reseeded"
        );
        self.generation
    }

    pub(in crate::app) fn teardown(&mut self) {
        self.simulation = None;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Restarts the current run with new force parameters, keeping positions.
    pub(in crate::app) fn reheat(&mut self, config: ForceConfig) {
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.config = config;
            simulation.alpha = 1.0;
        }
    }

    pub(in crate::app) fn positions_by_id(&self) -> HashMap<String, Vec2> {
        self.simulation
            .as_ref()
            .map(|simulation| {
                simulation
                    .ids
                    .iter()
                    .cloned()
                    .zip(simulation.positions.iter().copied())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Runs up to `steps` ticks, handing each result to `on_tick`. Returns
    /// whether the simulation still has energy left afterwards.
    pub(in crate::app) fn advance(&mut self, steps: usize, mut on_tick: impl FnMut(&Tick<'_>)) -> bool {
        let generation = self.generation;
        let Some(simulation) = self.simulation.as_mut() else {
            return false;
        };

        for _ in 0..steps {
            if !simulation.is_running() {
                break;
            }
            simulation.step();
            on_tick(&Tick {
                generation,
                positions: &simulation.positions,
                alpha: simulation.alpha,
            });
        }

        simulation.is_running()
    }
}
