use eframe::egui::{Vec2, vec2};

use crate::util::stable_pair;

use super::quadtree::QuadNode;

/// Minimum squared distance used by the charge force before it saturates.
const CHARGE_DISTANCE_MIN_SQ: f32 = 1.0;

/// Tiny deterministic offset for particles that sit exactly on top of each other.
fn jiggle(seed: (usize, usize)) -> Vec2 {
    let (x, y) = stable_pair(seed);
    vec2(x, y) * 1e-6
}

fn nonzero(delta: Vec2, seed: (usize, usize)) -> Vec2 {
    let x = if delta.x == 0.0 { jiggle(seed).x } else { delta.x };
    let y = if delta.y == 0.0 { jiggle(seed).y } else { delta.y };
    vec2(x, y)
}

/// Per-link stiffness and endpoint bias, weighted by node degree so that hubs
/// move less than leaves.
pub(super) fn link_weights(links: &[(usize, usize)], node_count: usize) -> Vec<(f32, f32)> {
    let mut degree = vec![0u32; node_count];
    for &(source, target) in links {
        degree[source] += 1;
        degree[target] += 1;
    }

    links
        .iter()
        .map(|&(source, target)| {
            let source_degree = degree[source] as f32;
            let target_degree = degree[target] as f32;
            let strength = 1.0 / source_degree.min(target_degree);
            let bias = source_degree / (source_degree + target_degree);
            (strength, bias)
        })
        .collect()
}

/// Springs pulling each linked pair toward `distance`.
pub(super) fn apply_links(
    links: &[(usize, usize)],
    weights: &[(f32, f32)],
    distance: f32,
    alpha: f32,
    positions: &[Vec2],
    velocities: &mut [Vec2],
) {
    for (&(source, target), &(strength, bias)) in links.iter().zip(weights) {
        let delta = nonzero(
            (positions[target] + velocities[target]) - (positions[source] + velocities[source]),
            (source, target),
        );
        let length = delta.length();
        let correction = delta * ((length - distance) / length * alpha * strength);

        velocities[target] -= correction * bias;
        velocities[source] += correction * (1.0 - bias);
    }
}

fn charge_between(point: Vec2, other: Vec2, scaled_charge: f32, seed: (usize, usize)) -> Vec2 {
    let delta = nonzero(other - point, seed);
    let mut distance_sq = delta.length_sq();
    if distance_sq < CHARGE_DISTANCE_MIN_SQ {
        distance_sq = (CHARGE_DISTANCE_MIN_SQ * distance_sq).sqrt();
    }
    delta * (scaled_charge / distance_sq)
}

/// Barnes–Hut accumulation of the many-body force acting on `index`.
///
/// A negative `scaled_charge` repels. Cells far enough away relative to their
/// width (`theta_sq`) act as a single particle at their centroid.
pub(super) fn accumulate_charge(
    cell: &QuadNode,
    index: usize,
    positions: &[Vec2],
    scaled_charge: f32,
    theta_sq: f32,
    velocity: &mut Vec2,
) {
    if cell.count <= 0.0 {
        return;
    }

    let point = positions[index];
    if cell.is_leaf() {
        for &other in &cell.indices {
            if other != index {
                *velocity += charge_between(point, positions[other], scaled_charge, (index, other));
            }
        }
        return;
    }

    let distance_sq = (cell.centroid - point).length_sq();
    let width = cell.bounds.width();
    if !cell.bounds.contains(point) && width * width / theta_sq < distance_sq {
        *velocity += charge_between(
            point,
            cell.centroid,
            scaled_charge * cell.count,
            (index, usize::MAX),
        );
        return;
    }

    for child in cell.children() {
        accumulate_charge(child, index, positions, scaled_charge, theta_sq, velocity);
    }
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) radius: f32,
    pub(super) strength: f32,
}

fn resolve_overlap(
    from: usize,
    to: usize,
    predicted: &[Vec2],
    params: CollisionParams,
    deltas: &mut [Vec2],
) {
    let min_distance = params.radius * 2.0;
    let delta = predicted[from] - predicted[to];
    let distance_sq = delta.length_sq();
    if distance_sq >= min_distance * min_distance {
        return;
    }

    let delta = nonzero(delta, (from, to));
    let distance = delta.length();
    let push = delta * ((min_distance - distance) / distance * params.strength);
    // Equal radii split the correction evenly.
    deltas[from] += push * 0.5;
    deltas[to] -= push * 0.5;
}

/// Pushes apart every pair of particles whose predicted positions overlap,
/// walking pairs of quadtree cells and pruning cells further apart than two radii.
pub(super) fn accumulate_collisions(
    cell_a: &QuadNode,
    cell_b: &QuadNode,
    same_cell: bool,
    predicted: &[Vec2],
    params: CollisionParams,
    deltas: &mut [Vec2],
) {
    let reach = params.radius * 2.0;
    if cell_a.bounds.gap_sq(cell_b.bounds) > reach * reach {
        return;
    }

    if cell_a.is_leaf() && cell_b.is_leaf() {
        if same_cell {
            for (offset, &from) in cell_a.indices.iter().enumerate() {
                for &to in &cell_a.indices[offset + 1..] {
                    resolve_overlap(from, to, predicted, params, deltas);
                }
            }
        } else {
            for &from in &cell_a.indices {
                for &to in &cell_b.indices {
                    resolve_overlap(from, to, predicted, params, deltas);
                }
            }
        }
        return;
    }

    if same_cell {
        let children = cell_a.children().collect::<Vec<_>>();
        for (offset, child) in children.iter().enumerate() {
            accumulate_collisions(child, child, true, predicted, params, deltas);
            for other in &children[offset + 1..] {
                accumulate_collisions(child, other, false, predicted, params, deltas);
            }
        }
        return;
    }

    let split_a = !cell_a.is_leaf()
        && (cell_b.is_leaf() || cell_a.bounds.half_extent >= cell_b.bounds.half_extent);
    if split_a {
        for child in cell_a.children() {
            accumulate_collisions(child, cell_b, false, predicted, params, deltas);
        }
    } else {
        for child in cell_b.children() {
            accumulate_collisions(cell_a, child, false, predicted, params, deltas);
        }
    }
}

/// Pulls every particle toward the ring of radius `depth * spacing` around `center`.
pub(super) fn apply_radial(
    depths: &[f32],
    spacing: f32,
    center: Vec2,
    strength: f32,
    alpha: f32,
    positions: &[Vec2],
    velocities: &mut [Vec2],
) {
    for (index, (position, velocity)) in positions.iter().zip(velocities.iter_mut()).enumerate() {
        let mut offset = *position - center;
        if offset.x == 0.0 {
            offset.x = 1e-6;
        }
        let radius = offset.length();
        let target = depths[index] * spacing;
        *velocity += offset * ((target - radius) * strength * alpha / radius);
    }
}

/// Shifts every particle so the centroid moves toward `center`.
pub(super) fn apply_centering(positions: &mut [Vec2], center: Vec2, strength: f32) {
    if positions.is_empty() {
        return;
    }

    let centroid = positions.iter().fold(Vec2::ZERO, |sum, position| sum + *position)
        / positions.len() as f32;
    let shift = (centroid - center) * strength;
    for position in positions {
        *position -= shift;
    }
}
