//! Mesh relaxation: soft per-seed forces plus hard edge constraints.
//!
//! Integration applies the organic-looking soft forces (damped velocity,
//! center attraction, anchor return, temporal smoothing); the constraint
//! solver then runs Gauss–Seidel passes over the spring edges to prevent
//! triangle degeneracy from excessive stretch or compression. Keeping the
//! two separate is what lets the mesh move loosely without inverting.

use crate::foundation::core::Point;
use crate::mesh::builder::MeshEdge;
use crate::params::Params;
use crate::seed::Seed;

/// Edges compressed below this fraction of rest length get an extra push.
const REPULSION_RATIO: f64 = 0.7;

/// One full relaxation step: integrate, then constraint passes, then the
/// containment clamp.
pub fn relax(seeds: &mut [Seed], edges: &[MeshEdge], params: &Params, width: f64, height: f64) {
    integrate(seeds, params, width, height);
    for _ in 0..params.constraint_iterations {
        satisfy_edge_constraints(seeds, edges, params);
        clamp_to_region(seeds, params, width, height);
    }
}

/// Per-frame force integration for every seed.
///
/// Fixed seeds are clamped exactly to their anchor; the boundary is rigid.
pub fn integrate(seeds: &mut [Seed], params: &Params, width: f64, height: f64) {
    let center = Point::new(width / 2.0, height / 2.0);
    for seed in seeds.iter_mut() {
        if seed.is_fixed {
            seed.prev_position = seed.anchor;
            seed.position = seed.anchor;
            continue;
        }
        let before = seed.position;
        let velocity = (seed.position - seed.prev_position) * (1.0 - params.jitter_damping);
        let mut pos = seed.position + velocity * params.physics_strength;
        pos += (center - pos) * params.center_attraction;
        pos += (seed.anchor - pos) * params.return_strength;
        // Second-order damping: blend back toward where the seed started
        // this frame.
        pos += (before - pos) * params.smoothing;
        seed.prev_position = before;
        seed.position = pos;
    }
}

/// One Gauss–Seidel pass over the edge set.
///
/// Each edge moves both endpoints half the proportional correction; a fixed
/// endpoint is excluded and its share shunted to the free one. Compressed
/// edges (below 70% of rest) additionally push apart by `repulsion_push`.
pub fn satisfy_edge_constraints(seeds: &mut [Seed], edges: &[MeshEdge], params: &Params) {
    for edge in edges {
        if edge.a >= seeds.len() || edge.b >= seeds.len() {
            continue;
        }
        let (pa, pb) = (seeds[edge.a].position, seeds[edge.b].position);
        let delta = pb - pa;
        let len = delta.hypot();
        if len < 1e-9 || edge.rest_length < 1e-9 {
            continue;
        }

        let mut strength = (len - edge.rest_length) / len;
        if len < edge.rest_length * REPULSION_RATIO {
            strength -= params.repulsion_push * (1.0 - len / (edge.rest_length * REPULSION_RATIO));
        }
        let correction = delta * (0.5 * strength);

        let a_fixed = seeds[edge.a].is_fixed;
        let b_fixed = seeds[edge.b].is_fixed;
        match (a_fixed, b_fixed) {
            (false, false) => {
                seeds[edge.a].position += correction;
                seeds[edge.b].position -= correction;
            }
            (false, true) => seeds[edge.a].position += correction * 2.0,
            (true, false) => seeds[edge.b].position -= correction * 2.0,
            (true, true) => {}
        }
    }
}

/// Clamp every non-fixed seed into the interest region.
pub fn clamp_to_region(seeds: &mut [Seed], params: &Params, width: f64, height: f64) {
    for seed in seeds.iter_mut() {
        if !seed.is_fixed {
            seed.position = params.region.clamp(seed.position, width, height);
        }
    }
}

/// Drift each seed's anchor toward its current relaxed position.
///
/// Runs on its own cadence; this is how the mesh slowly forgets the shape
/// it was detected in.
pub fn update_anchors(seeds: &mut [Seed], drift: f64) {
    for seed in seeds.iter_mut() {
        if !seed.is_fixed {
            seed.anchor += (seed.position - seed.anchor) * drift;
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/physics.rs"]
mod tests;
