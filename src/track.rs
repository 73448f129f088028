//! Temporal tracking: the cheap per-frame correspondence step.
//!
//! On frames where feature detection does not run, every non-fixed seed
//! searches a small square neighborhood for the pixel whose luminance best
//! matches its stored fingerprint. A miss counter with hysteresis absorbs
//! single-frame failures; seeds that stay lost past `seed_lifetime` are
//! dropped and repopulated by the next detection cycle.

use tracing::debug;

use crate::foundation::core::Point;
use crate::frame::AnalysisBuffer;
use crate::params::Params;
use crate::seed::Seed;

/// Result of one tracking pass.
#[derive(Clone, Debug)]
pub struct TrackOutcome {
    /// Surviving seeds with updated positions and fingerprints.
    pub seeds: Vec<Seed>,
    /// Seeds dropped this frame for exceeding the miss budget.
    pub dropped: usize,
}

/// Track every non-fixed seed one frame forward.
///
/// Consumes the old population and builds a new collection (a single
/// `filter_map` pass) rather than removing elements mid-iteration. Fixed
/// seeds pass through untouched apart from the age increment.
pub fn track_seeds(seeds: Vec<Seed>, analysis: &AnalysisBuffer, params: &Params) -> TrackOutcome {
    if !analysis.is_ready() {
        return TrackOutcome {
            seeds,
            dropped: 0,
        };
    }

    let before = seeds.len();
    let tracked: Vec<Seed> = seeds
        .into_iter()
        .filter_map(|mut seed| {
            seed.age += 1;
            if seed.is_fixed {
                return Some(seed);
            }

            let (best_pos, best_score) = best_match(&seed, analysis, params);
            if best_score > params.tracking_drop_threshold {
                seed.miss_count += 1;
            } else {
                seed.miss_count = seed.miss_count.saturating_sub(1);
            }
            if seed.miss_count > params.seed_lifetime {
                return None;
            }

            let delta = best_pos - seed.position;
            seed.position += delta * params.tracking_strength;
            // Luminance adapts faster than position so the fingerprint
            // follows lighting changes.
            let target = analysis.sample(best_pos).luminance();
            seed.luminance += (target - seed.luminance) * 0.5;
            Some(seed)
        })
        .collect();

    let dropped = before - tracked.len();
    if dropped > 0 {
        debug!(dropped, remaining = tracked.len(), "tracking dropped seeds");
    }
    TrackOutcome {
        seeds: tracked,
        dropped,
    }
}

/// Exhaustive luminance search in the square neighborhood of
/// `tracking_radius`, constrained to the interest region.
fn best_match(seed: &Seed, analysis: &AnalysisBuffer, params: &Params) -> (Point, f32) {
    let (w, h) = (f64::from(analysis.width), f64::from(analysis.height));
    let cx = seed.position.x.round() as i64;
    let cy = seed.position.y.round() as i64;
    let r = i64::from(params.tracking_radius);

    let mut best_pos = seed.position;
    let mut best_score = f32::INFINITY;
    for dy in -r..=r {
        for dx in -r..=r {
            let p = Point::new((cx + dx) as f64, (cy + dy) as f64);
            if !params.region.contains(p, w, h) {
                continue;
            }
            let score = (analysis.luminance_at(cx + dx, cy + dy) - seed.luminance).abs();
            if score < best_score {
                best_score = score;
                best_pos = p;
            }
        }
    }
    (best_pos, best_score)
}

#[cfg(test)]
#[path = "../tests/unit/track.rs"]
mod tests;
