//! Feature detection: periodic, full seed-set replacement.
//!
//! Detection raster-scans the analysis buffer on a coarse grid, scores each
//! grid point by 4-neighbor luminance gradient, and thins the survivors
//! stochastically so the seed budget is not spent exclusively on the very
//! strongest edges. A fixed boundary ring is always appended to anchor the
//! mesh to the frame border.

use tracing::debug;

use crate::foundation::core::Point;
use crate::foundation::math::Rng64;
use crate::frame::AnalysisBuffer;
use crate::params::Params;
use crate::seed::Seed;

/// Run one full detection cycle, producing the replacement seed set.
///
/// Interior seeds obey the `max_seeds` cap and pairwise separation; the
/// boundary ring is exempt from both. An unready buffer yields only the
/// empty vec (the caller treats that as a no-op frame). Zero accepted
/// interior seeds is valid: the ring alone still triangulates.
pub fn detect_features(
    analysis: &AnalysisBuffer,
    params: &Params,
    rng: &mut Rng64,
) -> Vec<Seed> {
    if !analysis.is_ready() {
        return Vec::new();
    }

    let mut seeds: Vec<Seed> = Vec::with_capacity(params.max_seeds);
    let step = params.feature_step.max(1);
    let min_sep = params.min_seed_separation * f64::from(step);

    interior_pass(
        analysis,
        params,
        rng,
        &mut seeds,
        PassConfig {
            step,
            threshold: params.interest_threshold,
            min_sep,
            acceptance: Acceptance::GradientProportional,
        },
    );

    // Sparse scenes get a coarser low-threshold fill pass.
    if seeds.len() < params.max_seeds / 2 {
        interior_pass(
            analysis,
            params,
            rng,
            &mut seeds,
            PassConfig {
                step: step * 2,
                threshold: params.interest_threshold * 0.25,
                min_sep: min_sep * 4.0,
                acceptance: Acceptance::Fixed(0.3),
            },
        );
    }

    let interior = seeds.len();
    seeds.extend(boundary_ring(analysis.width, analysis.height, step));
    debug!(
        interior,
        fixed = seeds.len() - interior,
        "feature detection cycle complete"
    );
    seeds
}

enum Acceptance {
    /// Accept with probability proportional to gradient magnitude.
    GradientProportional,
    /// Accept a fixed fraction of candidates.
    Fixed(f64),
}

struct PassConfig {
    step: u32,
    threshold: f32,
    min_sep: f64,
    acceptance: Acceptance,
}

fn interior_pass(
    analysis: &AnalysisBuffer,
    params: &Params,
    rng: &mut Rng64,
    seeds: &mut Vec<Seed>,
    cfg: PassConfig,
) {
    let step = cfg.step.max(1) as i64;
    let (w, h) = (i64::from(analysis.width), i64::from(analysis.height));
    let min_sep_sq = cfg.min_sep * cfg.min_sep;

    let mut y = step;
    while y < h - step.min(h) {
        let mut x = step;
        while x < w - step.min(w) {
            if seeds.len() >= params.max_seeds {
                return;
            }
            let p = Point::new(x as f64, y as f64);
            if !params.region.contains(p, w as f64, h as f64) {
                x += step;
                continue;
            }
            let grad = analysis.gradient_at(x, y);
            if grad < cfg.threshold {
                x += step;
                continue;
            }
            let accept = match cfg.acceptance {
                Acceptance::GradientProportional => {
                    rng.next_f64_01() * 255.0 < f64::from(grad)
                }
                Acceptance::Fixed(p) => rng.next_f64_01() < p,
            };
            if !accept {
                x += step;
                continue;
            }
            let too_close = seeds.iter().any(|s| {
                let d = s.position - p;
                d.x * d.x + d.y * d.y < min_sep_sq
            });
            if !too_close {
                seeds.push(Seed::interior(p, analysis.luminance_at(x, y)));
            }
            x += step;
        }
        y += step;
    }
}

/// The fixed boundary ring: four corners plus border points spaced
/// `step * 3` along each edge.
pub fn boundary_ring(width: u32, height: u32, step: u32) -> Vec<Seed> {
    let (w, h) = (f64::from(width) - 1.0, f64::from(height) - 1.0);
    let spacing = (f64::from(step) * 3.0).max(1.0);

    let mut ring = vec![
        Seed::fixed(Point::new(0.0, 0.0)),
        Seed::fixed(Point::new(w, 0.0)),
        Seed::fixed(Point::new(0.0, h)),
        Seed::fixed(Point::new(w, h)),
    ];

    let mut x = spacing;
    while x < w {
        ring.push(Seed::fixed(Point::new(x, 0.0)));
        ring.push(Seed::fixed(Point::new(x, h)));
        x += spacing;
    }
    let mut y = spacing;
    while y < h {
        ring.push(Seed::fixed(Point::new(0.0, y)));
        ring.push(Seed::fixed(Point::new(w, y)));
        y += spacing;
    }
    ring
}

#[cfg(test)]
#[path = "../tests/unit/detect.rs"]
mod tests;
