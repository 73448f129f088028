use super::*;

use crate::foundation::core::{Region, Rgb};

fn gray(v: f32) -> Rgb {
    Rgb::new(v, v, v)
}

fn buffer_with(width: u32, height: u32, base: f32, hot: &[(usize, usize, f32)]) -> AnalysisBuffer {
    let mut pixels = vec![gray(base); width as usize * height as usize];
    for &(x, y, v) in hot {
        pixels[y * width as usize + x] = gray(v);
    }
    AnalysisBuffer {
        width,
        height,
        pixels,
    }
}

fn rect_params() -> Params {
    Params {
        region: Region::Rect,
        ..Params::default()
    }
}

#[test]
fn unready_buffer_passes_seeds_through() {
    let seeds = vec![Seed::interior(Point::new(2.0, 2.0), 100.0)];
    let out = track_seeds(seeds.clone(), &AnalysisBuffer::default(), &rect_params());
    assert_eq!(out.seeds, seeds);
    assert_eq!(out.dropped, 0);
}

#[test]
fn tracker_locks_onto_unique_luminance_match() {
    // A single matching pixel at offset (+2, 0); everything else differs
    // from the fingerprint by 50 (> drop threshold of 25).
    let analysis = buffer_with(12, 12, 150.0, &[(7, 5, 100.0)]);
    let params = Params {
        tracking_radius: 4,
        tracking_strength: 0.35,
        tracking_drop_threshold: 25.0,
        ..rect_params()
    };
    let mut seed = Seed::interior(Point::new(5.0, 5.0), 100.0);
    seed.miss_count = 1;

    let out = track_seeds(vec![seed], &analysis, &params);
    assert_eq!(out.dropped, 0);
    let tracked = out.seeds[0];

    // Miss counter decremented on a good match.
    assert_eq!(tracked.miss_count, 0);
    // Position interpolated toward (7, 5) by tracking_strength.
    assert!((tracked.position.x - (5.0 + 2.0 * 0.35)).abs() < 1e-9);
    assert!((tracked.position.y - 5.0).abs() < 1e-9);
    assert_eq!(tracked.age, 1);
}

#[test]
fn miss_count_floors_at_zero() {
    let analysis = buffer_with(8, 8, 100.0, &[]);
    let params = rect_params();
    let seed = Seed::interior(Point::new(4.0, 4.0), 100.0);
    let out = track_seeds(vec![seed], &analysis, &params);
    assert_eq!(out.seeds[0].miss_count, 0);
}

#[test]
fn lost_seed_is_dropped_after_lifetime() {
    // No pixel anywhere near the fingerprint: every frame is a miss.
    let analysis = buffer_with(8, 8, 0.0, &[]);
    let params = Params {
        tracking_drop_threshold: 25.0,
        seed_lifetime: 2,
        ..rect_params()
    };
    let mut seeds = vec![Seed::interior(Point::new(4.0, 4.0), 255.0)];
    let mut dropped_at = None;
    for frame in 1..=5 {
        let out = track_seeds(std::mem::take(&mut seeds), &analysis, &params);
        seeds = out.seeds;
        if out.dropped > 0 {
            dropped_at = Some(frame);
            break;
        }
    }
    // miss_count reaches 3 (> lifetime 2) on the third miss.
    assert_eq!(dropped_at, Some(3));
    assert!(seeds.is_empty());
}

#[test]
fn fixed_seeds_are_never_tracked_or_dropped() {
    let analysis = buffer_with(8, 8, 0.0, &[]);
    let params = Params {
        seed_lifetime: 0,
        ..rect_params()
    };
    let fixed = Seed::fixed(Point::new(0.0, 0.0));
    let out = track_seeds(vec![fixed], &analysis, &params);
    assert_eq!(out.dropped, 0);
    assert_eq!(out.seeds[0].position, Point::new(0.0, 0.0));
    assert_eq!(out.seeds[0].age, 1);
}

#[test]
fn luminance_adapts_by_half_toward_match() {
    let analysis = buffer_with(8, 8, 90.0, &[]);
    let params = Params {
        tracking_drop_threshold: 25.0,
        ..rect_params()
    };
    let seed = Seed::interior(Point::new(4.0, 4.0), 100.0);
    let out = track_seeds(vec![seed], &analysis, &params);
    // Best match is 90 everywhere (score 10, a good match); fingerprint
    // blends halfway: 100 -> 95.
    assert!((out.seeds[0].luminance - 95.0).abs() < 0.01);
}
