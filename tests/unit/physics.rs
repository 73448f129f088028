use super::*;

use crate::foundation::core::Region;

fn still_params() -> Params {
    // Every soft force disabled so tests can isolate one at a time.
    Params {
        physics_strength: 1.0,
        jitter_damping: 0.0,
        center_attraction: 0.0,
        return_strength: 0.0,
        smoothing: 0.0,
        repulsion_push: 0.0,
        region: Region::Rect,
        ..Params::default()
    }
}

fn seed_at(x: f64, y: f64) -> Seed {
    Seed::interior(Point::new(x, y), 0.0)
}

#[test]
fn fixed_seeds_are_pinned_to_their_anchor() {
    let mut seeds = vec![Seed::fixed(Point::new(3.0, 4.0))];
    seeds[0].position = Point::new(9.0, 9.0);
    integrate(&mut seeds, &still_params(), 100.0, 100.0);
    assert_eq!(seeds[0].position, Point::new(3.0, 4.0));
    assert_eq!(seeds[0].prev_position, Point::new(3.0, 4.0));
}

#[test]
fn velocity_carries_forward_without_damping() {
    let mut seeds = vec![seed_at(10.0, 10.0)];
    seeds[0].prev_position = Point::new(9.0, 10.0);
    integrate(&mut seeds, &still_params(), 100.0, 100.0);
    // Velocity (1, 0) applied in full.
    assert!((seeds[0].position.x - 11.0).abs() < 1e-12);
    assert_eq!(seeds[0].position.y, 10.0);
    assert_eq!(seeds[0].prev_position, Point::new(10.0, 10.0));
}

#[test]
fn full_damping_kills_all_motion() {
    let params = Params {
        jitter_damping: 1.0,
        ..still_params()
    };
    let mut seeds = vec![seed_at(10.0, 10.0)];
    seeds[0].prev_position = Point::new(2.0, 3.0);
    integrate(&mut seeds, &params, 100.0, 100.0);
    assert_eq!(seeds[0].position, Point::new(10.0, 10.0));
}

#[test]
fn return_force_pulls_toward_anchor() {
    let params = Params {
        return_strength: 0.5,
        ..still_params()
    };
    let mut seeds = vec![seed_at(10.0, 10.0)];
    seeds[0].anchor = Point::new(20.0, 10.0);
    integrate(&mut seeds, &params, 100.0, 100.0);
    assert!((seeds[0].position.x - 15.0).abs() < 1e-12);
}

#[test]
fn center_attraction_moves_toward_buffer_center() {
    let params = Params {
        center_attraction: 0.1,
        ..still_params()
    };
    let mut seeds = vec![seed_at(10.0, 50.0)];
    seeds[0].anchor = seeds[0].position;
    integrate(&mut seeds, &params, 100.0, 100.0);
    // Center is (50, 50); 10% of the offset applied.
    assert!((seeds[0].position.x - 14.0).abs() < 1e-12);
    assert_eq!(seeds[0].position.y, 50.0);
}

#[test]
fn stretched_edge_contracts_symmetrically() {
    let mut seeds = vec![seed_at(0.0, 0.0), seed_at(10.0, 0.0)];
    let edges = [MeshEdge {
        a: 0,
        b: 1,
        rest_length: 6.0,
    }];
    satisfy_edge_constraints(&mut seeds, &edges, &still_params());
    // Each endpoint moves half of the 4px excess toward the other.
    assert!((seeds[0].position.x - 2.0).abs() < 1e-12);
    assert!((seeds[1].position.x - 8.0).abs() < 1e-12);
    // Midpoint preserved for a free-free edge.
    let mid = (seeds[0].position.x + seeds[1].position.x) / 2.0;
    assert!((mid - 5.0).abs() < 1e-12);
}

#[test]
fn fixed_endpoint_shunts_correction_to_the_free_one() {
    let mut seeds = vec![Seed::fixed(Point::new(0.0, 0.0)), seed_at(10.0, 0.0)];
    let edges = [MeshEdge {
        a: 0,
        b: 1,
        rest_length: 6.0,
    }];
    satisfy_edge_constraints(&mut seeds, &edges, &still_params());
    assert_eq!(seeds[0].position, Point::new(0.0, 0.0));
    assert!((seeds[1].position.x - 6.0).abs() < 1e-12);
}

#[test]
fn compressed_edge_gets_repulsion_push() {
    let rest = 10.0;
    let edges = [MeshEdge {
        a: 0,
        b: 1,
        rest_length: rest,
    }];

    let mut plain = vec![seed_at(0.0, 0.0), seed_at(3.0, 0.0)];
    satisfy_edge_constraints(&mut plain, &edges, &still_params());

    let params = Params {
        repulsion_push: 0.35,
        ..still_params()
    };
    let mut pushed = vec![seed_at(0.0, 0.0), seed_at(3.0, 0.0)];
    satisfy_edge_constraints(&mut pushed, &edges, &params);

    // Below 70% of rest the endpoints separate farther than the plain
    // proportional correction alone.
    let plain_len = plain[1].position.x - plain[0].position.x;
    let pushed_len = pushed[1].position.x - pushed[0].position.x;
    assert!(pushed_len > plain_len);
}

#[test]
fn degenerate_edges_are_skipped() {
    let mut seeds = vec![seed_at(5.0, 5.0), seed_at(5.0, 5.0)];
    let edges = [
        MeshEdge {
            a: 0,
            b: 1,
            rest_length: 3.0,
        },
        // Out-of-range index from a stale mesh.
        MeshEdge {
            a: 0,
            b: 7,
            rest_length: 3.0,
        },
    ];
    satisfy_edge_constraints(&mut seeds, &edges, &still_params());
    assert_eq!(seeds[0].position, Point::new(5.0, 5.0));
    assert!(seeds[0].position.x.is_finite());
}

#[test]
fn relax_keeps_seeds_inside_the_region() {
    let mut params = still_params();
    params.constraint_iterations = 2;
    let mut seeds = vec![seed_at(50.0, 50.0)];
    // Launch the seed hard toward the border.
    seeds[0].prev_position = Point::new(10.0, 50.0);
    seeds[0].anchor = Point::new(50.0, 50.0);
    for _ in 0..10 {
        relax(&mut seeds, &[], &params, 100.0, 100.0);
    }
    let p = seeds[0].position;
    assert!(p.x >= 1.0 && p.x <= 98.0);
    assert!(p.y >= 1.0 && p.y <= 98.0);
}

#[test]
fn anchors_drift_toward_positions() {
    let mut seeds = vec![seed_at(10.0, 0.0), Seed::fixed(Point::new(0.0, 0.0))];
    seeds[0].anchor = Point::new(0.0, 0.0);
    seeds[1].position = Point::new(5.0, 5.0);
    update_anchors(&mut seeds, 0.25);
    assert!((seeds[0].anchor.x - 2.5).abs() < 1e-12);
    assert_eq!(seeds[1].anchor, Point::new(0.0, 0.0));
}
