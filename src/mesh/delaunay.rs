//! Bowyer–Watson incremental Delaunay triangulation.
//!
//! Points are inserted one at a time: every triangle whose circumcircle
//! contains the new point is removed, the cavity boundary is collected
//! (edges appearing in exactly one removed triangle), and the point is
//! connected to each boundary edge. A super-triangle with generous margin
//! encloses the input so border points triangulate cleanly; triangles
//! touching it are discarded at the end.

use std::collections::HashMap;

use crate::foundation::core::Point;

/// An ordered triple of point indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triangle {
    /// Vertex indices into the triangulated point slice.
    pub v: [usize; 3],
}

impl Triangle {
    /// The three undirected edges, as canonically ordered index pairs.
    pub fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.v;
        [ordered(a, b), ordered(b, c), ordered(c, a)]
    }
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

/// Circumcircle in center/radius² form.
///
/// Near-collinear triples yield a near-zero determinant; those are flagged
/// degenerate and treated as containing nothing, which keeps insertion from
/// dividing by (almost) zero.
#[derive(Clone, Copy, Debug)]
struct Circumcircle {
    cx: f64,
    cy: f64,
    r_sq: f64,
    degenerate: bool,
}

impl Circumcircle {
    fn of(a: Point, b: Point, c: Point) -> Self {
        let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
        if d.abs() < 1e-9 {
            return Self {
                cx: 0.0,
                cy: 0.0,
                r_sq: 0.0,
                degenerate: true,
            };
        }
        let a2 = a.x * a.x + a.y * a.y;
        let b2 = b.x * b.x + b.y * b.y;
        let c2 = c.x * c.x + c.y * c.y;
        let cx = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
        let cy = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;
        let dx = a.x - cx;
        let dy = a.y - cy;
        Self {
            cx,
            cy,
            r_sq: dx * dx + dy * dy,
            degenerate: false,
        }
    }

    fn contains(&self, p: Point) -> bool {
        if self.degenerate {
            return false;
        }
        let dx = p.x - self.cx;
        let dy = p.y - self.cy;
        dx * dx + dy * dy < self.r_sq
    }
}

/// Triangulate a point set.
///
/// Fewer than three points yield an empty triangulation. Output triangles
/// reference only input indices (super-triangle artifacts are removed).
pub fn triangulate(points: &[Point]) -> Vec<Triangle> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    let extent = (max_x - min_x).max(max_y - min_y).max(1.0);
    let margin = 20.0 * extent;

    let mut pts = points.to_vec();
    pts.push(Point::new(min_x - margin, min_y - extent));
    pts.push(Point::new(max_x + margin, min_y - extent));
    pts.push(Point::new((min_x + max_x) / 2.0, max_y + margin));

    let mut tris: Vec<(Triangle, Circumcircle)> = vec![(
        Triangle { v: [n, n + 1, n + 2] },
        Circumcircle::of(pts[n], pts[n + 1], pts[n + 2]),
    )];

    for i in 0..n {
        let p = pts[i];

        let mut bad: Vec<usize> = Vec::new();
        for (ti, (_, cc)) in tris.iter().enumerate() {
            if cc.contains(p) {
                bad.push(ti);
            }
        }
        if bad.is_empty() {
            continue;
        }

        // Edges shared by two removed triangles cancel; the survivors form
        // the cavity boundary.
        let mut edge_count: HashMap<(usize, usize), u32> = HashMap::new();
        for &ti in &bad {
            for e in tris[ti].0.edges() {
                *edge_count.entry(e).or_insert(0) += 1;
            }
        }

        for &ti in bad.iter().rev() {
            tris.swap_remove(ti);
        }

        for ((a, b), count) in edge_count {
            if count != 1 {
                continue;
            }
            let t = Triangle { v: [a, b, i] };
            let cc = Circumcircle::of(pts[a], pts[b], pts[i]);
            tris.push((t, cc));
        }
    }

    tris.into_iter()
        .map(|(t, _)| t)
        .filter(|t| t.v.iter().all(|&v| v < n))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/mesh/delaunay.rs"]
mod tests;
