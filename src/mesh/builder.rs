//! Mesh derivation: triangles plus the unique spring-edge set.
//!
//! The mesh is rebuilt wholesale when triggered, never patched. Edge rest
//! lengths are measured from seed positions at build time, so the springs
//! relax toward whatever shape existed at the last rebuild, not the
//! original detection shape.

use std::collections::BTreeSet;

use tracing::debug;

use crate::mesh::delaunay::{self, Triangle};
use crate::seed::SeedSet;

/// An undirected spring constraint between two seeds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshEdge {
    /// Lower seed index.
    pub a: usize,
    /// Higher seed index.
    pub b: usize,
    /// Euclidean distance between the endpoints at build time.
    pub rest_length: f64,
}

/// The triangulation and derived edges for one seed generation.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Delaunay triangles over the seed positions.
    pub triangles: Vec<Triangle>,
    /// Unique undirected edges with cached rest lengths.
    pub edges: Vec<MeshEdge>,
    generation: u64,
    built_seeds: usize,
}

impl Mesh {
    /// Seed generation this mesh was built against.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Seed count at build time.
    pub fn built_seed_count(&self) -> usize {
        self.built_seeds
    }

    /// Whether the mesh holds no triangles.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Retriangulate the current seed set and derive its edge set.
///
/// Fewer than three seeds yield an empty mesh; the renderer degrades
/// gracefully and the next detection cycle repopulates.
pub fn build_mesh(set: &SeedSet) -> Mesh {
    let positions = set.positions();
    let triangles = delaunay::triangulate(&positions);

    let mut pairs: BTreeSet<(usize, usize)> = BTreeSet::new();
    for t in &triangles {
        for e in t.edges() {
            pairs.insert(e);
        }
    }
    let edges = pairs
        .into_iter()
        .map(|(a, b)| MeshEdge {
            a,
            b,
            rest_length: positions[a].distance(positions[b]),
        })
        .collect::<Vec<_>>();

    debug!(
        seeds = set.len(),
        triangles = triangles.len(),
        edges = edges.len(),
        "mesh rebuilt"
    );
    Mesh {
        triangles,
        edges,
        generation: set.generation(),
        built_seeds: set.len(),
    }
}

/// Heuristic proxy for "topology probably changed": enough seeds have
/// appeared or vanished since the mesh was last built that the triangulation
/// no longer reflects the population. Small fluctuations are tolerated to
/// avoid needless rebuilds, which would re-measure every spring's rest
/// length and defeat the relaxation.
pub fn topology_drifted(seed_count: usize, built_seed_count: usize) -> bool {
    (seed_count as i64 - built_seed_count as i64).abs() > 10
}

#[cfg(test)]
#[path = "../../tests/unit/mesh/builder.rs"]
mod tests;
