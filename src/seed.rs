//! Seeds: tracked feature points doubling as mesh vertices.

use crate::foundation::core::{Point, Rgb};

/// A tracked 2D feature point serving as one mesh vertex.
///
/// Positions live in analysis-buffer space. A seed is created by the
/// feature detector (interior) or boundary injection (fixed), mutated each
/// frame by the tracker/physics/color/segmenter stages, and destroyed when
/// tracking loss outlives `seed_lifetime` or a detection cycle replaces the
/// whole set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Seed {
    /// Current relaxed position.
    pub position: Point,
    /// Position at the previous frame, for pseudo-velocity.
    pub prev_position: Point,
    /// Slowly drifting rest position, target of the return force.
    pub anchor: Point,
    /// Last-sampled brightness, the tracking fingerprint.
    pub luminance: f32,
    /// Smoothed full-resolution video color.
    pub display_color: Rgb,
    /// Smoothed palette-mapped background color.
    pub background_color: Rgb,
    /// Foreground/background classification, recomputed every frame.
    pub is_foreground: bool,
    /// Consecutive frames without a good tracking match.
    pub miss_count: u32,
    /// Boundary seeds are exempt from tracking, integration and
    /// foreground classification.
    pub is_fixed: bool,
    /// Frames since creation.
    pub age: u64,
}

impl Seed {
    /// A fresh interior seed at `position` with fingerprint `luminance`.
    pub fn interior(position: Point, luminance: f32) -> Self {
        Self {
            position,
            prev_position: position,
            anchor: position,
            luminance,
            display_color: Rgb::default(),
            background_color: Rgb::default(),
            is_foreground: false,
            miss_count: 0,
            is_fixed: false,
            age: 0,
        }
    }

    /// A fixed boundary seed anchored at `position`.
    pub fn fixed(position: Point) -> Self {
        Self {
            is_fixed: true,
            ..Self::interior(position, 0.0)
        }
    }

    /// The color this seed contributes to rendering.
    pub fn active_color(&self) -> Rgb {
        if self.is_foreground {
            self.display_color
        } else {
            self.background_color
        }
    }
}

/// The current seed population plus its generation counter.
///
/// Edges and triangles index into one seed generation; the mesh records the
/// generation it was built against so the pipeline never mixes derived
/// structures across full seed-set replacements.
#[derive(Clone, Debug, Default)]
pub struct SeedSet {
    /// Seeds in detection order; fixed boundary seeds come last.
    pub seeds: Vec<Seed>,
    generation: u64,
}

impl SeedSet {
    /// Replace the whole population, invalidating derived structures.
    pub fn replace(&mut self, seeds: Vec<Seed>) {
        self.seeds = seeds;
        self.generation += 1;
    }

    /// Current generation; bumped on every full replacement.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of seeds, fixed ring included.
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    /// Whether the set holds no seeds at all.
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// Number of non-fixed seeds.
    pub fn interior_count(&self) -> usize {
        self.seeds.iter().filter(|s| !s.is_fixed).count()
    }

    /// Positions of every seed, in index order.
    pub fn positions(&self) -> Vec<Point> {
        self.seeds.iter().map(|s| s.position).collect()
    }
}
