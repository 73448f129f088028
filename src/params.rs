//! Tunable parameters, presets and background palettes.
//!
//! [`Params`] is a flat, serde-friendly bundle that can be loaded from JSON,
//! swapped wholesale via a named [`Preset`], or randomized from a seed.
//! Mutating parameters never retriggers work by itself; the pipeline reads
//! the active set at frame start and forces rebuilds only where flagged
//! (seed cap, analysis resolution, preset swaps).

use crate::foundation::core::{Region, Rgb};
use crate::foundation::error::{MeshcamError, MeshcamResult};
use crate::foundation::math::Rng64;

/// Flat bundle of pipeline tunables.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Params {
    /// Maximum number of interior (non-fixed) seeds per detection cycle.
    pub max_seeds: usize,
    /// Grid step in analysis pixels for the detector raster scan.
    pub feature_step: u32,
    /// Minimum gradient magnitude for a grid point to be considered.
    pub interest_threshold: f32,
    /// Minimum pairwise seed distance, in multiples of `feature_step`.
    pub min_seed_separation: f64,
    /// Square search radius (analysis pixels) for the temporal tracker.
    pub tracking_radius: u32,
    /// Fraction of the distance to the best match applied per frame.
    pub tracking_strength: f64,
    /// Luminance-difference score above which a frame counts as a miss.
    pub tracking_drop_threshold: f32,
    /// Consecutive misses after which a seed is dropped.
    pub seed_lifetime: u32,
    /// Frames between full feature-detection cycles.
    pub detect_every: u32,
    /// Frames between periodic mesh rebuilds.
    pub mesh_rebuild_every: u32,
    /// Frames between anchor-drift updates.
    pub anchor_update_every: u32,
    /// Fraction each anchor moves toward its seed per anchor update.
    pub anchor_drift: f64,
    /// Velocity scale applied during integration.
    pub physics_strength: f64,
    /// Fraction of frame-to-frame velocity discarded as jitter.
    pub jitter_damping: f64,
    /// Pull strength toward the buffer center.
    pub center_attraction: f64,
    /// Pull strength toward each seed's anchor.
    pub return_strength: f64,
    /// Second-order blend back toward the previous position.
    pub smoothing: f64,
    /// Gauss-Seidel passes over the edge constraints per frame.
    pub constraint_iterations: u32,
    /// Extra push applied to edges compressed below 70% of rest length.
    pub repulsion_push: f64,
    /// Mean-absolute color difference above which a pixel/seed is foreground.
    pub fg_threshold: f32,
    /// Local gradient magnitude above which a seed is foreground.
    pub fg_edge_threshold: f32,
    /// Per-frame adaptation rate of the background model.
    pub bg_learning_rate: f32,
    /// Per-frame blend applied to seed display colors.
    pub color_smoothing: f32,
    /// Longest side of the downsampled analysis buffer.
    pub analysis_max_dim: u32,
    /// Output pixels per Voronoi raster cell.
    pub voronoi_cell_px: u32,
    /// Interest region shape.
    pub region: Region,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_seeds: 220,
            feature_step: 4,
            interest_threshold: 24.0,
            min_seed_separation: 1.5,
            tracking_radius: 4,
            tracking_strength: 0.35,
            tracking_drop_threshold: 25.0,
            seed_lifetime: 30,
            detect_every: 150,
            mesh_rebuild_every: 45,
            anchor_update_every: 12,
            anchor_drift: 0.06,
            physics_strength: 0.9,
            jitter_damping: 0.18,
            center_attraction: 0.004,
            return_strength: 0.05,
            smoothing: 0.25,
            constraint_iterations: 3,
            repulsion_push: 0.35,
            fg_threshold: 28.0,
            fg_edge_threshold: 40.0,
            bg_learning_rate: 0.015,
            color_smoothing: 0.3,
            analysis_max_dim: 160,
            voronoi_cell_px: 6,
            region: Region::Oval,
        }
    }
}

impl Params {
    /// The parameter bundle for a named preset.
    pub fn preset(preset: Preset) -> Self {
        let base = Params::default();
        match preset {
            Preset::Smooth => Self {
                smoothing: 0.45,
                jitter_damping: 0.3,
                tracking_strength: 0.2,
                anchor_drift: 0.03,
                constraint_iterations: 4,
                ..base
            },
            Preset::Expressive => Self {
                tracking_strength: 0.55,
                smoothing: 0.1,
                return_strength: 0.02,
                anchor_drift: 0.12,
                center_attraction: 0.002,
                ..base
            },
            Preset::Unstable => Self {
                seed_lifetime: 8,
                detect_every: 60,
                anchor_drift: 0.3,
                return_strength: 0.01,
                fg_threshold: 20.0,
                ..base
            },
        }
    }

    /// A randomized bundle, deterministic for a given seed.
    ///
    /// Every sampled range keeps the pipeline stable enough to run; the
    /// structural knobs (seed cap, analysis resolution) are left at their
    /// defaults so randomizing never forces a buffer reallocation.
    pub fn randomize(seed: u64) -> Self {
        let mut rng = Rng64::new(seed);
        let base = Params::default();
        Self {
            interest_threshold: rng.next_f64_range(12.0, 48.0) as f32,
            min_seed_separation: rng.next_f64_range(1.0, 2.5),
            tracking_strength: rng.next_f64_range(0.15, 0.6),
            seed_lifetime: rng.next_f64_range(6.0, 45.0) as u32,
            anchor_drift: rng.next_f64_range(0.02, 0.25),
            jitter_damping: rng.next_f64_range(0.05, 0.4),
            center_attraction: rng.next_f64_range(0.0, 0.01),
            return_strength: rng.next_f64_range(0.01, 0.12),
            smoothing: rng.next_f64_range(0.05, 0.5),
            repulsion_push: rng.next_f64_range(0.1, 0.6),
            fg_threshold: rng.next_f64_range(18.0, 40.0) as f32,
            bg_learning_rate: rng.next_f64_range(0.005, 0.05) as f32,
            ..base
        }
    }

    /// Reject parameter combinations the pipeline cannot run with.
    pub fn validate(&self) -> MeshcamResult<()> {
        if self.max_seeds == 0 {
            return Err(MeshcamError::validation("max_seeds must be > 0"));
        }
        if self.feature_step == 0 {
            return Err(MeshcamError::validation("feature_step must be > 0"));
        }
        if self.analysis_max_dim < 8 {
            return Err(MeshcamError::validation("analysis_max_dim must be >= 8"));
        }
        if self.voronoi_cell_px == 0 {
            return Err(MeshcamError::validation("voronoi_cell_px must be > 0"));
        }
        for (name, v) in [
            ("tracking_strength", self.tracking_strength),
            ("anchor_drift", self.anchor_drift),
            ("jitter_damping", self.jitter_damping),
            ("return_strength", self.return_strength),
            ("smoothing", self.smoothing),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(MeshcamError::validation(format!(
                    "{name} must be within 0..=1, got {v}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&f64::from(self.bg_learning_rate)) {
            return Err(MeshcamError::validation("bg_learning_rate must be within 0..=1"));
        }
        Ok(())
    }
}

/// Named parameter bundles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Heavy damping and slow anchor drift; the portrait barely breathes.
    Smooth,
    /// Fast tracking and weak return forces; the mesh chases motion.
    Expressive,
    /// Short seed lifetimes and aggressive anchor drift; the portrait
    /// keeps forgetting its own shape.
    Unstable,
}

impl Preset {
    /// All built-in presets, in cycling order.
    pub const ALL: [Preset; 3] = [Preset::Smooth, Preset::Expressive, Preset::Unstable];

    /// Stable lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Preset::Smooth => "smooth",
            Preset::Expressive => "expressive",
            Preset::Unstable => "unstable",
        }
    }

    /// Parse a preset by its stable name.
    pub fn from_name(name: &str) -> MeshcamResult<Self> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| MeshcamError::validation(format!("unknown preset '{name}'")))
    }
}

/// A five-stop gradient mapping background luminance to display color.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Palette {
    /// Gradient stops, darkest luminance first.
    pub stops: [Rgb; 5],
}

impl Palette {
    /// All built-in palette names, in cycling order.
    pub const BUILTIN: [&'static str; 3] = ["mono", "ember", "glacier"];

    /// Look up a built-in palette by name.
    pub fn builtin(name: &str) -> MeshcamResult<Self> {
        let stops = match name {
            "mono" => [
                Rgb::new(12.0, 12.0, 14.0),
                Rgb::new(70.0, 70.0, 74.0),
                Rgb::new(128.0, 128.0, 132.0),
                Rgb::new(190.0, 190.0, 192.0),
                Rgb::new(244.0, 244.0, 246.0),
            ],
            "ember" => [
                Rgb::new(24.0, 10.0, 8.0),
                Rgb::new(92.0, 28.0, 16.0),
                Rgb::new(182.0, 64.0, 22.0),
                Rgb::new(236.0, 138.0, 48.0),
                Rgb::new(250.0, 222.0, 180.0),
            ],
            "glacier" => [
                Rgb::new(8.0, 14.0, 30.0),
                Rgb::new(24.0, 52.0, 94.0),
                Rgb::new(58.0, 110.0, 158.0),
                Rgb::new(132.0, 182.0, 214.0),
                Rgb::new(224.0, 240.0, 250.0),
            ],
            _ => {
                return Err(MeshcamError::validation(format!(
                    "unknown palette '{name}' (built-ins: {})",
                    Palette::BUILTIN.join(", ")
                )));
            }
        };
        Ok(Self { stops })
    }

    /// Map a luminance in `0.0..=255.0` through the gradient.
    ///
    /// Piecewise-linear between adjacent stops by the fractional stop index.
    pub fn map(&self, luminance: f32) -> Rgb {
        let t = (luminance / 255.0).clamp(0.0, 1.0) * (self.stops.len() - 1) as f32;
        let i = (t.floor() as usize).min(self.stops.len() - 2);
        let frac = t - i as f32;
        self.stops[i].lerp(self.stops[i + 1], frac)
    }
}

#[cfg(test)]
#[path = "../tests/unit/params.rs"]
mod tests;
