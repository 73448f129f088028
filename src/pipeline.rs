//! The per-frame portrait pipeline.
//!
//! One [`PortraitPipeline::advance`] call executes a full cooperative pass:
//! buffer refresh, detection or tracking (mutually exclusive per frame),
//! conditional mesh rebuild, relaxation, anchor drift, color sampling,
//! background segmentation, and rendering. Control-surface writes (mode,
//! freeze, preset, palette, caps) are buffered and applied atomically at
//! the start of the next frame.

use tracing::{debug, info};

use crate::detect::detect_features;
use crate::foundation::core::Rgb;
use crate::foundation::error::MeshcamResult;
use crate::foundation::math::Rng64;
use crate::frame::{FrameBuffers, FrameSource, Refresh};
use crate::mesh::builder::{self, Mesh, build_mesh};
use crate::params::{Palette, Params, Preset};
use crate::physics;
use crate::render::portrait::{RenderMode, render_mesh, render_voronoi};
use crate::render::surface::DrawSurface;
use crate::schedule::Cadence;
use crate::seed::SeedSet;
use crate::segment::BackgroundModel;
use crate::track::track_seeds;

/// Frame-capture collaborator, consumed as a black box.
pub trait Recorder {
    /// Begin capturing the visible frame buffer for `seconds`.
    fn begin(&mut self, seconds: f64);
    /// Whether a capture is currently active.
    fn is_active(&self) -> bool;
}

/// Per-frame counters for the debug surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Frames advanced since construction.
    pub frames: u64,
    /// Current seed count, fixed ring included.
    pub seeds: usize,
    /// Current non-fixed seed count.
    pub interior_seeds: usize,
    /// Current triangle count.
    pub triangles: usize,
    /// Current edge count.
    pub edges: usize,
    /// Full detection cycles run.
    pub detections: u64,
    /// Mesh rebuilds performed.
    pub rebuilds: u64,
    /// Seeds dropped by tracking loss, cumulative.
    pub seeds_dropped: u64,
}

/// Control-surface writes buffered until the next frame boundary.
#[derive(Clone, Debug, Default)]
struct PendingControls {
    params: Option<Params>,
    palette: Option<Palette>,
    mode: Option<RenderMode>,
    frozen: Option<bool>,
    max_seeds: Option<usize>,
    analysis_max_dim: Option<u32>,
}

/// The real-time mesh-portrait engine.
pub struct PortraitPipeline {
    params: Params,
    palette: Palette,
    mode: RenderMode,
    frozen: bool,
    buffers: FrameBuffers,
    seeds: SeedSet,
    mesh: Mesh,
    background: BackgroundModel,
    detect_cadence: Cadence,
    rebuild_cadence: Cadence,
    anchor_cadence: Cadence,
    rng: Rng64,
    mesh_dirty: bool,
    stats: PipelineStats,
    pending: PendingControls,
}

impl PortraitPipeline {
    /// Build a pipeline from a parameter bundle and palette.
    pub fn new(params: Params, palette: Palette, seed: u64) -> MeshcamResult<Self> {
        params.validate()?;
        Ok(Self {
            buffers: FrameBuffers::new(params.analysis_max_dim),
            detect_cadence: Cadence::new(params.detect_every),
            rebuild_cadence: Cadence::new(params.mesh_rebuild_every),
            anchor_cadence: Cadence::new(params.anchor_update_every),
            params,
            palette,
            mode: RenderMode::default(),
            frozen: false,
            seeds: SeedSet::default(),
            mesh: Mesh::default(),
            background: BackgroundModel::new(),
            rng: Rng64::new(seed),
            mesh_dirty: false,
            stats: PipelineStats::default(),
            pending: PendingControls::default(),
        })
    }

    /// Run one full pipeline pass and draw into `surface`.
    pub fn advance(
        &mut self,
        source: &mut dyn FrameSource,
        surface: &mut dyn DrawSurface,
    ) -> MeshcamResult<()> {
        self.apply_pending();
        self.stats.frames += 1;

        if self.frozen {
            self.render(surface);
            return Ok(());
        }

        match self.buffers.refresh(source, self.params.analysis_max_dim) {
            Refresh::NotReady => {
                // Video not sized yet; retried next frame.
                self.render(surface);
                return Ok(());
            }
            Refresh::Resized => {
                debug!(
                    width = self.buffers.analysis.width,
                    height = self.buffers.analysis.height,
                    "analysis buffer resized; resetting derived state"
                );
                self.seeds.replace(Vec::new());
                self.mesh = Mesh::default();
                self.detect_cadence.force();
            }
            Refresh::Updated => {}
        }

        // Detection and tracking are mutually exclusive per frame.
        if self.detect_cadence.tick() {
            let fresh = detect_features(&self.buffers.analysis, &self.params, &mut self.rng);
            self.seeds.replace(fresh);
            self.mesh_dirty = true;
            self.stats.detections += 1;
        } else {
            let outcome = track_seeds(
                std::mem::take(&mut self.seeds.seeds),
                &self.buffers.analysis,
                &self.params,
            );
            self.seeds.seeds = outcome.seeds;
            self.stats.seeds_dropped += outcome.dropped as u64;
            if outcome.dropped > 0 {
                self.mesh_dirty = true;
            }
        }

        let periodic = self.rebuild_cadence.tick();
        let stale = self.mesh.generation() != self.seeds.generation();
        let drifted = builder::topology_drifted(self.seeds.len(), self.mesh.built_seed_count());
        if self.mesh_dirty || stale || periodic || drifted {
            self.mesh = build_mesh(&self.seeds);
            self.mesh_dirty = false;
            self.stats.rebuilds += 1;
        }

        let (aw, ah) = (
            f64::from(self.buffers.analysis.width),
            f64::from(self.buffers.analysis.height),
        );
        physics::relax(&mut self.seeds.seeds, &self.mesh.edges, &self.params, aw, ah);

        if self.anchor_cadence.tick() {
            physics::update_anchors(&mut self.seeds.seeds, self.params.anchor_drift);
        }

        self.sample_display_colors();
        self.background
            .update(&self.buffers.analysis, &self.params, &self.palette);
        self.background
            .classify_seeds(&mut self.seeds.seeds, &self.buffers.analysis, &self.params);

        self.stats.seeds = self.seeds.len();
        self.stats.interior_seeds = self.seeds.interior_count();
        self.stats.triangles = self.mesh.triangles.len();
        self.stats.edges = self.mesh.edges.len();

        self.render(surface);
        Ok(())
    }

    /// Map each seed back to full-resolution video pixels and smooth its
    /// display color.
    fn sample_display_colors(&mut self) {
        let scale = self.buffers.analysis_scale();
        let t = self.params.color_smoothing;
        for seed in &mut self.seeds.seeds {
            let fx = (seed.position.x * scale).round() as i64;
            let fy = (seed.position.y * scale).round() as i64;
            let sampled = self.buffers.frame.get_clamped(fx, fy);
            seed.display_color = seed.display_color.lerp(sampled, t);
        }
    }

    fn render(&mut self, surface: &mut dyn DrawSurface) {
        surface.clear(Rgb::default());
        let (aw, ah) = (self.buffers.analysis.width, self.buffers.analysis.height);
        match self.mode {
            RenderMode::Mesh => render_mesh(
                surface,
                &self.seeds.seeds,
                &self.mesh,
                &self.background,
                aw,
                ah,
            ),
            RenderMode::Voronoi => render_voronoi(
                surface,
                &self.seeds.seeds,
                aw,
                ah,
                self.params.voronoi_cell_px,
            ),
        }
    }

    fn apply_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        if let Some(params) = pending.params {
            self.params = params;
            self.detect_cadence.reset(self.params.detect_every);
            self.rebuild_cadence.reset(self.params.mesh_rebuild_every);
            self.anchor_cadence.reset(self.params.anchor_update_every);
            self.mesh_dirty = true;
        }
        if let Some(max_seeds) = pending.max_seeds {
            self.params.max_seeds = max_seeds.max(1);
            // Seed-cap changes force a fresh detection cycle.
            self.detect_cadence.force();
        }
        if let Some(dim) = pending.analysis_max_dim {
            // Picked up by the next buffer refresh, which resets state.
            self.params.analysis_max_dim = dim.max(8);
        }
        if let Some(palette) = pending.palette {
            self.palette = palette;
        }
        if let Some(mode) = pending.mode {
            self.mode = mode;
        }
        if let Some(frozen) = pending.frozen {
            self.frozen = frozen;
        }
    }

    /// Queue a full parameter swap for the next frame.
    pub fn set_params(&mut self, params: Params) -> MeshcamResult<()> {
        params.validate()?;
        self.pending.params = Some(params);
        Ok(())
    }

    /// Queue a named preset for the next frame.
    pub fn set_preset(&mut self, preset: Preset) {
        info!(preset = preset.name(), "preset queued");
        self.pending.params = Some(Params::preset(preset));
    }

    /// Queue a palette swap for the next frame.
    pub fn set_palette(&mut self, palette: Palette) {
        self.pending.palette = Some(palette);
    }

    /// Queue a render-mode switch for the next frame.
    pub fn set_mode(&mut self, mode: RenderMode) {
        self.pending.mode = Some(mode);
    }

    /// Queue a freeze-state change for the next frame.
    pub fn set_frozen(&mut self, frozen: bool) {
        self.pending.frozen = Some(frozen);
    }

    /// Queue a new interior-seed cap, forcing a detection cycle.
    pub fn set_max_seeds(&mut self, max_seeds: usize) {
        self.pending.max_seeds = Some(max_seeds);
    }

    /// Queue a new analysis-resolution cap, forcing a buffer rebuild.
    pub fn set_analysis_max_dim(&mut self, dim: u32) {
        self.pending.analysis_max_dim = Some(dim);
    }

    /// Ask the recorder collaborator to capture `seconds` of output, if it
    /// is not already doing so.
    pub fn start_capture(&self, recorder: &mut dyn Recorder, seconds: f64) {
        if !recorder.is_active() {
            info!(seconds, "capture requested");
            recorder.begin(seconds);
        }
    }

    /// Counter snapshot for the debug surface.
    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    /// Active render mode.
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Whether the pipeline is frozen.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Active parameter bundle.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Current seed population (primarily for inspection and tests).
    pub fn seeds(&self) -> &SeedSet {
        &self.seeds
    }

    /// Current mesh (primarily for inspection and tests).
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
