//! Background segmentation: adaptive model, palette mapping, seed
//! classification.
//!
//! The model is a slow exponential moving average of background-classified
//! pixel colors, one `Rgb` per analysis pixel, updated in place. The filter
//! is one-sided on purpose: pixels currently classified foreground never
//! adapt the model, so a subject lingering in frame does not dissolve into
//! the background estimate.

use rayon::prelude::*;

use crate::foundation::core::Rgb;
use crate::frame::AnalysisBuffer;
use crate::params::{Palette, Params};
use crate::seed::Seed;

/// Blend factor for per-seed background display colors.
const BG_COLOR_SMOOTHING: f32 = 0.3;

/// Per-pixel running background estimate plus its palette rendering.
#[derive(Clone, Debug, Default)]
pub struct BackgroundModel {
    width: u32,
    height: u32,
    model: Vec<Rgb>,
    palette_buf: Vec<Rgb>,
    initialized: bool,
}

impl BackgroundModel {
    /// An empty model; sized lazily on first update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Model buffer dimensions.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The palette-mapped background image, analysis resolution.
    pub fn palette_buffer(&self) -> &[Rgb] {
        &self.palette_buf
    }

    /// Background estimate at a clamped analysis coordinate.
    pub fn model_at(&self, x: i64, y: i64) -> Rgb {
        let x = x.clamp(0, i64::from(self.width) - 1) as usize;
        let y = y.clamp(0, i64::from(self.height) - 1) as usize;
        self.model[y * self.width as usize + x]
    }

    /// Adapt the model one frame and refresh the palette buffer.
    ///
    /// The first run (and any resolution change) initializes the model
    /// directly from the current frame. Afterwards only pixels whose
    /// difference stays below `fg_threshold` adapt, by `bg_learning_rate`.
    pub fn update(&mut self, analysis: &AnalysisBuffer, params: &Params, palette: &Palette) {
        if !analysis.is_ready() {
            return;
        }
        if self.width != analysis.width || self.height != analysis.height || !self.initialized {
            self.width = analysis.width;
            self.height = analysis.height;
            self.model = analysis.pixels.clone();
            self.palette_buf = vec![Rgb::default(); self.model.len()];
            self.initialized = true;
        } else {
            let w = self.width as usize;
            self.model
                .par_chunks_mut(w)
                .zip(analysis.pixels.par_chunks(w))
                .for_each(|(model_row, frame_row)| {
                    for (m, &px) in model_row.iter_mut().zip(frame_row) {
                        if m.mean_abs_diff(px) < params.fg_threshold {
                            *m = m.lerp(px, params.bg_learning_rate);
                        }
                    }
                });
        }

        let w = self.width as usize;
        self.palette_buf
            .par_chunks_mut(w)
            .zip(self.model.par_chunks(w))
            .for_each(|(out_row, model_row)| {
                for (out, m) in out_row.iter_mut().zip(model_row) {
                    *out = palette.map(m.luminance());
                }
            });
    }

    /// Classify every seed and smooth its background display color.
    ///
    /// A seed is foreground on strong color novelty or a strong local edge;
    /// fixed boundary seeds are always background.
    pub fn classify_seeds(&self, seeds: &mut [Seed], analysis: &AnalysisBuffer, params: &Params) {
        if !self.initialized || !analysis.is_ready() {
            return;
        }
        for seed in seeds.iter_mut() {
            let x = seed.position.x.round() as i64;
            let y = seed.position.y.round() as i64;
            let current = analysis.get_clamped(x, y);
            let diff = current.mean_abs_diff(self.model_at(x, y));
            let grad = analysis.gradient_at(x, y);

            seed.is_foreground =
                !seed.is_fixed && (diff > params.fg_threshold || grad > params.fg_edge_threshold);

            let xc = x.clamp(0, i64::from(self.width) - 1) as usize;
            let yc = y.clamp(0, i64::from(self.height) - 1) as usize;
            let mapped = self.palette_buf[yc * self.width as usize + xc];
            seed.background_color = seed.background_color.lerp(mapped, BG_COLOR_SMOOTHING);
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/segment.rs"]
mod tests;
