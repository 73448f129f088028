//! Frame acquisition and analysis buffers.
//!
//! The pipeline never blocks on video: a [`FrameSource`] is polled once per
//! frame for whatever the latest decoded frame is. [`FrameBuffers`] owns the
//! full-resolution copy plus the downsampled analysis buffer used by every
//! per-pixel stage, and resizes both synchronously before any stage runs.

use crate::foundation::core::{BufferSize, Point, Rgb};
use crate::foundation::error::{MeshcamError, MeshcamResult};

/// A full-resolution RGB8 video frame.
#[derive(Clone, Debug, Default)]
pub struct FrameRgb {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Packed RGB bytes, row-major, `width * height * 3` long.
    pub data: Vec<u8>,
}

impl FrameRgb {
    /// Build a frame, validating the byte length.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> MeshcamResult<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(MeshcamError::frame(format!(
                "frame byte length {} does not match {width}x{height}x3",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Pixel at `(x, y)`, clamped into bounds.
    pub fn get_clamped(&self, x: i64, y: i64) -> Rgb {
        let x = x.clamp(0, i64::from(self.width) - 1) as usize;
        let y = y.clamp(0, i64::from(self.height) - 1) as usize;
        let i = (y * self.width as usize + x) * 3;
        Rgb::from_rgb8(self.data[i], self.data[i + 1], self.data[i + 2])
    }
}

/// A polled provider of decoded video frames.
///
/// Implementations must never block: if no new frame has been decoded yet,
/// they return the previous one, and `None` only while the device is still
/// negotiating a resolution.
pub trait FrameSource {
    /// The most recent decoded frame, if any.
    fn latest_frame(&mut self) -> Option<&FrameRgb>;
}

/// A camera-free source producing a luminance blob orbiting a dark field.
///
/// Keeps the pipeline (and the CLI) runnable with no capture device and
/// gives tests a deterministic moving subject.
#[derive(Clone, Debug)]
pub struct SyntheticSource {
    frame: FrameRgb,
    size: BufferSize,
    tick: u64,
}

impl SyntheticSource {
    /// Create a source emitting `width × height` frames.
    pub fn new(width: u32, height: u32) -> MeshcamResult<Self> {
        let size = BufferSize::new(width, height)?;
        Ok(Self {
            frame: FrameRgb::default(),
            size,
            tick: 0,
        })
    }

    fn render(&mut self) {
        let (w, h) = (self.size.width as f64, self.size.height as f64);
        let t = self.tick as f64 * 0.05;
        let cx = w / 2.0 + w * 0.25 * t.cos();
        let cy = h / 2.0 + h * 0.25 * t.sin();
        let radius = w.min(h) * 0.18;

        let mut data = Vec::with_capacity(self.size.area() * 3);
        for y in 0..self.size.height {
            for x in 0..self.size.width {
                let dx = f64::from(x) - cx;
                let dy = f64::from(y) - cy;
                let d = (dx * dx + dy * dy).sqrt();
                let v = if d < radius {
                    (235.0 - d / radius * 120.0) as u8
                } else {
                    30
                };
                data.extend_from_slice(&[v, v / 2 + 20, v / 3 + 40]);
            }
        }
        self.frame = FrameRgb {
            width: self.size.width,
            height: self.size.height,
            data,
        };
    }
}

impl FrameSource for SyntheticSource {
    fn latest_frame(&mut self) -> Option<&FrameRgb> {
        self.render();
        self.tick += 1;
        Some(&self.frame)
    }
}

/// The downsampled frame used for all feature and gradient computation.
#[derive(Clone, Debug, Default)]
pub struct AnalysisBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major pixels.
    pub pixels: Vec<Rgb>,
}

impl AnalysisBuffer {
    /// Whether the buffer has been filled at least once.
    pub fn is_ready(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Pixel at `(x, y)`, clamped into bounds.
    pub fn get_clamped(&self, x: i64, y: i64) -> Rgb {
        let x = x.clamp(0, i64::from(self.width) - 1) as usize;
        let y = y.clamp(0, i64::from(self.height) - 1) as usize;
        self.pixels[y * self.width as usize + x]
    }

    /// Pixel under an analysis-space point.
    pub fn sample(&self, p: Point) -> Rgb {
        self.get_clamped(p.x.round() as i64, p.y.round() as i64)
    }

    /// Luminance at `(x, y)`.
    pub fn luminance_at(&self, x: i64, y: i64) -> f32 {
        self.get_clamped(x, y).luminance()
    }

    /// 4-neighbor gradient magnitude: sum of absolute horizontal and
    /// vertical luminance differences.
    pub fn gradient_at(&self, x: i64, y: i64) -> f32 {
        let gx = (self.luminance_at(x + 1, y) - self.luminance_at(x - 1, y)).abs();
        let gy = (self.luminance_at(x, y + 1) - self.luminance_at(x, y - 1)).abs();
        gx + gy
    }
}

/// Outcome of a per-frame buffer refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Refresh {
    /// No frame available yet; every stage should no-op.
    NotReady,
    /// Buffers updated in place.
    Updated,
    /// Input dimensions or the analysis scale changed; buffers were
    /// reallocated and all derived state (seeds, mesh, background model)
    /// is stale.
    Resized,
}

/// Owner of the full-resolution frame copy and the analysis buffer.
#[derive(Clone, Debug, Default)]
pub struct FrameBuffers {
    /// Latest full-resolution frame.
    pub frame: FrameRgb,
    /// Downsampled analysis buffer.
    pub analysis: AnalysisBuffer,
    analysis_max_dim: u32,
}

impl FrameBuffers {
    /// Create buffers targeting `analysis_max_dim` for the longest
    /// analysis-buffer side.
    pub fn new(analysis_max_dim: u32) -> Self {
        Self {
            frame: FrameRgb::default(),
            analysis: AnalysisBuffer::default(),
            analysis_max_dim: analysis_max_dim.max(8),
        }
    }

    /// Scale factor from analysis space to full-resolution space.
    pub fn analysis_scale(&self) -> f64 {
        if self.analysis.width == 0 {
            1.0
        } else {
            f64::from(self.frame.width) / f64::from(self.analysis.width)
        }
    }

    /// Poll the source and rebuild the analysis buffer by box-averaging.
    ///
    /// Resizing happens here, before any per-frame stage runs, so no stage
    /// ever observes a half-resized buffer.
    pub fn refresh(&mut self, source: &mut dyn FrameSource, analysis_max_dim: u32) -> Refresh {
        let Some(frame) = source.latest_frame() else {
            return Refresh::NotReady;
        };
        if frame.width == 0 || frame.height == 0 {
            return Refresh::NotReady;
        }

        let max_dim = analysis_max_dim.max(8);
        let long_side = frame.width.max(frame.height);
        let scale = long_side.div_ceil(max_dim).max(1);
        let aw = (frame.width / scale).max(1);
        let ah = (frame.height / scale).max(1);

        let resized = self.analysis.width != aw
            || self.analysis.height != ah
            || self.frame.width != frame.width
            || self.frame.height != frame.height
            || self.analysis_max_dim != max_dim;
        self.analysis_max_dim = max_dim;
        self.frame = frame.clone();

        let mut pixels = Vec::with_capacity(aw as usize * ah as usize);
        let s = scale as usize;
        for ay in 0..ah as usize {
            for ax in 0..aw as usize {
                let (mut r, mut g, mut b) = (0.0f32, 0.0f32, 0.0f32);
                let mut n = 0.0f32;
                for dy in 0..s {
                    for dx in 0..s {
                        let x = (ax * s + dx) as i64;
                        let y = (ay * s + dy) as i64;
                        let px = self.frame.get_clamped(x, y);
                        r += px.r;
                        g += px.g;
                        b += px.b;
                        n += 1.0;
                    }
                }
                pixels.push(Rgb::new(r / n, g / n, b / n));
            }
        }
        self.analysis = AnalysisBuffer {
            width: aw,
            height: ah,
            pixels,
        };

        if resized { Refresh::Resized } else { Refresh::Updated }
    }
}

#[cfg(test)]
#[path = "../tests/unit/frame.rs"]
mod tests;
