//! Minimal drawing-surface capability.
//!
//! The pipeline's algorithmic core only needs three primitives: flat
//! triangle fill, rect fill, and a scaled image blit. [`RasterSurface`] is
//! the CPU implementation producing RGBA8 pixels.

use crate::foundation::core::{Point, Rgb};
use crate::foundation::error::{MeshcamError, MeshcamResult};

/// Drawing primitives the renderer depends on.
pub trait DrawSurface {
    /// Surface dimensions in pixels.
    fn size(&self) -> (u32, u32);

    /// Clear every pixel to `color`.
    fn clear(&mut self, color: Rgb);

    /// Flat-fill a triangle given in surface coordinates.
    fn fill_triangle(&mut self, pts: [Point; 3], color: Rgb);

    /// Fill an axis-aligned rectangle, clipped to the surface.
    fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, color: Rgb);

    /// Scale `src` (row-major, `src_w × src_h`) over the whole surface with
    /// nearest-neighbor sampling.
    fn blit_scaled(&mut self, src: &[Rgb], src_w: u32, src_h: u32);
}

/// CPU raster target holding packed RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterSurface {
    /// Create an opaque black surface.
    pub fn new(width: u32, height: u32) -> MeshcamResult<Self> {
        if width == 0 || height == 0 {
            return Err(MeshcamError::validation(
                "RasterSurface dimensions must be > 0",
            ));
        }
        let mut s = Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        };
        s.clear(Rgb::default());
        Ok(s)
    }

    /// Packed RGBA8 pixel bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn put(&mut self, x: i64, y: i64, rgb: [u8; 3]) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data[i..i + 3].copy_from_slice(&rgb);
        self.data[i + 3] = 255;
    }
}

impl DrawSurface for RasterSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Rgb) {
        let rgb = color.to_rgb8();
        for px in self.data.chunks_exact_mut(4) {
            px[0] = rgb[0];
            px[1] = rgb[1];
            px[2] = rgb[2];
            px[3] = 255;
        }
    }

    fn fill_triangle(&mut self, pts: [Point; 3], color: Rgb) {
        let rgb = color.to_rgb8();
        let min_x = pts.iter().map(|p| p.x).fold(f64::INFINITY, f64::min).floor() as i64;
        let max_x = pts
            .iter()
            .map(|p| p.x)
            .fold(f64::NEG_INFINITY, f64::max)
            .ceil() as i64;
        let min_y = pts.iter().map(|p| p.y).fold(f64::INFINITY, f64::min).floor() as i64;
        let max_y = pts
            .iter()
            .map(|p| p.y)
            .fold(f64::NEG_INFINITY, f64::max)
            .ceil() as i64;

        let min_x = min_x.max(0);
        let min_y = min_y.max(0);
        let max_x = max_x.min(i64::from(self.width) - 1);
        let max_y = max_y.min(i64::from(self.height) - 1);

        let edge = |a: Point, b: Point, px: f64, py: f64| -> f64 {
            (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
        };

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);
                let w0 = edge(pts[0], pts[1], px, py);
                let w1 = edge(pts[1], pts[2], px, py);
                let w2 = edge(pts[2], pts[0], px, py);
                // Accept either winding.
                let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0)
                    || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);
                if inside {
                    self.put(x, y, rgb);
                }
            }
        }
    }

    fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, color: Rgb) {
        let rgb = color.to_rgb8();
        for yy in y..y + i64::from(h) {
            for xx in x..x + i64::from(w) {
                self.put(xx, yy, rgb);
            }
        }
    }

    fn blit_scaled(&mut self, src: &[Rgb], src_w: u32, src_h: u32) {
        if src_w == 0 || src_h == 0 || src.len() != src_w as usize * src_h as usize {
            return;
        }
        for y in 0..self.height {
            let sy = (y as u64 * u64::from(src_h) / u64::from(self.height)) as usize;
            for x in 0..self.width {
                let sx = (x as u64 * u64::from(src_w) / u64::from(self.width)) as usize;
                let rgb = src[sy * src_w as usize + sx].to_rgb8();
                self.put(i64::from(x), i64::from(y), rgb);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
