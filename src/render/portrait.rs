//! The two portrait rendering strategies.
//!
//! Mesh mode: palette background blit plus flat-filled Delaunay triangles.
//! Voronoi mode: a reduced-resolution nearest-seed raster upscaled with
//! nearest-neighbor sampling for a deliberately blocky look. The brute
//! force scan is O(cells × seeds), kept cheap by the reduced raster and the
//! seed cap.

use rayon::prelude::*;

use crate::foundation::core::{Point, Rgb};
use crate::mesh::builder::Mesh;
use crate::render::surface::DrawSurface;
use crate::seed::Seed;
use crate::segment::BackgroundModel;

/// Which rasterization strategy the pipeline draws with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Filled mesh triangles over the palette background.
    #[default]
    Mesh,
    /// Brute-force nearest-seed Voronoi raster.
    Voronoi,
}

/// Draw the palette background and the flat-filled mesh.
///
/// Triangle color is the average of the three vertices' active colors:
/// display colors when any vertex is foreground, background colors
/// otherwise. An empty mesh draws only the background.
pub fn render_mesh(
    surface: &mut dyn DrawSurface,
    seeds: &[Seed],
    mesh: &Mesh,
    background: &BackgroundModel,
    analysis_w: u32,
    analysis_h: u32,
) {
    let (bw, bh) = background.size();
    if bw > 0 {
        surface.blit_scaled(background.palette_buffer(), bw, bh);
    }
    if analysis_w == 0 || analysis_h == 0 {
        return;
    }

    let (sw, sh) = surface.size();
    let sx = f64::from(sw) / f64::from(analysis_w);
    let sy = f64::from(sh) / f64::from(analysis_h);

    for tri in &mesh.triangles {
        let [a, b, c] = tri.v;
        let Some((va, vb, vc)) = seeds
            .get(a)
            .zip(seeds.get(b))
            .zip(seeds.get(c))
            .map(|((x, y), z)| (x, y, z))
        else {
            continue;
        };
        let any_fg = va.is_foreground || vb.is_foreground || vc.is_foreground;
        let pick = |s: &Seed| {
            if any_fg {
                s.display_color
            } else {
                s.background_color
            }
        };
        let color = Rgb::average3(pick(va), pick(vb), pick(vc));
        let map = |s: &Seed| Point::new(s.position.x * sx, s.position.y * sy);
        surface.fill_triangle([map(va), map(vb), map(vc)], color);
    }
}

/// Draw the nearest-seed Voronoi raster.
///
/// Each raster cell linearly scans all seeds for the nearest (squared
/// Euclidean distance in analysis space) and takes that seed's active
/// color. With no seeds the surface is left untouched.
pub fn render_voronoi(
    surface: &mut dyn DrawSurface,
    seeds: &[Seed],
    analysis_w: u32,
    analysis_h: u32,
    cell_px: u32,
) {
    if seeds.is_empty() || analysis_w == 0 || analysis_h == 0 {
        return;
    }
    let (sw, sh) = surface.size();
    let cell = cell_px.max(1);
    let rw = (sw.div_ceil(cell)).max(1);
    let rh = (sh.div_ceil(cell)).max(1);

    let mut raster = vec![Rgb::default(); rw as usize * rh as usize];
    raster
        .par_chunks_mut(rw as usize)
        .enumerate()
        .for_each(|(cy, row)| {
            let ay = (cy as f64 + 0.5) / f64::from(rh) * f64::from(analysis_h);
            for (cx, out) in row.iter_mut().enumerate() {
                let ax = (cx as f64 + 0.5) / f64::from(rw) * f64::from(analysis_w);
                let mut best = f64::INFINITY;
                let mut color = Rgb::default();
                for s in seeds {
                    let dx = s.position.x - ax;
                    let dy = s.position.y - ay;
                    let d = dx * dx + dy * dy;
                    if d < best {
                        best = d;
                        color = s.active_color();
                    }
                }
                *out = color;
            }
        });

    surface.blit_scaled(&raster, rw, rh);
}

#[cfg(test)]
#[path = "../../tests/unit/render/portrait.rs"]
mod tests;
