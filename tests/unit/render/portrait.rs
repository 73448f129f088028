use super::*;

use crate::frame::AnalysisBuffer;
use crate::mesh::builder::build_mesh;
use crate::params::{Palette, Params};
use crate::render::surface::RasterSurface;
use crate::seed::SeedSet;

fn px(s: &RasterSurface, x: u32, y: u32) -> [u8; 3] {
    let i = (y as usize * s.size().0 as usize + x as usize) * 4;
    let d = s.data();
    [d[i], d[i + 1], d[i + 2]]
}

fn colored_seed(x: f64, y: f64, display: Rgb, background: Rgb, fg: bool) -> Seed {
    let mut s = Seed::interior(Point::new(x, y), 0.0);
    s.display_color = display;
    s.background_color = background;
    s.is_foreground = fg;
    s
}

fn learned_background(width: u32, height: u32, color: Rgb) -> BackgroundModel {
    let analysis = AnalysisBuffer {
        width,
        height,
        pixels: vec![color; (width * height) as usize],
    };
    let mut model = BackgroundModel::new();
    model.update(
        &analysis,
        &Params::default(),
        &Palette::builtin("mono").unwrap(),
    );
    model
}

#[test]
fn mode_serializes_to_snake_case() {
    assert_eq!(serde_json::to_string(&RenderMode::Mesh).unwrap(), "\"mesh\"");
    assert_eq!(
        serde_json::from_str::<RenderMode>("\"voronoi\"").unwrap(),
        RenderMode::Voronoi
    );
    assert_eq!(RenderMode::default(), RenderMode::Mesh);
}

#[test]
fn empty_mesh_draws_only_the_background() {
    let mut surface = RasterSurface::new(8, 8).unwrap();
    let background = learned_background(4, 4, Rgb::new(0.0, 0.0, 0.0));
    let expected = background.palette_buffer()[0].to_rgb8();
    render_mesh(&mut surface, &[], &Mesh::default(), &background, 4, 4);
    assert_eq!(px(&surface, 4, 4), expected);
}

#[test]
fn background_triangles_average_background_colors() {
    let mut surface = RasterSurface::new(10, 10).unwrap();
    let bg = Rgb::new(30.0, 60.0, 90.0);
    let mut set = SeedSet::default();
    set.replace(vec![
        colored_seed(0.0, 0.0, Rgb::new(255.0, 0.0, 0.0), bg, false),
        colored_seed(9.0, 0.0, Rgb::new(255.0, 0.0, 0.0), bg, false),
        colored_seed(0.0, 9.0, Rgb::new(255.0, 0.0, 0.0), bg, false),
    ]);
    let mesh = build_mesh(&set);
    assert!(!mesh.is_empty());

    render_mesh(
        &mut surface,
        &set.seeds,
        &mesh,
        &BackgroundModel::new(),
        10,
        10,
    );
    // Every vertex is background so the fill averages background colors.
    assert_eq!(px(&surface, 2, 2), bg.to_rgb8());
}

#[test]
fn foreground_vertex_switches_the_triangle_to_display_colors() {
    let mut surface = RasterSurface::new(10, 10).unwrap();
    let display = Rgb::new(210.0, 210.0, 210.0);
    let bg = Rgb::new(30.0, 30.0, 30.0);
    let mut set = SeedSet::default();
    set.replace(vec![
        colored_seed(0.0, 0.0, display, bg, true),
        colored_seed(9.0, 0.0, display, bg, false),
        colored_seed(0.0, 9.0, display, bg, false),
    ]);
    let mesh = build_mesh(&set);

    render_mesh(
        &mut surface,
        &set.seeds,
        &mesh,
        &BackgroundModel::new(),
        10,
        10,
    );
    // One foreground vertex is enough; all three display colors average.
    assert_eq!(px(&surface, 2, 2), display.to_rgb8());
}

#[test]
fn stale_triangle_indices_are_skipped() {
    let mut surface = RasterSurface::new(8, 8).unwrap();
    let mut set = SeedSet::default();
    set.replace(vec![
        colored_seed(0.0, 0.0, Rgb::default(), Rgb::default(), false),
        colored_seed(7.0, 0.0, Rgb::default(), Rgb::default(), false),
        colored_seed(0.0, 7.0, Rgb::default(), Rgb::default(), false),
    ]);
    let mesh = build_mesh(&set);
    // Render against a shorter seed slice than the mesh was built on.
    render_mesh(
        &mut surface,
        &set.seeds[..2],
        &mesh,
        &BackgroundModel::new(),
        8,
        8,
    );
    assert_eq!(px(&surface, 2, 2), [0, 0, 0]);
}

#[test]
fn voronoi_with_no_seeds_is_a_no_op() {
    let mut surface = RasterSurface::new(8, 8).unwrap();
    surface.clear(Rgb::new(7.0, 7.0, 7.0));
    render_voronoi(&mut surface, &[], 8, 8, 2);
    assert_eq!(px(&surface, 3, 3), [7, 7, 7]);
}

#[test]
fn single_seed_owns_the_whole_raster() {
    let mut surface = RasterSurface::new(8, 8).unwrap();
    let color = Rgb::new(120.0, 40.0, 200.0);
    let seeds = [colored_seed(4.0, 4.0, Rgb::default(), color, false)];
    render_voronoi(&mut surface, &seeds, 8, 8, 2);
    assert_eq!(px(&surface, 0, 0), color.to_rgb8());
    assert_eq!(px(&surface, 7, 7), color.to_rgb8());
}

#[test]
fn cells_take_the_nearest_seed_color() {
    let mut surface = RasterSurface::new(16, 16).unwrap();
    let left = Rgb::new(255.0, 0.0, 0.0);
    let right = Rgb::new(0.0, 0.0, 255.0);
    let seeds = [
        colored_seed(2.0, 8.0, Rgb::default(), left, false),
        colored_seed(14.0, 8.0, Rgb::default(), right, false),
    ];
    render_voronoi(&mut surface, &seeds, 16, 16, 2);
    assert_eq!(px(&surface, 1, 8), left.to_rgb8());
    assert_eq!(px(&surface, 14, 8), right.to_rgb8());
}

#[test]
fn foreground_seeds_contribute_display_colors() {
    let mut surface = RasterSurface::new(8, 8).unwrap();
    let display = Rgb::new(200.0, 180.0, 160.0);
    let seeds = [colored_seed(4.0, 4.0, display, Rgb::default(), true)];
    render_voronoi(&mut surface, &seeds, 8, 8, 1);
    assert_eq!(px(&surface, 4, 4), display.to_rgb8());
}
