//! Meshcam is a real-time low-resolution mesh-portrait engine for live
//! video.
//!
//! Each frame of input is reduced to a set of tracked feature points
//! ("seeds"), triangulated into a Delaunay mesh, relaxed with spring
//! constraints, segmented against an adaptive background model, and
//! rasterized as either flat-filled triangles or a blocky nearest-seed
//! Voronoi mosaic.
//!
//! # Pipeline overview
//!
//! One [`PortraitPipeline::advance`] call runs the full cooperative pass:
//!
//! 1. **Refresh**: poll the [`FrameSource`], downsample into the analysis buffer
//! 2. **Detect or track**: periodic full re-detection, cheap per-frame tracking otherwise
//! 3. **Mesh**: conditional Bowyer–Watson retriangulation + spring-edge derivation
//! 4. **Relax**: force integration plus Gauss–Seidel edge constraints
//! 5. **Segment**: adaptive background model, palette mapping, seed classification
//! 6. **Render**: mesh fill or Voronoi raster onto a [`DrawSurface`]
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single-threaded frame model**: one pass per call, no suspension within a
//!   frame; `rayon` is used only for data-parallel pixel loops inside a stage.
//! - **Soft failure only**: degenerate input (unsized video, too few seeds,
//!   lost tracks, collinear triangles) degrades gracefully and self-heals on
//!   the next detection or rebuild cycle.
//! - **Deterministic-by-default**: stochastic thinning and parameter
//!   randomization derive from an explicit seed.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod detect;
mod foundation;
mod frame;
mod mesh;
mod params;
mod physics;
mod pipeline;
mod render;
mod schedule;
mod seed;
mod segment;
mod track;

pub use detect::{boundary_ring, detect_features};
pub use foundation::core::{BufferSize, Point, Rect, Region, Rgb, Vec2};
pub use foundation::error::{MeshcamError, MeshcamResult};
pub use foundation::math::Rng64;
pub use frame::{AnalysisBuffer, FrameBuffers, FrameRgb, FrameSource, Refresh, SyntheticSource};
pub use mesh::builder::{Mesh, MeshEdge, build_mesh, topology_drifted};
pub use mesh::delaunay::{Triangle, triangulate};
pub use params::{Palette, Params, Preset};
pub use physics::{clamp_to_region, integrate, relax, satisfy_edge_constraints, update_anchors};
pub use pipeline::{PipelineStats, PortraitPipeline, Recorder};
pub use render::portrait::{RenderMode, render_mesh, render_voronoi};
pub use render::surface::{DrawSurface, RasterSurface};
pub use schedule::Cadence;
pub use seed::{Seed, SeedSet};
pub use segment::BackgroundModel;
pub use track::{TrackOutcome, track_seeds};
