//! Mesh construction: Delaunay triangulation and spring-edge derivation.

pub mod builder;
pub mod delaunay;
