//! Vertex marker visualization

mod color_map;
mod marker_mesh;

pub use color_map::{color_for, Color, ValueRange};
pub use marker_mesh::{MarkerMesh, MarkerMeshBuilder};
