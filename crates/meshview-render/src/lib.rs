//! Meshview Render - CPU-side geometry for the viewer shell
//!
//! Turns a decoded `RawMesh` into the buffers the GPU layer draws (flipped
//! axes, corrected winding, skeleton and normal debug lines), generates the
//! viewport overlay grid, and derives camera matrices. The GPU layer itself
//! lives outside this workspace; everything here is plain data.

pub mod camera;
pub mod grid;
pub mod mesh;
pub mod vertex;

pub use camera::{Camera, CameraConfig, OrthogonalDirection};
pub use grid::{grid_lines, grid_vertex_data};
pub use mesh::{ProcessedMesh, NORMAL_LINE_SCALE};
pub use vertex::MeshVertex;
