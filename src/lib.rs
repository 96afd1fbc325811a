//! Meshview - mesh viewer session glue
//!
//! Ties the workspace crates together for an embedding shell:
//! - `InputState`, the numeric-delta input contract the windowing layer fills
//! - `CameraController`, mapping input onto orbit/pan/dolly/snap operations
//! - `ViewerSession`, owning the camera and the currently loaded mesh
//!
//! The shell itself (window, GPU pipelines, file dialogs) lives outside this
//! workspace; it consumes the matrices and vertex buffers produced here.

pub mod controller;
pub mod input;
pub mod session;

pub use controller::CameraController;
pub use input::{DragMode, InputState, ViewerAction};
pub use session::{overlay_grid, ViewerSession};

pub use meshview_core::{BoneSet, MeshError, RawMesh};
pub use meshview_export::{convert_mesh, ExportError, MeshFormat, FORMATS};
pub use meshview_render::{Camera, CameraConfig, OrthogonalDirection, ProcessedMesh};
