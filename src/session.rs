//! Viewer session
//!
//! One session per open viewer: it owns the camera controller and at most
//! one loaded mesh. Loading replaces the previous mesh wholesale; the old
//! `ProcessedMesh` is dropped before the new one becomes visible, so no two
//! instances are ever live for the same session.

use meshview_core::{MeshError, RawMesh};
use meshview_export::{convert_mesh, ExportError};
use meshview_render::{grid_vertex_data, ProcessedMesh};
use tracing::info;

use crate::controller::CameraController;
use crate::input::InputState;

const GRID_SIZE: f32 = 5.0;
const GRID_STEPS: usize = 10;
const GRID_COLOR: [f32; 3] = [0.3, 0.3, 0.3];

/// Interleaved position+color vertex stream for the viewport grid.
pub fn overlay_grid() -> Vec<f32> {
    grid_vertex_data(GRID_SIZE, GRID_STEPS, GRID_COLOR)
}

struct LoadedMesh {
    raw: RawMesh,
    processed: ProcessedMesh,
}

/// A single viewer's state: camera plus the currently loaded mesh.
#[derive(Default)]
pub struct ViewerSession {
    controller: CameraController,
    mesh: Option<LoadedMesh>,
}

impl ViewerSession {
    /// Create an empty session
    pub fn new() -> Self {
        Self {
            controller: CameraController::new(),
            mesh: None,
        }
    }

    /// Validate, process, and take ownership of a decoded mesh, replacing
    /// whatever was loaded before. On error the previous mesh stays loaded.
    pub fn load_mesh(&mut self, raw: RawMesh) -> Result<(), MeshError> {
        raw.validate()?;
        let processed = ProcessedMesh::from_raw(&raw)?;
        info!(
            "loaded mesh: {} vertices, {} triangles, {} bones",
            processed.vertex_count(),
            processed.triangle_count(),
            processed.bone_positions.len()
        );
        self.mesh = Some(LoadedMesh { raw, processed });
        Ok(())
    }

    /// Drop the loaded mesh, if any.
    pub fn clear_mesh(&mut self) {
        self.mesh = None;
    }

    /// Whether a mesh is currently loaded.
    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    /// The decoded mesh as loaded, the form exporters consume.
    pub fn raw_mesh(&self) -> Option<&RawMesh> {
        self.mesh.as_ref().map(|m| &m.raw)
    }

    /// The viewer-ready buffers for the loaded mesh.
    pub fn processed_mesh(&self) -> Option<&ProcessedMesh> {
        self.mesh.as_ref().map(|m| &m.processed)
    }

    /// Export the loaded mesh to the named format. Returns `None` when no
    /// mesh is loaded; prompting the user about that is the shell's job.
    pub fn export(&self, format_name: &str) -> Option<Result<Vec<u8>, ExportError>> {
        self.raw_mesh().map(|raw| convert_mesh(raw, format_name))
    }

    /// The camera controller driving this session's viewport.
    pub fn controller_mut(&mut self) -> &mut CameraController {
        &mut self.controller
    }

    /// The session camera.
    pub fn camera(&self) -> &meshview_render::Camera {
        &self.controller.camera
    }

    /// Apply one frame of input to the camera.
    pub fn update(&mut self, input: &InputState, dt: f32) {
        self.controller.update(input, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn mesh_with_vertices(count: usize) -> RawMesh {
        RawMesh {
            positions: (0..count).map(|i| Vec3::splat(i as f32)).collect(),
            normals: Some(vec![Vec3::Y; count]),
            uvs: None,
            faces: vec![[0, 1, 2]],
            bones: None,
        }
    }

    #[test]
    fn test_load_replaces_previous_mesh() {
        let mut session = ViewerSession::new();
        session.load_mesh(mesh_with_vertices(3)).unwrap();
        assert_eq!(session.processed_mesh().unwrap().vertex_count(), 3);

        session.load_mesh(mesh_with_vertices(5)).unwrap();
        assert_eq!(session.processed_mesh().unwrap().vertex_count(), 5);
    }

    #[test]
    fn test_failed_load_keeps_previous_mesh() {
        let mut session = ViewerSession::new();
        session.load_mesh(mesh_with_vertices(3)).unwrap();

        let mut broken = mesh_with_vertices(4);
        broken.faces.push([0, 1, 9]);
        assert!(session.load_mesh(broken).is_err());
        assert_eq!(session.processed_mesh().unwrap().vertex_count(), 3);
    }

    #[test]
    fn test_export_without_mesh_is_none() {
        let session = ViewerSession::new();
        assert!(session.export("glTF").is_none());
    }

    #[test]
    fn test_export_loaded_mesh() {
        let mut session = ViewerSession::new();
        session.load_mesh(mesh_with_vertices(3)).unwrap();
        let bytes = session.export("glTF").unwrap().unwrap();
        assert!(!bytes.is_empty());
        assert!(session.export("collada").unwrap().is_err());
    }

    #[test]
    fn test_clear_mesh() {
        let mut session = ViewerSession::new();
        session.load_mesh(mesh_with_vertices(3)).unwrap();
        session.clear_mesh();
        assert!(!session.has_mesh());
        assert!(session.processed_mesh().is_none());
    }

    #[test]
    fn test_overlay_grid_shape() {
        let grid = overlay_grid();
        // 20 lines, 2 vertices each, 6 floats per vertex.
        assert_eq!(grid.len(), 20 * 2 * 6);
    }
}
