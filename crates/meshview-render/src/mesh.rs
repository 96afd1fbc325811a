//! Mesh post-processing
//!
//! Converts a `RawMesh` into viewer-ready buffers. The source format is
//! right-handed with X flipped relative to the viewer's convention, so every
//! position, normal, and bone translation gets its X component negated, and
//! each face `(a, b, c)` is re-emitted as `(b, a, c)` to keep triangles
//! front-facing after the flip. Both corrections are fixed conventions of
//! the pipeline, not user options.

use glam::Vec3;
use meshview_core::{MeshError, RawMesh};
use tracing::debug;

use crate::vertex::MeshVertex;

/// Length factor applied to normals when building the debug normal lines.
pub const NORMAL_LINE_SCALE: f32 = 0.008;

/// Viewer-ready derived geometry, rebuilt from scratch on every load.
#[derive(Debug, Clone, Default)]
pub struct ProcessedMesh {
    /// Interleaved position + normal records, one per source vertex.
    pub vertices: Vec<MeshVertex>,
    /// Flat triangle list with winding corrected for the X flip.
    pub indices: Vec<u32>,
    /// Point pairs `(p, p + n * NORMAL_LINE_SCALE)` for normal visualization.
    pub normal_lines: Vec<Vec3>,
    /// World position of each bone, from the bind matrix translation.
    pub bone_positions: Vec<Vec3>,
    /// Point pairs `(child, parent)` for every bone with a parent.
    pub bone_lines: Vec<Vec3>,
}

impl ProcessedMesh {
    /// Process a raw mesh into render buffers.
    ///
    /// Fails when the mesh violates the geometry contract, when faces are
    /// empty, or when the normal channel is absent; the viewer pipeline
    /// interleaves normals unconditionally.
    pub fn from_raw(raw: &RawMesh) -> Result<Self, MeshError> {
        raw.validate()?;
        if raw.faces.is_empty() {
            return Err(MeshError::EmptyFaces);
        }
        let normals = raw.normals.as_ref().ok_or(MeshError::MissingNormals)?;

        let mut vertices = Vec::with_capacity(raw.positions.len());
        let mut normal_lines = Vec::with_capacity(raw.positions.len() * 2);
        for (&position, &normal) in raw.positions.iter().zip(normals) {
            let position = flip_x(position);
            let normal = flip_x(normal);
            vertices.push(MeshVertex::new(position.to_array(), normal.to_array()));
            normal_lines.push(position);
            normal_lines.push(position + normal * NORMAL_LINE_SCALE);
        }

        let mut indices = Vec::with_capacity(raw.faces.len() * 3);
        for &[a, b, c] in &raw.faces {
            indices.extend_from_slice(&[b, a, c]);
        }

        let mut bone_positions = Vec::new();
        let mut bone_lines = Vec::new();
        if let Some(bones) = &raw.bones {
            bone_positions.reserve(bones.len());
            for (bone, &parent) in bones.parents.iter().enumerate() {
                let position = flip_x(bones.bind_matrices[bone].w_axis.truncate());
                bone_positions.push(position);

                // Root bones contribute no line. Parents may appear after
                // their children, so the parent position is read straight
                // from its matrix rather than from bone_positions.
                if parent != -1 {
                    let parent_position =
                        flip_x(bones.bind_matrices[parent as usize].w_axis.truncate());
                    bone_lines.push(position);
                    bone_lines.push(parent_position);
                }
            }
        }

        debug!(
            "processed mesh: {} vertices, {} triangles, {} bones",
            vertices.len(),
            raw.faces.len(),
            bone_positions.len()
        );

        Ok(Self {
            vertices,
            indices,
            normal_lines,
            bone_positions,
            bone_lines,
        })
    }

    /// Number of vertices in the render buffer.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles in the index buffer.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

fn flip_x(v: Vec3) -> Vec3 {
    Vec3::new(-v.x, v.y, v.z)
}
