//! Raw mesh data model
//!
//! `RawMesh` is the output contract of the binary mesh parser. Optional
//! attribute channels are modeled as `Option<Vec<_>>` so consumers branch
//! once per channel instead of checking presence flags ad hoc.

use glam::{Mat4, Vec2, Vec3};

use crate::error::MeshError;

/// Maximum number of bone influences carried per vertex.
pub const MAX_INFLUENCES: usize = 4;

/// Skeleton data attached to a mesh.
#[derive(Debug, Clone, Default)]
pub struct BoneSet {
    /// One display name per bone.
    pub names: Vec<String>,
    /// Parent index per bone; -1 marks a root. Parents may appear after
    /// their children in the array.
    pub parents: Vec<i32>,
    /// Model-space bind pose per bone. The translation column is the bone's
    /// world position in the bind pose.
    pub bind_matrices: Vec<Mat4>,
    /// Bone indices influencing each vertex, up to [`MAX_INFLUENCES`].
    /// Vertices missing an entry default to bone 0 with weight 1.0.
    pub vertex_joints: Vec<Vec<u16>>,
    /// Weights parallel to `vertex_joints`; not required to sum to 1.
    pub vertex_weights: Vec<Vec<f32>>,
}

impl BoneSet {
    /// Number of bones in the set.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the set contains no bones.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Decoded in-memory representation of a loaded mesh file, before any
/// viewer-specific processing.
#[derive(Debug, Clone, Default)]
pub struct RawMesh {
    /// Vertex positions; the vertex count of the mesh.
    pub positions: Vec<Vec3>,
    /// Per-vertex normals, same length as `positions` when present.
    pub normals: Option<Vec<Vec3>>,
    /// Per-vertex texture coordinates, same length as `positions` when present.
    pub uvs: Option<Vec<Vec2>>,
    /// Triangle list; every index must be in `[0, positions.len())`.
    pub faces: Vec<[u32; 3]>,
    /// Skeleton, when the source file carries one.
    pub bones: Option<BoneSet>,
}

impl RawMesh {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Whether a normal channel is present.
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Whether a UV channel is present.
    pub fn has_uvs(&self) -> bool {
        self.uvs.is_some()
    }

    /// Whether the mesh carries a non-empty skeleton.
    pub fn has_bones(&self) -> bool {
        self.bones.as_ref().is_some_and(|b| !b.is_empty())
    }

    /// Check the geometry contract: non-empty positions, attribute channel
    /// lengths agreeing with the vertex count, face indices in range, and a
    /// bone hierarchy that forms a forest.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.positions.is_empty() {
            return Err(MeshError::EmptyPositions);
        }

        let n = self.positions.len();
        if let Some(normals) = &self.normals {
            if normals.len() != n {
                return Err(MeshError::AttributeLengthMismatch {
                    name: "normals",
                    actual: normals.len(),
                    expected: n,
                });
            }
        }
        if let Some(uvs) = &self.uvs {
            if uvs.len() != n {
                return Err(MeshError::AttributeLengthMismatch {
                    name: "uvs",
                    actual: uvs.len(),
                    expected: n,
                });
            }
        }

        for face in &self.faces {
            for &index in face {
                if index as usize >= n {
                    return Err(MeshError::FaceIndexOutOfRange {
                        index,
                        vertex_count: n,
                    });
                }
            }
        }

        if let Some(bones) = &self.bones {
            validate_bones(bones)?;
        }

        Ok(())
    }
}

fn validate_bones(bones: &BoneSet) -> Result<(), MeshError> {
    let count = bones.names.len();
    if bones.parents.len() != count {
        return Err(MeshError::AttributeLengthMismatch {
            name: "bone parents",
            actual: bones.parents.len(),
            expected: count,
        });
    }
    if bones.bind_matrices.len() != count {
        return Err(MeshError::AttributeLengthMismatch {
            name: "bone bind matrices",
            actual: bones.bind_matrices.len(),
            expected: count,
        });
    }

    for (bone, &parent) in bones.parents.iter().enumerate() {
        if parent == -1 {
            continue;
        }
        if parent < 0 || parent as usize >= count || parent as usize == bone {
            return Err(MeshError::InvalidBoneParent { bone, parent });
        }
    }

    // Walk each bone to a root; a chain longer than the bone count means
    // the parent links loop back on themselves.
    for start in 0..count {
        let mut current = start;
        let mut steps = 0;
        while bones.parents[current] != -1 {
            current = bones.parents[current] as usize;
            steps += 1;
            if steps > count {
                return Err(MeshError::BoneCycle(start));
            }
        }
    }

    Ok(())
}
