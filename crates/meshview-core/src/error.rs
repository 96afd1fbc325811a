/// Errors raised when a mesh violates the geometry contract.
///
/// These are detected on entry to post-processing or export and are always
/// surfaced to the caller; nothing in the pipeline recovers from them.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("mesh has no vertex positions")]
    EmptyPositions,

    #[error("mesh has no faces")]
    EmptyFaces,

    #[error("mesh has no normals")]
    MissingNormals,

    #[error("attribute '{name}' has {actual} entries, expected {expected}")]
    AttributeLengthMismatch {
        name: &'static str,
        actual: usize,
        expected: usize,
    },

    #[error("face index {index} out of range for {vertex_count} vertices")]
    FaceIndexOutOfRange { index: u32, vertex_count: usize },

    #[error("bone {bone} has invalid parent index {parent}")]
    InvalidBoneParent { bone: usize, parent: i32 },

    #[error("bone hierarchy contains a cycle through bone {0}")]
    BoneCycle(usize),
}
