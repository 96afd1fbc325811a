use meshview_core::MeshError;

/// Errors raised while exporting a mesh to an interchange format.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    InvalidMesh(#[from] MeshError),

    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("face index {0} does not fit in an unsigned 16-bit index buffer")]
    IndexOverflow(u32),

    #[error("bone index {0} does not fit in an unsigned 8-bit joint buffer")]
    JointIndexOverflow(u16),

    #[error("failed to serialize export document: {0}")]
    Serialize(#[from] serde_json::Error),
}
