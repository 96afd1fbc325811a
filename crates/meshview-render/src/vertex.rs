//! Vertex types uploaded by the viewer shell

use bytemuck::{Pod, Zeroable};

/// Interleaved position + normal vertex, the layout of the mesh pipeline.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    /// Size of one vertex in bytes (the pipeline's vertex stride).
    pub const fn stride() -> usize {
        std::mem::size_of::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride_is_six_floats() {
        assert_eq!(MeshVertex::stride(), 6 * std::mem::size_of::<f32>());
    }

    #[test]
    fn test_vertices_cast_to_bytes() {
        let vertices = [MeshVertex::new([1.0, 2.0, 3.0], [0.0, 1.0, 0.0])];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), MeshVertex::stride());
    }
}
