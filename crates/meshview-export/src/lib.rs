//! Meshview Export - Interchange format converters
//!
//! Each target format implements [`MeshFormat`] and registers itself in
//! [`FORMATS`]; the viewer shell enumerates the registry to build its
//! "Save As" entries. Conversion is a pure function from a `RawMesh` to the
//! exported file bytes; callers handle the file I/O.

mod error;
pub mod gltf;

pub use error::ExportError;
pub use gltf::GltfFormat;

use meshview_core::RawMesh;

/// A target interchange format.
pub trait MeshFormat: Sync {
    /// Display name used in menus.
    fn name(&self) -> &'static str;
    /// File extension including the leading dot.
    fn extension(&self) -> &'static str;
    /// Serialize the mesh into the format's file bytes.
    fn convert(&self, mesh: &RawMesh) -> Result<Vec<u8>, ExportError>;
}

/// All registered target formats.
pub static FORMATS: &[&dyn MeshFormat] = &[&GltfFormat];

/// Convert a mesh to the named format.
///
/// Format names are matched case-insensitively against the registry;
/// unknown names fail with [`ExportError::UnsupportedFormat`].
pub fn convert_mesh(mesh: &RawMesh, format_name: &str) -> Result<Vec<u8>, ExportError> {
    let format = FORMATS
        .iter()
        .find(|f| f.name().eq_ignore_ascii_case(format_name))
        .ok_or_else(|| ExportError::UnsupportedFormat(format_name.to_string()))?;
    format.convert(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn triangle() -> RawMesh {
        RawMesh {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            normals: None,
            uvs: None,
            faces: vec![[0, 1, 2]],
            bones: None,
        }
    }

    #[test]
    fn test_registry_lists_gltf() {
        assert!(FORMATS.iter().any(|f| f.name() == "glTF"));
        let gltf = FORMATS.iter().find(|f| f.name() == "glTF").unwrap();
        assert_eq!(gltf.extension(), ".gltf");
    }

    #[test]
    fn test_convert_by_name() {
        assert!(convert_mesh(&triangle(), "glTF").is_ok());
        assert!(convert_mesh(&triangle(), "gltf").is_ok());
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = convert_mesh(&triangle(), "collada");
        assert!(matches!(result, Err(ExportError::UnsupportedFormat(name)) if name == "collada"));
    }
}
