//! glTF 2.0 exporter
//!
//! Serializes a `RawMesh` into a self-contained glTF JSON document. All
//! binary data is packed into a single blob, embedded as a base64 data URI,
//! and described by one bufferView/accessor pair per attribute section.
//! Section order in the blob is fixed: positions, normals, UVs, indices,
//! joints, weights, inverse bind matrices. Downstream attribute mapping
//! relies on that order, which is why the `SectionBuilder` assigns the
//! indices instead of hand-threaded counters.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use glam::Mat4;
use meshview_core::{BoneSet, MeshError, RawMesh, MAX_INFLUENCES};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ExportError;
use crate::MeshFormat;

const COMPONENT_FLOAT: u32 = 5126;
const COMPONENT_UNSIGNED_SHORT: u32 = 5123;
const COMPONENT_UNSIGNED_BYTE: u32 = 5121;

const TARGET_ARRAY_BUFFER: u32 = 34962;
const TARGET_ELEMENT_ARRAY_BUFFER: u32 = 34963;

/// The glTF registry entry.
pub struct GltfFormat;

impl MeshFormat for GltfFormat {
    fn name(&self) -> &'static str {
        "glTF"
    }

    fn extension(&self) -> &'static str {
        ".gltf"
    }

    fn convert(&self, mesh: &RawMesh) -> Result<Vec<u8>, ExportError> {
        convert(mesh)
    }
}

#[derive(Serialize)]
struct Asset {
    version: &'static str,
    generator: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Buffer {
    uri: String,
    byte_length: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BufferView {
    buffer: usize,
    byte_offset: usize,
    byte_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<u32>,
}

#[derive(Serialize)]
struct Accessor {
    #[serde(rename = "bufferView")]
    buffer_view: usize,
    #[serde(rename = "componentType")]
    component_type: u32,
    count: usize,
    #[serde(rename = "type")]
    element_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<[f32; 3]>,
}

#[derive(Serialize)]
struct Attributes {
    #[serde(rename = "POSITION")]
    position: usize,
    #[serde(rename = "NORMAL", skip_serializing_if = "Option::is_none")]
    normal: Option<usize>,
    #[serde(rename = "TEXCOORD_0", skip_serializing_if = "Option::is_none")]
    texcoord: Option<usize>,
    #[serde(rename = "JOINTS_0", skip_serializing_if = "Option::is_none")]
    joints: Option<usize>,
    #[serde(rename = "WEIGHTS_0", skip_serializing_if = "Option::is_none")]
    weights: Option<usize>,
}

#[derive(Serialize)]
struct Primitive {
    attributes: Attributes,
    indices: usize,
}

#[derive(Serialize)]
struct MeshEntry {
    primitives: Vec<Primitive>,
}

#[derive(Serialize, Default)]
struct Node {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    translation: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rotation: Option<[f32; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scale: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mesh: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    skin: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Skin {
    joints: Vec<usize>,
    inverse_bind_matrices: usize,
}

#[derive(Serialize)]
struct SceneEntry {
    nodes: Vec<usize>,
}

#[derive(Serialize)]
struct Document {
    asset: Asset,
    meshes: Vec<MeshEntry>,
    accessors: Vec<Accessor>,
    #[serde(rename = "bufferViews")]
    buffer_views: Vec<BufferView>,
    buffers: Vec<Buffer>,
    nodes: Vec<Node>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skins: Vec<Skin>,
    scenes: Vec<SceneEntry>,
    scene: usize,
}

/// Packs attribute sections into the shared binary blob and records the
/// matching bufferView/accessor pair, handing back the accessor index the
/// section was assigned.
struct SectionBuilder {
    blob: Vec<u8>,
    views: Vec<BufferView>,
    accessors: Vec<Accessor>,
}

impl SectionBuilder {
    fn new() -> Self {
        Self {
            blob: Vec::new(),
            views: Vec::new(),
            accessors: Vec::new(),
        }
    }

    fn push_section(
        &mut self,
        bytes: Vec<u8>,
        target: Option<u32>,
        component_type: u32,
        element_type: &'static str,
        count: usize,
        bounds: Option<([f32; 3], [f32; 3])>,
    ) -> usize {
        let byte_offset = self.blob.len();
        let byte_length = bytes.len();
        self.blob.extend_from_slice(&bytes);

        self.views.push(BufferView {
            buffer: 0,
            byte_offset,
            byte_length,
            target,
        });
        let (min, max) = match bounds {
            Some((min, max)) => (Some(min), Some(max)),
            None => (None, None),
        };
        self.accessors.push(Accessor {
            buffer_view: self.views.len() - 1,
            component_type,
            count,
            element_type,
            min,
            max,
        });
        self.accessors.len() - 1
    }
}

/// Convert a mesh to glTF bytes.
///
/// Pure function: the only output is the returned JSON document, UTF-8
/// encoded, with the binary payload embedded as a base64 data URI.
pub fn convert(mesh: &RawMesh) -> Result<Vec<u8>, ExportError> {
    mesh.validate()?;
    if mesh.faces.is_empty() {
        return Err(MeshError::EmptyFaces.into());
    }

    let mut builder = SectionBuilder::new();

    let position_accessor = builder.push_section(
        f32_bytes(mesh.positions.iter().flat_map(|p| p.to_array())),
        Some(TARGET_ARRAY_BUFFER),
        COMPONENT_FLOAT,
        "VEC3",
        mesh.positions.len(),
        Some(position_bounds(mesh)),
    );

    let normal_accessor = mesh.normals.as_ref().map(|normals| {
        builder.push_section(
            f32_bytes(normals.iter().flat_map(|n| n.to_array())),
            Some(TARGET_ARRAY_BUFFER),
            COMPONENT_FLOAT,
            "VEC3",
            normals.len(),
            None,
        )
    });

    let uv_accessor = mesh.uvs.as_ref().map(|uvs| {
        builder.push_section(
            f32_bytes(uvs.iter().flat_map(|uv| uv.to_array())),
            Some(TARGET_ARRAY_BUFFER),
            COMPONENT_FLOAT,
            "VEC2",
            uvs.len(),
            None,
        )
    });

    let mut index_bytes = Vec::with_capacity(mesh.faces.len() * 3 * 2);
    for &index in mesh.faces.iter().flatten() {
        let short = u16::try_from(index).map_err(|_| ExportError::IndexOverflow(index))?;
        index_bytes.extend_from_slice(&short.to_le_bytes());
    }
    let index_accessor = builder.push_section(
        index_bytes,
        Some(TARGET_ELEMENT_ARRAY_BUFFER),
        COMPONENT_UNSIGNED_SHORT,
        "SCALAR",
        mesh.faces.len() * 3,
        None,
    );

    let mut attributes = Attributes {
        position: position_accessor,
        normal: normal_accessor,
        texcoord: uv_accessor,
        joints: None,
        weights: None,
    };

    let mut nodes = Vec::new();
    let mut skins = Vec::new();
    let scene_roots;

    match mesh.bones.as_ref().filter(|b| !b.is_empty()) {
        Some(bones) => {
            let (joint_bytes, weight_bytes) = influence_buffers(mesh.positions.len(), bones)?;
            attributes.joints = Some(builder.push_section(
                joint_bytes,
                Some(TARGET_ARRAY_BUFFER),
                COMPONENT_UNSIGNED_BYTE,
                "VEC4",
                mesh.positions.len(),
                None,
            ));
            attributes.weights = Some(builder.push_section(
                weight_bytes,
                Some(TARGET_ARRAY_BUFFER),
                COMPONENT_FLOAT,
                "VEC4",
                mesh.positions.len(),
                None,
            ));
            let ibm_accessor = builder.push_section(
                inverse_bind_bytes(&bones.bind_matrices),
                None,
                COMPONENT_FLOAT,
                "MAT4",
                bones.len(),
                None,
            );

            // One node per bone with an identity local transform; the bind
            // pose travels entirely through the inverse bind matrices.
            for (bone, name) in bones.names.iter().enumerate() {
                let children = bones
                    .parents
                    .iter()
                    .enumerate()
                    .filter(|&(_, &parent)| parent >= 0 && parent as usize == bone)
                    .map(|(child, _)| child)
                    .collect();
                nodes.push(Node {
                    name: Some(name.clone()),
                    translation: Some([0.0, 0.0, 0.0]),
                    rotation: Some([0.0, 0.0, 0.0, 1.0]),
                    scale: Some([1.0, 1.0, 1.0]),
                    children,
                    ..Node::default()
                });
            }

            skins.push(Skin {
                joints: (0..bones.len()).collect(),
                inverse_bind_matrices: ibm_accessor,
            });

            nodes.push(Node {
                name: Some("Mesh".to_string()),
                mesh: Some(0),
                skin: Some(0),
                ..Node::default()
            });
            // The scene points at the mesh node only; root bones stay
            // reachable through the skin's joint list.
            scene_roots = vec![bones.len()];
        }
        None => {
            nodes.push(Node {
                name: Some("Mesh".to_string()),
                mesh: Some(0),
                ..Node::default()
            });
            scene_roots = vec![0];
        }
    }

    let uri = format!(
        "data:application/octet-stream;base64,{}",
        STANDARD.encode(&builder.blob)
    );
    let byte_length = builder.blob.len();

    let document = Document {
        asset: Asset {
            version: "2.0",
            generator: "meshview",
        },
        meshes: vec![MeshEntry {
            primitives: vec![Primitive {
                attributes,
                indices: index_accessor,
            }],
        }],
        accessors: builder.accessors,
        buffer_views: builder.views,
        buffers: vec![Buffer { uri, byte_length }],
        nodes,
        skins,
        scenes: vec![SceneEntry { nodes: scene_roots }],
        scene: 0,
    };

    let bytes = serde_json::to_vec(&document)?;
    debug!(
        "exported glTF: {} vertices, {} triangles, {} byte blob",
        mesh.positions.len(),
        mesh.faces.len(),
        byte_length
    );
    Ok(bytes)
}

fn position_bounds(mesh: &RawMesh) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::INFINITY; 3];
    let mut max = [f32::NEG_INFINITY; 3];
    for position in &mesh.positions {
        for (axis, value) in position.to_array().into_iter().enumerate() {
            min[axis] = min[axis].min(value);
            max[axis] = max[axis].max(value);
        }
    }
    (min, max)
}

/// Flatten per-vertex influences to fixed-width VEC4 joint and weight
/// buffers. Influences beyond [`MAX_INFLUENCES`] are dropped, short entries
/// are zero-padded, and vertices with no entry at all default to bone 0
/// with full weight.
fn influence_buffers(
    vertex_count: usize,
    bones: &BoneSet,
) -> Result<(Vec<u8>, Vec<u8>), ExportError> {
    let mut joint_bytes = Vec::with_capacity(vertex_count * MAX_INFLUENCES);
    let mut weight_bytes = Vec::with_capacity(vertex_count * MAX_INFLUENCES * 4);

    for vertex in 0..vertex_count {
        match bones.vertex_joints.get(vertex) {
            Some(joints) => {
                for slot in 0..MAX_INFLUENCES {
                    let joint = joints.get(slot).copied().unwrap_or(0);
                    let byte =
                        u8::try_from(joint).map_err(|_| ExportError::JointIndexOverflow(joint))?;
                    joint_bytes.push(byte);
                }
                let weights = bones.vertex_weights.get(vertex);
                for slot in 0..MAX_INFLUENCES {
                    let weight = match weights {
                        Some(weights) => weights.get(slot).copied().unwrap_or(0.0),
                        None => {
                            if slot == 0 {
                                1.0
                            } else {
                                0.0
                            }
                        }
                    };
                    weight_bytes.extend_from_slice(&weight.to_le_bytes());
                }
            }
            None => {
                joint_bytes.extend_from_slice(&[0; MAX_INFLUENCES]);
                for slot in 0..MAX_INFLUENCES {
                    let weight: f32 = if slot == 0 { 1.0 } else { 0.0 };
                    weight_bytes.extend_from_slice(&weight.to_le_bytes());
                }
            }
        }
    }

    Ok((joint_bytes, weight_bytes))
}

/// Inverse bind matrices, column-major. A non-invertible bind matrix gets
/// the identity substituted; skinning degrades for that bone but the export
/// still succeeds.
fn inverse_bind_bytes(bind_matrices: &[Mat4]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(bind_matrices.len() * 16 * 4);
    for (bone, matrix) in bind_matrices.iter().enumerate() {
        let inverse = if matrix.determinant() != 0.0 {
            matrix.inverse()
        } else {
            warn!("bind matrix for bone {bone} is not invertible, using identity");
            Mat4::IDENTITY
        };
        bytes.extend(f32_bytes(inverse.to_cols_array()));
    }
    bytes
}

fn f32_bytes(values: impl IntoIterator<Item = f32>) -> Vec<u8> {
    values.into_iter().flat_map(f32::to_le_bytes).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use glam::{Vec2, Vec3};
    use serde_json::Value;

    fn flat_mesh() -> RawMesh {
        RawMesh {
            positions: vec![
                Vec3::new(-1.0, 0.0, 2.0),
                Vec3::new(1.0, 3.0, 0.0),
                Vec3::new(0.0, -2.0, 1.0),
            ],
            normals: Some(vec![Vec3::Z; 3]),
            uvs: Some(vec![Vec2::ZERO, Vec2::X, Vec2::Y]),
            faces: vec![[0, 1, 2]],
            bones: None,
        }
    }

    fn skinned_mesh() -> RawMesh {
        let mut mesh = flat_mesh();
        mesh.bones = Some(BoneSet {
            names: vec!["root".into(), "child".into()],
            parents: vec![-1, 0],
            bind_matrices: vec![
                Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)),
                Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)),
            ],
            vertex_joints: vec![vec![0, 1], vec![1]],
            vertex_weights: vec![vec![0.5, 0.5], vec![1.0]],
        });
        mesh
    }

    fn parse(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    fn decode_blob(doc: &Value) -> Vec<u8> {
        let uri = doc["buffers"][0]["uri"].as_str().unwrap();
        let payload = uri
            .strip_prefix("data:application/octet-stream;base64,")
            .unwrap();
        STANDARD.decode(payload).unwrap()
    }

    fn component_size(component_type: u64) -> usize {
        match component_type {
            5121 => 1,
            5123 => 2,
            5126 => 4,
            other => panic!("unexpected component type {other}"),
        }
    }

    fn element_count(element_type: &str) -> usize {
        match element_type {
            "SCALAR" => 1,
            "VEC2" => 2,
            "VEC3" => 3,
            "VEC4" => 4,
            "MAT4" => 16,
            other => panic!("unexpected element type {other}"),
        }
    }

    #[test]
    fn test_blob_sections_match_accessors() {
        let doc = parse(&convert(&skinned_mesh()).unwrap());
        let blob = decode_blob(&doc);
        assert_eq!(
            blob.len(),
            doc["buffers"][0]["byteLength"].as_u64().unwrap() as usize
        );

        let views = doc["bufferViews"].as_array().unwrap();
        let mut expected_offset = 0;
        for accessor in doc["accessors"].as_array().unwrap() {
            let view = &views[accessor["bufferView"].as_u64().unwrap() as usize];
            let count = accessor["count"].as_u64().unwrap() as usize;
            let size = component_size(accessor["componentType"].as_u64().unwrap());
            let components = element_count(accessor["type"].as_str().unwrap());

            assert_eq!(
                view["byteLength"].as_u64().unwrap() as usize,
                count * size * components
            );
            assert_eq!(view["byteOffset"].as_u64().unwrap() as usize, expected_offset);
            expected_offset += view["byteLength"].as_u64().unwrap() as usize;
        }
        // Sections are contiguous and cover the whole blob.
        assert_eq!(expected_offset, blob.len());
    }

    #[test]
    fn test_section_order_is_fixed() {
        let doc = parse(&convert(&skinned_mesh()).unwrap());
        let kinds: Vec<(u64, String)> = doc["accessors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| {
                (
                    a["componentType"].as_u64().unwrap(),
                    a["type"].as_str().unwrap().to_string(),
                )
            })
            .collect();
        let expected = [
            (5126, "VEC3"),   // positions
            (5126, "VEC3"),   // normals
            (5126, "VEC2"),   // uvs
            (5123, "SCALAR"), // indices
            (5121, "VEC4"),   // joints
            (5126, "VEC4"),   // weights
            (5126, "MAT4"),   // inverse bind matrices
        ];
        assert_eq!(kinds.len(), expected.len());
        for (actual, (component, element)) in kinds.iter().zip(expected) {
            assert_eq!(actual.0, component);
            assert_eq!(actual.1, element);
        }
    }

    #[test]
    fn test_position_accessor_carries_bounds() {
        let doc = parse(&convert(&flat_mesh()).unwrap());
        let accessor = &doc["accessors"][0];
        assert_eq!(accessor["min"][0].as_f64().unwrap(), -1.0);
        assert_eq!(accessor["min"][1].as_f64().unwrap(), -2.0);
        assert_eq!(accessor["max"][1].as_f64().unwrap(), 3.0);
        assert_eq!(accessor["max"][2].as_f64().unwrap(), 2.0);
    }

    #[test]
    fn test_skinned_mesh_scene_graph() {
        let doc = parse(&convert(&skinned_mesh()).unwrap());

        let skins = doc["skins"].as_array().unwrap();
        assert_eq!(skins.len(), 1);
        assert_eq!(skins[0]["joints"].as_array().unwrap().len(), 2);

        // Scene roots point at the mesh node only.
        let roots = doc["scenes"][0]["nodes"].as_array().unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].as_u64().unwrap(), 2);

        let nodes = doc["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0]["name"], "root");
        assert_eq!(nodes[0]["children"][0].as_u64().unwrap(), 1);
        assert!(nodes[1].get("children").is_none());
        assert_eq!(nodes[2]["skin"].as_u64().unwrap(), 0);
        assert_eq!(nodes[2]["mesh"].as_u64().unwrap(), 0);
    }

    #[test]
    fn test_unskinned_mesh_has_no_skin() {
        let doc = parse(&convert(&flat_mesh()).unwrap());
        assert!(doc.get("skins").is_none());
        assert_eq!(doc["nodes"].as_array().unwrap().len(), 1);
        assert_eq!(doc["scenes"][0]["nodes"][0].as_u64().unwrap(), 0);
    }

    #[test]
    fn test_empty_mesh_rejected() {
        let result = convert(&RawMesh::default());
        assert!(matches!(
            result,
            Err(ExportError::InvalidMesh(MeshError::EmptyPositions))
        ));

        let mut no_faces = flat_mesh();
        no_faces.faces.clear();
        assert!(matches!(
            convert(&no_faces),
            Err(ExportError::InvalidMesh(MeshError::EmptyFaces))
        ));
    }

    #[test]
    fn test_influences_padded_and_truncated() {
        let bones = BoneSet {
            names: vec!["a".into()],
            parents: vec![-1],
            bind_matrices: vec![Mat4::IDENTITY],
            vertex_joints: vec![vec![1, 2, 3, 4, 5, 6], vec![7]],
            vertex_weights: vec![vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6], vec![0.9]],
        };
        let (joints, weights) = influence_buffers(3, &bones).unwrap();

        // Vertex 0 truncated to four influences.
        assert_eq!(&joints[0..4], &[1, 2, 3, 4]);
        // Vertex 1 zero-padded.
        assert_eq!(&joints[4..8], &[7, 0, 0, 0]);
        // Vertex 2 has no entry: bone 0 at full weight.
        assert_eq!(&joints[8..12], &[0, 0, 0, 0]);
        let w = f32::from_le_bytes(weights[32..36].try_into().unwrap());
        assert_eq!(w, 1.0);
        let padded = f32::from_le_bytes(weights[20..24].try_into().unwrap());
        assert_eq!(padded, 0.0);
    }

    #[test]
    fn test_singular_bind_matrix_falls_back_to_identity() {
        let bytes = inverse_bind_bytes(&[Mat4::ZERO]);
        let floats: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes(c.try_into().unwrap()))
            .collect();
        assert_eq!(floats, Mat4::IDENTITY.to_cols_array().to_vec());
    }

    #[test]
    fn test_inverse_bind_matrices_invert_bind_pose() {
        let bind = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let bytes = inverse_bind_bytes(&[bind]);
        let floats: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes(c.try_into().unwrap()))
            .collect();
        let restored = Mat4::from_cols_array(&floats.try_into().unwrap());
        assert!((restored * bind).abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn test_index_overflow_rejected() {
        let mut mesh = flat_mesh();
        mesh.positions = vec![Vec3::ZERO; 70_000];
        mesh.normals = None;
        mesh.uvs = None;
        mesh.faces = vec![[0, 1, 66_000]];
        assert!(matches!(
            convert(&mesh),
            Err(ExportError::IndexOverflow(66_000))
        ));
    }

    #[test]
    fn test_joint_overflow_rejected() {
        let mut mesh = flat_mesh();
        mesh.bones = Some(BoneSet {
            names: vec!["a".into()],
            parents: vec![-1],
            bind_matrices: vec![Mat4::IDENTITY],
            vertex_joints: vec![vec![300]],
            vertex_weights: vec![vec![1.0]],
        });
        assert!(matches!(
            convert(&mesh),
            Err(ExportError::JointIndexOverflow(300))
        ));
    }

    #[test]
    fn test_index_buffer_content() {
        let doc = parse(&convert(&flat_mesh()).unwrap());
        let blob = decode_blob(&doc);
        let views = doc["bufferViews"].as_array().unwrap();
        // Index section is the fourth view for a mesh with normals and UVs.
        let offset = views[3]["byteOffset"].as_u64().unwrap() as usize;
        let indices: Vec<u16> = blob[offset..offset + 6]
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes(c.try_into().unwrap()))
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
