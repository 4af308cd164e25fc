//! GLTF / GLB asset decoding into a [`SceneNode`] tree.
//!
//! The chosen scene becomes a root group node; glTF node transforms are kept
//! as-is. Mesh bounds and vertex counts come from the POSITION attribute of
//! every primitive. Vertex data itself is not retained.

use std::io;
use std::path::Path;

use glam::{Quat, Vec3};
use thiserror::Error;

use modelview_core::geometry::{Aabb, Transform};
use modelview_core::loader::LoadError;
use modelview_core::node::{MeshInfo, SceneNode};

/// Deeper node chains are cut off rather than recursed into.
const MAX_NODE_DEPTH: usize = 128;

// ── Errors ────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("Asset contains no scene")]
    NoScene,
}

impl From<AssetError> for LoadError {
    fn from(err: AssetError) -> Self {
        match err {
            AssetError::Io(e) => LoadError::Fetch(e.to_string()),
            AssetError::Gltf(e) => LoadError::Decode(e.to_string()),
            AssetError::NoScene => LoadError::NoScene,
        }
    }
}

// ── Decoding ──────────────────────────────────────────────────────────

/// Decode a `.glb` or `.gltf` byte slice. External buffer URIs are resolved
/// against `base_dir`; `fallback_name` names the root when the scene has no
/// name of its own.
pub fn decode_model(
    bytes: &[u8],
    base_dir: Option<&Path>,
    fallback_name: &str,
) -> Result<SceneNode, AssetError> {
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes)?;
    let buffers = gltf::import_buffers(&document, base_dir, blob)?;

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(AssetError::NoScene)?;

    let mut root = SceneNode::new(scene.name().unwrap_or(fallback_name));
    for node in scene.nodes() {
        root.add_child(convert_node(&node, &buffers, 0));
    }

    log::info!(
        "Decoded scene '{}': {} nodes, {} meshes",
        root.name,
        root.node_count() - 1,
        root.mesh_count()
    );
    Ok(root)
}

fn convert_node(node: &gltf::Node, buffers: &[gltf::buffer::Data], depth: usize) -> SceneNode {
    let (translation, rotation, scale) = node.transform().decomposed();
    let transform = Transform {
        translation: Vec3::from(translation),
        rotation: Quat::from_array(rotation),
        scale: Vec3::from(scale),
    };
    let name = node
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()));

    let mut out = SceneNode::new(&name).with_transform(transform);
    if let Some(mesh) = node.mesh() {
        out.mesh = Some(convert_mesh(&mesh, buffers));
    }

    if depth >= MAX_NODE_DEPTH {
        log::warn!("Node '{}' exceeds depth {}, children skipped", name, MAX_NODE_DEPTH);
        return out;
    }
    for child in node.children() {
        out.add_child(convert_node(&child, buffers, depth + 1));
    }
    out
}

fn convert_mesh(mesh: &gltf::Mesh, buffers: &[gltf::buffer::Data]) -> MeshInfo {
    let mut bounds: Option<Aabb> = None;
    let mut vertex_count = 0;
    let mut primitive_count = 0;

    for prim in mesh.primitives() {
        primitive_count += 1;
        let reader = prim.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
        let positions: Vec<Vec3> = match reader.read_positions() {
            Some(it) => it.map(Vec3::from).collect(),
            None => continue,
        };
        vertex_count += positions.len();
        if let Some(b) = Aabb::from_points(&positions) {
            bounds = Some(match bounds {
                Some(acc) => acc.union(&b),
                None => b,
            });
        }
    }

    MeshInfo {
        name: mesh.name().map(str::to_string),
        primitive_count,
        vertex_count,
        bounds,
        cast_shadow: false,
        receive_shadow: false,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A single-triangle GLB: vertices (0,0,0) (2,0,0) (0,4,0), placed by a
    /// node translated to (1,2,3).
    pub(crate) fn triangle_glb() -> Vec<u8> {
        let positions: [f32; 9] = [0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 4.0, 0.0];
        let bin: Vec<u8> = positions.iter().flat_map(|v| v.to_le_bytes()).collect();

        let json = serde_json::json!({
            "asset": { "version": "2.0" },
            "scene": 0,
            "scenes": [{ "name": "fixture", "nodes": [0] }],
            "nodes": [{ "name": "tri", "mesh": 0, "translation": [1.0, 2.0, 3.0] }],
            "meshes": [{ "name": "tri_mesh", "primitives": [{ "attributes": { "POSITION": 0 } }] }],
            "buffers": [{ "byteLength": bin.len() }],
            "bufferViews": [{ "buffer": 0, "byteOffset": 0, "byteLength": bin.len() }],
            "accessors": [{
                "bufferView": 0,
                "componentType": 5126,
                "count": 3,
                "type": "VEC3",
                "min": [0.0, 0.0, 0.0],
                "max": [2.0, 4.0, 0.0]
            }]
        });
        let mut json_bytes = serde_json::to_vec(&json).unwrap();
        while json_bytes.len() % 4 != 0 {
            json_bytes.push(b' ');
        }

        let total = 12 + 8 + json_bytes.len() + 8 + bin.len();
        let mut glb = Vec::with_capacity(total);
        glb.extend_from_slice(b"glTF");
        glb.extend_from_slice(&2u32.to_le_bytes());
        glb.extend_from_slice(&(total as u32).to_le_bytes());
        glb.extend_from_slice(&(json_bytes.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"JSON");
        glb.extend_from_slice(&json_bytes);
        glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"BIN\0");
        glb.extend_from_slice(&bin);
        glb
    }

    #[test]
    fn test_decode_triangle_glb() {
        let root = decode_model(&triangle_glb(), None, "fallback").unwrap();
        assert_eq!(root.name, "fixture");
        assert_eq!(root.children.len(), 1);

        let tri = &root.children[0];
        assert_eq!(tri.name, "tri");
        assert_eq!(tri.position(), Vec3::new(1.0, 2.0, 3.0));
        let mesh = tri.mesh.as_ref().unwrap();
        assert_eq!(mesh.name.as_deref(), Some("tri_mesh"));
        assert_eq!(mesh.vertex_count, 3);
        assert_eq!(mesh.primitive_count, 1);
        assert_eq!(mesh.bounds, Some(Aabb::new(Vec3::ZERO, Vec3::new(2.0, 4.0, 0.0))));
    }

    #[test]
    fn test_decoded_world_bounds() {
        let root = decode_model(&triangle_glb(), None, "fallback").unwrap();
        let bounds = root.world_bounds().unwrap();
        assert_eq!(bounds.center(), Vec3::new(2.0, 4.0, 3.0));
    }

    #[test]
    fn test_document_without_scene() {
        let json = br#"{"asset":{"version":"2.0"}}"#;
        let err = decode_model(json, None, "empty").unwrap_err();
        assert!(matches!(err, AssetError::NoScene));
        assert_eq!(LoadError::from(err), LoadError::NoScene);
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let err = decode_model(b"definitely not gltf", None, "junk").unwrap_err();
        assert!(matches!(err, AssetError::Gltf(_)));
        assert!(matches!(LoadError::from(err), LoadError::Decode(_)));
    }
}
