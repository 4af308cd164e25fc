use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::geometry::{Aabb, Transform};

/// Mesh data attached to a scene node. Vertex data stays with the draw
/// back-end; the viewer only needs counts, bounds and shadow flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshInfo {
    pub name: Option<String>,
    pub primitive_count: usize,
    pub vertex_count: usize,
    /// Local-space bounds, `None` for a mesh without positions.
    pub bounds: Option<Aabb>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl MeshInfo {
    pub fn new(bounds: Option<Aabb>, vertex_count: usize) -> Self {
        Self {
            name: None,
            primitive_count: 1,
            vertex_count,
            bounds,
            cast_shadow: false,
            receive_shadow: false,
        }
    }
}

/// A node of a decoded asset: a transform, an optional mesh and children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<MeshInfo>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::default(),
            mesh: None,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshInfo) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    pub fn position(&self) -> Vec3 {
        self.transform.translation
    }

    /// World-space bounds of this node and all descendants, with this node's
    /// own transform applied.
    pub fn world_bounds(&self) -> Option<Aabb> {
        self.bounds_under(&Mat4::IDENTITY)
    }

    fn bounds_under(&self, parent: &Mat4) -> Option<Aabb> {
        let world = *parent * self.transform.matrix();
        let own = self
            .mesh
            .as_ref()
            .and_then(|m| m.bounds)
            .map(|b| b.transformed(&world));
        self.children
            .iter()
            .filter_map(|c| c.bounds_under(&world))
            .fold(own, |acc, b| match acc {
                Some(a) => Some(a.union(&b)),
                None => Some(b),
            })
    }

    /// Translate this node so the centre of its world bounds sits at the
    /// origin. Returns the centre that was removed.
    pub fn center_at_origin(&mut self) -> Option<Vec3> {
        let center = self.world_bounds()?.center();
        self.transform.translation -= center;
        Some(center)
    }

    /// Set both shadow flags on every mesh in the subtree. Returns the number
    /// of meshes touched.
    pub fn set_shadows(&mut self, cast: bool, receive: bool) -> usize {
        let mut touched = 0;
        self.visit_meshes_mut(&mut |mesh| {
            mesh.cast_shadow = cast;
            mesh.receive_shadow = receive;
            touched += 1;
        });
        touched
    }

    pub fn visit_meshes(&self, f: &mut impl FnMut(&MeshInfo)) {
        if let Some(mesh) = &self.mesh {
            f(mesh);
        }
        for child in &self.children {
            child.visit_meshes(f);
        }
    }

    pub fn visit_meshes_mut(&mut self, f: &mut impl FnMut(&mut MeshInfo)) {
        if let Some(mesh) = &mut self.mesh {
            f(mesh);
        }
        for child in &mut self.children {
            child.visit_meshes_mut(f);
        }
    }

    pub fn mesh_count(&self) -> usize {
        let mut count = 0;
        self.visit_meshes(&mut |_| count += 1);
        count
    }

    pub fn vertex_count(&self) -> usize {
        let mut count = 0;
        self.visit_meshes(&mut |m| count += m.vertex_count);
        count
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }
}
