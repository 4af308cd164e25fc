use glam::Mat4;
use serde::{Deserialize, Serialize};

use modelview_core::light::LightKind;
use modelview_core::node::SceneNode;
use modelview_core::ViewerContext;

use crate::Viewport;

/// A light as the draw back-end sees it. Hidden lights are left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderLight {
    pub name: String,
    pub kind: LightKind,
    pub color: [f32; 3],
    pub intensity: f32,
    pub casts_shadow: bool,
    pub shadow_map_size: Option<u32>,
}

/// One mesh instance with its world transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderMesh {
    pub node: String,
    /// Column-major world matrix.
    pub world: [[f32; 4]; 4],
    pub vertex_count: usize,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderFog {
    pub color: [f32; 3],
    pub near: f32,
    pub far: f32,
}

/// Everything one draw call needs: the current scene seen through the
/// current camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub frame_index: u64,
    pub viewport: Viewport,
    /// Column-major projection × view.
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 3],
    pub camera_target: [f32; 3],
    pub background: [f32; 3],
    pub fog: RenderFog,
    pub lights: Vec<RenderLight>,
    pub meshes: Vec<RenderMesh>,
}

impl RenderFrame {
    pub fn capture(ctx: &ViewerContext, viewport: Viewport, frame_index: u64) -> Self {
        let lights = ctx
            .scene
            .lights()
            .visible_lights()
            .map(|l| RenderLight {
                name: l.name.clone(),
                kind: l.kind,
                color: l.color.to_f32_array(),
                intensity: l.intensity,
                casts_shadow: l.casts_shadow(),
                shadow_map_size: l.shadow.map(|s| s.map_size),
            })
            .collect();

        let mut meshes = Vec::new();
        if let Some(model) = ctx.scene.model() {
            collect_meshes(model, &Mat4::IDENTITY, &mut meshes);
        }

        Self {
            frame_index,
            viewport,
            view_proj: ctx.camera.view_proj().to_cols_array_2d(),
            camera_position: ctx.camera.pose.position.to_array(),
            camera_target: ctx.camera.pose.target.to_array(),
            background: ctx.scene.background.to_f32_array(),
            fog: RenderFog {
                color: ctx.scene.fog.color.to_f32_array(),
                near: ctx.scene.fog.near,
                far: ctx.scene.fog.far,
            },
            lights,
            meshes,
        }
    }
}

fn collect_meshes(node: &SceneNode, parent: &Mat4, out: &mut Vec<RenderMesh>) {
    let world = *parent * node.transform.matrix();
    if let Some(mesh) = &node.mesh {
        out.push(RenderMesh {
            node: node.name.clone(),
            world: world.to_cols_array_2d(),
            vertex_count: mesh.vertex_count,
            cast_shadow: mesh.cast_shadow,
            receive_shadow: mesh.receive_shadow,
        });
    }
    for child in &node.children {
        collect_meshes(child, &world, out);
    }
}
