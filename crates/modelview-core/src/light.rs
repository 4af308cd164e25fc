use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::geometry::Color;

/// Kind of light source, with the parameters that only apply to that kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LightKind {
    Ambient,
    Directional { position: Vec3 },
    Point { position: Vec3, distance: f32 },
}

/// Shadow-map settings for a shadow-casting light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowSettings {
    pub map_size: u32,
    pub near: f32,
    pub far: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            map_size: 2048,
            near: 0.5,
            far: 50.0,
        }
    }
}

/// A named light registered in the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Light {
    pub name: String,
    pub kind: LightKind,
    pub color: Color,
    pub intensity: f32,
    pub visible: bool,
    pub shadow: Option<ShadowSettings>,
}

impl Light {
    pub fn new(name: &str, kind: LightKind, color: Color, intensity: f32) -> Self {
        Self {
            name: name.to_string(),
            kind,
            color,
            intensity,
            visible: true,
            shadow: None,
        }
    }

    pub fn with_shadow(mut self, shadow: ShadowSettings) -> Self {
        self.shadow = Some(shadow);
        self
    }

    pub fn casts_shadow(&self) -> bool {
        self.shadow.is_some()
    }
}

/// The fixed set of lights the viewer toggles as a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightRig {
    lights: Vec<Light>,
}

impl LightRig {
    pub const AMBIENT: &'static str = "ambient";
    pub const MAIN: &'static str = "directional-main";
    pub const ACCENT: &'static str = "point-accent";
    pub const FILL: &'static str = "directional-fill";

    pub fn new() -> Self {
        Self { lights: Vec::new() }
    }

    /// Ambient fill, shadow-casting key light, coloured point accent and
    /// coloured fill light.
    pub fn studio() -> Self {
        let mut rig = Self::new();
        rig.add_light(Light::new(
            Self::AMBIENT,
            LightKind::Ambient,
            Color::from_hex(0x404040),
            0.6,
        ));
        rig.add_light(
            Light::new(
                Self::MAIN,
                LightKind::Directional {
                    position: Vec3::new(5.0, 10.0, 5.0),
                },
                Color::from_hex(0xffffff),
                1.0,
            )
            .with_shadow(ShadowSettings::default()),
        );
        rig.add_light(Light::new(
            Self::ACCENT,
            LightKind::Point {
                position: Vec3::new(-5.0, 5.0, -5.0),
                distance: 50.0,
            },
            Color::from_hex(0x6366f1),
            0.8,
        ));
        rig.add_light(Light::new(
            Self::FILL,
            LightKind::Directional {
                position: Vec3::new(-5.0, 3.0, 5.0),
            },
            Color::from_hex(0xec4899),
            0.4,
        ));
        rig
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn get_light(&self, name: &str) -> Option<&Light> {
        self.lights.iter().find(|l| l.name == name)
    }

    pub fn visible_lights(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter().filter(|l| l.visible)
    }

    pub fn all_lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    pub fn set_all_visible(&mut self, visible: bool) {
        for light in &mut self.lights {
            light.visible = visible;
        }
    }
}

impl Default for LightRig {
    fn default() -> Self {
        Self::new()
    }
}
