use serde::{Deserialize, Serialize};

use crate::geometry::Color;
use crate::light::LightRig;
use crate::node::SceneNode;

/// Page colour scheme. Background and fog always share the theme colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub const DARK_BACKGROUND: Color = Color::from_hex(0x0f0f1a);
    pub const LIGHT_BACKGROUND: Color = Color::from_hex(0xf0f0f5);

    pub fn from_light_flag(light: bool) -> Self {
        if light {
            Theme::Light
        } else {
            Theme::Dark
        }
    }

    pub fn background(self) -> Color {
        match self {
            Theme::Dark => Self::DARK_BACKGROUND,
            Theme::Light => Self::LIGHT_BACKGROUND,
        }
    }

    /// Glyph on the theme button: the theme a click switches to.
    pub fn icon(self) -> &'static str {
        match self {
            Theme::Dark => "☀️",
            Theme::Light => "🌙",
        }
    }
}

/// Distance fog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fog {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

/// The renderable scene: background, fog, lights, the registered camera and
/// at most one loaded model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneHandle {
    pub background: Color,
    pub fog: Fog,
    lights: LightRig,
    camera_registered: bool,
    model: Option<SceneNode>,
}

impl SceneHandle {
    pub fn bootstrap(theme: Theme) -> Self {
        let mut scene = Self {
            background: theme.background(),
            fog: Fog {
                color: theme.background(),
                near: 10.0,
                far: 50.0,
            },
            lights: LightRig::studio(),
            camera_registered: true,
            model: None,
        };
        scene.apply_theme(theme);
        log::debug!(
            "Scene ready: {} lights, background {}",
            scene.lights.light_count(),
            scene.background
        );
        scene
    }

    pub fn apply_theme(&mut self, theme: Theme) {
        self.background = theme.background();
        self.fog.color = theme.background();
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut LightRig {
        &mut self.lights
    }

    pub fn model(&self) -> Option<&SceneNode> {
        self.model.as_ref()
    }

    /// Attach the loaded model. A scene holds one model for its whole life;
    /// a second attach is refused and the node is handed back.
    pub fn attach_model(&mut self, model: SceneNode) -> Result<(), SceneNode> {
        if self.model.is_some() {
            return Err(model);
        }
        self.model = Some(model);
        Ok(())
    }

    /// Lights, the camera and the model if attached.
    pub fn child_count(&self) -> usize {
        self.lights.light_count()
            + usize::from(self.camera_registered)
            + usize::from(self.model.is_some())
    }
}
