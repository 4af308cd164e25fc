use serde::{Deserialize, Serialize};

/// A UI control event. Each one is handled on its own, synchronously, by
/// [`ViewerContext::apply`](crate::ViewerContext::apply).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Control {
    /// Speed slider moved to a new multiplier.
    SetRotationSpeed(f32),
    ToggleLighting,
    ResetCamera,
    ToggleAutoRotate,
    ToggleTheme,
    /// The draw surface changed size, in pixels.
    Resize { width: u32, height: u32 },
    /// Drag rotation around the target, in degrees.
    Orbit { yaw_deg: f32, pitch_deg: f32 },
    /// Wheel zoom; > 1 moves closer.
    Zoom(f32),
    /// Drag pan in world units along the screen axes.
    Pan { right: f32, up: f32 },
}

impl Control {
    /// Human-readable name, used in logs.
    pub fn description(&self) -> &str {
        match self {
            Control::SetRotationSpeed(_) => "Set rotation speed",
            Control::ToggleLighting => "Toggle lighting",
            Control::ResetCamera => "Reset camera",
            Control::ToggleAutoRotate => "Toggle auto-rotate",
            Control::ToggleTheme => "Toggle theme",
            Control::Resize { .. } => "Resize",
            Control::Orbit { .. } => "Orbit",
            Control::Zoom(_) => "Zoom",
            Control::Pan { .. } => "Pan",
        }
    }
}
