use serde::{Deserialize, Serialize};

/// The draw surface the back-end renders into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Convert a pointer drag in pixels to orbit angles in degrees. Dragging
    /// across the full surface height turns the camera a full circle.
    pub fn drag_to_orbit(&self, dx: f32, dy: f32) -> (f32, f32) {
        let h = self.height.max(1) as f32;
        (360.0 * dx / h, 360.0 * dy / h)
    }
}
