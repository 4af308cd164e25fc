use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Camera position and look-at target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl CameraPose {
    pub const STARTUP: CameraPose = CameraPose {
        position: Vec3::new(5.0, 3.0, 5.0),
        target: Vec3::ZERO,
        up: Vec3::Y,
    };
}

/// Perspective camera with a remembered startup pose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraHandle {
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub pose: CameraPose,
    initial: CameraPose,
}

impl CameraHandle {
    pub fn new(aspect: f32) -> Self {
        Self::with_pose(aspect, CameraPose::STARTUP)
    }

    pub fn with_pose(aspect: f32, pose: CameraPose) -> Self {
        Self {
            fov_deg: 75.0,
            aspect,
            near: 0.1,
            far: 1000.0,
            pose,
            initial: pose,
        }
    }

    /// The pose snapshot taken at construction.
    pub fn initial_pose(&self) -> CameraPose {
        self.initial
    }

    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.pose.target = target;
    }

    /// Restore the startup position verbatim.
    pub fn restore_initial_position(&mut self) {
        self.pose.position = self.initial.position;
    }

    /// Recompute the aspect ratio for a new surface size. A zero height is
    /// treated as one pixel.
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.pose.position, self.pose.target, self.pose.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }
}
