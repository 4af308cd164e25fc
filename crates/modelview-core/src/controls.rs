//! Orbit camera controller: rotate, zoom and pan around a target point, with
//! optional inertial damping and continuous auto-rotation.

use std::f32::consts::PI;

use glam::Vec3;

use crate::camera::CameraHandle;

const EPS: f32 = 1e-6;

/// Closest the camera may get to the target. At zero radius the orbit
/// direction is lost and the view matrix degenerates.
const MIN_RADIUS: f32 = 1e-3;

/// Spherical coordinates with Y up. `theta` is the azimuth around Y measured
/// from +Z, `phi` the polar angle from +Y.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Spherical {
    radius: f32,
    phi: f32,
    theta: f32,
}

impl Spherical {
    fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi_r = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_r * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_r * self.theta.cos(),
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct SphericalDelta {
    theta: f32,
    phi: f32,
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per update.
    pub damping_factor: f32,
    pub auto_rotate: bool,
    /// 1.0 is one full orbit every 60 seconds at 60 updates per second.
    pub auto_rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    spherical_delta: SphericalDelta,
    pan_offset: Vec3,
    scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: true,
            damping_factor: 0.05,
            auto_rotate: false,
            auto_rotate_speed: 2.0,
            min_distance: 0.1,
            max_distance: 500.0,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            spherical_delta: SphericalDelta::default(),
            pan_offset: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Azimuthal step applied per update while auto-rotating.
    pub fn auto_rotation_angle(&self) -> f32 {
        2.0 * PI / 60.0 / 60.0 * self.auto_rotate_speed
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.phi -= angle;
    }

    /// Move towards the target by `factor` (> 1 zooms in, < 1 zooms out).
    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.scale /= factor;
        }
    }

    /// Shift the target along the camera's screen-space right and up axes.
    pub fn pan(&mut self, right: f32, up: f32, camera: &CameraHandle) {
        let forward = (self.target - camera.pose.position).normalize_or_zero();
        let right_dir = forward.cross(camera.pose.up).normalize_or_zero();
        let up_dir = right_dir.cross(forward).normalize_or_zero();
        self.pan_offset += right_dir * right + up_dir * up;
    }

    /// Drop any pending rotation, zoom or pan.
    pub fn stop_motion(&mut self) {
        self.spherical_delta = SphericalDelta::default();
        self.pan_offset = Vec3::ZERO;
        self.scale = 1.0;
    }

    /// Whether damped motion is still pending.
    pub fn is_settling(&self) -> bool {
        self.spherical_delta.theta.abs() > EPS
            || self.spherical_delta.phi.abs() > EPS
            || self.pan_offset.length_squared() > EPS * EPS
            || (self.scale - 1.0).abs() > EPS
    }

    /// Advance one step and place the camera. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut CameraHandle) -> bool {
        let before = camera.pose.position;
        let mut spherical = Spherical::from_offset(before - self.target);

        if self.auto_rotate {
            self.rotate_left(self.auto_rotation_angle());
        }

        let step = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        spherical.theta += self.spherical_delta.theta * step;
        spherical.phi += self.spherical_delta.phi * step;

        let min_phi = self.min_polar_angle.max(EPS);
        let max_phi = self.max_polar_angle.min(PI - EPS);
        spherical.phi = spherical.phi.clamp(min_phi, max_phi.max(min_phi));
        let min_radius = self.min_distance.max(MIN_RADIUS);
        let max_radius = self.max_distance.max(min_radius);
        spherical.radius =
            (spherical.radius.max(min_radius) * self.scale).clamp(min_radius, max_radius);

        self.target += self.pan_offset * step;
        camera.pose.position = self.target + spherical.to_offset();
        camera.look_at(self.target);

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.spherical_delta.theta *= decay;
            self.spherical_delta.phi *= decay;
            self.pan_offset *= decay;
        } else {
            self.spherical_delta = SphericalDelta::default();
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        camera.pose.position.distance_squared(before) > EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn azimuth(camera: &CameraHandle) -> f32 {
        camera.pose.position.x.atan2(camera.pose.position.z)
    }

    #[test]
    fn test_idle_update_keeps_camera() {
        let mut controls = OrbitControls::new();
        let mut camera = CameraHandle::new(1.0);
        let start = camera.position();
        assert!(!controls.update(&mut camera));
        assert!(camera.position().distance(start) < 1e-4);
    }

    #[test]
    fn test_auto_rotate_preserves_distance_and_height() {
        let mut controls = OrbitControls::new();
        controls.enable_damping = false;
        controls.auto_rotate = true;
        let mut camera = CameraHandle::new(1.0);
        let radius = camera.position().length();
        let start_azimuth = azimuth(&camera);

        assert!(controls.update(&mut camera));
        assert!((camera.position().length() - radius).abs() < 1e-4);
        assert!((camera.position().y - 3.0).abs() < 1e-4);
        let moved = start_azimuth - azimuth(&camera);
        assert!((moved - controls.auto_rotation_angle()).abs() < 1e-5);
    }

    #[test]
    fn test_damping_spreads_rotation_over_frames() {
        let mut controls = OrbitControls::new();
        let mut camera = CameraHandle::new(1.0);
        let start_azimuth = azimuth(&camera);
        controls.rotate_left(0.5);

        controls.update(&mut camera);
        let first_step = start_azimuth - azimuth(&camera);
        assert!((first_step - 0.5 * controls.damping_factor).abs() < 1e-4);

        for _ in 0..500 {
            controls.update(&mut camera);
        }
        assert!(!controls.is_settling());
        assert!((start_azimuth - azimuth(&camera) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_polar_angle_is_clamped() {
        let mut controls = OrbitControls::new();
        controls.enable_damping = false;
        let mut camera = CameraHandle::new(1.0);
        controls.rotate_up(10.0);
        controls.update(&mut camera);
        assert!(camera.position().y > 0.0);
        assert!(camera.position().x.is_finite());
    }

    #[test]
    fn test_zoom_respects_distance_limits() {
        let mut controls = OrbitControls::new();
        controls.enable_damping = false;
        controls.min_distance = 2.0;
        let mut camera = CameraHandle::new(1.0);
        controls.zoom(100.0);
        controls.update(&mut camera);
        assert!((camera.position().length() - 2.0).abs() < 1e-4);
        controls.zoom(-1.0);
        assert!(!controls.is_settling());
    }

    #[test]
    fn test_extreme_zoom_keeps_camera_off_target() {
        let mut controls = OrbitControls::new();
        controls.enable_damping = false;
        let mut camera = CameraHandle::new(1.0);

        controls.zoom(1e38);
        controls.update(&mut camera);
        controls.zoom(1e38);
        controls.update(&mut camera);
        let zoomed_in = camera.position().length();
        assert!((zoomed_in - controls.min_distance).abs() < 1e-4);
        assert!(camera.view_proj().is_finite());

        for _ in 0..100 {
            controls.zoom(0.001);
            controls.update(&mut camera);
        }
        let zoomed_out = camera.position().length();
        assert!((zoomed_out - controls.max_distance).abs() < 1e-2);
        assert!(camera.view_proj().is_finite());
    }

    #[test]
    fn test_pan_moves_target() {
        let mut controls = OrbitControls::new();
        controls.enable_damping = false;
        let mut camera = CameraHandle::new(1.0);
        controls.pan(1.0, 0.0, &camera);
        controls.update(&mut camera);
        assert!((controls.target.length() - 1.0).abs() < 1e-4);
        assert_eq!(camera.pose.target, controls.target);
    }

    #[test]
    fn test_stop_motion_clears_pending_deltas() {
        let mut controls = OrbitControls::new();
        controls.rotate_left(1.0);
        controls.zoom(2.0);
        assert!(controls.is_settling());
        controls.stop_motion();
        assert!(!controls.is_settling());
    }
}
