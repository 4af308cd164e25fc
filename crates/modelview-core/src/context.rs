use serde::{Deserialize, Serialize};

use crate::camera::CameraHandle;
use crate::commands::Control;
use crate::controls::OrbitControls;
use crate::loader::{progress_percent, AssetSource, LoadPhase, LoadStatus};
use crate::page::{self, PageView, LOAD_ERROR_MESSAGE};
use crate::scene::{SceneHandle, Theme};
use crate::state::ViewerState;

/// Size of the draw surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

/// Startup settings for a [`ViewerContext`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewerOptions {
    pub width: u32,
    pub height: u32,
    pub rotation_speed: f32,
    pub light_theme: bool,
    pub damping_factor: f32,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            rotation_speed: 1.0,
            light_theme: false,
            damping_factor: 0.05,
        }
    }
}

/// Everything the control handlers and the render loop read and write.
#[derive(Debug, Clone)]
pub struct ViewerContext {
    pub state: ViewerState,
    pub scene: SceneHandle,
    pub camera: CameraHandle,
    pub controls: OrbitControls,
    pub page: PageView,
    surface: SurfaceSize,
    load_phase: LoadPhase,
}

impl ViewerContext {
    /// Build the scene, camera and controls. `now_ms` starts the first FPS
    /// sample window.
    pub fn new(options: ViewerOptions, now_ms: f64) -> Self {
        let theme = Theme::from_light_flag(options.light_theme);
        let speed = sanitize_speed(options.rotation_speed).unwrap_or(1.0);

        let mut state = ViewerState::new(now_ms);
        state.rotation_speed_multiplier = speed;
        state.light_theme = options.light_theme;

        let mut camera = CameraHandle::new(1.0);
        camera.set_viewport_size(options.width, options.height);

        let mut controls = OrbitControls::new();
        match sanitize_damping(options.damping_factor) {
            Some(factor) => controls.damping_factor = factor,
            None => log::warn!(
                "Damping factor {} would freeze the camera, using {}",
                options.damping_factor,
                controls.damping_factor
            ),
        }
        controls.auto_rotate_speed = 2.0 * speed;

        Self {
            state,
            scene: SceneHandle::bootstrap(theme),
            camera,
            controls,
            page: PageView::new(theme, speed),
            surface: SurfaceSize {
                width: options.width,
                height: options.height,
            },
            load_phase: LoadPhase::Pending,
        }
    }

    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    pub fn load_phase(&self) -> LoadPhase {
        self.load_phase
    }

    pub fn theme(&self) -> Theme {
        Theme::from_light_flag(self.state.light_theme)
    }

    pub fn apply(&mut self, control: Control) {
        log::debug!("{}: {:?}", control.description(), control);
        match control {
            Control::SetRotationSpeed(m) => self.set_rotation_speed(m),
            Control::ToggleLighting => self.toggle_lighting(),
            Control::ResetCamera => self.reset_camera(),
            Control::ToggleAutoRotate => self.toggle_auto_rotate(),
            Control::ToggleTheme => self.toggle_theme(),
            Control::Resize { width, height } => self.resize(width, height),
            Control::Orbit { yaw_deg, pitch_deg } => {
                self.controls.rotate_left(yaw_deg.to_radians());
                self.controls.rotate_up(pitch_deg.to_radians());
            }
            Control::Zoom(factor) => self.controls.zoom(factor),
            Control::Pan { right, up } => self.controls.pan(right, up, &self.camera),
        }
    }

    // ── Control handlers ─────────────────────────────────────────────

    pub fn set_rotation_speed(&mut self, multiplier: f32) {
        let Some(m) = sanitize_speed(multiplier) else {
            log::warn!("Ignoring non-finite rotation speed {}", multiplier);
            return;
        };
        self.state.rotation_speed_multiplier = m;
        self.controls.auto_rotate_speed = 2.0 * m;
        self.page.speed_label = page::format_speed(m);
    }

    pub fn toggle_lighting(&mut self) {
        self.state.lighting_enabled = !self.state.lighting_enabled;
        self.scene
            .lights_mut()
            .set_all_visible(self.state.lighting_enabled);
    }

    pub fn reset_camera(&mut self) {
        self.camera.restore_initial_position();
        self.controls.stop_motion();
        self.controls.target = glam::Vec3::ZERO;
        self.camera.look_at(self.controls.target);
        self.set_auto_rotate(false);
    }

    pub fn toggle_auto_rotate(&mut self) {
        self.set_auto_rotate(!self.state.auto_rotate_enabled);
    }

    fn set_auto_rotate(&mut self, enabled: bool) {
        self.state.auto_rotate_enabled = enabled;
        self.controls.auto_rotate = enabled;
        self.page.auto_rotate_label = page::format_auto_rotate(enabled);
    }

    pub fn toggle_theme(&mut self) {
        self.state.light_theme = !self.state.light_theme;
        let theme = self.theme();
        self.scene.apply_theme(theme);
        self.page.theme_icon = theme.icon().to_string();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport_size(width, height);
        self.surface = SurfaceSize { width, height };
    }

    // ── Asset loading ────────────────────────────────────────────────

    /// Drain every pending update from `source`.
    pub fn pump_loader(&mut self, source: &mut dyn AssetSource) {
        while let Some(status) = source.poll() {
            self.apply_load_status(status);
        }
    }

    pub fn apply_load_status(&mut self, status: LoadStatus) {
        if self.load_phase != LoadPhase::Pending {
            log::warn!("Ignoring asset update after load finished: {:?}", self.load_phase);
            return;
        }

        match status {
            LoadStatus::Progress { loaded, total } => {
                let percent = progress_percent(loaded, total);
                self.page.progress_text = page::format_progress(percent);
            }
            LoadStatus::Loaded(mut model) => {
                if let Some(center) = model.center_at_origin() {
                    log::debug!("Model re-centred by {:?}", center);
                }
                model.set_shadows(true, true);
                let (objects, vertices) = (model.mesh_count(), model.vertex_count());
                if let Err(model) = self.scene.attach_model(model) {
                    log::warn!("Scene already holds a model, dropping '{}'", model.name);
                }
                log::info!("Model loaded: {} meshes, {} vertices", objects, vertices);
                self.page.model_info = page::format_model_info(objects, vertices);
                self.page.loading.visible = false;
                self.load_phase = LoadPhase::Loaded;
            }
            LoadStatus::Failed(err) => {
                log::error!("Failed to load model: {}", err);
                self.page.loading.content = LOAD_ERROR_MESSAGE.to_string();
                self.page.loading.visible = true;
                self.load_phase = LoadPhase::Failed;
            }
        }
    }

    // ── Per-frame work ───────────────────────────────────────────────

    /// Advance orbit damping and count the frame. Publishes a new FPS value
    /// to the page when a sample completes. Returns whether the camera moved.
    pub fn step(&mut self, now_ms: f64) -> bool {
        let moved = self.controls.update(&mut self.camera);
        if let Some(fps) = self.state.record_frame(now_ms) {
            self.page.fps_text = page::format_fps(fps);
        }
        moved
    }
}

/// Speed multipliers are clamped to be non-negative; non-finite input has no
/// meaning and is rejected.
fn sanitize_speed(multiplier: f32) -> Option<f32> {
    multiplier.is_finite().then(|| multiplier.max(0.0))
}

/// Damping must lie in (0, 1]: at zero no pending motion is ever applied.
fn sanitize_damping(factor: f32) -> Option<f32> {
    (factor.is_finite() && factor > 0.0).then(|| factor.min(1.0))
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use glam::Vec3;

    use super::*;
    use crate::geometry::{Aabb, Transform};
    use crate::loader::LoadError;
    use crate::node::{MeshInfo, SceneNode};

    fn context() -> ViewerContext {
        ViewerContext::new(ViewerOptions::default(), 0.0)
    }

    /// Asset source replaying a fixed script of statuses.
    struct ScriptedSource(VecDeque<LoadStatus>);

    impl AssetSource for ScriptedSource {
        fn poll(&mut self) -> Option<LoadStatus> {
            self.0.pop_front()
        }
    }

    fn mesh(min: Vec3, max: Vec3) -> MeshInfo {
        MeshInfo::new(Some(Aabb::new(min, max)), 24)
    }

    /// Two meshes whose combined bounds are centred on (3, 1, -2).
    fn mock_model() -> SceneNode {
        SceneNode::new("mock")
            .with_child(SceneNode::new("left").with_mesh(mesh(
                Vec3::new(1.0, 0.0, -3.0),
                Vec3::new(2.0, 2.0, -1.0),
            )))
            .with_child(
                SceneNode::new("right")
                    .with_transform(Transform::from_translation(Vec3::new(4.0, 0.0, 0.0)))
                    .with_mesh(mesh(Vec3::new(0.0, 0.0, -3.0), Vec3::new(1.0, 2.0, -1.0))),
            )
    }

    #[test]
    fn test_speed_sets_auto_rotate_speed_to_double() {
        let mut ctx = context();
        for m in [0.0, 0.5, 1.0, 2.5, 10.0] {
            ctx.apply(Control::SetRotationSpeed(m));
            assert_eq!(ctx.controls.auto_rotate_speed, 2.0 * m);
            assert_eq!(ctx.state.rotation_speed_multiplier, m);
        }
        assert_eq!(ctx.page.speed_label, "10.0x");
    }

    #[test]
    fn test_speed_rejects_negative_and_nan() {
        let mut ctx = context();
        ctx.set_rotation_speed(-3.0);
        assert_eq!(ctx.controls.auto_rotate_speed, 0.0);
        ctx.set_rotation_speed(1.5);
        ctx.set_rotation_speed(f32::NAN);
        assert_eq!(ctx.state.rotation_speed_multiplier, 1.5);
    }

    fn light_visibility(ctx: &ViewerContext) -> Vec<bool> {
        ctx.scene.lights().all_lights().iter().map(|l| l.visible).collect()
    }

    #[test]
    fn test_zero_damping_falls_back_to_default() {
        let options = ViewerOptions {
            damping_factor: 0.0,
            ..Default::default()
        };
        let mut ctx = ViewerContext::new(options, 0.0);
        assert_eq!(ctx.controls.damping_factor, 0.05);

        ctx.apply(Control::ToggleAutoRotate);
        ctx.apply(Control::Orbit { yaw_deg: 90.0, pitch_deg: 0.0 });
        let start = ctx.camera.position();
        for i in 0..600 {
            ctx.step(i as f64 * 16.0);
        }
        assert!(ctx.camera.position().distance(start) > 1.0);
    }

    #[test]
    fn test_damping_above_one_is_capped() {
        let options = ViewerOptions {
            damping_factor: 3.0,
            ..Default::default()
        };
        let ctx = ViewerContext::new(options, 0.0);
        assert_eq!(ctx.controls.damping_factor, 1.0);
    }

    #[test]
    fn test_lighting_toggle_round_trip() {
        let mut ctx = context();
        let before = light_visibility(&ctx);

        ctx.apply(Control::ToggleLighting);
        assert!(!ctx.state.lighting_enabled);
        assert!(ctx.scene.lights().all_lights().iter().all(|l| !l.visible));

        ctx.apply(Control::ToggleLighting);
        assert_eq!(light_visibility(&ctx), before);
    }

    #[test]
    fn test_reset_camera_restores_snapshot_and_stops_rotation() {
        let mut ctx = context();
        let snapshot = ctx.camera.initial_pose().position;
        ctx.apply(Control::ToggleAutoRotate);
        ctx.apply(Control::Orbit { yaw_deg: 45.0, pitch_deg: 10.0 });
        ctx.apply(Control::Pan { right: 2.0, up: 1.0 });
        for i in 0..30 {
            ctx.step(i as f64 * 16.0);
        }
        assert_ne!(ctx.camera.position(), snapshot);

        ctx.apply(Control::ResetCamera);
        assert_eq!(ctx.camera.position(), snapshot);
        assert_eq!(ctx.controls.target, Vec3::ZERO);
        assert!(!ctx.state.auto_rotate_enabled);
        assert!(!ctx.controls.auto_rotate);
        assert!(!ctx.controls.is_settling());

        // Reset while already idle is still a reset.
        ctx.apply(Control::ResetCamera);
        assert!(!ctx.state.auto_rotate_enabled);
        assert_eq!(ctx.camera.position(), snapshot);
    }

    #[test]
    fn test_auto_rotate_toggle() {
        let mut ctx = context();
        ctx.apply(Control::ToggleAutoRotate);
        assert!(ctx.state.auto_rotate_enabled && ctx.controls.auto_rotate);
        assert_eq!(ctx.page.auto_rotate_label, "Auto-Rotate: On");
        ctx.apply(Control::ToggleAutoRotate);
        assert!(!ctx.state.auto_rotate_enabled && !ctx.controls.auto_rotate);
    }

    #[test]
    fn test_theme_toggle_twice_restores() {
        let mut ctx = context();
        let (bg, fog) = (ctx.scene.background, ctx.scene.fog.color);
        let icon = ctx.page.theme_icon.clone();

        ctx.apply(Control::ToggleTheme);
        assert!(ctx.state.light_theme);
        assert_eq!(ctx.scene.background, Theme::LIGHT_BACKGROUND);
        assert_eq!(ctx.scene.fog.color, Theme::LIGHT_BACKGROUND);
        assert_ne!(ctx.page.theme_icon, icon);

        ctx.apply(Control::ToggleTheme);
        assert_eq!(ctx.scene.background, bg);
        assert_eq!(ctx.scene.fog.color, fog);
        assert_eq!(ctx.page.theme_icon, icon);
    }

    #[test]
    fn test_resize_updates_aspect_and_surface() {
        let mut ctx = context();
        ctx.apply(Control::Resize { width: 1000, height: 500 });
        assert!((ctx.camera.aspect - 2.0).abs() < 1e-6);
        assert_eq!(ctx.surface(), SurfaceSize { width: 1000, height: 500 });
    }

    #[test]
    fn test_load_success_centres_model_and_hides_indicator() {
        let mut ctx = context();
        let original = mock_model().position();
        let mut source = ScriptedSource(VecDeque::from(vec![
            LoadStatus::Progress { loaded: 10, total: 40 },
            LoadStatus::Progress { loaded: 40, total: 40 },
            LoadStatus::Loaded(mock_model()),
        ]));

        ctx.pump_loader(&mut source);

        let model = ctx.scene.model().expect("model attached");
        assert_eq!(model.position(), original - Vec3::new(3.0, 1.0, -2.0));
        let mut all_shadowed = true;
        model.visit_meshes(&mut |m| all_shadowed &= m.cast_shadow && m.receive_shadow);
        assert!(all_shadowed);
        assert!(!ctx.page.loading.visible);
        assert_eq!(ctx.page.progress_text, "100%");
        assert_eq!(ctx.page.model_info, "Objects: 2 | Vertices: 48");
        assert_eq!(ctx.load_phase(), LoadPhase::Loaded);
    }

    #[test]
    fn test_load_failure_shows_error_and_leaves_scene() {
        let mut ctx = context();
        let children = ctx.scene.child_count();
        let mut source = ScriptedSource(VecDeque::from(vec![
            LoadStatus::Progress { loaded: 5, total: 0 },
            LoadStatus::Failed(LoadError::Fetch("connection reset".into())),
        ]));

        ctx.pump_loader(&mut source);

        assert_eq!(ctx.page.progress_text, "0%");
        assert!(ctx.page.loading.visible);
        assert_eq!(ctx.page.loading.content, LOAD_ERROR_MESSAGE);
        assert_eq!(ctx.scene.child_count(), children);
        assert!(ctx.scene.model().is_none());
        assert_eq!(ctx.load_phase(), LoadPhase::Failed);
    }

    #[test]
    fn test_only_first_terminal_status_counts() {
        let mut ctx = context();
        ctx.apply_load_status(LoadStatus::Failed(LoadError::NoScene));
        ctx.apply_load_status(LoadStatus::Loaded(mock_model()));
        assert!(ctx.scene.model().is_none());
        assert_eq!(ctx.page.loading.content, LOAD_ERROR_MESSAGE);
    }

    #[test]
    fn test_step_publishes_fps() {
        let mut ctx = context();
        for i in 1..50 {
            ctx.step(i as f64 * 20.0);
        }
        assert_eq!(ctx.page.fps_text, "FPS: 0");
        // 50th frame lands exactly one second in
        ctx.step(1000.0);
        assert_eq!(ctx.page.fps_text, "FPS: 50");
        assert_eq!(ctx.state.frame_count, 0);
    }
}
