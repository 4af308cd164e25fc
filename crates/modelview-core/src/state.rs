use serde::{Deserialize, Serialize};

/// Minimum wall-clock time between two FPS samples, in milliseconds.
pub const FPS_SAMPLE_INTERVAL_MS: f64 = 1000.0;

/// Toggle intents and frame statistics shared by the control handlers and the
/// render loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerState {
    pub rotation_speed_multiplier: f32,
    pub auto_rotate_enabled: bool,
    pub lighting_enabled: bool,
    pub light_theme: bool,
    /// Frames drawn since the last FPS sample.
    pub frame_count: u32,
    /// Timestamp of the last FPS sample, in milliseconds.
    pub last_fps_sample_ms: f64,
    pub current_fps: u32,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl ViewerState {
    pub fn new(now_ms: f64) -> Self {
        Self {
            rotation_speed_multiplier: 1.0,
            auto_rotate_enabled: false,
            lighting_enabled: true,
            light_theme: false,
            frame_count: 0,
            last_fps_sample_ms: now_ms,
            current_fps: 0,
        }
    }

    /// Count one drawn frame. Once at least a second has passed since the
    /// last sample, compute and return the new FPS value and start a new
    /// sample window.
    pub fn record_frame(&mut self, now_ms: f64) -> Option<u32> {
        self.frame_count += 1;
        let elapsed = now_ms - self.last_fps_sample_ms;
        if elapsed < FPS_SAMPLE_INTERVAL_MS {
            return None;
        }
        self.current_fps = (self.frame_count as f64 * 1000.0 / elapsed).round() as u32;
        self.frame_count = 0;
        self.last_fps_sample_ms = now_ms;
        Some(self.current_fps)
    }
}
