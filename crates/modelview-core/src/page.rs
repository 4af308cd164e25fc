use serde::{Deserialize, Serialize};

use crate::scene::Theme;

/// Static message shown in the loading indicator when the asset fails.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading 3D model";

/// Loading overlay: a visibility flag and its visible content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadingIndicator {
    pub visible: bool,
    pub content: String,
}

/// Text and visibility values of the page elements the viewer writes to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageView {
    pub loading: LoadingIndicator,
    pub progress_text: String,
    pub model_info: String,
    pub fps_text: String,
    pub speed_label: String,
    pub theme_icon: String,
    pub auto_rotate_label: String,
}

impl PageView {
    pub fn new(theme: Theme, rotation_speed: f32) -> Self {
        Self {
            loading: LoadingIndicator {
                visible: true,
                content: "Loading 3D model...".to_string(),
            },
            progress_text: format_progress(0),
            model_info: String::new(),
            fps_text: format_fps(0),
            speed_label: format_speed(rotation_speed),
            theme_icon: theme.icon().to_string(),
            auto_rotate_label: format_auto_rotate(false),
        }
    }
}

pub fn format_progress(percent: u32) -> String {
    format!("{}%", percent)
}

pub fn format_fps(fps: u32) -> String {
    format!("FPS: {}", fps)
}

pub fn format_speed(multiplier: f32) -> String {
    format!("{:.1}x", multiplier)
}

pub fn format_model_info(objects: usize, vertices: usize) -> String {
    format!("Objects: {} | Vertices: {}", objects, vertices)
}

pub fn format_auto_rotate(enabled: bool) -> String {
    if enabled {
        "Auto-Rotate: On".to_string()
    } else {
        "Auto-Rotate: Off".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_page() {
        let page = PageView::new(Theme::Dark, 1.0);
        assert!(page.loading.visible);
        assert_eq!(page.progress_text, "0%");
        assert_eq!(page.speed_label, "1.0x");
        assert_eq!(page.theme_icon, Theme::Dark.icon());
    }

    #[test]
    fn test_formats() {
        assert_eq!(format_fps(59), "FPS: 59");
        assert_eq!(format_speed(1.5), "1.5x");
        assert_eq!(format_model_info(3, 120), "Objects: 3 | Vertices: 120");
    }
}
