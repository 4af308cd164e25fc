use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use modelview_core::context::ViewerOptions;
use modelview_nav::Section;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Viewer settings, read from a JSON file. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Asset to load at startup.
    pub asset: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    /// Frame rate the host timer aims for.
    pub target_fps: u32,
    pub rotation_speed: f32,
    pub light_theme: bool,
    pub damping_factor: f32,
    /// Page sections for the navigation menu, top to bottom.
    pub sections: Vec<Section>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            asset: Some(PathBuf::from("assets/model.glb")),
            width: 1280,
            height: 720,
            target_fps: 60,
            rotation_speed: 1.0,
            light_theme: false,
            damping_factor: 0.05,
            sections: vec![
                Section::new("home", 0.0),
                Section::new("viewer", 800.0),
                Section::new("features", 1600.0),
                Section::new("about", 2400.0),
            ],
        }
    }
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn viewer_options(&self) -> ViewerOptions {
        ViewerOptions {
            width: self.width,
            height: self.height,
            rotation_speed: self.rotation_speed,
            light_theme: self.light_theme,
            damping_factor: self.damping_factor,
        }
    }
}
