//! Render configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! stock party scene at 1280x720.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub yaw_deg: f32,
    pub pitch_deg: f32,
    pub fovy_deg: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        // looking down at the table from the front
        Self {
            position: [0.0, 11.0, 17.0],
            yaw_deg: -90.0,
            pitch_deg: -25.0,
            fovy_deg: 45.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Root that scene texture paths are resolved against.
    pub asset_dir: PathBuf,
    /// Where the binary writes the rendered frame.
    pub output: PathBuf,
    pub clear_colour: [f64; 4],
    pub log_filter: Option<String>,
    pub camera: CameraConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            asset_dir: PathBuf::from("assets"),
            output: PathBuf::from("party_scene.png"),
            clear_colour: [0.0, 0.0, 0.0, 1.0],
            log_filter: None,
            camera: CameraConfig::default(),
        }
    }
}

impl RenderConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn clear_colour(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_colour;
        wgpu::Color { r, g, b, a }
    }
}
