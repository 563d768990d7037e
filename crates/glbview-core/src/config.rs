//! Viewer configuration
//!
//! Values come from compiled defaults, optionally overridden by an inline
//! JSON block on the hosting page and by URL query parameters. Nothing is
//! persisted.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// URL of the binary glTF model to display
    #[serde(default = "default_model_url")]
    pub model_url: String,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub light: LightConfig,
    /// DOM id of the AR toggle button
    #[serde(default = "default_ar_button_id")]
    pub ar_button_id: String,
    /// CSS selector of an existing canvas; bevy creates one when unset
    #[serde(default)]
    pub canvas: Option<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model_url: default_model_url(),
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            ar_button_id: default_ar_button_id(),
            canvas: None,
        }
    }
}

fn default_model_url() -> String {
    "http://localhost:5173/src/assets/untitled.glb".to_string()
}

fn default_ar_button_id() -> String {
    "enter-ar".to_string()
}

impl ViewerConfig {
    /// Parse a configuration from JSON; missing fields keep their defaults
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the model URL (used for the `?model=` query parameter)
    pub fn with_model_url(mut self, url: impl Into<String>) -> Self {
        self.model_url = url.into();
        self
    }

    /// Check the values the renderer cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model_url.trim().is_empty() {
            return Err(ConfigError::Invalid("model_url is empty".to_string()));
        }
        self.camera.validate()
    }
}

/// Perspective camera and orbit settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    /// Starting offset along +Z
    #[serde(default = "default_initial_depth")]
    pub initial_depth: f32,
    /// Lower bound of the depth slider
    #[serde(default)]
    pub depth_min: f32,
    /// Upper bound of the depth slider
    #[serde(default = "default_depth_max")]
    pub depth_max: f32,
    /// Orbit rotation in radians per pixel of drag
    #[serde(default = "default_rotate_speed")]
    pub rotate_speed: f32,
    /// Dolly exponent multiplier per wheel notch
    #[serde(default = "default_zoom_speed")]
    pub zoom_speed: f32,
    /// Closest the orbit dolly may bring the camera to the origin
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: default_fov(),
            near: default_near(),
            far: default_far(),
            initial_depth: default_initial_depth(),
            depth_min: 0.0,
            depth_max: default_depth_max(),
            rotate_speed: default_rotate_speed(),
            zoom_speed: default_zoom_speed(),
            min_distance: default_min_distance(),
        }
    }
}

impl CameraConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov_degrees must be in (0, 180), got {}",
                self.fov_degrees
            )));
        }
        if !(self.near > 0.0 && self.near < self.far) {
            return Err(ConfigError::Invalid(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                self.near, self.far
            )));
        }
        if self.depth_min > self.depth_max {
            return Err(ConfigError::Invalid(format!(
                "depth range is empty: [{}, {}]",
                self.depth_min, self.depth_max
            )));
        }
        Ok(())
    }
}

fn default_fov() -> f32 {
    75.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    1000.0
}

fn default_initial_depth() -> f32 {
    9.3
}

fn default_depth_max() -> f32 {
    20.0
}

fn default_rotate_speed() -> f32 {
    0.005
}

fn default_zoom_speed() -> f32 {
    1.0
}

fn default_min_distance() -> f32 {
    0.1
}

/// Ambient light settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    /// Linear RGB, 0.0-1.0
    #[serde(default = "default_light_color")]
    pub color: [f32; 3],
    #[serde(default = "default_light_intensity")]
    pub intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            color: default_light_color(),
            intensity: default_light_intensity(),
        }
    }
}

fn default_light_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_light_intensity() -> f32 {
    5.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.camera.fov_degrees, 75.0);
        assert_eq!(config.camera.near, 0.1);
        assert_eq!(config.camera.far, 1000.0);
        assert_eq!(config.camera.initial_depth, 9.3);
        assert_eq!((config.camera.depth_min, config.camera.depth_max), (0.0, 20.0));
        assert_eq!(config.light.intensity, 5.0);
        assert_eq!(config.ar_button_id, "enter-ar");
        assert!(config.model_url.ends_with("untitled.glb"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ViewerConfig::from_json(
            r#"{ "model_url": "models/robot.glb", "camera": { "initial_depth": 4.0 } }"#,
        )
        .unwrap();

        assert_eq!(config.model_url, "models/robot.glb");
        assert_eq!(config.camera.initial_depth, 4.0);
        assert_eq!(config.camera.fov_degrees, 75.0);
        assert_eq!(config.light, LightConfig::default());
    }

    #[test]
    fn test_empty_object_is_default() {
        let config = ViewerConfig::from_json("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_malformed_json() {
        let result = ViewerConfig::from_json("{ model_url: ");
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_invalid_clip_planes() {
        let result = ViewerConfig::from_json(r#"{ "camera": { "near": 10.0, "far": 1.0 } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_depth_range() {
        let result =
            ViewerConfig::from_json(r#"{ "camera": { "depth_min": 5.0, "depth_max": 1.0 } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_model_url_override() {
        let config = ViewerConfig::default().with_model_url("https://example.com/a.glb");
        assert_eq!(config.model_url, "https://example.com/a.glb");
    }
}
