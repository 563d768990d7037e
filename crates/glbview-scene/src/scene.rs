//! Scene setup - viewport tracking, clear colour, and ambient light

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use glbview_core::LightConfig;

/// Ambient brightness per unit of configured light intensity
const AMBIENT_BRIGHTNESS_PER_UNIT: f32 = 100.0;

/// Size of the rendering surface in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Resource)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Width over height; `None` while the surface has no height
    pub fn aspect_ratio(&self) -> Option<f32> {
        (self.height > 0.0).then(|| self.width / self.height)
    }
}

/// Plugin for scene setup
pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Viewport>()
            // Transparent so the page (or the AR passthrough) shows behind the model
            .insert_resource(ClearColor(Color::NONE))
            .add_systems(Startup, init_viewport);
    }
}

/// Record the primary window size before the camera is spawned
pub fn init_viewport(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut viewport: ResMut<Viewport>,
) {
    if let Ok(window) = windows.single() {
        viewport.resize(window.width(), window.height());
    }
}

/// Uniform ambient light so unlit-looking glTF materials are still visible
pub fn ambient_light(config: &LightConfig) -> AmbientLight {
    let [r, g, b] = config.color;
    AmbientLight {
        color: Color::linear_rgb(r, g, b),
        brightness: config.intensity * AMBIENT_BRIGHTNESS_PER_UNIT,
        ..default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio() {
        let mut viewport = Viewport::default();
        viewport.resize(1920.0, 1080.0);
        assert_eq!(viewport.aspect_ratio(), Some(1920.0 / 1080.0));
    }

    #[test]
    fn test_zero_height_has_no_aspect() {
        let mut viewport = Viewport::default();
        viewport.resize(800.0, 0.0);
        assert_eq!(viewport.aspect_ratio(), None);
        assert_eq!(viewport.width, 800.0);
    }

    #[test]
    fn test_ambient_light_from_config() {
        let light = ambient_light(&LightConfig::default());
        assert_eq!(light.brightness, 500.0);
        assert_eq!(light.color, Color::linear_rgb(1.0, 1.0, 1.0));
    }
}
