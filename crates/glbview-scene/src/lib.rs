//! glbview Scene - Bevy plugins for the model viewer
//!
//! This crate wires the viewer's scene on top of bevy:
//! - Camera rig with resize handling, orbit controls, and per-frame aim at the origin
//! - Ambient lighting and a transparent clear colour
//! - One-shot glTF model loading
//! - egui debug panel and frame-rate overlay
//! - Render-side view of the AR session shared with the page toggle

pub mod ar;
pub mod camera;
pub mod models;
pub mod scene;
pub mod ui;

use bevy::prelude::*;
use glbview_core::ViewerConfig;

/// Viewer configuration as a bevy resource
#[derive(Debug, Clone, Resource, Default)]
pub struct ViewerSettings(pub ViewerConfig);

/// Plugin that sets up the whole viewer scene
pub struct ViewerScenePlugin {
    pub config: ViewerConfig,
}

impl Plugin for ViewerScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ViewerSettings(self.config.clone()))
            .insert_resource(CameraRig::from_config(&self.config.camera))
            .add_plugins(scene::SceneSetupPlugin)
            .add_plugins(camera::CameraPlugin)
            .add_plugins(models::ModelsPlugin)
            .add_plugins(ar::ArSessionPlugin)
            .add_plugins(ui::UiPlugin);
    }
}

// Re-export commonly used types
pub use ar::{ArSession, ArStatus};
pub use camera::{CameraRig, ViewerCamera};
pub use models::{LoadedModel, LoadedModels, ModelLoad};
pub use scene::Viewport;
