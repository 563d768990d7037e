//! Bevy application setup

use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::winit::WinitSettings;
use bevy_egui::EguiPlugin;
use bevy_picking::DefaultPickingPlugins;
use glbview_core::ViewerConfig;
use glbview_scene::{ArSession, ViewerScenePlugin};

use crate::xr::SharedSlot;

/// Run the Bevy application
pub fn run(config: ViewerConfig, session: SharedSlot) {
    App::new()
        // Continuous rendering: the frame loop is driven by the browser's animation frames
        .insert_resource(WinitSettings::default())
        .add_plugins(window_plugins(&config))
        // Must be added BEFORE EguiPlugin so it can detect PickingPlugin
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(EguiPlugin::default())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(ViewerScenePlugin { config })
        // Same slot the AR button writes to
        .insert_non_send_resource(ArSession::new(session))
        .run();
}

fn window_plugins(config: &ViewerConfig) -> impl PluginGroup {
    DefaultPlugins
        .set(WindowPlugin {
            primary_window: Some(Window {
                title: "glbview".to_string(),
                // Without a selector bevy appends its own canvas to <body>
                canvas: config.canvas.clone(),
                fit_canvas_to_parent: true,
                transparent: true,
                prevent_default_event_handling: false,
                ..default()
            }),
            ..default()
        })
        .set(AssetPlugin {
            file_path: "".to_string(),
            // Don't look for .meta files - dev servers don't have them
            meta_check: bevy::asset::AssetMetaCheck::Never,
            ..default()
        })
        .disable::<LogPlugin>()
}
