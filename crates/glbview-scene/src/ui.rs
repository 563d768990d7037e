//! Debug panel and frame-rate overlay using bevy_egui

use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};

use crate::ar::ArStatus;
use crate::camera::CameraRig;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FpsStats>()
            .add_systems(Update, record_fps)
            // Runs in EguiPrimaryContextPass for proper input handling (bevy_egui 0.38+)
            .add_systems(EguiPrimaryContextPass, ui_system);
    }
}

/// Frame rate shown in the overlay, with the extremes seen so far
#[derive(Debug, Clone, Default, Resource)]
pub struct FpsStats {
    pub current: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FpsStats {
    pub fn record(&mut self, fps: f64) {
        if !fps.is_finite() {
            return;
        }
        self.current = Some(fps);
        self.min = Some(self.min.map_or(fps, |m| m.min(fps)));
        self.max = Some(self.max.map_or(fps, |m| m.max(fps)));
    }

    pub fn label(&self) -> String {
        match (self.current, self.min, self.max) {
            (Some(fps), Some(min), Some(max)) => {
                format!("{:.0} FPS ({:.0}-{:.0})", fps, min, max)
            }
            _ => "-- FPS".to_string(),
        }
    }
}

fn record_fps(diagnostics: Option<Res<DiagnosticsStore>>, mut stats: ResMut<FpsStats>) {
    let Some(diagnostics) = diagnostics else { return };
    if let Some(fps) = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|d| d.smoothed())
    {
        stats.record(fps);
    }
}

fn ui_system(
    mut contexts: EguiContexts,
    mut rig: ResMut<CameraRig>,
    stats: Res<FpsStats>,
    ar: Option<Res<ArStatus>>,
) {
    // Nothing to click on while the user is in the AR session
    if ar.is_some_and(|ar| ar.is_active()) {
        return;
    }

    // Get the egui context - early return if not available
    let Ok(ctx) = contexts.ctx_mut() else { return };

    draw_fps_overlay(ctx, &stats);
    draw_debug_panel(ctx, &mut rig);
}

/// Frame-rate readout in the top-left corner
pub fn draw_fps_overlay(ctx: &egui::Context, stats: &FpsStats) {
    egui::Area::new(egui::Id::new("fps_overlay"))
        .anchor(egui::Align2::LEFT_TOP, [8.0, 8.0])
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(
                    egui::RichText::new(stats.label())
                        .monospace()
                        .color(egui::Color32::from_rgb(0, 255, 255)),
                );
            });
        });
}

/// Floating controls: an empty "Model" group and the camera depth slider
///
/// Returns the slider's response when the panel is open.
pub fn draw_debug_panel(ctx: &egui::Context, rig: &mut CameraRig) -> Option<egui::Response> {
    egui::Window::new("Controls")
        .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
        .resizable(false)
        .show(ctx, |ui| {
            // Per-model controls go here
            egui::CollapsingHeader::new("Model")
                .default_open(true)
                .show(ui, |_ui| {});

            egui::CollapsingHeader::new("Camera")
                .default_open(true)
                .show(ui, |ui| depth_slider(ui, rig))
                .body_returned
        })
        .and_then(|window| window.inner.flatten())
}

fn depth_slider(ui: &mut egui::Ui, rig: &mut CameraRig) -> egui::Response {
    let (min, max) = rig.depth_range;
    let mut depth = rig.depth();
    let response = ui.add(egui::Slider::new(&mut depth, min..=max).text("z"));
    if response.changed() {
        rig.set_depth(depth);
    }
    response
}
