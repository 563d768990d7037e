//! Camera rig, viewport resize, orbit controls, and per-frame aim

use std::f32::consts::PI;

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::WindowResized;
use bevy_egui::EguiContexts;
use glbview_core::CameraConfig;

use crate::scene::{ambient_light, init_viewport, Viewport};
use crate::ViewerSettings;

/// Keeps the orbit away from the poles where `look_at` with +Y up degenerates
const POLE_EPSILON: f32 = 1e-3;

/// Pixel-mode wheel deltas per notch (browsers report pixels)
const PIXELS_PER_NOTCH: f32 = 100.0;

/// Camera position and control limits.
///
/// The debug panel and the orbit controls both write `position`; the render
/// loop copies it into the camera transform every frame.
#[derive(Debug, Clone, Resource)]
pub struct CameraRig {
    pub position: Vec3,
    /// Slider bounds for the depth (Z) coordinate
    pub depth_range: (f32, f32),
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl CameraRig {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, config.initial_depth),
            depth_range: (config.depth_min, config.depth_max),
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            min_distance: config.min_distance,
        }
    }

    pub fn depth(&self) -> f32 {
        self.position.z
    }

    /// Set the depth coordinate, clamped to the slider range
    pub fn set_depth(&mut self, depth: f32) {
        let (min, max) = self.depth_range;
        self.position.z = depth.clamp(min, max);
    }

    /// Rotate about the origin on a Y-up sphere; `delta` is drag distance in pixels
    pub fn orbit(&mut self, delta: Vec2) {
        let radius = self.position.length();
        if radius <= f32::EPSILON {
            return;
        }

        let theta = self.position.x.atan2(self.position.z) - delta.x * self.rotate_speed;
        let phi = (self.position.y / radius).clamp(-1.0, 1.0).acos() - delta.y * self.rotate_speed;
        let phi = phi.clamp(POLE_EPSILON, PI - POLE_EPSILON);

        self.position = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
    }

    /// Move toward (positive notches) or away from the origin
    pub fn dolly(&mut self, notches: f32) {
        let radius = self.position.length();
        let direction = if radius > f32::EPSILON {
            self.position / radius
        } else {
            Vec3::Z
        };
        let scale = 0.95_f32.powf(self.zoom_speed * notches);
        self.position = direction * (radius * scale).max(self.min_distance);
    }
}

/// Marker component for the viewer camera
#[derive(Component)]
pub struct ViewerCamera;

/// Plugin for the camera rig
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraRig>()
            .add_systems(Startup, spawn_camera.after(init_viewport))
            .add_systems(
                Update,
                (apply_viewport_resize, (orbit_camera, aim_camera).chain()),
            );
    }
}

fn spawn_camera(
    mut commands: Commands,
    settings: Res<ViewerSettings>,
    rig: Res<CameraRig>,
    viewport: Res<Viewport>,
) {
    let config = &settings.0;

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: config.camera.fov_degrees.to_radians(),
            aspect_ratio: viewport.aspect_ratio().unwrap_or(1.0),
            near: config.camera.near,
            far: config.camera.far,
            ..default()
        }),
        Msaa::Sample4,
        // Ambient applies per camera
        ambient_light(&config.light),
        Transform::from_translation(rig.position).looking_at(Vec3::ZERO, Vec3::Y),
        ViewerCamera,
    ));
}

/// Track every resize (no debouncing) and keep the projection's aspect in step
pub fn apply_viewport_resize(
    mut resized: MessageReader<WindowResized>,
    mut viewport: ResMut<Viewport>,
    mut cameras: Query<&mut Projection, With<ViewerCamera>>,
) {
    for event in resized.read() {
        viewport.resize(event.width, event.height);

        let Some(aspect) = viewport.aspect_ratio() else {
            continue;
        };
        for mut projection in &mut cameras {
            if let Projection::Perspective(perspective) = projection.as_mut() {
                perspective.aspect_ratio = aspect;
            }
        }
    }
}

fn orbit_camera(
    mut rig: ResMut<CameraRig>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    mut contexts: EguiContexts,
) {
    // Don't steal drags and scrolls from the debug panel
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);

    let mut drag = Vec2::ZERO;
    for motion in mouse_motion.read() {
        drag += motion.delta;
    }

    let mut notches = 0.0;
    for scroll in mouse_wheel.read() {
        notches += match scroll.unit {
            MouseScrollUnit::Line => scroll.y,
            MouseScrollUnit::Pixel => scroll.y / PIXELS_PER_NOTCH,
        };
    }

    if egui_wants_pointer {
        return;
    }

    if !mouse_button.pressed(MouseButton::Left) {
        drag = Vec2::ZERO;
    }

    // Single finger orbits like a left drag
    if touches.iter().count() == 1 {
        for touch in touches.iter() {
            drag += touch.delta();
        }
    }

    if drag != Vec2::ZERO {
        rig.orbit(drag);
    }
    if notches != 0.0 {
        rig.dolly(notches);
    }
}

/// Runs every frame whether or not the rig moved
pub fn aim_camera(rig: Res<CameraRig>, mut cameras: Query<&mut Transform, With<ViewerCamera>>) {
    for mut transform in &mut cameras {
        transform.translation = rig.position;
        transform.look_at(Vec3::ZERO, Vec3::Y);
    }
}
