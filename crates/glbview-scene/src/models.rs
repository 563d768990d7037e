//! One-shot glTF model loading

use bevy::asset::LoadState;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use glbview_core::AssetLoadError;

use crate::ViewerSettings;

/// Marker for model roots added to the scene by the loader
#[derive(Component, Debug)]
pub struct LoadedModel {
    pub url: String,
}

/// Models successfully added to the scene, in load order
#[derive(Resource, Default, Debug)]
pub struct LoadedModels {
    pub entities: Vec<Entity>,
}

impl LoadedModels {
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Progress of the single model load
#[derive(Resource, Default, Debug)]
pub enum ModelLoad {
    #[default]
    Idle,
    Loading {
        url: String,
        handle: Handle<Gltf>,
    },
    /// Decoded, waiting to be attached to the scene
    Ready {
        url: String,
        scene: Handle<Scene>,
    },
    Attached {
        url: String,
        entity: Entity,
    },
    Failed(AssetLoadError),
}

/// What the asset server reports for a pending load
#[derive(Debug)]
pub enum LoadProgress {
    Pending,
    /// Decoded; carries the scene to display, if the file has one
    Loaded(Option<Handle<Scene>>),
    Failed(String),
}

impl ModelLoad {
    pub fn url(&self) -> Option<&str> {
        match self {
            ModelLoad::Idle => None,
            ModelLoad::Loading { url, .. }
            | ModelLoad::Ready { url, .. }
            | ModelLoad::Attached { url, .. } => Some(url.as_str()),
            ModelLoad::Failed(AssetLoadError::Fetch { url, .. })
            | ModelLoad::Failed(AssetLoadError::NoScene { url }) => Some(url.as_str()),
        }
    }

    /// Apply asset server progress. Only a `Loading` state moves; failures
    /// are logged here and never retried.
    pub fn advance(&mut self, progress: LoadProgress) {
        let url = match self {
            ModelLoad::Loading { url, .. } => url.clone(),
            _ => return,
        };

        match progress {
            LoadProgress::Pending => {}
            LoadProgress::Loaded(Some(scene)) => {
                *self = ModelLoad::Ready { url, scene };
            }
            LoadProgress::Loaded(None) => {
                let err = AssetLoadError::NoScene { url };
                tracing::error!("{}", err);
                *self = ModelLoad::Failed(err);
            }
            LoadProgress::Failed(reason) => {
                let err = AssetLoadError::Fetch { url, reason };
                tracing::error!("An error occurred while loading the model: {}", err);
                *self = ModelLoad::Failed(err);
            }
        }
    }
}

/// Plugin for model loading
pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ModelLoad>()
            .init_resource::<LoadedModels>()
            .add_systems(Startup, start_model_load)
            .add_systems(Update, (poll_model_load, attach_model).chain());
    }
}

fn start_model_load(
    mut load: ResMut<ModelLoad>,
    settings: Res<ViewerSettings>,
    asset_server: Res<AssetServer>,
) {
    if !matches!(*load, ModelLoad::Idle) {
        return;
    }

    let url = settings.0.model_url.clone();
    tracing::info!("Starting to load model: {}", url);
    let handle: Handle<Gltf> = asset_server.load(url.clone());
    *load = ModelLoad::Loading { url, handle };
}

/// Check loading state and pick the scene to display
fn poll_model_load(
    mut load: ResMut<ModelLoad>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
) {
    let ModelLoad::Loading { handle, .. } = &*load else {
        return;
    };

    let progress = match asset_server.get_load_state(handle.id()) {
        Some(LoadState::Loaded) => LoadProgress::Loaded(gltf_assets.get(handle).and_then(|gltf| {
            // Use first scene if no default
            gltf.default_scene
                .clone()
                .or_else(|| gltf.scenes.first().cloned())
        })),
        Some(LoadState::Failed(err)) => LoadProgress::Failed(err.to_string()),
        _ => LoadProgress::Pending,
    };

    if !matches!(progress, LoadProgress::Pending) {
        load.advance(progress);
    }
}

/// Add the decoded model at the origin with unit scale
fn attach_model(
    mut commands: Commands,
    mut load: ResMut<ModelLoad>,
    mut loaded: ResMut<LoadedModels>,
) {
    let ModelLoad::Ready { url, scene } = &*load else {
        return;
    };
    let url = url.clone();

    let entity = commands
        .spawn((
            SceneRoot(scene.clone()),
            Transform::from_translation(Vec3::ZERO).with_scale(Vec3::ONE),
            LoadedModel { url: url.clone() },
        ))
        .id();
    loaded.entities.push(entity);

    tracing::info!("Model loaded: {}", url);
    *load = ModelLoad::Attached { url, entity };
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use bevy::gltf::GltfPlugin;
    use bevy::scene::ScenePlugin;
    use glbview_core::ViewerConfig;
    use std::time::Duration;

    const URL: &str = "http://localhost:5173/src/assets/untitled.glb";

    fn loading_app() -> App {
        let mut app = App::new();
        app.init_resource::<LoadedModels>()
            .insert_resource(ModelLoad::Loading {
                url: URL.to_string(),
                handle: Handle::default(),
            })
            .add_systems(Update, attach_model);
        app
    }

    fn model_count(app: &mut App) -> usize {
        let world = app.world_mut();
        world.query::<&LoadedModel>().iter(world).count()
    }

    #[test]
    fn test_success_adds_one_node_at_origin() {
        let mut app = loading_app();
        app.world_mut()
            .resource_mut::<ModelLoad>()
            .advance(LoadProgress::Loaded(Some(Handle::default())));
        app.update();

        assert_eq!(model_count(&mut app), 1);
        let loaded = app.world().resource::<LoadedModels>();
        assert_eq!(loaded.len(), 1);

        let entity = loaded.entities[0];
        let transform = app.world().get::<Transform>(entity).unwrap();
        assert_eq!(transform.translation, Vec3::ZERO);
        assert_eq!(transform.scale, Vec3::ONE);
        assert_eq!(app.world().get::<LoadedModel>(entity).unwrap().url, URL);
        assert!(matches!(
            app.world().resource::<ModelLoad>(),
            ModelLoad::Attached { entity: e, .. } if *e == entity
        ));
    }

    #[test]
    fn test_model_attached_only_once() {
        let mut app = loading_app();
        app.world_mut()
            .resource_mut::<ModelLoad>()
            .advance(LoadProgress::Loaded(Some(Handle::default())));
        app.update();
        app.update();
        app.update();

        assert_eq!(model_count(&mut app), 1);
        assert_eq!(app.world().resource::<LoadedModels>().len(), 1);
    }

    #[test]
    fn test_fetch_failure_leaves_scene_unchanged() {
        let mut app = loading_app();
        app.update();
        let entities_before = app.world().entities().len();

        app.world_mut()
            .resource_mut::<ModelLoad>()
            .advance(LoadProgress::Failed("connection refused".to_string()));
        app.update();

        assert_eq!(app.world().entities().len(), entities_before);
        assert_eq!(model_count(&mut app), 0);
        assert!(app.world().resource::<LoadedModels>().is_empty());
        match app.world().resource::<ModelLoad>() {
            ModelLoad::Failed(AssetLoadError::Fetch { url, reason }) => {
                assert_eq!(url, URL);
                assert_eq!(reason, "connection refused");
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_gltf_without_scene_fails() {
        let mut load = ModelLoad::Loading {
            url: URL.to_string(),
            handle: Handle::default(),
        };
        load.advance(LoadProgress::Loaded(None));
        assert!(matches!(load, ModelLoad::Failed(AssetLoadError::NoScene { .. })));
        assert_eq!(load.url(), Some(URL));
    }

    #[test]
    fn test_pending_and_terminal_states_do_not_move() {
        let mut load = ModelLoad::Loading {
            url: URL.to_string(),
            handle: Handle::default(),
        };
        load.advance(LoadProgress::Pending);
        assert!(matches!(load, ModelLoad::Loading { .. }));

        load.advance(LoadProgress::Failed("404".to_string()));
        // No retry: a later success report is ignored
        load.advance(LoadProgress::Loaded(Some(Handle::default())));
        assert!(matches!(load, ModelLoad::Failed(_)));

        let mut idle = ModelLoad::Idle;
        idle.advance(LoadProgress::Loaded(Some(Handle::default())));
        assert!(matches!(idle, ModelLoad::Idle));
        assert_eq!(idle.url(), None);
    }

    fn asset_app(model_url: &str) -> App {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            AssetPlugin::default(),
            ScenePlugin,
            GltfPlugin::default(),
        ))
        .insert_resource(ViewerSettings(
            ViewerConfig::default().with_model_url(model_url),
        ))
        .add_plugins(ModelsPlugin);
        app.finish();
        app.cleanup();
        app
    }

    fn update_until_settled(app: &mut App) {
        for _ in 0..500 {
            app.update();
            if matches!(
                app.world().resource::<ModelLoad>(),
                ModelLoad::Failed(_) | ModelLoad::Attached { .. }
            ) {
                return;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn test_startup_issues_single_load() {
        let mut app = asset_app("missing/untitled.glb");
        app.world_mut().run_system_once(start_model_load).unwrap();

        let first = match app.world().resource::<ModelLoad>() {
            ModelLoad::Loading { url, handle } => {
                assert_eq!(url, "missing/untitled.glb");
                handle.id()
            }
            other => panic!("unexpected state {:?}", other),
        };

        // The Startup pass finds a load already in flight and leaves it alone
        app.update();
        match app.world().resource::<ModelLoad>() {
            ModelLoad::Loading { handle, .. } => assert_eq!(handle.id(), first),
            ModelLoad::Failed(AssetLoadError::Fetch { url, .. }) => {
                assert_eq!(url, "missing/untitled.glb");
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_missing_model_fails_without_adding_node() {
        let mut app = asset_app("missing/untitled.glb");
        update_until_settled(&mut app);

        match app.world().resource::<ModelLoad>() {
            ModelLoad::Failed(AssetLoadError::Fetch { url, .. }) => {
                assert_eq!(url, "missing/untitled.glb");
            }
            other => panic!("unexpected state {:?}", other),
        }

        // Failed loads are not retried
        app.world_mut().run_system_once(start_model_load).unwrap();
        for _ in 0..5 {
            app.update();
        }
        assert!(matches!(
            app.world().resource::<ModelLoad>(),
            ModelLoad::Failed(_)
        ));
        assert_eq!(model_count(&mut app), 0);
        assert!(app.world().resource::<LoadedModels>().is_empty());
    }
}
