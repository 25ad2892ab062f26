//! Editor session state
//!
//! Everything one editing session mutates lives in [`EditorContext`]: the
//! scene store, the selection, the active transform mode, the picking and
//! gizmo systems and the main camera. The frame controller owns exactly one.

use crate::config::EditorConfig;
use crate::ecs::components::LightFactory;
use crate::ecs::systems::{GizmoSystem, PickingSystem, TransformMode};
use crate::ecs::{
    AnimationClip, AnimationHandle, ComponentStore, Entity, SceneTree, SceneTreeCache, SelectionSet, attach_animation,
};
use crate::foundation::hash::NameHash;
use crate::foundation::math::Vec3;
use crate::render::camera::{Camera, Viewport};
use crate::render::resources::{DEFAULT_MATERIAL, Primitive, ResourceLibrary};

use super::EditorError;
use super::camera_controller::CameraController;

/// Per-session editor state
#[derive(Debug)]
pub struct EditorContext {
    /// Scene being edited
    pub store: ComponentStore,
    /// Selected entities
    pub selection: SelectionSet,
    /// Active gizmo mode
    pub transform_mode: TransformMode,
    /// Mouse picking
    pub picking: PickingSystem,
    /// Transform gizmo and physics grab
    pub gizmo: GizmoSystem,
    /// Main camera
    pub camera: Camera,
    /// Main camera navigation
    pub camera_controller: CameraController,
    /// Viewport in pixels
    pub viewport: Viewport,
    scene_tree: SceneTreeCache,
    config: EditorConfig,
}

impl EditorContext {
    /// Session with the default scene
    pub fn new(config: EditorConfig, viewport: Viewport) -> Self {
        let camera = Camera::perspective(
            Vec3::new(0.0, 0.0, 10.0),
            config.camera.fov_degrees,
            viewport.aspect(),
            config.camera.near,
            config.camera.far,
        );

        let mut store = ComponentStore::new();
        store.default_scene();

        Self {
            store,
            selection: SelectionSet::new(),
            transform_mode: TransformMode::default(),
            picking: PickingSystem::new(&config.picking),
            gizmo: GizmoSystem::new(&config.gizmo),
            camera_controller: CameraController::new(&config.camera, &camera),
            camera,
            viewport,
            scene_tree: SceneTreeCache::new(),
            config,
        }
    }

    /// Session configured from a TOML or RON file
    pub fn from_config_file(path: &str, viewport: Viewport) -> Result<Self, EditorError> {
        let config = EditorConfig::load(path)?;
        log::info!("Loaded editor config from {}", path);
        Ok(Self::new(config, viewport))
    }

    /// Configuration the session was created with
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Resize the viewport and keep the camera aspect in step
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.set_aspect_ratio(viewport.aspect());
    }

    /// Scene browser tree, rebuilt if the scene changed structurally
    pub fn scene_tree(&mut self) -> &SceneTree {
        self.scene_tree.get(&mut self.store)
    }

    /// Add an empty node and select it
    pub fn add_node(&mut self) -> Entity {
        let entity = self.store.create_node();
        self.selection.replace(&mut self.store, entity);
        entity
    }

    /// Add a point light at `position` and select it
    pub fn add_light(&mut self, position: Vec3) -> Entity {
        let name = format!("light_{}", self.store.num_nodes());
        let entity = self.store.create_light(&name, position, LightFactory::point(Vec3::new(1.0, 1.0, 1.0), 1.0));
        self.selection.replace(&mut self.store, entity);
        entity
    }

    /// Add a primitive with the default material and select it
    pub fn add_primitive(
        &mut self,
        resources: &dyn ResourceLibrary,
        primitive: Primitive,
    ) -> Result<Entity, EditorError> {
        let geometry = resources
            .geometry(NameHash::new(primitive.name()))
            .ok_or_else(|| EditorError::MissingResource(primitive.name().to_string()))?;
        let material = resources
            .material(NameHash::new(DEFAULT_MATERIAL))
            .ok_or_else(|| EditorError::MissingResource(DEFAULT_MATERIAL.to_string()))?;

        let entity = self.store.create_node();
        self.store.set_name(entity, primitive.name());
        self.store.instantiate_geometry(entity, geometry);
        self.store.instantiate_material(entity, material);
        self.selection.replace(&mut self.store, entity);

        log::info!("Added {} as {}", primitive.name(), entity);
        Ok(entity)
    }

    /// Bind an animation clip to the rig under `root`
    pub fn import_animation(
        &mut self,
        root: Entity,
        handle: AnimationHandle,
        clip: &AnimationClip,
    ) -> Result<(), EditorError> {
        attach_animation(&mut self.store, root, handle, clip)?;
        Ok(())
    }
}
