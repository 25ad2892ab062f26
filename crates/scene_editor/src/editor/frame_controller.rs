//! Editor frame controller
//!
//! Runs one editor frame in a fixed order:
//!
//! 1. camera navigation
//! 2. resolve a completed pick read-back
//! 3. picking update, unless suppressed
//! 4. gizmo update
//! 5. keyboard commands
//! 6. scene-tree invalidation after structural edits, then world transforms
//!
//! Picking is suppressed while a camera modifier is held, while the gizmo
//! was active last frame and in physics-grab mode. It only comes back once
//! the left button has been released, so a drag that started on the gizmo
//! never turns into a box selection.

use std::collections::HashSet;

use crate::ecs::flags::{EntityFlags, SceneFlags};
use crate::ecs::systems::{TransformMode, selection_bounds};
use crate::ecs::{ParentOutcome, clone_selection_hierarchical, delete_selection, instance_selection, parent_selection};
use crate::foundation::math::Vec3;
use crate::input::{InputState, KeyCode, UiCapture};
use crate::physics::{PhysicsCommand, PhysicsWorld};
use crate::render::device::RenderDevice;

use super::context::EditorContext;

/// Suffix appended to the names of duplicated nodes
pub const DUPLICATE_SUFFIX: &str = "_cloned";

const MODE_SHORTCUTS: [(KeyCode, TransformMode); 5] = [
    (KeyCode::Q, TransformMode::Select),
    (KeyCode::W, TransformMode::Translate),
    (KeyCode::E, TransformMode::Rotate),
    (KeyCode::R, TransformMode::Scale),
    (KeyCode::T, TransformMode::Physics),
];

/// Editor actions reachable from shortcuts or toolbar buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorCommand {
    /// Switch the gizmo mode
    SetMode(TransformMode),
    /// Parent the selection to its primary entity
    Parent,
    /// Make the primary entity a master instance of the selection
    Instance,
    /// Duplicate the selected subtrees
    Duplicate,
    /// Delete the selected subtrees
    Delete,
    /// Move the camera to the selection
    Focus,
    /// Toggle scene update
    TogglePause,
    /// Put rigid bodies back at their start transforms
    ResetPhysics,
}

impl EditorCommand {
    /// Whether the command can change the hierarchy
    pub fn is_structural(self) -> bool {
        matches!(self, Self::Parent | Self::Instance | Self::Duplicate | Self::Delete)
    }
}

/// What happened during one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Frame number, starting at 1
    pub frame: u64,
    /// Commands that ran this frame, in order
    pub commands: Vec<EditorCommand>,
    /// Whether picking was skipped this frame
    pub picking_suppressed: bool,
    /// Whether a pick result was applied this frame
    pub picked: bool,
}

/// Per-frame driver owning the editor context
#[derive(Debug)]
pub struct EditorFrameController {
    context: EditorContext,
    prev_keys: HashSet<KeyCode>,
    picking_disabled: bool,
    duplicate_armed: bool,
    frame: u64,
}

impl EditorFrameController {
    /// Take ownership of an editor session
    pub fn new(context: EditorContext) -> Self {
        Self {
            context,
            prev_keys: HashSet::new(),
            picking_disabled: false,
            duplicate_armed: false,
            frame: 0,
        }
    }

    /// The session state
    pub fn context(&self) -> &EditorContext {
        &self.context
    }

    /// Mutable session state, for UI panels between frames
    pub fn context_mut(&mut self) -> &mut EditorContext {
        &mut self.context
    }

    /// Run one frame
    ///
    /// # Arguments
    /// * `input` - Input snapshot for this frame
    /// * `device` - Renderer used for picking read-backs and instance buffers
    /// * `physics` - Physics world for grabbing, deletion and resets
    pub fn update(
        &mut self,
        input: &InputState,
        device: &mut dyn RenderDevice,
        physics: &mut dyn PhysicsWorld,
    ) -> FrameReport {
        self.frame += 1;

        let ctx = &mut self.context;
        let mouse_free = !input.ui_capture.contains(UiCapture::MOUSE);
        ctx.camera_controller.update(&mut ctx.camera, input, mouse_free);

        let picked = ctx.picking.resolve(&mut ctx.store, &mut ctx.selection);

        if input.camera_modifier()
            || ctx.gizmo.widget_active()
            || ctx.transform_mode == TransformMode::Physics
        {
            self.picking_disabled = true;
        } else if !input.left_down() {
            self.picking_disabled = false;
        }

        if self.picking_disabled {
            ctx.picking.suppress(input);
        } else {
            ctx.picking.update(&mut ctx.store, &mut ctx.selection, &ctx.camera, &ctx.viewport, input, device);
        }

        ctx.gizmo.update(
            &mut ctx.store,
            &ctx.selection,
            &ctx.camera,
            &ctx.viewport,
            input,
            ctx.transform_mode,
            physics,
        );

        let requested = self.collect_commands(input);
        let mut commands = Vec::with_capacity(requested.len());
        for command in requested {
            if self.execute(command, device, physics) {
                commands.push(command);
            }
        }

        let store = &mut self.context.store;
        if commands.iter().any(|c| c.is_structural()) {
            store.scene_flags |= SceneFlags::INVALIDATE_SCENE_TREE;
        }
        store.update_world_transforms();

        self.prev_keys.clone_from(&input.keys);

        FrameReport {
            frame: self.frame,
            commands,
            picking_suppressed: self.picking_disabled,
            picked,
        }
    }

    fn collect_commands(&mut self, input: &InputState) -> Vec<EditorCommand> {
        let shortcuts = !input.ui_capture.contains(UiCapture::KEYBOARD)
            && !self.context.camera_controller.is_flying(input);
        let prev_keys = &self.prev_keys;
        let pressed = |key: KeyCode| shortcuts && input.is_key_down(key) && !prev_keys.contains(&key);

        let mut commands = Vec::new();

        // Control combinations are not mode switches
        if !input.ctrl() {
            commands.extend(
                MODE_SHORTCUTS
                    .iter()
                    .filter(|(key, _)| pressed(*key))
                    .map(|&(_, mode)| EditorCommand::SetMode(mode)),
            );
        }

        if pressed(KeyCode::P) {
            commands.push(EditorCommand::Parent);
        }
        if pressed(KeyCode::I) {
            commands.push(EditorCommand::Instance);
        }

        // Duplicate fires once Ctrl+D is let go
        if shortcuts && input.ctrl() && input.is_key_down(KeyCode::D) {
            self.duplicate_armed = true;
        } else if self.duplicate_armed {
            self.duplicate_armed = false;
            commands.push(EditorCommand::Duplicate);
        }

        if pressed(KeyCode::Delete) || pressed(KeyCode::Backspace) {
            commands.push(EditorCommand::Delete);
        }
        if pressed(KeyCode::F) {
            commands.push(EditorCommand::Focus);
        }
        if pressed(KeyCode::Space) {
            commands.push(EditorCommand::TogglePause);
        }
        if pressed(KeyCode::O) {
            commands.push(EditorCommand::ResetPhysics);
        }

        commands
    }

    /// Run a command immediately.
    ///
    /// Returns `false` if the command had nothing to act on.
    pub fn execute(
        &mut self,
        command: EditorCommand,
        device: &mut dyn RenderDevice,
        physics: &mut dyn PhysicsWorld,
    ) -> bool {
        let ctx = &mut self.context;
        match command {
            EditorCommand::SetMode(mode) => {
                log::debug!("Transform mode {:?} -> {:?}", ctx.transform_mode, mode);
                ctx.transform_mode = mode;
                true
            }
            EditorCommand::Parent => parent_selection(&mut ctx.store, &mut ctx.selection) != ParentOutcome::Skipped,
            EditorCommand::Instance => instance_selection(&mut ctx.store, &ctx.selection, device),
            EditorCommand::Duplicate => {
                !clone_selection_hierarchical(&mut ctx.store, &mut ctx.selection, DUPLICATE_SUFFIX).is_empty()
            }
            EditorCommand::Delete => {
                !ctx.selection.is_empty() && delete_selection(&mut ctx.store, &mut ctx.selection, physics) > 0
            }
            EditorCommand::Focus => match selection_bounds(&ctx.store, &ctx.selection) {
                Some(bounds) => {
                    ctx.camera_controller.focus_on(&mut ctx.camera, bounds.pivot, bounds.extents);
                    true
                }
                None => false,
            },
            EditorCommand::TogglePause => {
                ctx.store.scene_flags.toggle(SceneFlags::PAUSE_UPDATE);
                log::info!(
                    "Scene update {}",
                    if ctx.store.scene_flags.contains(SceneFlags::PAUSE_UPDATE) { "paused" } else { "resumed" }
                );
                true
            }
            EditorCommand::ResetPhysics => {
                let mut reset = 0;
                for entity in ctx.store.iter_live() {
                    let index = entity.index();
                    if !ctx.store.entities[index].contains(EntityFlags::PHYSICS) {
                        continue;
                    }
                    let Some(handle) = ctx.store.physics_handles[index] else {
                        continue;
                    };

                    let data = &ctx.store.physics_data[index];
                    physics.set_transform(handle, data.start_position, data.start_rotation);
                    physics.set_v3(handle, Vec3::zeros(), PhysicsCommand::SetLinearVelocity);
                    physics.set_v3(handle, Vec3::zeros(), PhysicsCommand::SetAngularVelocity);
                    reset += 1;
                }
                log::debug!("Reset {} rigid bodies", reset);
                reset > 0
            }
        }
    }
}
