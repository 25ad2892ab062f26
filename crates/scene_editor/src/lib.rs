//! # Scene Editor
//!
//! Data-oriented scene store and the interactive editing layer on top of it.
//!
//! ## Features
//!
//! - **Component Store**: entities as stable slot indices into parallel component arrays
//! - **Hierarchy**: parenting, instancing, hierarchical cloning and subtree deletion
//! - **Picking**: asynchronous GPU read-back for clicks, frustum tests for box selection
//! - **Transform Gizmo**: translate, rotate and scale handles plus physics grabbing
//! - **Frame Controller**: one ordered per-frame update driving all of the above
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_editor::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = EditorContext::new(EditorConfig::default(), Viewport::new(1280.0, 720.0));
//!     let mut editor = EditorFrameController::new(context);
//!     let mut physics = NullPhysicsWorld::default();
//!     # let mut device: Box<dyn RenderDevice> = unimplemented!();
//!
//!     let input = InputState::new().with_mouse(640.0, 360.0);
//!     let report = editor.update(&input, device.as_mut(), &mut physics);
//!     println!("frame {} ran {:?}", report.frame, report.commands);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod ecs;
pub mod editor;
pub mod foundation;
pub mod input;
pub mod physics;
pub mod render;
pub mod scene;

#[cfg(test)]
mod test_support;

/// Common imports for editor hosts
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, EditorConfig, PickingConfig},
        ecs::{
            ComponentStore, Entity, EntityFlags, SceneFlags, SelectionMode, SelectionSet, StateFlags,
            systems::{GizmoSystem, PickingState, PickingSystem, TransformMode},
        },
        editor::{
            CameraController, CameraMode, EditorCommand, EditorContext, EditorError, EditorFrameController,
            FrameReport,
        },
        foundation::math::{Mat4, Quat, Transform, Vec2, Vec3},
        input::{InputState, KeyCode, MouseButton, UiCapture},
        physics::{NullPhysicsWorld, PhysicsWorld},
        render::{Camera, RenderDevice, ResourceLibrary, ResourceMap, Viewport},
    };
}
