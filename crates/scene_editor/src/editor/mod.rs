//! Editor layer
//!
//! Owns the per-session editing state and runs the per-frame update that
//! turns input into picking, gizmo manipulation and structural edits.

pub mod camera_controller;
pub mod context;
pub mod frame_controller;

#[cfg(test)]
mod tests;

use thiserror::Error;

use crate::config::ConfigError;
use crate::ecs::AnimationError;

pub use camera_controller::{CameraController, CameraMode};
pub use context::EditorContext;
pub use frame_controller::{EditorCommand, EditorFrameController, FrameReport};

/// Editor-level errors
#[derive(Error, Debug)]
pub enum EditorError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Animation import was rejected
    #[error("Animation error: {0}")]
    Animation(#[from] AnimationError),

    /// A named resource is not in the library
    #[error("Resource not found: {0}")]
    MissingResource(String),
}
