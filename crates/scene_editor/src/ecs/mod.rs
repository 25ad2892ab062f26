//! Entity-component scene store
//!
//! Data-oriented scene graph: entities are slot indices into parallel
//! component arrays, with hierarchy, selection and editor systems operating
//! directly on those arrays.

pub mod animation;
pub mod components;
pub mod entity;
pub mod flags;
pub mod hierarchy;
pub mod scene_tree;
pub mod selection;
pub mod store;
pub mod systems;

#[cfg(test)]
mod tests;

pub use animation::{AnimationClip, AnimationError, AnimationHandle, attach_animation, validate_animation_rig};
pub use entity::Entity;
pub use flags::{EntityFlags, SceneFlags, StateFlags};
pub use hierarchy::{CloneMode, ParentOutcome, clone_selection_hierarchical, delete_selection, instance_selection, parent_selection};
pub use scene_tree::{SceneTree, SceneTreeCache, SceneTreeNode};
pub use selection::{SelectionMode, SelectionSet};
pub use store::ComponentStore;
