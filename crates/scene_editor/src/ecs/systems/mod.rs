//! Editor systems operating on the component store

pub mod gizmo_system;
pub mod picking_system;

pub use gizmo_system::{GizmoAxes, GizmoHandles, GizmoSystem, SelectionBounds, TransformMode, selection_bounds};
pub use picking_system::{PickingState, PickingSystem};
