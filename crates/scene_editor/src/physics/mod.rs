//! Physics module
//!
//! Rays and the interface to the external physics world.

pub mod bridge;
pub mod collision;

pub use bridge::{
    ConstraintParams, ConstraintType, NullPhysicsWorld, PhysicsCommand, PhysicsHandle,
    PhysicsWorld, RayCastCallback, RayCastParams, RayCastResult, RayCastSlot,
};
pub use collision::Ray;
