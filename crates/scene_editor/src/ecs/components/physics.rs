//! Rigid body component

use crate::foundation::math::{Quat, Vec3};

/// Collision shape used when the body is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionShape {
    /// Box matching the entity's local bounds
    #[default]
    Box,
    /// Sphere
    Sphere,
    /// Capsule
    Capsule,
    /// Cylinder
    Cylinder,
}

/// Rigid body parameters for entities carrying
/// [`EntityFlags::PHYSICS`](crate::ecs::EntityFlags::PHYSICS)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsComponent {
    /// Collision shape
    pub shape: CollisionShape,
    /// Mass; zero means static
    pub mass: f32,
    /// World position the body was created at
    pub start_position: Vec3,
    /// World rotation the body was created at
    pub start_rotation: Quat,
}

impl Default for PhysicsComponent {
    fn default() -> Self {
        Self {
            shape: CollisionShape::Box,
            mass: 1.0,
            start_position: Vec3::zeros(),
            start_rotation: Quat::identity(),
        }
    }
}
