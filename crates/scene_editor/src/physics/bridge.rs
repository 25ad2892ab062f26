//! Physics boundary
//!
//! The editor drives an external physics world through [`PhysicsWorld`].
//! Ray casts are asynchronous: the callback may run on another thread, so
//! results are handed over through a [`RayCastSlot`] that the editor polls
//! once per frame.

use std::sync::{Arc, Mutex};

use crate::foundation::math::{Quat, Vec3};

/// Opaque rigid body or constraint id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhysicsHandle(pub u32);

/// Ray cast request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayCastParams {
    /// Ray start in world space
    pub start: Vec3,
    /// Ray end in world space
    pub end: Vec3,
    /// Milliseconds since the editor started, for matching results to requests
    pub timestamp: u64,
}

/// Ray cast outcome
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayCastResult {
    /// Hit position
    pub point: Vec3,
    /// Body that was hit, `None` for a miss
    pub physics_handle: Option<PhysicsHandle>,
}

/// Ray cast completion callback
pub type RayCastCallback = Box<dyn FnOnce(RayCastResult) + Send>;

/// Constraint kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    /// Point-to-point (ball socket) constraint
    PointToPoint,
    /// Single-axis hinge
    Hinge,
    /// Six degrees of freedom with limits
    Dof6,
}

/// Constraint creation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintParams {
    /// Kind of constraint
    pub constraint_type: ConstraintType,
    /// World-space pivot
    pub pivot: Vec3,
    /// Constrained body
    pub body: PhysicsHandle,
}

/// Vector commands accepted by [`PhysicsWorld::set_v3`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsCommand {
    /// Move the pivot of a point-to-point constraint
    SetP2pConstraintPos,
    /// Set a body's linear velocity
    SetLinearVelocity,
    /// Set a body's angular velocity
    SetAngularVelocity,
}

/// The physics operations the editor core depends on
pub trait PhysicsWorld {
    /// Schedule a ray cast
    fn cast_ray(&mut self, params: RayCastParams, callback: RayCastCallback);

    /// Create a constraint
    fn add_constraint(&mut self, params: ConstraintParams) -> PhysicsHandle;

    /// Apply a vector command to a body or constraint
    fn set_v3(&mut self, handle: PhysicsHandle, value: Vec3, command: PhysicsCommand);

    /// Teleport a body
    fn set_transform(&mut self, handle: PhysicsHandle, position: Vec3, rotation: Quat);

    /// Remove a body or constraint from the world
    fn release_entity(&mut self, handle: PhysicsHandle);
}

/// Single-slot handoff for ray cast results
#[derive(Debug, Clone, Default)]
pub struct RayCastSlot {
    inner: Arc<Mutex<Option<RayCastResult>>>,
}

impl RayCastSlot {
    /// Empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback that stores its result into this slot
    pub fn callback(&self) -> RayCastCallback {
        let inner = Arc::clone(&self.inner);
        Box::new(move |result| {
            if let Ok(mut slot) = inner.lock() {
                *slot = Some(result);
            }
        })
    }

    /// Take the stored result, if one arrived
    pub fn take(&self) -> Option<RayCastResult> {
        self.inner.lock().ok().and_then(|mut slot| slot.take())
    }
}

/// Physics world that hits nothing
#[derive(Debug, Default)]
pub struct NullPhysicsWorld {
    next_handle: u32,
}

impl PhysicsWorld for NullPhysicsWorld {
    fn cast_ray(&mut self, params: RayCastParams, callback: RayCastCallback) {
        callback(RayCastResult {
            point: params.end,
            physics_handle: None,
        });
    }

    fn add_constraint(&mut self, _params: ConstraintParams) -> PhysicsHandle {
        self.next_handle += 1;
        PhysicsHandle(self.next_handle)
    }

    fn set_v3(&mut self, _handle: PhysicsHandle, _value: Vec3, _command: PhysicsCommand) {}

    fn set_transform(&mut self, _handle: PhysicsHandle, _position: Vec3, _rotation: Quat) {}

    fn release_entity(&mut self, _handle: PhysicsHandle) {}
}
