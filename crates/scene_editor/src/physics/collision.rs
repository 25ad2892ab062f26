//! Rays for picking and gizmo drags

use crate::foundation::math::{Vec3, ray_vs_plane};

/// A ray for ray casting and picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray from `start` towards `end`
    pub fn between(start: Vec3, end: Vec3) -> Self {
        Self::new(start, end - start)
    }

    /// Intersection with the plane through `point` with `normal`.
    ///
    /// Planes behind the origin are missed.
    pub fn intersect_plane(&self, normal: &Vec3, point: &Vec3) -> Option<Vec3> {
        ray_vs_plane(&self.origin, &self.direction, normal, point)
    }
}
