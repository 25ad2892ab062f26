//! Bounding volume component

use crate::foundation::math::{Mat4, Vec3, transform_aabb};

/// Local and world-space extents of an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingVolume {
    /// Local-space minimum corner
    pub min_extents: Vec3,
    /// Local-space maximum corner
    pub max_extents: Vec3,
    /// World-space minimum corner, valid after world transforms update
    pub transformed_min_extents: Vec3,
    /// World-space maximum corner, valid after world transforms update
    pub transformed_max_extents: Vec3,
    /// Bounding-sphere radius around the world-space box centre
    pub radius: f32,
}

impl Default for BoundingVolume {
    fn default() -> Self {
        Self::from_extents(Vec3::zeros(), Vec3::zeros())
    }
}

impl BoundingVolume {
    /// Volume with the given local extents; world extents start equal to them
    pub fn from_extents(min: Vec3, max: Vec3) -> Self {
        Self {
            min_extents: min,
            max_extents: max,
            transformed_min_extents: min,
            transformed_max_extents: max,
            radius: (max - min).magnitude() * 0.5,
        }
    }

    /// Recompute the world-space box and radius from a world matrix
    pub fn update(&mut self, world: &Mat4) {
        let (min, max) = transform_aabb(world, &self.min_extents, &self.max_extents);
        self.transformed_min_extents = min;
        self.transformed_max_extents = max;
        self.radius = (max - min).magnitude() * 0.5;
    }

    /// Centre of the world-space box
    pub fn center(&self) -> Vec3 {
        self.transformed_min_extents + (self.transformed_max_extents - self.transformed_min_extents) * 0.5
    }
}
