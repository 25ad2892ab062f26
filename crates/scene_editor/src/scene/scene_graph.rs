//! Spatial primitives for scene queries
//!
//! Boxes, planes and the selection frustum built from a screen-space drag
//! rectangle.

use crate::foundation::math::{Vec3, point_vs_plane};

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Inverted box that any `expand` call replaces
    pub fn empty() -> Self {
        Self {
            min: Vec3::repeat(f32::MAX),
            max: Vec3::repeat(f32::MIN),
        }
    }

    /// Grow to enclose another box
    pub fn expand(&mut self, min: &Vec3, max: &Vec3) {
        self.min = self.min.inf(min);
        self.max = self.max.sup(max);
    }

    /// Length of the diagonal
    pub fn diagonal(&self) -> f32 {
        (self.max - self.min).magnitude()
    }
}

/// Plane through a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal, pointing out of the enclosed volume
    pub normal: Vec3,
    /// Any point on the plane
    pub point: Vec3,
}

impl Plane {
    /// Plane through `point` with `normal` (normalized here)
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        Self {
            normal: normal.normalize(),
            point,
        }
    }

    /// Plane through three points, normal = (b - a) x (c - a)
    pub fn from_triangle(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let v1 = (b - a).normalize();
        let v2 = (c - a).normalize();
        Self::from_point_normal(a, v1.cross(&v2))
    }

    /// Signed distance, positive on the normal's side
    pub fn distance_to_point(&self, point: &Vec3) -> f32 {
        point_vs_plane(point, &self.point, &self.normal)
    }

    /// Reverse the normal
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            point: self.point,
        }
    }
}

/// Six-plane selection volume
#[derive(Debug, Clone, PartialEq)]
pub struct Frustum {
    /// Left, top, right, bottom, near, far; normals point outwards
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Build from the unprojected corners of a screen rectangle.
    ///
    /// Corners are ordered top-left, top-right, bottom-left, bottom-right for
    /// both the near and far cap. Plane normals are oriented away from the
    /// volume's centroid.
    pub fn from_corners(near: &[Vec3; 4], far: &[Vec3; 4]) -> Self {
        let triples = [
            (near[0], far[0], near[2]),
            (near[0], near[1], far[0]),
            (near[1], near[3], far[1]),
            (near[2], far[2], near[3]),
            (near[0], near[2], near[1]),
            (far[0], far[1], far[2]),
        ];

        let centroid = (near.iter().chain(far.iter()).sum::<Vec3>()) / 8.0;

        let planes = triples.map(|(a, b, c)| {
            let plane = Plane::from_triangle(a, b, c);
            if plane.distance_to_point(&centroid) > 0.0 {
                plane.flipped()
            } else {
                plane
            }
        });

        Self { planes }
    }

    /// Whether a sphere is inside or touching the volume
    pub fn intersects_sphere(&self, center: &Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(center) <= radius)
    }
}
