//! Math utilities and types
//!
//! Provides the vector/matrix aliases used across the editor together with the
//! handful of geometric queries that picking and the transform gizmo rely on.

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    Unit,
};

/// 2D vector type (screen space, pixels)
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Local transform of a scene node: translation, rotation and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation relative to the parent node
    pub translation: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only a translation
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Convert to a transformation matrix (T * R * S)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.translation)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Decompose a TRS matrix back into a transform
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let translation = Vec3::new(matrix.m14, matrix.m24, matrix.m34);

        let scale_x = Vec3::new(matrix.m11, matrix.m21, matrix.m31).magnitude();
        let scale_y = Vec3::new(matrix.m12, matrix.m22, matrix.m32).magnitude();
        let scale_z = Vec3::new(matrix.m13, matrix.m23, matrix.m33).magnitude();
        let scale = Vec3::new(scale_x, scale_y, scale_z);

        let rotation_matrix = Mat3::new(
            matrix.m11 / scale_x, matrix.m12 / scale_y, matrix.m13 / scale_z,
            matrix.m21 / scale_x, matrix.m22 / scale_y, matrix.m23 / scale_z,
            matrix.m31 / scale_x, matrix.m32 / scale_y, matrix.m33 / scale_z,
        );
        let rotation = Quat::from_matrix(&rotation_matrix);

        Self {
            translation,
            rotation,
            scale,
        }
    }
}

/// Math utility functions
pub mod utils {
    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }

    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        value.max(min).min(max)
    }
}

/// Signed distance from `point` to the plane through `plane_point` with `normal`.
///
/// Positive values lie on the side the normal points to.
pub fn point_vs_plane(point: &Vec3, plane_point: &Vec3, normal: &Vec3) -> f32 {
    (point - plane_point).dot(normal)
}

/// Intersect a ray with a plane.
///
/// Returns `None` when the ray runs parallel to the plane or meets it
/// behind `ray_origin`.
pub fn ray_vs_plane(ray_origin: &Vec3, ray_dir: &Vec3, plane_normal: &Vec3, plane_point: &Vec3) -> Option<Vec3> {
    let denom = ray_dir.dot(plane_normal);
    if denom.abs() < 1e-6 {
        return None;
    }

    let t = (plane_point - ray_origin).dot(plane_normal) / denom;
    if t < 0.0 {
        return None;
    }
    Some(ray_origin + ray_dir * t)
}

/// Closest point to `p` on the segment `a`-`b` (screen space).
pub fn closest_point_on_segment(a: &Vec2, b: &Vec2, p: &Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.magnitude_squared();
    if len_sq <= f32::EPSILON {
        return *a;
    }

    let t = utils::clamp((p - a).dot(&ab) / len_sq, 0.0, 1.0);
    a + ab * t
}

/// Signed angle in radians rotating `from` onto `to` around `axis`.
pub fn signed_angle(from: &Vec3, to: &Vec3, axis: &Vec3) -> f32 {
    let cross = from.cross(to);
    cross.dot(axis).atan2(from.dot(to))
}

/// Transform a local-space box by `matrix` and return the enclosing world-space box.
pub fn transform_aabb(matrix: &Mat4, min: &Vec3, max: &Vec3) -> (Vec3, Vec3) {
    let mut out_min = Vec3::repeat(f32::MAX);
    let mut out_max = Vec3::repeat(f32::MIN);

    for corner in 0..8 {
        let local = Point3::new(
            if corner & 1 == 0 { min.x } else { max.x },
            if corner & 2 == 0 { min.y } else { max.y },
            if corner & 4 == 0 { min.z } else { max.z },
        );
        let world = matrix.transform_point(&local).coords;
        out_min = out_min.inf(&world);
        out_max = out_max.sup(&world);
    }

    (out_min, out_max)
}
