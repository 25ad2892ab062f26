//! # 3D Camera
//!
//! Perspective camera used by picking and the transform gizmo.
//!
//! ## Conventions
//! - Right-handed, Y-up world space; the camera looks down its local -Z
//! - Clip space depth runs -1..1, mapped to 0..1 by [`Camera::project`]
//! - Screen space is in pixels with the origin at the top-left and Y down,
//!   matching mouse coordinates

use crate::foundation::math::{Mat4, Point3, Vec3, Vec4, utils};

/// Viewport dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Viewport {
    /// Create a viewport
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width / height
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

/// 3D perspective camera
///
/// Represents a camera in 3D space with position, look-at target and
/// projection parameters. Matrices are computed on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,
    /// Point the camera is looking at in world space
    pub target: Vec3,
    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Distance to near clipping plane
    pub near: f32,
    /// Distance to far clipping plane
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(Vec3::new(0.0, 0.0, 10.0), 60.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

impl Camera {
    /// Create a new perspective camera looking at the origin
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Update camera target (look-at point)
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        log::trace!("Camera target updated to: {:?}", target);
    }

    /// Update the aspect ratio after a viewport change
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::debug!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// World-to-camera transform
    pub fn get_view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(
            &Point3::from(self.position),
            &Point3::from(self.target),
            &self.up,
        )
    }

    /// Perspective projection with -1..1 clip depth
    pub fn get_projection_matrix(&self) -> Mat4 {
        Mat4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Combined projection * view
    pub fn get_view_projection_matrix(&self) -> Mat4 {
        self.get_projection_matrix() * self.get_view_matrix()
    }

    /// Unit vector the camera looks along
    pub fn forward(&self) -> Vec3 {
        let view = self.get_view_matrix();
        -Vec3::new(view.m31, view.m32, view.m33)
    }

    /// Camera-space +X in world space
    pub fn right(&self) -> Vec3 {
        let view = self.get_view_matrix();
        Vec3::new(view.m11, view.m12, view.m13)
    }

    /// Camera-space +Y in world space (orthogonalised against the view direction)
    pub fn up_vector(&self) -> Vec3 {
        let view = self.get_view_matrix();
        Vec3::new(view.m21, view.m22, view.m23)
    }

    /// Clip-space position of a world point
    pub fn to_clip(&self, world: &Vec3) -> Vec4 {
        self.get_view_projection_matrix() * world.push(1.0)
    }

    /// Project a world point to screen space.
    ///
    /// Returns pixel x, pixel y (top-left origin) and depth in 0..1.
    pub fn project(&self, world: &Vec3, viewport: &Viewport) -> Vec3 {
        let clip = self.to_clip(world);
        let w = if clip.w.abs() > f32::EPSILON { clip.w } else { f32::EPSILON };
        let ndc = clip.xyz() / w;

        Vec3::new(
            (ndc.x * 0.5 + 0.5) * viewport.width,
            (0.5 - ndc.y * 0.5) * viewport.height,
            ndc.z * 0.5 + 0.5,
        )
    }

    /// Inverse of [`Camera::project`]: screen pixel plus 0..1 depth to world.
    ///
    /// Returns `None` if the view-projection matrix is singular.
    pub fn unproject(&self, screen: &Vec3, viewport: &Viewport) -> Option<Vec3> {
        let inverse = self.get_view_projection_matrix().try_inverse()?;

        let ndc = Vec4::new(
            screen.x / viewport.width * 2.0 - 1.0,
            1.0 - screen.y / viewport.height * 2.0,
            screen.z * 2.0 - 1.0,
            1.0,
        );
        let world = inverse * ndc;
        if world.w.abs() <= f32::EPSILON {
            return None;
        }
        Some(world.xyz() / world.w)
    }
}
