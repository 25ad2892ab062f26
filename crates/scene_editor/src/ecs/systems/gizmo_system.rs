//! Transform gizmo
//!
//! Screen-space manipulator for the current selection. Handles are sized by
//! the pivot's clip-space depth so they keep a roughly constant on-screen
//! size. Axis hit-testing only happens while the mouse is up; once a drag
//! starts the chosen axes stay locked until release.
//!
//! The same system drives physics grabbing: a ray cast picks a rigid body,
//! a point-to-point constraint holds it, and the constraint pivot follows
//! the mouse on a camera-facing plane.

use std::time::Instant;

use bitflags::bitflags;
use nalgebra::Unit;

use crate::config::GizmoConfig;
use crate::ecs::flags::EntityFlags;
use crate::ecs::selection::SelectionSet;
use crate::ecs::store::ComponentStore;
use crate::foundation::math::{Quat, Vec2, Vec3, closest_point_on_segment, signed_angle};
use crate::input::{InputState, KeyCode};
use crate::physics::{
    ConstraintParams, ConstraintType, PhysicsCommand, PhysicsHandle, PhysicsWorld, Ray, RayCastParams, RayCastSlot,
};
use crate::render::camera::{Camera, Viewport};
use crate::scene::AABB;

/// Editing mode selected from the toolbar or keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransformMode {
    /// Pick only
    #[default]
    Select,
    /// Move along axes
    Translate,
    /// Rotate around world axes
    Rotate,
    /// Scale along axes
    Scale,
    /// Grab rigid bodies with a constraint
    Physics,
}

bitflags! {
    /// Gizmo axes under the cursor or locked by a drag
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct GizmoAxes: u32 {
        /// World X
        const X = 1 << 0;
        /// World Y
        const Y = 1 << 1;
        /// World Z
        const Z = 1 << 2;
    }
}

impl GizmoAxes {
    fn axis(index: usize) -> Self {
        Self::from_bits_truncate(1 << index)
    }

    /// Sum of the unit vectors of the selected axes
    pub fn restrict_vector(self) -> Vec3 {
        (0..3)
            .filter(|&i| self.contains(Self::axis(i)))
            .map(|i| UNIT_AXES[i])
            .sum()
    }

    fn first(self) -> Option<usize> {
        (0..3).find(|&i| self.contains(Self::axis(i)))
    }
}

const UNIT_AXES: [Vec3; 3] = [
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
];

/// Screen-space handle positions from the last update, for overlay drawing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GizmoHandles {
    /// Whether the gizmo was drawn this frame
    pub visible: bool,
    /// World-space pivot
    pub pivot: Vec3,
    /// World-space handle length
    pub size: f32,
    /// Projected pivot
    pub origin: Vec2,
    /// Projected handle tips per axis
    pub tips: [Vec2; 3],
    /// Highlighted axes
    pub axes: GizmoAxes,
}

/// Combined centre and size of the selection's world bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionBounds {
    /// Mean of the selected boxes' centres
    pub pivot: Vec3,
    /// Diagonal of the box enclosing every selected box
    pub extents: f32,
}

/// Pivot and extent of the current selection, `None` when nothing is selected
pub fn selection_bounds(store: &ComponentStore, selection: &SelectionSet) -> Option<SelectionBounds> {
    if selection.is_empty() {
        return None;
    }

    let mut pivot = Vec3::zeros();
    let mut enclosing = AABB::empty();
    for entity in selection.iter() {
        let bv = &store.bounding_volumes[entity.index()];
        enclosing.expand(&bv.transformed_min_extents, &bv.transformed_max_extents);
        pivot += bv.center();
    }

    #[allow(clippy::cast_precision_loss)]
    let count = selection.len() as f32;
    Some(SelectionBounds {
        pivot: pivot / count,
        extents: enclosing.diagonal(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum GrabState {
    #[default]
    Ready,
    Casting,
    Grabbed {
        constraint: PhysicsHandle,
        anchor: Vec3,
    },
}

/// Transform gizmo and physics grab
#[derive(Debug)]
pub struct GizmoSystem {
    config: GizmoConfig,
    axes: GizmoAxes,
    pre_click_axis_pos: [Vec3; 3],
    active_ring: Option<usize>,
    attach_point: Vec3,
    widget_active: bool,
    handles: GizmoHandles,
    grab: GrabState,
    ray_slot: RayCastSlot,
    started: Instant,
}

impl GizmoSystem {
    /// Create a gizmo with the given proportions
    pub fn new(config: &GizmoConfig) -> Self {
        Self {
            config: config.clone(),
            axes: GizmoAxes::empty(),
            pre_click_axis_pos: [Vec3::zeros(); 3],
            active_ring: None,
            attach_point: Vec3::zeros(),
            widget_active: false,
            handles: GizmoHandles::default(),
            grab: GrabState::Ready,
            ray_slot: RayCastSlot::new(),
            started: Instant::now(),
        }
    }

    /// Whether a handle was hovered or dragged this frame
    pub fn widget_active(&self) -> bool {
        self.widget_active
    }

    /// Handles computed by the last update
    pub fn handles(&self) -> &GizmoHandles {
        &self.handles
    }

    /// Whether a rigid body is currently held
    pub fn is_grabbing(&self) -> bool {
        matches!(self.grab, GrabState::Grabbed { .. })
    }

    /// Run one frame of the gizmo
    ///
    /// # Arguments
    /// * `store` - Scene store holding the selected entities
    /// * `selection` - Entities the gizmo manipulates
    /// * `camera` - Camera the scene is viewed through
    /// * `viewport` - Viewport dimensions in pixels
    /// * `input` - This frame's input snapshot
    /// * `mode` - Active transform mode
    /// * `physics` - Physics world used in [`TransformMode::Physics`]
    pub fn update(
        &mut self,
        store: &mut ComponentStore,
        selection: &SelectionSet,
        camera: &Camera,
        viewport: &Viewport,
        input: &InputState,
        mode: TransformMode,
        physics: &mut dyn PhysicsWorld,
    ) {
        self.widget_active = false;
        self.handles.visible = false;

        let mouse = input.mouse_position;
        let Some(near) = camera.unproject(&Vec3::new(mouse.x, mouse.y, 0.0), viewport) else {
            return;
        };
        let Some(far) = camera.unproject(&Vec3::new(mouse.x, mouse.y, 1.0), viewport) else {
            return;
        };
        let ray = Ray::between(near, far);

        if mode == TransformMode::Physics {
            self.update_grab(&ray, near, far, camera, input, physics);
        } else if let GrabState::Grabbed { constraint, .. } = self.grab {
            physics.release_entity(constraint);
            self.grab = GrabState::Ready;
        }

        let Some(bounds) = selection_bounds(store, selection) else {
            return;
        };
        let pivot = bounds.pivot;

        let clip = camera.to_clip(&pivot);
        if clip.w <= 0.0 {
            return;
        }
        let size = clip.w.abs() * self.config.size_factor;

        self.handles = GizmoHandles {
            visible: true,
            pivot,
            size,
            origin: camera.project(&pivot, viewport).xy(),
            tips: UNIT_AXES.map(|axis| camera.project(&(pivot + axis * size), viewport).xy()),
            axes: self.axes,
        };

        let held = input.left_down();
        match mode {
            TransformMode::Translate | TransformMode::Scale => {
                self.update_axes(store, selection, camera, viewport, &ray, mouse, size, mode, held);
            }
            TransformMode::Rotate => {
                self.update_rotation(store, selection, &ray, pivot, size, held);
            }
            TransformMode::Select | TransformMode::Physics => {}
        }
        self.handles.axes = self.axes;
    }

    #[allow(clippy::too_many_arguments)]
    fn update_axes(
        &mut self,
        store: &mut ComponentStore,
        selection: &SelectionSet,
        camera: &Camera,
        viewport: &Viewport,
        ray: &Ray,
        mouse: Vec2,
        size: f32,
        mode: TransformMode,
        held: bool,
    ) {
        let pivot = self.handles.pivot;

        if !held {
            let radius = self.config.selection_radius;
            let near_segment = |a: &Vec2, b: &Vec2| (closest_point_on_segment(a, b, &mouse) - mouse).magnitude() < radius;

            let mut axes = GizmoAxes::empty();
            for i in 0..3 {
                if near_segment(&self.handles.origin, &self.handles.tips[i]) {
                    axes |= GizmoAxes::axis(i);
                }
            }

            let joint = size * self.config.joint_factor;
            for i in 0..3 {
                let next = (i + 1) % 3;
                let a = camera.project(&(pivot + UNIT_AXES[i] * joint), viewport).xy();
                let b = camera.project(&(pivot + UNIT_AXES[next] * joint), viewport).xy();
                if near_segment(&a, &b) {
                    axes |= GizmoAxes::axis(i) | GizmoAxes::axis(next);
                }
            }
            self.axes = axes;
        }

        self.widget_active = !self.axes.is_empty();

        let Some(axis) = self.axes.first() else {
            return;
        };

        // Drag plane contains the axis and faces the camera as much as possible
        let normal = if axis == 1 {
            UNIT_AXES[axis].cross(&camera.right())
        } else {
            UNIT_AXES[axis].cross(&camera.up_vector())
        };
        let Some(axis_pos) = ray.intersect_plane(&normal, &pivot) else {
            return;
        };

        if !held {
            self.pre_click_axis_pos[axis] = axis_pos;
            return;
        }

        let delta = (axis_pos - self.pre_click_axis_pos[axis]).component_mul(&self.axes.restrict_vector());
        self.pre_click_axis_pos[axis] = axis_pos;

        if delta == Vec3::zeros() {
            return;
        }

        let scale_factor = self.config.scale_factor;
        for entity in selection.roots(store) {
            let transform = &mut store.transforms[entity.index()];
            match mode {
                TransformMode::Scale => transform.scale += delta * scale_factor,
                _ => transform.translation += delta,
            }
            store.entities[entity.index()] |= EntityFlags::TRANSFORM;
        }
    }

    fn update_rotation(
        &mut self,
        store: &mut ComponentStore,
        selection: &SelectionSet,
        ray: &Ray,
        pivot: Vec3,
        size: f32,
        held: bool,
    ) {
        let ring_radius = size * self.config.ring_factor;
        let tolerance = ring_radius * self.config.ring_tolerance;

        let ring_points = UNIT_AXES.map(|normal| ray.intersect_plane(&normal, &pivot));

        if !held {
            self.active_ring = ring_points.iter().position(|point| {
                point.is_some_and(|p| ((p - pivot).magnitude() - ring_radius).abs() <= tolerance)
            });
            if let Some(point) = self.active_ring.and_then(|i| ring_points[i]) {
                self.attach_point = point;
            }
        }

        self.axes = self
            .active_ring
            .map_or(GizmoAxes::empty(), GizmoAxes::axis);
        self.widget_active = self.active_ring.is_some();

        let Some(ring) = self.active_ring else {
            return;
        };
        let Some(point) = ring_points[ring] else {
            return;
        };
        if !held {
            return;
        }

        let from = self.attach_point - pivot;
        let to = point - pivot;
        self.attach_point = point;
        if from.magnitude_squared() <= f32::EPSILON || to.magnitude_squared() <= f32::EPSILON {
            return;
        }

        let axis = UNIT_AXES[ring];
        let angle = signed_angle(&from.normalize(), &to.normalize(), &axis);
        if angle == 0.0 {
            return;
        }

        let delta = Quat::from_axis_angle(&Unit::new_normalize(axis), angle);
        for entity in selection.roots(store) {
            let transform = &mut store.transforms[entity.index()];
            transform.rotation = delta * transform.rotation;
            store.entities[entity.index()] |= EntityFlags::TRANSFORM;
        }
    }

    fn update_grab(
        &mut self,
        ray: &Ray,
        near: Vec3,
        far: Vec3,
        camera: &Camera,
        input: &InputState,
        physics: &mut dyn PhysicsWorld,
    ) {
        let held = input.left_down();
        match self.grab {
            GrabState::Ready => {
                if held && !input.is_key_down(KeyCode::Menu) {
                    let timestamp = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
                    physics.cast_ray(
                        RayCastParams {
                            start: near,
                            end: far,
                            timestamp,
                        },
                        self.ray_slot.callback(),
                    );
                    self.grab = GrabState::Casting;
                }
            }
            GrabState::Casting => {
                let Some(result) = self.ray_slot.take() else {
                    return;
                };
                self.grab = match result.physics_handle {
                    Some(body) => {
                        let constraint = physics.add_constraint(ConstraintParams {
                            constraint_type: ConstraintType::PointToPoint,
                            pivot: result.point,
                            body,
                        });
                        log::debug!("Grabbed body {:?} at {:?}", body, result.point);
                        GrabState::Grabbed {
                            constraint,
                            anchor: result.point,
                        }
                    }
                    None => GrabState::Ready,
                };
            }
            GrabState::Grabbed { constraint, anchor } => {
                if held {
                    if let Some(target) = ray.intersect_plane(&camera.forward(), &anchor) {
                        physics.set_v3(constraint, target, PhysicsCommand::SetP2pConstraintPos);
                    }
                } else {
                    physics.release_entity(constraint);
                    self.grab = GrabState::Ready;
                }
            }
        }
    }
}
