//! Picking and gizmo interplay through the frame controller

use super::{controller, mouse};
use crate::ecs::components::BoundingVolume;
use crate::ecs::systems::{PickingState, TransformMode};
use crate::ecs::{EntityFlags, StateFlags};
use crate::foundation::math::Vec3;
use crate::input::{KeyCode, UiCapture};
use crate::physics::NullPhysicsWorld;
use crate::render::NO_ENTITY;
use crate::test_support::RecordingDevice;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_click_selects_on_following_frame() {
        let mut editor = controller();
        let ctx = editor.context_mut();
        let cube = ctx.add_node();
        ctx.selection.clear(&mut ctx.store);
        let mut device = RecordingDevice::with_picking_target(800, 600);
        let mut physics = NullPhysicsWorld::default();

        let report = editor.update(&mouse(400.0, 300.0, true), &mut device, &mut physics);
        assert!(!report.picked);
        assert_eq!(device.pending_readbacks(), 1);

        device.complete_readbacks(|_, _| cube.id());
        let report = editor.update(&mouse(400.0, 300.0, false), &mut device, &mut physics);
        assert!(report.picked);
        assert_eq!(editor.context().selection.as_slice(), &[cube]);
        assert!(editor.context().store.state_flags[cube.index()].contains(StateFlags::SELECTED));
    }

    #[test]
    fn test_click_after_late_readback_issues_new_pick() {
        let mut editor = controller();
        let ctx = editor.context_mut();
        let first = ctx.add_node();
        let second = ctx.add_node();
        ctx.selection.clear(&mut ctx.store);
        let mut device = RecordingDevice::with_picking_target(800, 600);
        let mut physics = NullPhysicsWorld::default();

        editor.update(&mouse(400.0, 300.0, true), &mut device, &mut physics);
        // Button goes up while the read-back is still in flight
        editor.update(&mouse(400.0, 300.0, false), &mut device, &mut physics);
        editor.update(&mouse(400.0, 300.0, false), &mut device, &mut physics);
        assert_eq!(editor.context().picking.state(), PickingState::SinglePending);
        device.complete_readbacks(|_, _| first.id());

        // Second press lands on the frame that consumes the first result
        let report = editor.update(&mouse(300.0, 300.0, true), &mut device, &mut physics);
        assert!(report.picked);
        assert_eq!(editor.context().selection.as_slice(), &[first]);
        assert_eq!(device.total_readbacks(), 2);

        editor.update(&mouse(300.0, 300.0, false), &mut device, &mut physics);
        device.complete_readbacks(|_, _| second.id());
        let report = editor.update(&mouse(300.0, 300.0, false), &mut device, &mut physics);
        assert!(report.picked);
        assert_eq!(editor.context().selection.as_slice(), &[second]);
    }

    #[test]
    fn test_camera_modifier_suppresses_until_release() {
        let mut editor = controller();
        let mut device = RecordingDevice::with_picking_target(800, 600);
        let mut physics = NullPhysicsWorld::default();

        let orbit = mouse(400.0, 300.0, true).with_key(KeyCode::Menu);
        let report = editor.update(&orbit, &mut device, &mut physics);
        assert!(report.picking_suppressed);

        // Modifier let go but button still held: still suppressed
        let report = editor.update(&mouse(410.0, 300.0, true), &mut device, &mut physics);
        assert!(report.picking_suppressed);
        assert_eq!(device.total_readbacks(), 0);

        editor.update(&mouse(410.0, 300.0, false), &mut device, &mut physics);
        let report = editor.update(&mouse(410.0, 300.0, true), &mut device, &mut physics);
        assert!(!report.picking_suppressed);
        assert_eq!(device.total_readbacks(), 1);
    }

    #[test]
    fn test_physics_mode_suppresses_picking() {
        let mut editor = controller();
        editor.context_mut().transform_mode = TransformMode::Physics;
        let mut device = RecordingDevice::with_picking_target(800, 600);
        let mut physics = NullPhysicsWorld::default();

        let report = editor.update(&mouse(400.0, 300.0, true), &mut device, &mut physics);
        assert!(report.picking_suppressed);
        assert_eq!(device.total_readbacks(), 0);
    }

    #[test]
    fn test_ui_mouse_capture_blocks_pick() {
        let mut editor = controller();
        let mut device = RecordingDevice::with_picking_target(800, 600);
        let mut physics = NullPhysicsWorld::default();

        let mut input = mouse(400.0, 300.0, true);
        input.ui_capture = UiCapture::MOUSE;
        editor.update(&input, &mut device, &mut physics);

        assert_eq!(device.total_readbacks(), 0);
        assert_eq!(editor.context().picking.state(), PickingState::Ready);
    }

    #[test]
    fn test_gizmo_drag_does_not_pick() {
        let mut editor = controller();
        let ctx = editor.context_mut();
        let cube = ctx.add_node();
        ctx.store.bounding_volumes[cube.index()] = BoundingVolume::from_extents(Vec3::repeat(-0.5), Vec3::repeat(0.5));
        ctx.store.entities[cube.index()] |= EntityFlags::GEOMETRY;
        ctx.store.update_world_transforms();
        ctx.transform_mode = TransformMode::Translate;

        let camera = ctx.camera.clone();
        let viewport = ctx.viewport;
        let hover = camera.project(&Vec3::new(0.5, 0.0, 0.0), &viewport);
        let target = camera.project(&Vec3::new(2.5, 0.0, 0.0), &viewport);

        let mut device = RecordingDevice::with_picking_target(800, 600);
        let mut physics = NullPhysicsWorld::default();

        editor.update(&mouse(hover.x, hover.y, false), &mut device, &mut physics);
        assert!(editor.context().gizmo.widget_active());

        let report = editor.update(&mouse(hover.x, hover.y, true), &mut device, &mut physics);
        assert!(report.picking_suppressed);
        editor.update(&mouse(target.x, target.y, true), &mut device, &mut physics);
        editor.update(&mouse(target.x, target.y, false), &mut device, &mut physics);

        assert_eq!(device.total_readbacks(), 0);
        assert_eq!(editor.context().selection.as_slice(), &[cube]);
        assert_relative_eq!(
            editor.context().store.transforms[cube.index()].translation,
            Vec3::new(2.0, 0.0, 0.0),
            epsilon = 1e-2
        );
        let world = editor.context().store.world_matrices[cube.index()];
        assert_relative_eq!(world[(0, 3)], 2.0, epsilon = 1e-2);
    }

    #[test]
    fn test_box_drag_replaces_selection() {
        let mut editor = controller();
        let ctx = editor.context_mut();
        let cube = ctx.add_node();
        ctx.store.bounding_volumes[cube.index()] = BoundingVolume::from_extents(Vec3::repeat(-0.5), Vec3::repeat(0.5));
        ctx.store.entities[cube.index()] |= EntityFlags::GEOMETRY;
        let light = ctx.store.find_by_name("front_light").unwrap();
        ctx.selection.replace(&mut ctx.store, light);

        let mut device = RecordingDevice::with_picking_target(800, 600);
        let mut physics = NullPhysicsWorld::default();

        editor.update(&mouse(300.0, 200.0, true), &mut device, &mut physics);
        device.complete_readbacks(|_, _| NO_ENTITY);
        editor.update(&mouse(500.0, 400.0, true), &mut device, &mut physics);
        assert_eq!(editor.context().picking.state(), PickingState::BoxPending);
        editor.update(&mouse(500.0, 400.0, false), &mut device, &mut physics);

        assert_eq!(editor.context().selection.as_slice(), &[cube]);
    }
}
