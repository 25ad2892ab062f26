//! Keyboard commands through the frame controller

use super::{controller, mouse};
use crate::ecs::components::PhysicsComponent;
use crate::ecs::systems::TransformMode;
use crate::ecs::{AnimationClip, AnimationHandle, Entity, EntityFlags, SceneFlags};
use crate::editor::{EditorCommand, EditorError};
use crate::foundation::math::{Quat, Vec3};
use crate::input::{InputState, KeyCode, UiCapture};
use crate::physics::{NullPhysicsWorld, PhysicsCommand, PhysicsHandle};
use crate::render::{Primitive, ResourceMap};
use crate::test_support::{RecordingDevice, ScriptedPhysics};

fn keys(keys: &[KeyCode]) -> InputState {
    keys.iter().fold(mouse(0.0, 0.0, false), |input, &key| input.with_key(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mode_shortcuts_are_edge_triggered() {
        let mut editor = controller();
        let mut device = RecordingDevice::default();
        let mut physics = NullPhysicsWorld::default();

        let report = editor.update(&keys(&[KeyCode::E]), &mut device, &mut physics);
        assert_eq!(report.commands, vec![EditorCommand::SetMode(TransformMode::Rotate)]);
        assert_eq!(editor.context().transform_mode, TransformMode::Rotate);

        let report = editor.update(&keys(&[KeyCode::E]), &mut device, &mut physics);
        assert!(report.commands.is_empty());

        editor.update(&keys(&[KeyCode::W]), &mut device, &mut physics);
        assert_eq!(editor.context().transform_mode, TransformMode::Translate);
    }

    #[test]
    fn test_keyboard_capture_blocks_shortcuts() {
        let mut editor = controller();
        let mut device = RecordingDevice::default();
        let mut physics = NullPhysicsWorld::default();

        let mut input = keys(&[KeyCode::R]);
        input.ui_capture = UiCapture::KEYBOARD;
        let report = editor.update(&input, &mut device, &mut physics);

        assert!(report.commands.is_empty());
        assert_eq!(editor.context().transform_mode, TransformMode::Select);
    }

    #[test]
    fn test_delete_key_removes_subtree() {
        let mut editor = controller();
        let ctx = editor.context_mut();
        let root = ctx.add_node();
        let child = ctx.add_node();
        ctx.store.set_parent(child, root);
        ctx.selection.replace(&mut ctx.store, root);
        ctx.scene_tree();
        let rebuilt = ctx.store.scene_flags;

        let mut device = RecordingDevice::default();
        let mut physics = NullPhysicsWorld::default();
        let report = editor.update(&keys(&[KeyCode::Delete]), &mut device, &mut physics);

        assert!(!rebuilt.contains(SceneFlags::INVALIDATE_SCENE_TREE));
        assert_eq!(report.commands, vec![EditorCommand::Delete]);
        let ctx = editor.context_mut();
        assert!(!ctx.store.is_live(root));
        assert!(!ctx.store.is_live(child));
        assert!(ctx.selection.is_empty());
        assert!(ctx.store.scene_flags.contains(SceneFlags::INVALIDATE_SCENE_TREE));
        assert_eq!(ctx.scene_tree().len(), 1);
    }

    #[test]
    fn test_delete_with_empty_selection_is_not_reported() {
        let mut editor = controller();
        let mut device = RecordingDevice::default();
        let mut physics = NullPhysicsWorld::default();

        let report = editor.update(&keys(&[KeyCode::Backspace]), &mut device, &mut physics);
        assert!(report.commands.is_empty());
        assert_eq!(editor.context().store.live_count(), 1);
    }

    #[test]
    fn test_duplicate_fires_on_release() {
        let mut editor = controller();
        let original = editor.context_mut().add_node();
        let mut device = RecordingDevice::default();
        let mut physics = NullPhysicsWorld::default();

        let report = editor.update(&keys(&[KeyCode::Control, KeyCode::D]), &mut device, &mut physics);
        assert!(report.commands.is_empty());

        let report = editor.update(&keys(&[KeyCode::Control]), &mut device, &mut physics);
        assert_eq!(report.commands, vec![EditorCommand::Duplicate]);

        let ctx = editor.context();
        let copy = ctx.selection.primary().unwrap();
        assert_ne!(copy, original);
        assert_eq!(ctx.store.names[copy.index()], format!("{}_cloned", ctx.store.names[original.index()]));
    }

    #[test]
    fn test_space_toggles_pause_once_per_press() {
        let mut editor = controller();
        let mut device = RecordingDevice::default();
        let mut physics = NullPhysicsWorld::default();

        editor.update(&keys(&[KeyCode::Space]), &mut device, &mut physics);
        editor.update(&keys(&[KeyCode::Space]), &mut device, &mut physics);
        assert!(editor.context().store.scene_flags.contains(SceneFlags::PAUSE_UPDATE));

        editor.update(&keys(&[]), &mut device, &mut physics);
        editor.update(&keys(&[KeyCode::Space]), &mut device, &mut physics);
        assert!(!editor.context().store.scene_flags.contains(SceneFlags::PAUSE_UPDATE));
    }

    #[test]
    fn test_reset_physics_restores_start_transform() {
        let mut editor = controller();
        let ctx = editor.context_mut();
        let body = ctx.add_node();
        let start = Vec3::new(0.0, 5.0, 0.0);
        ctx.store.physics_data[body.index()] = PhysicsComponent {
            start_position: start,
            ..PhysicsComponent::default()
        };
        ctx.store.physics_handles[body.index()] = Some(PhysicsHandle(3));
        ctx.store.entities[body.index()] |= EntityFlags::PHYSICS;

        let mut device = RecordingDevice::default();
        let mut physics = ScriptedPhysics::default();
        let report = editor.update(&keys(&[KeyCode::O]), &mut device, &mut physics);

        assert_eq!(report.commands, vec![EditorCommand::ResetPhysics]);
        assert_eq!(physics.transforms, vec![(PhysicsHandle(3), start, Quat::identity())]);
        assert_eq!(
            physics.vector_commands,
            vec![
                (PhysicsHandle(3), Vec3::zeros(), PhysicsCommand::SetLinearVelocity),
                (PhysicsHandle(3), Vec3::zeros(), PhysicsCommand::SetAngularVelocity),
            ]
        );
    }

    #[test]
    fn test_focus_centres_camera_on_selection() {
        let mut editor = controller();
        let ctx = editor.context_mut();
        let resources = ResourceMap::with_primitives();
        let cube = ctx.add_primitive(&resources, Primitive::Cube).unwrap();
        ctx.store.transforms[cube.index()].translation = Vec3::new(3.0, 1.0, 0.0);
        ctx.store.update_world_transforms();

        let mut device = RecordingDevice::default();
        let mut physics = NullPhysicsWorld::default();
        editor.update(&keys(&[KeyCode::F]), &mut device, &mut physics);

        let camera = &editor.context().camera;
        assert_relative_eq!(camera.target, Vec3::new(3.0, 1.0, 0.0), epsilon = 1e-4);
        let expected = (Vec3::repeat(2.0)).magnitude();
        assert_relative_eq!((camera.position - camera.target).magnitude(), expected, epsilon = 1e-3);
    }

    #[test]
    fn test_parent_and_instance_shortcuts() {
        let mut editor = controller();
        let ctx = editor.context_mut();
        let nodes: Vec<Entity> = (0..3).map(|_| ctx.store.create_node()).collect();
        for &node in &nodes {
            ctx.selection.add(&mut ctx.store, node);
        }

        let mut device = RecordingDevice::default();
        let mut physics = NullPhysicsWorld::default();
        let report = editor.update(&keys(&[KeyCode::P, KeyCode::I]), &mut device, &mut physics);

        assert_eq!(report.commands, vec![EditorCommand::Parent, EditorCommand::Instance]);
        let store = &editor.context().store;
        assert_eq!(store.parent(nodes[1]), Some(nodes[0]));
        assert!(store.has(nodes[0], EntityFlags::MASTER_INSTANCE));
        assert_eq!(device.buffers.len(), 1);
    }

    #[test]
    fn test_missing_primitive_and_bad_rig_are_errors() {
        let mut editor = controller();
        let ctx = editor.context_mut();

        let empty = ResourceMap::new();
        assert!(matches!(
            ctx.add_primitive(&empty, Primitive::Sphere),
            Err(EditorError::MissingResource(name)) if name == "sphere"
        ));

        let root = ctx.add_node();
        let bone = ctx.add_node();
        ctx.store.set_name(bone, "hip");
        ctx.store.entities[bone.index()] |= EntityFlags::BONE;
        ctx.store.set_parent(bone, root);

        let clip = AnimationClip::from_targets("idle", &["spine"]);
        assert!(matches!(
            ctx.import_animation(root, AnimationHandle(0), &clip),
            Err(EditorError::Animation(_))
        ));
        let clip = AnimationClip::from_targets("idle", &["hip"]);
        assert!(ctx.import_animation(root, AnimationHandle(0), &clip).is_ok());
    }
}
