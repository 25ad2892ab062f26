//! Animation rig validation
//!
//! An imported clip can only drive a rig whose joints appear in the same
//! order as the clip's channels. Validation walks the rig's pre-order node
//! list and matches each bone against the next channel target by name hash.

use thiserror::Error;

use crate::ecs::entity::Entity;
use crate::ecs::flags::EntityFlags;
use crate::ecs::store::ComponentStore;
use crate::foundation::hash::NameHash;

/// Id of a loaded animation clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle(pub u32);

/// One animated joint in a clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationChannel {
    /// Name hash of the joint the channel drives
    pub target: NameHash,
}

/// Joint-ordered channels of a loaded clip
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnimationClip {
    /// Clip name
    pub name: String,
    /// Channels in joint order
    pub channels: Vec<AnimationChannel>,
}

impl AnimationClip {
    /// Clip whose channels target the given joint names
    pub fn from_targets(name: &str, targets: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            channels: targets
                .iter()
                .map(|t| AnimationChannel { target: NameHash::new(t) })
                .collect(),
        }
    }
}

/// Animation import errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnimationError {
    /// A bone does not match the channel at its position
    #[error("animation '{clip}' does not fit rig: bone {bone} does not match channel {channel}")]
    RigMismatch {
        /// Clip name
        clip: String,
        /// Offending bone
        bone: Entity,
        /// Channel index the bone was compared against
        channel: usize,
    },

    /// The rig has more bones than the clip has channels
    #[error("animation '{clip}' has {channels} channels but the rig has more bones")]
    MissingChannels {
        /// Clip name
        clip: String,
        /// Number of channels in the clip
        channels: usize,
    },

    /// The rig root is not a live entity
    #[error("rig root {0} is not a live entity")]
    InvalidRoot(Entity),
}

/// Check that `clip` fits the rig under `root`.
///
/// Returns the number of non-bone nodes preceding the first bone.
pub fn validate_animation_rig(
    store: &ComponentStore,
    root: Entity,
    clip: &AnimationClip,
) -> Result<u32, AnimationError> {
    if !store.is_live(root) {
        return Err(AnimationError::InvalidRoot(root));
    }

    let mut channel = 0;
    let mut joints_offset = 0;
    for node in store.build_hierarchy_node_list(root) {
        if !store.entities[node.index()].contains(EntityFlags::BONE) {
            if channel == 0 {
                joints_offset += 1;
            }
            continue;
        }

        let Some(expected) = clip.channels.get(channel) else {
            return Err(AnimationError::MissingChannels {
                clip: clip.name.clone(),
                channels: clip.channels.len(),
            });
        };

        if expected.target != store.name_hashes[node.index()] {
            return Err(AnimationError::RigMismatch {
                clip: clip.name.clone(),
                bone: node,
                channel,
            });
        }
        channel += 1;
    }

    Ok(joints_offset)
}

/// Validate `clip` against the rig under `root` and bind it.
///
/// On success the root gains [`EntityFlags::ANIM_CONTROLLER`] and `handle` is
/// appended to its controller if not already present. Rejections are logged.
pub fn attach_animation(
    store: &mut ComponentStore,
    root: Entity,
    handle: AnimationHandle,
    clip: &AnimationClip,
) -> Result<(), AnimationError> {
    let joints_offset = validate_animation_rig(store, root, clip).map_err(|err| {
        log::error!("[animation] {}", err);
        err
    })?;

    let index = root.index();
    let controller = &mut store.anim_controllers[index];
    controller.joints_offset = joints_offset;
    if !controller.handles.contains(&handle) {
        controller.handles.push(handle);
    }
    store.entities[index] |= EntityFlags::ANIM_CONTROLLER;

    log::info!("[animation] attached '{}' to {}", clip.name, store.names[index]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig(store: &mut ComponentStore) -> Entity {
        let root = store.create_node();
        store.set_name(root, "rig");

        let mut parent = root;
        for name in ["hip", "spine", "head"] {
            let bone = store.create_node();
            store.set_name(bone, name);
            store.entities[bone.index()] |= EntityFlags::BONE;
            store.set_parent(bone, parent);
            parent = bone;
        }
        root
    }

    #[test]
    fn test_matching_clip_attaches_once() {
        let mut store = ComponentStore::new();
        let root = rig(&mut store);
        let clip = AnimationClip::from_targets("walk", &["hip", "spine", "head"]);

        attach_animation(&mut store, root, AnimationHandle(3), &clip).unwrap();
        attach_animation(&mut store, root, AnimationHandle(3), &clip).unwrap();

        let controller = &store.anim_controllers[root.index()];
        assert_eq!(controller.handles, vec![AnimationHandle(3)]);
        assert_eq!(controller.joints_offset, 1);
        assert!(store.has(root, EntityFlags::ANIM_CONTROLLER));
    }

    #[test]
    fn test_mismatched_clip_rejected() {
        let mut store = ComponentStore::new();
        let root = rig(&mut store);
        let clip = AnimationClip::from_targets("wave", &["hip", "arm", "head"]);

        let err = attach_animation(&mut store, root, AnimationHandle(1), &clip).unwrap_err();
        assert!(matches!(err, AnimationError::RigMismatch { channel: 1, .. }));
        assert!(!store.has(root, EntityFlags::ANIM_CONTROLLER));
        assert!(store.anim_controllers[root.index()].handles.is_empty());
    }

    #[test]
    fn test_short_clip_rejected() {
        let mut store = ComponentStore::new();
        let root = rig(&mut store);
        let clip = AnimationClip::from_targets("short", &["hip"]);

        assert_eq!(
            validate_animation_rig(&store, root, &clip),
            Err(AnimationError::MissingChannels { clip: "short".to_string(), channels: 1 })
        );
    }
}
