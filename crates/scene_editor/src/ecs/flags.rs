//! Per-entity and per-scene flag sets

use bitflags::bitflags;

bitflags! {
    /// Component presence mask. An entity is live iff `ALLOCATED` is set.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct EntityFlags: u32 {
        /// Slot is in use
        const ALLOCATED       = 1 << 0;
        /// Has renderable geometry
        const GEOMETRY        = 1 << 1;
        /// Has a material
        const MATERIAL        = 1 << 2;
        /// Local matrix is driven by the transform component
        const TRANSFORM       = 1 << 3;
        /// Has light data
        const LIGHT           = 1 << 4;
        /// Has a rigid body
        const PHYSICS         = 1 << 5;
        /// Has a physics constraint
        const CONSTRAINT      = 1 << 6;
        /// Skeleton joint
        const BONE            = 1 << 7;
        /// Drives animation clips
        const ANIM_CONTROLLER = 1 << 8;
        /// Root motion node of an animated rig
        const ANIM_TRAJECTORY = 1 << 9;
        /// Owns per-instance GPU data for a contiguous block of siblings
        const MASTER_INSTANCE = 1 << 10;
    }
}

bitflags! {
    /// Editor state bits mirrored from the selection set
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct StateFlags: u32 {
        /// Entity is in the selection set
        const SELECTED       = 1 << 0;
        /// An ancestor of the entity is selected
        const CHILD_SELECTED = 1 << 1;
    }
}

bitflags! {
    /// Scene-wide flags
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct SceneFlags: u32 {
        /// Cached scene tree is stale
        const INVALIDATE_SCENE_TREE = 1 << 0;
        /// Simulation and animation updates are paused
        const PAUSE_UPDATE          = 1 << 1;
    }
}
