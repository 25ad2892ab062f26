//! Animation controller component

use crate::ecs::animation::AnimationHandle;

/// Clips bound to a rig root
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationController {
    /// Attached clips in attach order
    pub handles: Vec<AnimationHandle>,
    /// Number of non-bone nodes preceding the first joint in the rig's node list
    pub joints_offset: u32,
    /// Index into `handles` of the clip currently playing
    pub current_animation: Option<usize>,
    /// Playback position in seconds
    pub current_time: f32,
    /// Whether playback advances each frame
    pub play_flags: bool,
}
