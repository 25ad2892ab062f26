//! Test doubles for the render and physics boundaries

use crate::foundation::hash::NameHash;
use crate::foundation::math::{Quat, Vec3};
use crate::physics::{
    ConstraintParams, PhysicsCommand, PhysicsHandle, PhysicsWorld, RayCastCallback, RayCastParams, RayCastResult,
};
use crate::render::device::{
    BufferDesc, BufferHandle, ReadbackCallback, ReadbackParams, RenderDevice, RenderTargetInfo,
};

/// Render device that queues read-backs until the test completes them
#[derive(Default)]
pub struct RecordingDevice {
    picking: Option<RenderTargetInfo>,
    pending: Vec<(ReadbackParams, ReadbackCallback)>,
    total: usize,
    pub buffers: Vec<BufferDesc>,
}

impl RecordingDevice {
    pub fn with_picking_target(width: u32, height: u32) -> Self {
        Self {
            picking: Some(RenderTargetInfo { width, height }),
            ..Self::default()
        }
    }

    pub fn pending_readbacks(&self) -> usize {
        self.pending.len()
    }

    pub fn total_readbacks(&self) -> usize {
        self.total
    }

    /// Fill the picking target from `index_at(x, y)` and run every queued callback
    pub fn complete_readbacks(&mut self, index_at: impl Fn(u32, u32) -> u32) {
        for (params, callback) in self.pending.drain(..) {
            let width = params.row_pitch / params.block_size;
            let height = params.data_size / params.row_pitch;
            let mut data = vec![0u8; params.data_size as usize];
            for y in 0..height {
                for x in 0..width {
                    let offset = (y * params.row_pitch + x * params.block_size) as usize;
                    data[offset..offset + 4].copy_from_slice(&index_at(x, y).to_le_bytes());
                }
            }
            callback(&data, params.row_pitch, params.block_size);
        }
    }
}

impl RenderDevice for RecordingDevice {
    fn render_target(&self, name: NameHash) -> Option<RenderTargetInfo> {
        if name == NameHash::new("picking") { self.picking } else { None }
    }

    fn read_back(&mut self, params: ReadbackParams, callback: ReadbackCallback) {
        self.total += 1;
        self.pending.push((params, callback));
    }

    fn create_buffer(&mut self, desc: &BufferDesc) -> BufferHandle {
        self.buffers.push(*desc);
        BufferHandle(u32::try_from(self.buffers.len()).unwrap_or(u32::MAX))
    }
}

/// Physics world that records every call and answers ray casts with a fixed result
#[derive(Default)]
pub struct ScriptedPhysics {
    hit: Option<(PhysicsHandle, Vec3)>,
    pub ray_casts: Vec<RayCastParams>,
    pub constraints: Vec<ConstraintParams>,
    pub vector_commands: Vec<(PhysicsHandle, Vec3, PhysicsCommand)>,
    pub transforms: Vec<(PhysicsHandle, Vec3, Quat)>,
    pub released: Vec<PhysicsHandle>,
}

impl ScriptedPhysics {
    pub fn hitting(body: PhysicsHandle, point: Vec3) -> Self {
        Self {
            hit: Some((body, point)),
            ..Self::default()
        }
    }
}

impl PhysicsWorld for ScriptedPhysics {
    fn cast_ray(&mut self, params: RayCastParams, callback: RayCastCallback) {
        self.ray_casts.push(params);
        let result = match self.hit {
            Some((body, point)) => RayCastResult {
                point,
                physics_handle: Some(body),
            },
            None => RayCastResult {
                point: params.end,
                physics_handle: None,
            },
        };
        callback(result);
    }

    fn add_constraint(&mut self, params: ConstraintParams) -> PhysicsHandle {
        self.constraints.push(params);
        PhysicsHandle(1000 + u32::try_from(self.constraints.len()).unwrap_or(0))
    }

    fn set_v3(&mut self, handle: PhysicsHandle, value: Vec3, command: PhysicsCommand) {
        self.vector_commands.push((handle, value, command));
    }

    fn set_transform(&mut self, handle: PhysicsHandle, position: Vec3, rotation: Quat) {
        self.transforms.push((handle, position, rotation));
    }

    fn release_entity(&mut self, handle: PhysicsHandle) {
        self.released.push(handle);
    }
}
