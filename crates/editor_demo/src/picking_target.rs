//! CPU stand-in for the renderer's picking pass
//!
//! Rasterises each geometry entity's projected world bounds into an index
//! buffer, nearest box wins. Read-backs queue up and complete on `flush`,
//! one frame after they were requested, the way a GPU copy would.

use scene_editor::ecs::{ComponentStore, EntityFlags};
use scene_editor::foundation::hash::NameHash;
use scene_editor::foundation::math::Vec3;
use scene_editor::render::device::{
    BufferDesc, BufferHandle, ReadbackCallback, ReadbackParams, RenderDevice, RenderTargetInfo,
};
use scene_editor::render::{Camera, NO_ENTITY, Viewport};
use scene_editor::scene::AABB;

pub struct SoftwarePickingTarget {
    name: NameHash,
    width: u32,
    height: u32,
    indices: Vec<u32>,
    depth: Vec<f32>,
    pending: Vec<(ReadbackParams, ReadbackCallback)>,
    buffers: u32,
}

impl SoftwarePickingTarget {
    pub fn new(target_name: &str, width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            name: NameHash::new(target_name),
            width,
            height,
            indices: vec![NO_ENTITY; size],
            depth: vec![f32::MAX; size],
            pending: Vec::new(),
            buffers: 0,
        }
    }

    /// Redraw the index buffer for the current scene and camera
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn rasterize(&mut self, store: &ComponentStore, camera: &Camera, viewport: &Viewport) {
        self.indices.fill(NO_ENTITY);
        self.depth.fill(f32::MAX);

        for entity in store.iter_live() {
            if !store.has(entity, EntityFlags::GEOMETRY) {
                continue;
            }

            let bv = &store.bounding_volumes[entity.index()];
            let (min, max) = (bv.transformed_min_extents, bv.transformed_max_extents);
            let corners = (0..8).map(|c| {
                Vec3::new(
                    if c & 1 == 0 { min.x } else { max.x },
                    if c & 2 == 0 { min.y } else { max.y },
                    if c & 4 == 0 { min.z } else { max.z },
                )
            });

            let mut rect = AABB::empty();
            for corner in corners {
                let screen = camera.project(&corner, viewport);
                rect.expand(&screen, &screen);
            }
            let (lo, hi) = (rect.min, rect.max);
            if lo.z < 0.0 || hi.z > 1.0 {
                continue;
            }

            let x0 = lo.x.max(0.0) as u32;
            let y0 = lo.y.max(0.0) as u32;
            let x1 = (hi.x.min(self.width as f32 - 1.0)).max(0.0) as u32;
            let y1 = (hi.y.min(self.height as f32 - 1.0)).max(0.0) as u32;

            for y in y0..=y1 {
                for x in x0..=x1 {
                    let pixel = (y * self.width + x) as usize;
                    if lo.z < self.depth[pixel] {
                        self.depth[pixel] = lo.z;
                        self.indices[pixel] = entity.id();
                    }
                }
            }
        }
    }

    /// Complete every queued read-back, returning how many ran
    pub fn flush(&mut self) -> usize {
        let bytes: Vec<u8> = self.indices.iter().flat_map(|i| i.to_le_bytes()).collect();
        let count = self.pending.len();
        for (params, callback) in self.pending.drain(..) {
            callback(&bytes, params.row_pitch, params.block_size);
        }
        count
    }
}

impl RenderDevice for SoftwarePickingTarget {
    fn render_target(&self, name: NameHash) -> Option<RenderTargetInfo> {
        (name == self.name).then_some(RenderTargetInfo {
            width: self.width,
            height: self.height,
        })
    }

    fn read_back(&mut self, params: ReadbackParams, callback: ReadbackCallback) {
        log::trace!("Queued read-back of {} bytes", params.data_size);
        self.pending.push((params, callback));
    }

    fn create_buffer(&mut self, desc: &BufferDesc) -> BufferHandle {
        self.buffers += 1;
        log::debug!("Created {:?} buffer of {} bytes", desc.usage, desc.size);
        BufferHandle(self.buffers)
    }
}
