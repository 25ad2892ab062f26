//! Instancing data
//!
//! A master instance owns one GPU buffer holding a [`PerDrawCall`] for each
//! entity of its contiguous block.

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::Mat4;
use crate::render::device::BufferHandle;

/// Per-entity draw constants, laid out for upload
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PerDrawCall {
    /// World matrix, column major
    pub world_matrix: [[f32; 4]; 4],
    /// Inverse transpose of the world matrix, column major
    pub world_matrix_inv_transpose: [[f32; 4]; 4],
}

impl PerDrawCall {
    /// Build draw constants from a world matrix
    pub fn from_world(world: &Mat4) -> Self {
        let inv_transpose = world.try_inverse().unwrap_or_else(Mat4::identity).transpose();
        Self {
            world_matrix: (*world).into(),
            world_matrix_inv_transpose: inv_transpose.into(),
        }
    }
}

/// Instance block owned by a master entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MasterInstance {
    /// Entities in the block, master included
    pub num_instances: u32,
    /// Bytes per instance
    pub instance_stride: u32,
    /// Dynamic vertex buffer holding `num_instances` draw constants
    pub instance_buffer: BufferHandle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride_is_two_matrices() {
        assert_eq!(std::mem::size_of::<PerDrawCall>(), 128);
        let call = PerDrawCall::from_world(&Mat4::identity());
        let bytes = bytemuck::bytes_of(&call);
        assert_eq!(bytes.len(), 128);
    }
}
