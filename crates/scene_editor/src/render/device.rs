//! Renderer boundary
//!
//! The editor never talks to a graphics API directly. It asks a
//! [`RenderDevice`] for render-target dimensions, schedules read-backs and
//! creates buffers; the host renderer decides when and on which thread a
//! read-back completes.

use crate::foundation::hash::NameHash;

/// Opaque GPU buffer id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

/// Dimensions of a named render target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTargetInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Parameters of a colour-target read-back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadbackParams {
    /// Target to read
    pub target: NameHash,
    /// Bytes per row in the returned buffer
    pub row_pitch: u32,
    /// Bytes per element
    pub block_size: u32,
    /// Total bytes requested
    pub data_size: u32,
}

/// Completion callback: raw data, row pitch and block size.
///
/// May be invoked on any thread, any number of frames after the request.
pub type ReadbackCallback = Box<dyn FnOnce(&[u8], u32, u32) + Send>;

/// Buffer usage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Rewritten by the CPU every frame
    DynamicVertex,
    /// Immutable vertex data
    Vertex,
    /// Immutable index data
    Index,
}

/// Buffer creation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferDesc {
    /// How the buffer is used
    pub usage: BufferUsage,
    /// Size in bytes
    pub size: usize,
}

/// The renderer operations the editor core depends on
pub trait RenderDevice {
    /// Look up a render target by name
    fn render_target(&self, name: NameHash) -> Option<RenderTargetInfo>;

    /// Schedule a read-back of a colour target
    fn read_back(&mut self, params: ReadbackParams, callback: ReadbackCallback);

    /// Create a GPU buffer
    fn create_buffer(&mut self, desc: &BufferDesc) -> BufferHandle;
}
