//! Rendering boundary
//!
//! Camera math plus the traits and handoff types the editor uses to talk to
//! an external renderer.

pub mod camera;
pub mod device;
pub mod readback;
pub mod resources;

pub use camera::{Camera, Viewport};
pub use device::{BufferDesc, BufferHandle, BufferUsage, ReadbackCallback, ReadbackParams, RenderDevice, RenderTargetInfo};
pub use readback::{PickingReadback, decode_entity_index, NO_ENTITY};
pub use resources::{GeometryResource, MaterialResource, Primitive, ResourceLibrary, ResourceMap, DEFAULT_MATERIAL};
