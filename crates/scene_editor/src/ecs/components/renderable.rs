//! Geometry and material components
//!
//! Rows hold copies of the resource data the renderer needs; the resource
//! library remains the owner of the GPU objects.

use crate::foundation::hash::NameHash;
use crate::foundation::math::Vec4;
use crate::render::device::BufferHandle;
use crate::render::resources::{GeometryResource, MaterialResource};

/// Renderable primitive attached to an entity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryComponent {
    /// Resource name the geometry was instantiated from
    pub name: String,
    /// Hash of `name`
    pub resource: NameHash,
    /// Vertex buffer
    pub vertex_buffer: BufferHandle,
    /// Index buffer
    pub index_buffer: BufferHandle,
    /// Number of indices to draw
    pub num_indices: u32,
}

impl From<&GeometryResource> for GeometryComponent {
    fn from(resource: &GeometryResource) -> Self {
        Self {
            name: resource.name.clone(),
            resource: resource.id,
            vertex_buffer: resource.vertex_buffer,
            index_buffer: resource.index_buffer,
            num_indices: resource.num_indices,
        }
    }
}

/// Material attached to an entity
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialComponent {
    /// Resource name the material was instantiated from
    pub name: String,
    /// Hash of `name`
    pub resource: NameHash,
    /// Base colour
    pub albedo: Vec4,
    /// Surface roughness
    pub roughness: f32,
    /// Metalness
    pub metallic: f32,
    /// Texture ids bound to the material's slots
    pub textures: Vec<NameHash>,
}

impl Default for MaterialComponent {
    fn default() -> Self {
        Self {
            name: String::new(),
            resource: NameHash::default(),
            albedo: Vec4::new(1.0, 1.0, 1.0, 1.0),
            roughness: 0.5,
            metallic: 0.0,
            textures: Vec::new(),
        }
    }
}

impl From<&MaterialResource> for MaterialComponent {
    fn from(resource: &MaterialResource) -> Self {
        Self {
            name: resource.name.clone(),
            resource: resource.id,
            albedo: resource.albedo,
            roughness: resource.roughness,
            metallic: resource.metallic,
            textures: resource.textures.clone(),
        }
    }
}
