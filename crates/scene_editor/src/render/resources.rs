//! Geometry and material lookup
//!
//! Resources are owned by the host and looked up read-only by name hash.

use std::collections::HashMap;

use crate::foundation::hash::NameHash;
use crate::foundation::math::{Vec3, Vec4};
use crate::render::device::BufferHandle;

/// A renderable primitive
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryResource {
    /// Resource name
    pub name: String,
    /// Hash of `name`
    pub id: NameHash,
    /// Vertex buffer
    pub vertex_buffer: BufferHandle,
    /// Index buffer
    pub index_buffer: BufferHandle,
    /// Number of indices
    pub num_indices: u32,
    /// Local-space minimum corner
    pub min_extents: Vec3,
    /// Local-space maximum corner
    pub max_extents: Vec3,
}

/// Shading parameters
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialResource {
    /// Resource name
    pub name: String,
    /// Hash of `name`
    pub id: NameHash,
    /// Base colour
    pub albedo: Vec4,
    /// Surface roughness
    pub roughness: f32,
    /// Metalness
    pub metallic: f32,
    /// Texture ids per slot
    pub textures: Vec<NameHash>,
}

/// Read-only resource lookup
pub trait ResourceLibrary {
    /// Geometry by name hash
    fn geometry(&self, id: NameHash) -> Option<&GeometryResource>;

    /// Material by name hash
    fn material(&self, id: NameHash) -> Option<&MaterialResource>;
}

/// Built-in primitive shapes the editor can add to a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Unit cube
    Cube,
    /// Unit cylinder
    Cylinder,
    /// Unit sphere
    Sphere,
    /// Unit capsule
    Capsule,
    /// Unit cone
    Cone,
}

impl Primitive {
    /// Every primitive, in menu order
    pub const ALL: [Self; 5] = [Self::Cube, Self::Cylinder, Self::Sphere, Self::Capsule, Self::Cone];

    /// Resource name of the primitive's geometry
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cube => "cube",
            Self::Cylinder => "cylinder",
            Self::Sphere => "sphere",
            Self::Capsule => "capsule",
            Self::Cone => "cone",
        }
    }
}

/// Name of the material assigned to new primitives
pub const DEFAULT_MATERIAL: &str = "default_material";

/// In-memory library keyed by name hash
#[derive(Debug, Default)]
pub struct ResourceMap {
    geometry: HashMap<NameHash, GeometryResource>,
    materials: HashMap<NameHash, MaterialResource>,
}

impl ResourceMap {
    /// Empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Library holding the unit primitives and the default material
    pub fn with_primitives() -> Self {
        let mut map = Self::new();
        for (i, primitive) in Primitive::ALL.iter().enumerate() {
            let name = primitive.name();
            let buffer = u32::try_from(i * 2).unwrap_or(u32::MAX);
            map.add_geometry(GeometryResource {
                name: name.to_string(),
                id: NameHash::new(name),
                vertex_buffer: BufferHandle(buffer),
                index_buffer: BufferHandle(buffer + 1),
                num_indices: 36,
                min_extents: Vec3::repeat(-1.0),
                max_extents: Vec3::repeat(1.0),
            });
        }

        map.add_material(MaterialResource {
            name: DEFAULT_MATERIAL.to_string(),
            id: NameHash::new(DEFAULT_MATERIAL),
            albedo: Vec4::new(1.0, 1.0, 1.0, 1.0),
            roughness: 0.5,
            metallic: 0.0,
            textures: Vec::new(),
        });
        map
    }

    /// Register a geometry resource
    pub fn add_geometry(&mut self, geometry: GeometryResource) {
        self.geometry.insert(geometry.id, geometry);
    }

    /// Register a material resource
    pub fn add_material(&mut self, material: MaterialResource) {
        self.materials.insert(material.id, material);
    }
}

impl ResourceLibrary for ResourceMap {
    fn geometry(&self, id: NameHash) -> Option<&GeometryResource> {
        self.geometry.get(&id)
    }

    fn material(&self, id: NameHash) -> Option<&MaterialResource> {
        self.materials.get(&id)
    }
}
