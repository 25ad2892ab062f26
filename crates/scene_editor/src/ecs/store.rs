//! Component store
//!
//! Structure-of-arrays scene storage. Every component kind lives in its own
//! `Vec`, indexed by [`Entity`]; all of them always have the same length
//! (the store's capacity) and grow together.
//!
//! Presence of a component is tracked by [`EntityFlags`] rather than by
//! `Option`s, so a dead slot keeps its stale data until it is reused. Slots
//! are recycled through a LIFO free list.
//!
//! The arrays are public so systems can iterate a single component kind
//! directly. Never push to or truncate them; go through
//! [`ComponentStore::allocate`] and friends.

use std::ops::Range;

use crate::ecs::components::{
    AnimationController, BoundingVolume, GeometryComponent, LightComponent, LightFactory,
    MasterInstance, MaterialComponent, PerDrawCall, PhysicsComponent,
};
use crate::ecs::entity::Entity;
use crate::ecs::flags::{EntityFlags, SceneFlags, StateFlags};
use crate::foundation::hash::NameHash;
use crate::foundation::math::{Mat4, Transform, Vec3};
use crate::physics::PhysicsHandle;
use crate::render::resources::{GeometryResource, MaterialResource};

const MIN_CAPACITY: usize = 64;

macro_rules! component_store {
    ($( $(#[$meta:meta])* $field:ident : $ty:ty ),* $(,)?) => {
        /// Parallel component arrays plus allocation bookkeeping
        #[derive(Debug, Clone)]
        pub struct ComponentStore {
            $( $(#[$meta])* pub $field: Vec<$ty>, )*
            num_nodes: usize,
            free_list: Vec<u32>,
            /// Scene-wide flags
            pub scene_flags: SceneFlags,
        }

        impl ComponentStore {
            fn empty() -> Self {
                Self {
                    $( $field: Vec::new(), )*
                    num_nodes: 0,
                    free_list: Vec::new(),
                    scene_flags: SceneFlags::empty(),
                }
            }

            fn resize_arrays(&mut self, capacity: usize) {
                $( self.$field.resize_with(capacity, Default::default); )*
            }

            fn reset_row(&mut self, index: usize) {
                $( self.$field[index] = Default::default(); )*
            }

            /// Copy every component of row `src` into row `dst`
            pub(crate) fn copy_row(&mut self, src: usize, dst: usize) {
                $( self.$field[dst] = self.$field[src].clone(); )*
            }

            /// Lengths of every component array
            pub fn array_lengths(&self) -> Vec<usize> {
                vec![$( self.$field.len() ),*]
            }
        }
    };
}

component_store! {
    /// Component presence mask
    entities: EntityFlags,
    /// Editor state bits
    state_flags: StateFlags,
    /// Display names
    names: String,
    /// Hashes of `names`
    name_hashes: NameHash,
    /// Parent slot; equal to the entity's own index for roots
    parents: u32,
    /// Local transforms
    transforms: Transform,
    /// Local matrices built from `transforms`
    local_matrices: Mat4,
    /// World matrices
    world_matrices: Mat4,
    /// Local and world bounds
    bounding_volumes: BoundingVolume,
    /// Renderable geometry
    geometries: GeometryComponent,
    /// Materials
    materials: MaterialComponent,
    /// Rigid body parameters
    physics_data: PhysicsComponent,
    /// Rigid bodies created in the physics world
    physics_handles: Option<PhysicsHandle>,
    /// Light data
    lights: LightComponent,
    /// Animation controllers
    anim_controllers: AnimationController,
    /// Instance blocks owned by master entities
    master_instances: MasterInstance,
    /// Draw constants derived from the world matrix
    draw_calls: PerDrawCall,
}

impl Default for ComponentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentStore {
    /// Empty store with a small initial capacity
    pub fn new() -> Self {
        Self::with_capacity(MIN_CAPACITY)
    }

    /// Empty store with room for `capacity` entities before growing
    pub fn with_capacity(capacity: usize) -> Self {
        let mut store = Self::empty();
        store.resize_arrays(capacity.max(1));
        store
    }

    /// Length of every component array
    pub fn capacity(&self) -> usize {
        self.entities.len()
    }

    /// One past the highest slot ever handed out (since the last trim)
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Number of live entities
    pub fn live_count(&self) -> usize {
        self.entities[..self.num_nodes]
            .iter()
            .filter(|flags| flags.contains(EntityFlags::ALLOCATED))
            .count()
    }

    /// Free slots below `num_nodes`, next to be reused last
    pub fn free_list(&self) -> &[u32] {
        &self.free_list
    }

    /// Whether `entity` refers to a live slot
    pub fn is_live(&self, entity: Entity) -> bool {
        entity.index() < self.num_nodes
            && self.entities[entity.index()].contains(EntityFlags::ALLOCATED)
    }

    /// Whether `entity` is live and carries all of `flags`
    pub fn has(&self, entity: Entity, flags: EntityFlags) -> bool {
        self.is_live(entity) && self.entities[entity.index()].contains(flags)
    }

    /// Iterate live entities in index order
    pub fn iter_live(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities[..self.num_nodes]
            .iter()
            .enumerate()
            .filter(|(_, flags)| flags.contains(EntityFlags::ALLOCATED))
            .map(|(i, _)| Entity::new(slot_id(i)))
    }

    /// Parent of a live entity, `None` for roots and dead handles
    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        if !self.is_live(entity) {
            return None;
        }
        let parent = self.parents[entity.index()];
        (parent != entity.id()).then(|| Entity::new(parent))
    }

    fn grow(&mut self, required: usize) {
        let mut capacity = self.capacity().max(MIN_CAPACITY);
        while capacity < required {
            capacity *= 2;
        }
        if capacity > self.capacity() {
            log::debug!("Growing component store {} -> {}", self.capacity(), capacity);
            self.resize_arrays(capacity);
        }
    }

    fn init_row(&mut self, index: usize) {
        self.reset_row(index);
        self.entities[index] = EntityFlags::ALLOCATED;
        self.parents[index] = slot_id(index);
        self.local_matrices[index] = Mat4::identity();
        self.world_matrices[index] = Mat4::identity();
    }

    /// Allocate a slot, reusing the most recently freed one first
    pub fn allocate(&mut self) -> Entity {
        let index = match self.free_list.pop() {
            Some(index) => index as usize,
            None => {
                let index = self.num_nodes;
                self.grow(index + 1);
                self.num_nodes += 1;
                index
            }
        };

        self.init_row(index);
        Entity::new(slot_id(index))
    }

    /// Allocate `count` fresh slots in one ascending block at the end of the store
    pub fn allocate_contiguous(&mut self, count: usize) -> Range<u32> {
        let start = self.num_nodes;
        self.grow(start + count);
        self.num_nodes += count;

        for index in start..start + count {
            self.init_row(index);
        }
        slot_id(start)..slot_id(start + count)
    }

    /// Release a slot. The caller removes it from the selection and
    /// re-parents its children beforehand.
    pub fn deallocate(&mut self, entity: Entity) {
        if !self.is_live(entity) {
            return;
        }

        let index = entity.index();
        self.entities[index] = EntityFlags::empty();
        self.state_flags[index] = StateFlags::empty();
        self.free_list.push(entity.id());
    }

    /// Rebuild the free list from the flags in one scan.
    ///
    /// Trailing dead slots are trimmed from `num_nodes`; the remaining holes
    /// are queued so the lowest index is reused first.
    pub fn rebuild_free_list(&mut self) {
        self.free_list.clear();

        let last_live = self.entities[..self.num_nodes]
            .iter()
            .rposition(|flags| flags.contains(EntityFlags::ALLOCATED));
        self.num_nodes = last_live.map_or(0, |i| i + 1);

        for index in (0..self.num_nodes).rev() {
            if !self.entities[index].contains(EntityFlags::ALLOCATED) {
                self.free_list.push(slot_id(index));
            }
        }

        self.scene_flags |= SceneFlags::INVALIDATE_SCENE_TREE;
    }

    /// Remove every entity
    pub fn clear(&mut self) {
        for flags in &mut self.entities {
            *flags = EntityFlags::empty();
        }
        for state in &mut self.state_flags {
            *state = StateFlags::empty();
        }
        self.num_nodes = 0;
        self.free_list.clear();
        self.scene_flags |= SceneFlags::INVALIDATE_SCENE_TREE;
    }

    /// Rename an entity
    pub fn set_name(&mut self, entity: Entity, name: &str) {
        if !self.is_live(entity) {
            return;
        }
        self.names[entity.index()] = name.to_string();
        self.name_hashes[entity.index()] = NameHash::new(name);
    }

    /// Set an entity's local transform
    pub fn set_transform(&mut self, entity: Entity, transform: Transform) {
        if !self.is_live(entity) {
            return;
        }
        self.transforms[entity.index()] = transform;
        self.entities[entity.index()] |= EntityFlags::TRANSFORM;
    }

    /// Add an empty transform node named `node_<index>`
    pub fn create_node(&mut self) -> Entity {
        let entity = self.allocate();
        self.set_name(entity, &format!("node_{}", entity.id()));
        self.set_transform(entity, Transform::identity());
        self.scene_flags |= SceneFlags::INVALIDATE_SCENE_TREE;
        entity
    }

    /// Attach geometry and take its bounds
    pub fn instantiate_geometry(&mut self, entity: Entity, geometry: &GeometryResource) {
        if !self.is_live(entity) {
            return;
        }
        let index = entity.index();
        self.geometries[index] = GeometryComponent::from(geometry);
        self.bounding_volumes[index] = BoundingVolume::from_extents(geometry.min_extents, geometry.max_extents);
        self.entities[index] |= EntityFlags::GEOMETRY;
    }

    /// Attach a material
    pub fn instantiate_material(&mut self, entity: Entity, material: &MaterialResource) {
        if !self.is_live(entity) {
            return;
        }
        self.materials[entity.index()] = MaterialComponent::from(material);
        self.entities[entity.index()] |= EntityFlags::MATERIAL;
    }

    /// Add a light entity at `position`
    pub fn create_light(&mut self, name: &str, position: Vec3, light: LightComponent) -> Entity {
        let entity = self.allocate();
        let index = entity.index();
        self.set_name(entity, name);
        self.set_transform(entity, Transform::from_translation(position));
        self.lights[index] = light;
        self.bounding_volumes[index] = BoundingVolume::from_extents(Vec3::repeat(-1.0), Vec3::repeat(1.0));
        self.entities[index] |= EntityFlags::LIGHT;
        self.scene_flags |= SceneFlags::INVALIDATE_SCENE_TREE;
        entity
    }

    /// Reset to the editor's starting scene: a single white key light
    pub fn default_scene(&mut self) {
        self.clear();
        self.create_light(
            "front_light",
            Vec3::new(100.0, 100.0, 100.0),
            LightFactory::directional(Vec3::new(1.0, 1.0, 1.0)),
        );
        self.update_world_transforms();
    }

    /// Propagate local transforms to world matrices, bounds and draw constants.
    ///
    /// Entities flagged `TRANSFORM` rebuild their local matrix from
    /// `transforms`; others keep the local matrix they were given.
    /// One forward pass in index order; parents always precede their
    /// children, so every parent's world matrix is final when a child reads it.
    pub fn update_world_transforms(&mut self) {
        for index in 0..self.num_nodes {
            if !self.entities[index].contains(EntityFlags::ALLOCATED) {
                continue;
            }

            if self.entities[index].contains(EntityFlags::TRANSFORM) {
                self.local_matrices[index] = self.transforms[index].to_matrix();
            }
            let local = self.local_matrices[index];

            let parent = self.parents[index] as usize;
            let live_parent = parent != index
                && parent < index
                && self.entities[parent].contains(EntityFlags::ALLOCATED);

            self.world_matrices[index] = if live_parent {
                self.world_matrices[parent] * local
            } else {
                local
            };

            let ancestor_selected = live_parent
                && self.state_flags[parent].intersects(StateFlags::SELECTED | StateFlags::CHILD_SELECTED);
            self.state_flags[index].set(StateFlags::CHILD_SELECTED, ancestor_selected);

            let world = self.world_matrices[index];
            self.bounding_volumes[index].update(&world);
            self.draw_calls[index] = PerDrawCall::from_world(&world);
        }
    }

    /// Find a live entity by name
    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        let hash = NameHash::new(name);
        self.iter_live().find(|e| self.name_hashes[e.index()] == hash)
    }
}

/// Slot index as an entity id. Slot counts never approach `u32::MAX`.
#[allow(clippy::cast_possible_truncation)]
pub(crate) const fn slot_id(index: usize) -> u32 {
    index as u32
}
