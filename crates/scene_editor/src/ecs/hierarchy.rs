//! Hierarchy manager
//!
//! Parent/child edits over the [`ComponentStore`]. The store keeps every
//! parent at a lower index than its descendants; that ordering lets world
//! transforms propagate in a single forward pass, and instancing relies on
//! siblings occupying one contiguous index range.
//!
//! Edits that cannot keep the ordering in place re-lay the affected nodes
//! into a fresh block at the end of the store instead of failing.

use std::ops::Range;

use crate::ecs::entity::Entity;
use crate::ecs::components::{MasterInstance, PerDrawCall};
use crate::ecs::flags::{EntityFlags, SceneFlags, StateFlags};
use crate::ecs::selection::SelectionSet;
use crate::ecs::store::{ComponentStore, slot_id};
use crate::foundation::hash::NameHash;
use crate::foundation::math::Vec3;
use crate::physics::PhysicsWorld;
use crate::render::device::{BufferDesc, BufferUsage, RenderDevice};

/// How [`ComponentStore::clone_node`] treats names, positions and parents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneMode {
    /// Re-layout: keep name and position, keep parent offsets inside the block
    Move,
    /// Duplicate: append a suffix and offset the position
    Instantiate,
}

/// Result of [`parent_selection`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentOutcome {
    /// Fewer than two entities selected
    Skipped,
    /// Selection was already ordered; members were parented in place
    InPlace,
    /// Selection was cloned into a new contiguous block
    Relaid(Range<u32>),
}

impl ComponentStore {
    /// Make `parent` the parent of `child`.
    ///
    /// No-op unless both are live and `parent` does not come after `child`.
    /// Passing the child itself as parent turns it into a root.
    pub fn set_parent(&mut self, child: Entity, parent: Entity) -> bool {
        if !self.is_live(child) || !self.is_live(parent) || parent > child {
            return false;
        }

        self.parents[child.index()] = parent.id();
        self.scene_flags |= SceneFlags::INVALIDATE_SCENE_TREE;
        true
    }

    /// Deep-copy every component of `src` into the allocated slot `dst`.
    ///
    /// `base` is the first slot of the block `dst` belongs to. A parent that
    /// sits at the same distance before `dst` inside the block as it did
    /// before `src` is remapped into the block; any other parent is kept.
    pub fn clone_node(
        &mut self,
        src: Entity,
        dst: Entity,
        base: Entity,
        mode: CloneMode,
        offset: Vec3,
        name_suffix: &str,
    ) {
        if !self.is_live(src) || !self.is_live(dst) || src == dst {
            return;
        }

        let (s, d) = (src.index(), dst.index());
        self.copy_row(s, d);
        self.state_flags[d] = StateFlags::empty();
        self.physics_handles[d] = None;
        self.entities[d].remove(EntityFlags::MASTER_INSTANCE);
        self.master_instances[d] = MasterInstance::default();

        let parent = self.parents[s];
        self.parents[d] = if parent == src.id() {
            dst.id()
        } else {
            let distance = src.id().saturating_sub(parent);
            match dst.id().checked_sub(distance) {
                Some(candidate) if candidate >= base.id() && candidate < dst.id() => candidate,
                _ => parent,
            }
        };

        if mode == CloneMode::Instantiate {
            let name = format!("{}{}", self.names[s], name_suffix);
            self.name_hashes[d] = NameHash::new(&name);
            self.names[d] = name;

            let parent_in_block = self.parents[d] >= base.id() && self.parents[d] < dst.id();
            if !parent_in_block {
                self.transforms[d].translation += offset;
                self.entities[d] |= EntityFlags::TRANSFORM;
            }
        }

        self.scene_flags |= SceneFlags::INVALIDATE_SCENE_TREE;
    }

    /// Depth-first pre-order list of the subtree under `root`, root first.
    ///
    /// Empty for a dead root.
    pub fn build_hierarchy_node_list(&self, root: Entity) -> Vec<Entity> {
        if !self.is_live(root) {
            return Vec::new();
        }

        let start = root.index();
        let end = self.num_nodes();
        let mut children: Vec<Vec<u32>> = vec![Vec::new(); end - start];
        for index in start + 1..end {
            if !self.entities[index].contains(EntityFlags::ALLOCATED) {
                continue;
            }
            let parent = self.parents[index] as usize;
            if parent >= start && parent < index {
                children[parent - start].push(slot_id(index));
            }
        }

        let mut list = Vec::new();
        let mut stack = vec![root.id()];
        while let Some(node) = stack.pop() {
            list.push(Entity::new(node));
            stack.extend(children[node as usize - start].iter().rev());
        }
        list
    }

    /// Deallocate a single node. Children are left in place.
    pub fn delete_entity(&mut self, entity: Entity) {
        if !self.is_live(entity) {
            return;
        }
        self.deallocate(entity);
        self.scene_flags |= SceneFlags::INVALIDATE_SCENE_TREE;
    }

    /// Duplicate the subtree under `root` into a new contiguous block.
    ///
    /// The copy of `root` keeps the original's parent; internal parents are
    /// remapped into the block.
    pub fn clone_subtree(&mut self, root: Entity, offset: Vec3, name_suffix: &str) -> Option<Range<u32>> {
        let nodes = self.build_hierarchy_node_list(root);
        if nodes.is_empty() {
            return None;
        }

        let block = self.allocate_contiguous(nodes.len());
        let base = Entity::new(block.start);

        for (k, &src) in nodes.iter().enumerate() {
            let dst = Entity::new(block.start + slot_id(k));
            let node_offset = if k == 0 { offset } else { Vec3::zeros() };
            self.clone_node(src, dst, base, CloneMode::Instantiate, node_offset, name_suffix);

            if k > 0 {
                let parent = self.parents[src.index()];
                if let Some(j) = nodes.iter().position(|n| n.id() == parent) {
                    self.parents[dst.index()] = block.start + slot_id(j);
                }
            }
        }

        Some(block)
    }
}

/// Parent the selection to its primary entity.
///
/// If the other members already lie after the primary within
/// `selection.len()` slots, root members are parented in place. Otherwise
/// the selection is cloned in order into a fresh block, the root clones are
/// parented to the first clone and the clones become the selection; the
/// originals are left untouched.
pub fn parent_selection(store: &mut ComponentStore, selection: &mut SelectionSet) -> ParentOutcome {
    selection.retain_live(store);
    let size = selection.len();
    let Some(parent) = selection.primary() else {
        return ParentOutcome::Skipped;
    };
    if size <= 1 {
        return ParentOutcome::Skipped;
    }

    let rest = &selection.as_slice()[1..];
    let last = rest.iter().map(|e| e.id()).max().unwrap_or(parent.id());
    let contiguous = rest.iter().all(|&e| e > parent)
        && last as usize <= parent.index() + size;

    let outcome = if contiguous {
        log::info!("[parent] selection is contiguous {} to {} size {}", parent.id(), last, size);
        for &member in rest {
            if store.parent(member).is_none() {
                store.set_parent(member, parent);
            }
        }
        ParentOutcome::InPlace
    } else {
        log::info!("[parent] selection is not contiguous, moving {} nodes", size);
        let members: Vec<Entity> = selection.iter().collect();
        let block = store.allocate_contiguous(size);
        let base = Entity::new(block.start);

        for (k, &src) in members.iter().enumerate() {
            let dst = Entity::new(block.start + slot_id(k));
            store.clone_node(src, dst, base, CloneMode::Move, Vec3::zeros(), "");
        }

        let clones: Vec<Entity> = block.clone().map(Entity::new).collect();
        for &clone in &clones[1..] {
            if store.parent(clone).is_none() {
                store.set_parent(clone, base);
            }
        }

        selection.clear(store);
        for clone in clones {
            selection.add(store, clone);
        }
        ParentOutcome::Relaid(block)
    };

    store.scene_flags |= SceneFlags::INVALIDATE_SCENE_TREE;
    outcome
}

/// Turn the primary entity into a master instance for the whole selection.
///
/// Records the instance count and stride and creates a dynamic vertex buffer
/// of `stride * count` bytes. Returns `false` if nothing was done.
pub fn instance_selection(
    store: &mut ComponentStore,
    selection: &SelectionSet,
    device: &mut dyn RenderDevice,
) -> bool {
    let size = selection.len();
    let Some(master) = selection.primary() else {
        return false;
    };
    if size <= 1 || !store.is_live(master) || store.has(master, EntityFlags::MASTER_INSTANCE) {
        return false;
    }

    let contiguous = selection
        .iter()
        .enumerate()
        .all(|(k, e)| e.index() == master.index() + k);
    if !contiguous {
        log::warn!("[instance] selection is not a contiguous block starting at {}", master.id());
    }

    let stride = std::mem::size_of::<PerDrawCall>();
    let instance_buffer = device.create_buffer(&BufferDesc {
        usage: BufferUsage::DynamicVertex,
        size: stride * size,
    });

    store.entities[master.index()] |= EntityFlags::MASTER_INSTANCE;
    store.master_instances[master.index()] = MasterInstance {
        num_instances: slot_id(size),
        instance_stride: slot_id(stride),
        instance_buffer,
    };

    log::info!("[instance] master instance: {} with {} sub instances", master.id(), size);
    true
}

/// Duplicate every selected subtree, select the copies.
///
/// Members whose parent is also selected are copied as part of that parent's
/// subtree. Returns the new root entities.
pub fn clone_selection_hierarchical(
    store: &mut ComponentStore,
    selection: &mut SelectionSet,
    name_suffix: &str,
) -> Vec<Entity> {
    let roots = selection.roots(store);
    let clones: Vec<Entity> = roots
        .into_iter()
        .filter_map(|root| store.clone_subtree(root, Vec3::zeros(), name_suffix))
        .map(|block| Entity::new(block.start))
        .collect();

    if !clones.is_empty() {
        selection.clear(store);
        for &clone in &clones {
            selection.add(store, clone);
        }
        log::info!("[clone] duplicated {} subtrees", clones.len());
    }
    clones
}

/// Delete every selected subtree.
///
/// Rigid bodies are released first, the selection is cleared, every node of
/// each subtree is deallocated and the free list is rebuilt.
pub fn delete_selection(
    store: &mut ComponentStore,
    selection: &mut SelectionSet,
    physics: &mut dyn PhysicsWorld,
) -> usize {
    let mut doomed = Vec::new();
    for root in selection.iter() {
        for node in store.build_hierarchy_node_list(root) {
            if !doomed.contains(&node) {
                doomed.push(node);
            }
        }
    }
    selection.clear(store);

    for &node in &doomed {
        if let Some(handle) = store.physics_handles[node.index()].take() {
            physics.release_entity(handle);
        }
        store.delete_entity(node);
    }

    store.rebuild_free_list();
    log::info!("[delete] removed {} nodes", doomed.len());
    doomed.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;

    #[test]
    fn test_set_parent_rejects_later_parent() {
        let mut store = ComponentStore::new();
        let a = store.create_node();
        let b = store.create_node();

        assert!(!store.set_parent(a, b));
        assert_eq!(store.parent(a), None);

        assert!(store.set_parent(b, a));
        assert_eq!(store.parent(b), Some(a));

        assert!(!store.set_parent(b, Entity::new(99)));
        assert_eq!(store.parent(b), Some(a));
    }

    #[test]
    fn test_node_list_is_preorder() {
        let mut store = ComponentStore::new();
        let nodes: Vec<_> = (0..6).map(|_| store.create_node()).collect();
        // 0 -> {1 -> {3}, 2 -> {4}}, 5 separate
        store.set_parent(nodes[1], nodes[0]);
        store.set_parent(nodes[2], nodes[0]);
        store.set_parent(nodes[3], nodes[1]);
        store.set_parent(nodes[4], nodes[2]);

        let list = store.build_hierarchy_node_list(nodes[0]);
        assert_eq!(list, vec![nodes[0], nodes[1], nodes[3], nodes[2], nodes[4]]);
        assert_eq!(store.build_hierarchy_node_list(nodes[5]), vec![nodes[5]]);
        assert!(store.build_hierarchy_node_list(Entity::new(40)).is_empty());
    }

    #[test]
    fn test_clone_node_move_remaps_parent_inside_block() {
        let mut store = ComponentStore::new();
        let a = store.create_node();
        let b = store.create_node();
        store.set_parent(b, a);

        let block = store.allocate_contiguous(2);
        let base = Entity::new(block.start);
        let dst_b = Entity::new(block.start + 1);
        store.clone_node(a, base, base, CloneMode::Move, Vec3::zeros(), "");
        store.clone_node(b, dst_b, base, CloneMode::Move, Vec3::zeros(), "");

        assert_eq!(store.parent(base), None);
        assert_eq!(store.parent(dst_b), Some(base));
        assert_eq!(store.names[dst_b.index()], store.names[b.index()]);
    }

    #[test]
    fn test_clone_node_instantiate_suffix_and_offset() {
        let mut store = ComponentStore::new();
        let a = store.create_node();
        store.set_name(a, "crate");
        store.set_transform(a, Transform::from_translation(Vec3::new(1.0, 0.0, 0.0)));

        let dst = store.allocate();
        store.clone_node(a, dst, dst, CloneMode::Instantiate, Vec3::new(0.0, 2.0, 0.0), "_copy");

        assert_eq!(store.names[dst.index()], "crate_copy");
        assert_eq!(store.name_hashes[dst.index()], NameHash::new("crate_copy"));
        assert_eq!(store.transforms[dst.index()].translation, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_clone_subtree_keeps_shape() {
        let mut store = ComponentStore::new();
        let root = store.create_node();
        let other = store.create_node();
        let child = store.create_node();
        let grandchild = store.create_node();
        store.set_parent(child, root);
        store.set_parent(grandchild, child);

        let block = store.clone_subtree(root, Vec3::zeros(), "_cloned").unwrap();
        assert_eq!(block, 4..7);

        let (r, c, g) = (Entity::new(4), Entity::new(5), Entity::new(6));
        assert_eq!(store.parent(r), None);
        assert_eq!(store.parent(c), Some(r));
        assert_eq!(store.parent(g), Some(c));
        assert_eq!(store.names[g.index()], format!("{}_cloned", store.names[grandchild.index()]));
        assert_eq!(store.parent(other), None);
    }

    #[test]
    fn test_delete_entity_is_not_recursive() {
        let mut store = ComponentStore::new();
        let a = store.create_node();
        let b = store.create_node();
        store.set_parent(b, a);

        store.delete_entity(a);
        assert!(!store.is_live(a));
        assert!(store.is_live(b));
    }
}
