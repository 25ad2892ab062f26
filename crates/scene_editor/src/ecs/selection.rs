//! Selection set
//!
//! Ordered list of distinct live entities. The first entry is the primary
//! selection used by parenting and instancing. Every mutation mirrors the
//! membership into [`StateFlags::SELECTED`] so renderers can query selection
//! state from the store alone.

use crate::ecs::entity::Entity;
use crate::ecs::flags::StateFlags;
use crate::ecs::store::ComponentStore;

/// How a picked entity is applied to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Replace current selection
    #[default]
    Replace,
    /// Add to current selection (Shift)
    Add,
    /// Remove from current selection (Control)
    Remove,
}

impl SelectionMode {
    /// Mode chosen by held modifiers: Control removes, Shift adds
    pub fn from_modifiers(ctrl: bool, shift: bool) -> Self {
        if ctrl {
            Self::Remove
        } else if shift {
            Self::Add
        } else {
            Self::Replace
        }
    }
}

/// Ordered set of selected entities
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    entities: Vec<Entity>,
}

impl SelectionSet {
    /// Empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected entities in selection order
    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    /// Iterate selected entities in selection order
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().copied()
    }

    /// Primary (first) selected entity
    pub fn primary(&self) -> Option<Entity> {
        self.entities.first().copied()
    }

    /// Number of selected entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Whether `entity` is selected
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    /// Deselect everything
    pub fn clear(&mut self, store: &mut ComponentStore) {
        for entity in self.entities.drain(..) {
            if entity.index() < store.capacity() {
                store.state_flags[entity.index()].remove(StateFlags::SELECTED);
            }
        }
    }

    /// Make `entity` the only selected entity.
    ///
    /// A dead or out-of-range handle just clears the selection.
    pub fn replace(&mut self, store: &mut ComponentStore, entity: Entity) {
        self.clear(store);
        self.add(store, entity);
    }

    /// Append `entity` unless already selected
    pub fn add(&mut self, store: &mut ComponentStore, entity: Entity) {
        if !store.is_live(entity) || self.contains(entity) {
            return;
        }
        self.entities.push(entity);
        store.state_flags[entity.index()].insert(StateFlags::SELECTED);
    }

    /// Remove `entity` if selected
    pub fn remove(&mut self, store: &mut ComponentStore, entity: Entity) {
        let Some(position) = self.entities.iter().position(|&e| e == entity) else {
            return;
        };
        self.entities.remove(position);
        if entity.index() < store.capacity() {
            store.state_flags[entity.index()].remove(StateFlags::SELECTED);
        }
    }

    /// Apply a picked entity with the given mode
    pub fn apply(&mut self, store: &mut ComponentStore, entity: Entity, mode: SelectionMode) {
        match mode {
            SelectionMode::Replace => self.replace(store, entity),
            SelectionMode::Add => self.add(store, entity),
            SelectionMode::Remove => self.remove(store, entity),
        }
    }

    /// Drop entries whose slot is no longer live
    pub fn retain_live(&mut self, store: &ComponentStore) {
        self.entities.retain(|&e| store.is_live(e));
    }

    /// Selected entities whose parent is not also selected
    pub fn roots(&self, store: &ComponentStore) -> Vec<Entity> {
        self.entities
            .iter()
            .copied()
            .filter(|&e| store.parent(e).map_or(true, |p| !self.contains(p)))
            .collect()
    }
}
