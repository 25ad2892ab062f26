//! Cross-module scene store scenarios

mod store_integration;

use crate::ecs::ComponentStore;

/// Every live entity is a root or comes after its parent
pub(crate) fn assert_parents_precede(store: &ComponentStore) {
    for entity in store.iter_live() {
        let parent = store.parents[entity.index()];
        assert!(
            parent == entity.id() || parent < entity.id(),
            "{} has parent #{} stored after it",
            entity,
            parent
        );
    }
}
