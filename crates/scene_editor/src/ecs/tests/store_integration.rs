//! Slot allocation and reuse across mixed allocate/deallocate sequences

use crate::ecs::{ComponentStore, Entity, EntityFlags};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_live_handles_never_alias() {
        let mut store = ComponentStore::new();
        let mut live: Vec<Entity> = Vec::new();

        // Deterministic interleaving of allocations and frees
        for step in 0..200u32 {
            if step % 3 == 2 && !live.is_empty() {
                let victim = live.remove((step as usize * 7) % live.len());
                store.deallocate(victim);
            } else {
                live.push(store.allocate());
            }

            let distinct: HashSet<u32> = live.iter().map(|e| e.id()).collect();
            assert_eq!(distinct.len(), live.len());
            assert!(live.iter().all(|&e| store.is_live(e)));
        }
        assert_eq!(store.live_count(), live.len());
    }

    #[test]
    fn test_freed_slot_returns_before_untouched_slots() {
        let mut store = ComponentStore::new();
        let entities: Vec<_> = (0..8).map(|_| store.allocate()).collect();

        store.deallocate(entities[2]);
        store.deallocate(entities[6]);

        assert_eq!(store.allocate(), entities[6]);
        assert_eq!(store.allocate(), entities[2]);
        assert_eq!(store.allocate(), Entity::new(8));
    }

    #[test]
    fn test_dead_handles_are_ignored() {
        let mut store = ComponentStore::new();
        let e = store.create_node();
        store.deallocate(e);

        store.deallocate(e);
        store.set_name(e, "ghost");
        store.deallocate(Entity::new(10_000));

        assert!(!store.has(e, EntityFlags::ALLOCATED));
        assert_eq!(store.free_list(), &[e.id()]);
    }
}
