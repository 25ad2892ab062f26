//! Scene tree view
//!
//! Nested view of the flat parent array for the scene browser. Rebuilding
//! it walks every node, so [`SceneTreeCache`] only does so when the store's
//! [`SceneFlags::INVALIDATE_SCENE_TREE`] flag is set.

use crate::ecs::entity::Entity;
use crate::ecs::flags::SceneFlags;
use crate::ecs::store::ComponentStore;

/// One node of the tree view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneTreeNode {
    /// Entity shown by this node
    pub entity: Entity,
    /// Display name at build time
    pub name: String,
    /// Child nodes in index order
    pub children: Vec<SceneTreeNode>,
}

/// Forest of root entities
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneTree {
    /// Root nodes in index order
    pub roots: Vec<SceneTreeNode>,
}

impl SceneTree {
    /// Build from the store
    pub fn build(store: &ComponentStore) -> Self {
        let roots = store
            .iter_live()
            .filter(|&e| store.parent(e).is_none())
            .map(|root| {
                let nodes = store.build_hierarchy_node_list(root);
                Self::nest(store, &nodes)
            })
            .collect();

        Self { roots }
    }

    /// Nest a pre-order node list, first entry being the root
    fn nest(store: &ComponentStore, nodes: &[Entity]) -> SceneTreeNode {
        let mut stack: Vec<SceneTreeNode> = Vec::new();
        for &entity in nodes {
            let node = SceneTreeNode {
                entity,
                name: store.names[entity.index()].clone(),
                children: Vec::new(),
            };

            let parent = store.parent(entity);
            while stack.len() > 1 && stack.last().map(|n| Some(n.entity)) != Some(parent) {
                if let Some(done) = stack.pop() {
                    if let Some(top) = stack.last_mut() {
                        top.children.push(done);
                    }
                }
            }
            stack.push(node);
        }

        while stack.len() > 1 {
            if let Some(done) = stack.pop() {
                if let Some(top) = stack.last_mut() {
                    top.children.push(done);
                }
            }
        }

        stack.pop().unwrap_or(SceneTreeNode {
            entity: Entity::new(0),
            name: String::new(),
            children: Vec::new(),
        })
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        fn count(node: &SceneTreeNode) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        self.roots.iter().map(count).sum()
    }

    /// Whether the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Lazily rebuilt scene tree
#[derive(Debug, Default)]
pub struct SceneTreeCache {
    tree: SceneTree,
    rebuilds: u64,
}

impl SceneTreeCache {
    /// Empty cache; the first `get` after any edit rebuilds it
    pub fn new() -> Self {
        Self::default()
    }

    /// The current tree, rebuilt first if the store invalidated it
    pub fn get(&mut self, store: &mut ComponentStore) -> &SceneTree {
        if store.scene_flags.contains(SceneFlags::INVALIDATE_SCENE_TREE) {
            self.tree = SceneTree::build(store);
            self.rebuilds += 1;
            store.scene_flags.remove(SceneFlags::INVALIDATE_SCENE_TREE);
            log::debug!("Scene tree rebuilt with {} nodes", self.tree.len());
        }
        &self.tree
    }

    /// Number of rebuilds so far
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_nests_children() {
        let mut store = ComponentStore::new();
        let a = store.create_node();
        let b = store.create_node();
        let c = store.create_node();
        let d = store.create_node();
        store.set_parent(b, a);
        store.set_parent(c, b);
        store.set_parent(d, a);

        let tree = SceneTree::build(&store);
        assert_eq!(tree.roots.len(), 1);
        let root = &tree.roots[0];
        assert_eq!(root.entity, a);
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].entity, b);
        assert_eq!(root.children[0].children[0].entity, c);
        assert_eq!(root.children[1].entity, d);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_cache_rebuilds_only_when_invalidated() {
        let mut store = ComponentStore::new();
        store.create_node();
        let mut cache = SceneTreeCache::new();

        assert_eq!(cache.get(&mut store).len(), 1);
        assert_eq!(cache.get(&mut store).len(), 1);
        assert_eq!(cache.rebuild_count(), 1);

        store.create_node();
        assert_eq!(cache.get(&mut store).len(), 2);
        assert_eq!(cache.rebuild_count(), 2);
    }
}
