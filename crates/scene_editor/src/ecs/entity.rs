//! Entity implementation
//!
//! An entity is nothing more than a slot index shared by every component
//! array in the [`ComponentStore`](super::ComponentStore).

/// Entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    id: u32,
}

impl Entity {
    /// Create an entity handle for slot `id`
    pub const fn new(id: u32) -> Self {
        Self { id }
    }

    /// Get the entity ID
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Slot index into the component arrays
    pub const fn index(&self) -> usize {
        self.id as usize
    }
}

impl From<u32> for Entity {
    fn from(id: u32) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.id)
    }
}
