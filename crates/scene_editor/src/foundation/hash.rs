//! Name hashing
//!
//! Node names, render targets and resource ids are compared by a 64-bit xxh3
//! hash rather than by string.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// 64-bit hash of a name or resource id
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NameHash(pub u64);

impl NameHash {
    /// Hash a string
    pub fn new(name: &str) -> Self {
        Self(xxh3_64(name.as_bytes()))
    }

    /// Raw hash value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<&str> for NameHash {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl std::fmt::Display for NameHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
