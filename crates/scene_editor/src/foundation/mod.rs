//! Foundation module - Core utilities and types
//!
//! - Math types and geometric queries
//! - Name hashing for resource and node ids
//! - Logging utilities

pub mod math;
pub mod hash;
pub mod logging;
