//! Scene spatial primitives

pub mod scene_graph;

pub use scene_graph::{AABB, Frustum, Plane};
