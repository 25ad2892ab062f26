//! Component row types stored in the [`ComponentStore`](super::ComponentStore)

pub mod animation;
pub mod bounds;
pub mod instance;
pub mod lighting;
pub mod physics;
pub mod renderable;

pub use animation::AnimationController;
pub use bounds::BoundingVolume;
pub use instance::{MasterInstance, PerDrawCall};
pub use lighting::{LightComponent, LightFactory, LightType};
pub use physics::{CollisionShape, PhysicsComponent};
pub use renderable::{GeometryComponent, MaterialComponent};
