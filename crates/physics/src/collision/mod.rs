//! Collision volumes and the point/ray query service.

mod volume;
mod world;

pub use volume::Aabb;
pub use world::{Blocker, BlockerId, BlockerWorld, EntityRef, RayHit};
