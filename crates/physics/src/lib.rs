//! Ironsight physics - spatial collision and player movement.
//!
//! This crate is pure geometry: it knows nothing about doors, agents, or
//! missions. The blocker set is passed into every query as an explicit
//! argument, so there is no hidden module-level state and a test can build
//! a world in three lines.
//!
//! Two design constraints shape everything here:
//!
//! 1. The blocker set is small (tens of obstacles), so every query is a
//!    linear scan and full rebuilds are cheap.
//! 2. Occupancy is a cylinder-vs-expanded-box approximation and rays use the
//!    slab method. Exact capsule-vs-box intersection buys nothing at the
//!    granularity of "can a human stand here".

pub mod collision;
pub mod movement;

pub use collision::{Aabb, Blocker, BlockerId, BlockerWorld, EntityRef, RayHit};
pub use movement::{
    find_safe_spawn, planar_displacement, resolve_movement, MoveIntent, MovementConfig, Stance,
};
