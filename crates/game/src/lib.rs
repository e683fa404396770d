//! Ironsight game core - mission world, doors, player, and hostile agents.
//!
//! The host owns the render/input loop and calls [`Simulation::tick`] once
//! per frame with the sampled input and a monotonic wall-clock timestamp.
//! Everything in here is synchronous and single-threaded: blocker volumes
//! are refreshed at the top of the tick, then movement and per-agent
//! perception each query the same frozen view of the world.
//!
//! The geometric queries themselves live in `ironsight_physics`; this crate
//! decides *membership* (which objects block, when doors stop blocking) and
//! *behavior* (alert transitions, aiming, fire gating).

pub mod agent;
pub mod door;
pub mod input;
pub mod perception;
pub mod player;
pub mod random;
pub mod registry;
pub mod simulation;
pub mod world;

pub use agent::{Agent, AgentId, MuzzleRef, PerceptionProfile, WeaponPivot};
pub use door::Door;
pub use input::PlayerInput;
pub use player::Player;
pub use random::SeededRandom;
pub use registry::BlockerRegistry;
pub use simulation::{Event, Simulation, SimulationConfig};
pub use world::{ObjectId, ObjectKind, World, WorldError, WorldObject};
