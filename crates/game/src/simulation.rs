//! The per-frame simulation shell.
//!
//! One [`Simulation`] is one mission. Loading a new mission means building a
//! new `Simulation`; state is re-created, never reset in place. The host
//! drives [`Simulation::tick`] once per rendered frame with the sampled
//! input and its monotonic clock; movement advances by the fixed tick delta
//! while cooldowns, reloads, and door swings gate on the wall clock.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use ironsight_physics::{movement, MovementConfig};

use crate::agent::{Agent, AgentId, PerceptionProfile};
use crate::input::PlayerInput;
use crate::perception;
use crate::player::Player;
use crate::random::SeededRandom;
use crate::world::{ObjectId, World};

/// Simulation tuning; serializable so hosts can ship presets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Simulation tick rate (ticks per second).
    pub tick_rate: u32,

    /// Movement physics configuration.
    pub movement: MovementConfig,

    /// Profile handed to newly spawned agents.
    pub agent_profile: PerceptionProfile,

    /// Seed for the fire-roll generator.
    pub rng_seed: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            movement: MovementConfig::default(),
            agent_profile: PerceptionProfile::default(),
            rng_seed: 1,
        }
    }
}

impl SimulationConfig {
    /// Time step per tick, seconds.
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }
}

/// Things that happened during one tick, for the HUD and host effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// An agent detected the player.
    AgentAlerted(AgentId),
    /// An agent registered a hit on the player. Damage bookkeeping is the
    /// host's job.
    AgentShotPlayer(AgentId),
    /// A door started its open swing.
    DoorOpened(ObjectId),
    /// A door was breached.
    DoorBreached(ObjectId),
}

/// One mission's live state.
#[derive(Debug)]
pub struct Simulation {
    pub world: World,
    pub player: Player,
    pub agents: Vec<Agent>,
    config: SimulationConfig,
    rng: SeededRandom,
    frame: u64,
    next_agent_id: AgentId,
}

impl Simulation {
    /// Build a mission. The requested spawn is checked for safety: a blocked
    /// spawn relocates via the spiral search, with the world's fallback
    /// coordinate as the bounded last resort.
    pub fn new(config: SimulationConfig, world: World, spawn: Vec3) -> Self {
        let safe_spawn = movement::find_safe_spawn(
            world.registry().blockers(),
            spawn,
            world.fallback_spawn(),
            &config.movement,
        );
        let rng = SeededRandom::new(config.rng_seed);
        Self {
            world,
            player: Player::new(safe_spawn),
            agents: Vec::new(),
            config,
            rng,
            frame: 0,
            next_agent_id: 1,
        }
    }

    /// A mission in the training compound, for tests and host development.
    pub fn training() -> Self {
        Self::new(
            SimulationConfig::default(),
            World::training_compound(),
            Vec3::new(0.0, 0.0, 10.0),
        )
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Add a hostile agent at a position, facing `yaw`. Returns its id.
    pub fn spawn_agent(&mut self, position: Vec3, yaw: f32) -> AgentId {
        let id = self.next_agent_id;
        self.next_agent_id += 1;
        let mut agent = Agent::new(id, position, yaw);
        agent.profile = self.config.agent_profile.clone();
        agent.rounds_left = agent.profile.magazine_size;
        self.agents.push(agent);
        id
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id == id)
    }

    /// Advance the simulation by one frame.
    ///
    /// `now_ms` is the host's monotonic clock. Door animations advance and
    /// blocker volumes refresh before any query this frame; the player then
    /// moves, and each agent runs its perception update against the player's
    /// new camera position.
    pub fn tick(&mut self, input: &PlayerInput, now_ms: u64) -> Vec<Event> {
        let dt = self.config.delta_time();
        let mut events = Vec::new();

        self.world.update_doors(now_ms);
        self.world.refresh_volumes();

        self.player.update(
            input,
            self.world.registry().blockers(),
            &self.config.movement,
            dt,
        );

        let camera = self.player.camera_position(&self.config.movement);
        for agent in &mut self.agents {
            let outcome = perception::update_agent(
                agent,
                self.world.registry().blockers(),
                camera,
                now_ms,
                &mut self.rng,
            );
            if outcome.became_alert {
                events.push(Event::AgentAlerted(agent.id));
            }
            if outcome.landed_hit {
                events.push(Event::AgentShotPlayer(agent.id));
            }
        }

        self.frame += 1;
        events
    }

    /// Start a door's open swing. The registry rebuilds before the call
    /// returns, so the next query already sees through the doorway.
    pub fn open_door(&mut self, id: ObjectId, now_ms: u64) -> Option<Event> {
        self.world.open_door(id, now_ms).then_some(Event::DoorOpened(id))
    }

    /// Breach a door: instant and permanent.
    pub fn breach_door(&mut self, id: ObjectId) -> Option<Event> {
        self.world.breach_door(id).then_some(Event::DoorBreached(id))
    }
}
