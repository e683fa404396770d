//! Hostile agents and their perception state.
//!
//! Agents do not navigate; they stand their ground, watch, and shoot. All
//! per-frame decision logic lives in [`crate::perception`]; this module is
//! the data: who the agent is, what it can perceive, and where its weapon
//! points.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Unique identifier for an agent within one mission.
pub type AgentId = u32;

/// Perception and engagement tuning for one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerceptionProfile {
    /// Farthest distance at which the player can be detected.
    pub view_distance: f32,

    /// Full detection field of view, radians.
    pub vision_fov: f32,

    /// Full aiming field of view, radians. Tighter than the vision cone:
    /// seeing the player and having the weapon trained on them are
    /// different claims.
    pub aiming_fov: f32,

    /// Height of the eye point above the feet.
    pub eye_height: f32,

    /// Longest range at which the agent will take a shot.
    pub fire_range: f32,

    /// Per-attempt chance that a shot is taken and lands.
    pub hit_chance: f32,

    /// Minimum wall-clock gap between registered hits, milliseconds.
    pub fire_cooldown_ms: u64,

    /// Rounds in a magazine; firing the last one starts a reload.
    pub magazine_size: u32,

    /// Reload duration, milliseconds.
    pub reload_ms: u64,
}

impl Default for PerceptionProfile {
    fn default() -> Self {
        Self {
            view_distance: 30.0,
            vision_fov: 80f32.to_radians(),
            aiming_fov: 20f32.to_radians(),
            eye_height: 1.7,
            fire_range: 15.0,
            hit_chance: 0.3,
            fire_cooldown_ms: 2000,
            magazine_size: 6,
            reload_ms: 2500,
        }
    }
}

/// Weapon pivot orientation relative to the agent's body. Orientation only;
/// the pivot has no independent physics.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WeaponPivot {
    /// Offset from the body yaw, radians.
    pub yaw: f32,
    /// Elevation, radians; positive is up.
    pub pitch: f32,
}

/// Where the muzzle sits relative to the body. Aim-line casts originate
/// here; an agent that loses its muzzle reference degrades to body-origin
/// checks instead of erroring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MuzzleRef {
    /// Height of the weapon line above the feet.
    pub height: f32,
    /// Distance from the pivot to the muzzle tip along the weapon axis.
    pub forward: f32,
}

impl Default for MuzzleRef {
    fn default() -> Self {
        Self {
            height: 1.45,
            forward: 0.55,
        }
    }
}

/// One hostile agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,

    /// Feet position on the ground plane.
    pub position: Vec3,

    /// Body facing, radians.
    pub yaw: f32,

    pub health: i32,

    /// Dead agents freeze: no perception, no aiming, no fire.
    pub is_alive: bool,

    /// One-way while alive. Cleared only by building a new mission.
    pub is_alert: bool,

    /// Re-derived every frame; never sticky.
    pub aiming_at_player: bool,

    /// Wall-clock stamp of the last registered hit.
    pub last_shot_ms: Option<u64>,

    /// Wall-clock stamp at which an in-progress reload completes.
    pub reload_until_ms: Option<u64>,

    /// Rounds left in the current magazine.
    pub rounds_left: u32,

    pub pivot: WeaponPivot,

    /// Muzzle reference; `None` degrades aim queries to the body substitute.
    pub muzzle: Option<MuzzleRef>,

    pub profile: PerceptionProfile,
}

impl Agent {
    pub fn new(id: AgentId, position: Vec3, yaw: f32) -> Self {
        let profile = PerceptionProfile::default();
        Self {
            id,
            position,
            yaw,
            health: 100,
            is_alive: true,
            is_alert: false,
            aiming_at_player: false,
            last_shot_ms: None,
            reload_until_ms: None,
            rounds_left: profile.magazine_size,
            pivot: WeaponPivot::default(),
            muzzle: Some(MuzzleRef::default()),
            profile,
        }
    }

    /// Elevated eye point used for detection rays.
    pub fn eye_position(&self) -> Vec3 {
        self.position + Vec3::new(0.0, self.profile.eye_height, 0.0)
    }

    /// Horizontal body facing.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin())
    }

    /// World-space direction of the weapon's forward axis.
    pub fn weapon_direction(&self) -> Vec3 {
        let yaw = self.yaw + self.pivot.yaw;
        let (pitch_sin, pitch_cos) = self.pivot.pitch.sin_cos();
        Vec3::new(yaw.cos() * pitch_cos, pitch_sin, yaw.sin() * pitch_cos)
    }

    /// World-space muzzle point, if the weapon still has one.
    pub fn muzzle_position(&self) -> Option<Vec3> {
        self.muzzle.map(|muzzle| {
            self.position
                + Vec3::new(0.0, muzzle.height, 0.0)
                + self.weapon_direction() * muzzle.forward
        })
    }

    /// Apply damage. Health at or below zero marks the agent dead and
    /// freezes all further perception updates.
    pub fn take_damage(&mut self, amount: i32) {
        if !self.is_alive {
            return;
        }
        self.health -= amount;
        if self.health <= 0 {
            self.health = 0;
            self.is_alive = false;
            self.aiming_at_player = false;
            log::debug!("agent {} down", self.id);
        }
    }

    /// HUD opacity for this agent's aim indicator: invisible while unaware
    /// or dead, faint while merely alert, strong while actively aiming.
    pub fn aim_indicator_opacity(&self) -> f32 {
        if !self.is_alive || !self.is_alert {
            0.0
        } else if self.aiming_at_player {
            0.9
        } else {
            0.35
        }
    }
}
