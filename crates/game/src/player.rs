//! The player: camera, stance, and per-frame movement.
//!
//! The player owns its position exclusively; it is mutated once per frame by
//! [`Player::update`] and read by everything else. Vertical position is
//! stance-mapped: the camera provider reads eye height straight off the
//! stance, and there is no gravity.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use ironsight_physics::{movement, BlockerWorld, MovementConfig, Stance};

use crate::input::PlayerInput;

/// Player state for one mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Feet position on the ground plane.
    pub position: Vec3,

    pub stance: Stance,

    /// Camera yaw, radians.
    pub look_yaw: f32,

    /// Camera pitch, radians; clamped by the movement config.
    pub look_pitch: f32,
}

impl Player {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            stance: Stance::Standing,
            look_yaw: 0.0,
            look_pitch: 0.0,
        }
    }

    /// Camera position: feet plus the stance's eye height.
    pub fn camera_position(&self, config: &MovementConfig) -> Vec3 {
        self.position + Vec3::new(0.0, self.stance.eye_height(config), 0.0)
    }

    /// Horizontal facing of the camera.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.look_yaw.cos(), 0.0, self.look_yaw.sin())
    }

    /// Integrate one frame of input and resolve the result against the
    /// blocker set.
    pub fn update(
        &mut self,
        input: &PlayerInput,
        blockers: &BlockerWorld,
        config: &MovementConfig,
        dt: f32,
    ) {
        let (dyaw, dpitch) = input.look_delta_radians(config.mouse_sensitivity);
        self.look_yaw += dyaw;
        self.look_pitch = (self.look_pitch + dpitch).clamp(-config.max_pitch, config.max_pitch);

        self.stance = input.stance;

        let intent = input.move_intent();
        let displacement =
            movement::planar_displacement(&intent, self.stance, self.look_yaw, dt, config);
        self.position = movement::resolve_movement(blockers, self.position, displacement, config);
    }
}
