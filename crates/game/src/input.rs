//! Raw per-frame player input.
//!
//! The host samples its windowing layer into this and hands it to the tick.
//! Toggle/hold stance keys are resolved host-side; the core only sees the
//! stance the player should be in this frame.

use serde::{Deserialize, Serialize};

use ironsight_physics::{MoveIntent, Stance};

/// Input sampled by the host for a single frame.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Held movement keys.
    pub movement: MovementKeys,

    /// Mouse delta this frame, pixels.
    pub mouse_delta: (f32, f32),

    /// Sprint key held.
    pub sprint: bool,

    /// Stance the input layer has resolved for this frame.
    pub stance: Stance,
}

/// Held-direction key states.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MovementKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl PlayerInput {
    /// Movement intent for the physics resolver.
    pub fn move_intent(&self) -> MoveIntent {
        MoveIntent {
            forward: self.movement.forward,
            backward: self.movement.backward,
            left: self.movement.left,
            right: self.movement.right,
            sprinting: self.sprint,
        }
    }

    /// Convert mouse pixels to look deltas in radians (yaw, pitch).
    pub fn look_delta_radians(&self, sensitivity: f32) -> (f32, f32) {
        let scale = sensitivity * 0.001;
        (self.mouse_delta.0 * scale, -self.mouse_delta.1 * scale)
    }

    /// Check if any movement key is held.
    pub fn has_movement(&self) -> bool {
        self.movement.forward || self.movement.backward || self.movement.left || self.movement.right
    }
}
