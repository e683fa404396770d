//! Player stances.
//!
//! Stance drives two things and nothing else: ground speed and eye height.
//! Vertical position is purely stance-mapped; there is no gravity and no
//! ground probe. Toggle/hold key semantics belong to the host's input layer,
//! which hands the resolved stance down each frame.

use serde::{Deserialize, Serialize};

use super::config::MovementConfig;

/// The three body stances, ordered by profile height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Stance {
    #[default]
    Standing,
    Crouching,
    Prone,
}

impl Stance {
    /// Ground speed for this stance, units per second. Sprinting overrides
    /// the standing speed; a crouched or prone body cannot sprint.
    pub fn speed(self, sprinting: bool, config: &MovementConfig) -> f32 {
        match self {
            Stance::Standing if sprinting => config.sprint_speed,
            Stance::Standing => config.walk_speed,
            Stance::Crouching => config.crouch_speed,
            Stance::Prone => config.prone_speed,
        }
    }

    /// Camera height above the feet for this stance.
    pub fn eye_height(self, config: &MovementConfig) -> f32 {
        match self {
            Stance::Standing => config.eye_height_standing,
            Stance::Crouching => config.eye_height_crouching,
            Stance::Prone => config.eye_height_prone,
        }
    }
}
