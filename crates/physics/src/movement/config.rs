//! Movement tuning.

use serde::{Deserialize, Serialize};

/// Movement tuning shared by the resolver, the spawn search, and occupancy
/// queries. Serializable so hosts can ship presets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementConfig {
    /// Horizontal collision radius of the player capsule.
    pub radius: f32,

    /// Total capsule height when standing.
    pub height: f32,

    /// Ground speed while sprinting, units per second.
    pub sprint_speed: f32,

    /// Ground speed while standing, units per second.
    pub walk_speed: f32,

    /// Ground speed while crouching, units per second.
    pub crouch_speed: f32,

    /// Ground speed while prone, units per second.
    pub prone_speed: f32,

    /// Camera height above the feet while standing.
    pub eye_height_standing: f32,

    /// Camera height above the feet while crouching.
    pub eye_height_crouching: f32,

    /// Camera height above the feet while prone.
    pub eye_height_prone: f32,

    /// Mouse sensitivity multiplier for look deltas.
    pub mouse_sensitivity: f32,

    /// Camera pitch limit, radians either side of level.
    pub max_pitch: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            radius: 0.35,
            height: 1.8,
            sprint_speed: 8.0,
            walk_speed: 4.0,
            crouch_speed: 2.0,
            prone_speed: 1.0,
            eye_height_standing: 1.7,
            eye_height_crouching: 1.0,
            eye_height_prone: 0.4,
            mouse_sensitivity: 2.0,
            max_pitch: 1.5,
        }
    }
}
