//! Hinged doors: the only world geometry whose blocking state changes.
//!
//! Two one-way transitions exist. Interacting starts a short, self-
//! terminating hinge swing (`closed -> opening -> open`); the door stops
//! blocking at the *start* of the swing, so an opening door is already
//! passable and see-through. Breaching is instant (`closed -> breached`),
//! hides the leaf, and is permanent: the flag survives every future
//! registry rebuild. No transition leads back to closed.

use serde::{Deserialize, Serialize};

/// Duration of the open swing, milliseconds.
pub const OPEN_DURATION_MS: u64 = 900;

/// Hinge travel of a fully open leaf, radians (about 110 degrees).
pub const OPEN_SWING_RAD: f32 = 1.92;

/// State of one door leaf.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Door {
    /// Set at the start of the open swing.
    pub is_open: bool,

    /// Breached doors never block again, whatever `is_open` says.
    pub is_breached: bool,

    /// Wall-clock start of a running open swing.
    opening_since: Option<u64>,

    /// Current hinge deflection, radians.
    swing: f32,
}

impl Door {
    /// A closed, intact door.
    pub fn closed() -> Self {
        Self::default()
    }

    /// A door obstructs movement and sightlines only while closed and
    /// unbreached.
    pub fn is_blocking(&self) -> bool {
        !self.is_open && !self.is_breached
    }

    /// Whether the visible leaf still exists. Breaching destroys it.
    pub fn leaf_visible(&self) -> bool {
        !self.is_breached
    }

    /// Start the open swing. No-op on an open or breached door.
    /// Returns whether the state changed.
    pub fn begin_open(&mut self, now_ms: u64) -> bool {
        if self.is_open || self.is_breached {
            return false;
        }
        self.is_open = true;
        self.opening_since = Some(now_ms);
        true
    }

    /// Destroy the door instantly, overriding a running open swing.
    /// Returns whether the state changed.
    pub fn breach(&mut self) -> bool {
        if self.is_breached {
            return false;
        }
        self.is_breached = true;
        self.opening_since = None;
        true
    }

    /// Advance the open swing. Self-terminating: once the fixed duration has
    /// elapsed the leaf rests at full deflection.
    pub fn update(&mut self, now_ms: u64) {
        if let Some(start) = self.opening_since {
            let elapsed = now_ms.saturating_sub(start);
            if elapsed >= OPEN_DURATION_MS {
                self.swing = OPEN_SWING_RAD;
                self.opening_since = None;
            } else {
                self.swing = OPEN_SWING_RAD * (elapsed as f32 / OPEN_DURATION_MS as f32);
            }
        }
    }

    /// Current hinge deflection, added to the leaf's base yaw for rendering
    /// and volume refresh.
    pub fn swing(&self) -> f32 {
        self.swing
    }

    /// Whether the open swing is still animating.
    pub fn is_animating(&self) -> bool {
        self.opening_since.is_some()
    }
}
