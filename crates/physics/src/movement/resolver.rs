//! Per-frame movement resolution and spawn safety.
//!
//! Movement resolves one horizontal axis at a time: the X-only candidate is
//! tested and committed first, then the Z candidate from the possibly-updated
//! X. A diagonal move into a corner therefore slides along whichever axis
//! stays open instead of stopping dead.

use glam::{Vec2, Vec3};

use crate::collision::BlockerWorld;

use super::config::MovementConfig;
use super::stance::Stance;

/// Spacing between spawn-search rings.
const SPAWN_RING_STEP: f32 = 0.5;
/// Number of rings searched; the outermost sits at radius 8.
const SPAWN_RING_COUNT: u32 = 16;
/// Angular spacing of samples around each ring, degrees.
const SPAWN_ANGLE_STEP_DEG: u32 = 15;

/// Held-direction flags for one frame, as resolved by the input layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub sprinting: bool,
}

impl MoveIntent {
    /// Local movement axes (x = strafe right, y = forward), with diagonal
    /// input normalized so two held keys do not outrun one.
    pub fn axes(&self) -> Vec2 {
        let mut axes = Vec2::ZERO;
        if self.forward {
            axes.y += 1.0;
        }
        if self.backward {
            axes.y -= 1.0;
        }
        if self.right {
            axes.x += 1.0;
        }
        if self.left {
            axes.x -= 1.0;
        }
        if axes.length_squared() > 1.0 {
            axes = axes.normalize();
        }
        axes
    }

    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// Rotate the local movement axes into the camera's yaw frame and scale by
/// stance speed and the frame delta. Returns the planar (x, z) displacement.
pub fn planar_displacement(
    intent: &MoveIntent,
    stance: Stance,
    yaw: f32,
    dt: f32,
    config: &MovementConfig,
) -> Vec2 {
    let axes = intent.axes();
    if axes == Vec2::ZERO {
        return Vec2::ZERO;
    }

    let (sin, cos) = yaw.sin_cos();
    let forward = Vec2::new(cos, sin);
    let right = Vec2::new(-sin, cos);

    let speed = stance.speed(intent.sprinting, config);
    (forward * axes.y + right * axes.x) * speed * dt
}

/// Resolve a planar displacement against the blocker set, one axis at a time.
///
/// The traversal test sweeps the capsule's vertical segment as a point; the
/// radius expansion serves the occupancy and spawn queries. Returns the
/// committed position (feet on the ground plane; Y is untouched).
pub fn resolve_movement(
    blockers: &BlockerWorld,
    position: Vec3,
    displacement: Vec2,
    config: &MovementConfig,
) -> Vec3 {
    let half_height = config.height * 0.5;
    let center_y = position.y + half_height;
    let mut resolved = position;

    let x_candidate = Vec3::new(position.x + displacement.x, center_y, position.z);
    if !blockers.point_blocked(x_candidate, half_height, 0.0) {
        resolved.x += displacement.x;
    }

    let z_candidate = Vec3::new(resolved.x, center_y, position.z + displacement.y);
    if !blockers.point_blocked(z_candidate, half_height, 0.0) {
        resolved.z += displacement.y;
    }

    resolved
}

/// Guarantee a usable spawn point.
///
/// If `desired` is blocked, search a deterministic outward spiral:
/// concentric rings stepping out by half a unit to a radius of eight,
/// sampling every fifteen degrees, ring-major then angle-major. The first
/// clear sample wins. An exhausted search lands on `fallback`, which the
/// mission vouches for; proximity to `desired` is not guaranteed.
pub fn find_safe_spawn(
    blockers: &BlockerWorld,
    desired: Vec3,
    fallback: Vec3,
    config: &MovementConfig,
) -> Vec3 {
    let half_height = config.height * 0.5;
    let clear = |feet: Vec3| {
        !blockers.point_blocked(
            Vec3::new(feet.x, feet.y + half_height, feet.z),
            half_height,
            config.radius,
        )
    };

    if clear(desired) {
        return desired;
    }

    for ring in 1..=SPAWN_RING_COUNT {
        let radius = ring as f32 * SPAWN_RING_STEP;
        for angle_deg in (0..360).step_by(SPAWN_ANGLE_STEP_DEG as usize) {
            let angle = (angle_deg as f32).to_radians();
            let candidate = desired + Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin());
            if clear(candidate) {
                log::debug!(
                    "spawn relocated from {:?} to {:?} (ring {}, angle {}deg)",
                    desired,
                    candidate,
                    ring,
                    angle_deg
                );
                return candidate;
            }
        }
    }

    log::warn!("spawn search around {:?} exhausted, using fallback", desired);
    fallback
}
