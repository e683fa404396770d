//! Per-frame agent perception, aiming, and fire decisions.
//!
//! Each agent is evaluated independently against the player and the current
//! blocker set; agents never read each other's same-frame state. The order
//! within one agent's update is fixed: alert transition, weapon tracking,
//! aim re-derivation, fire gate.

use glam::{Vec2, Vec3};

use ironsight_physics::BlockerWorld;

use crate::agent::Agent;
use crate::random::SeededRandom;

/// Detection and fire rays stop this far short of the player's camera; the
/// far endpoint otherwise lands exactly on a blocker face when the player
/// hugs cover, and the slab test reads a grazing hit.
pub const BODY_LOS_STOP_SHORT: f32 = 0.25;

/// Muzzle rays stop slightly less short; the muzzle already sits ahead of
/// the body.
pub const MUZZLE_LOS_STOP_SHORT: f32 = 0.2;

/// The aim target sits this far below the camera: center mass, not eyes.
const AIM_DROP: f32 = 0.4;

/// Weapon pivot limits relative to the body, radians. The weapon cannot
/// swing through the torso.
const PIVOT_PITCH_MIN: f32 = -0.6;
const PIVOT_PITCH_MAX: f32 = 0.35;
const PIVOT_YAW_LIMIT: f32 = 1.2;

/// Pose the weapon relaxes to while the agent is unaware.
const LOWERED_PITCH: f32 = -1.1;

/// What one agent did during its frame update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerceptionOutcome {
    /// The agent detected the player this frame.
    pub became_alert: bool,
    /// The agent registered a hit on the player this frame.
    pub landed_hit: bool,
}

/// Normalize an angle difference to [-pi, pi].
pub fn normalize_angle_diff(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle > PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Angle between two directions, radians. `a` must be normalized; `b` is
/// normalized here.
fn angle_between(a: Vec3, b: Vec3) -> f32 {
    let b = b.normalize_or_zero();
    if b == Vec3::ZERO {
        return 0.0;
    }
    a.dot(b).clamp(-1.0, 1.0).acos()
}

/// Run one frame of perception for one agent.
///
/// `player_camera` is the camera position from the player provider and
/// `now_ms` the host's monotonic clock. Dead agents are frozen: no queries,
/// no state changes.
pub fn update_agent(
    agent: &mut Agent,
    blockers: &BlockerWorld,
    player_camera: Vec3,
    now_ms: u64,
    rng: &mut SeededRandom,
) -> PerceptionOutcome {
    let mut outcome = PerceptionOutcome::default();
    if !agent.is_alive {
        return outcome;
    }

    if !agent.is_alert && sees_player(agent, blockers, player_camera) {
        agent.is_alert = true;
        outcome.became_alert = true;
        log::debug!("agent {} alerted", agent.id);
    }

    update_weapon_pivot(agent, player_camera);
    agent.aiming_at_player = agent.is_alert && evaluate_aim(agent, blockers, player_camera);

    if agent.is_alert && try_fire(agent, blockers, player_camera, now_ms, rng) {
        outcome.landed_hit = true;
    }

    outcome
}

/// Detection test: range, vision cone, then an unobstructed eye-to-camera
/// ray. All three must hold on the same frame.
fn sees_player(agent: &Agent, blockers: &BlockerWorld, player_camera: Vec3) -> bool {
    let eye = agent.eye_position();
    let to_player = player_camera - eye;
    if to_player.length() > agent.profile.view_distance {
        return false;
    }

    let flat = Vec2::new(to_player.x, to_player.z);
    if flat.length_squared() > f32::EPSILON {
        let bearing = flat.y.atan2(flat.x);
        let deviation = normalize_angle_diff(bearing - agent.yaw).abs();
        if deviation > agent.profile.vision_fov * 0.5 {
            return false;
        }
    }

    blockers.line_clear(eye, player_camera, BODY_LOS_STOP_SHORT)
}

/// While alert, track a point slightly below the camera; otherwise relax to
/// the lowered pose. Pivot angles are clamped relative to the body.
fn update_weapon_pivot(agent: &mut Agent, player_camera: Vec3) {
    if !agent.is_alert {
        agent.pivot.yaw = 0.0;
        agent.pivot.pitch = LOWERED_PITCH;
        return;
    }

    let pivot_height = agent
        .muzzle
        .map_or(agent.profile.eye_height, |muzzle| muzzle.height);
    let origin = agent.position + Vec3::new(0.0, pivot_height, 0.0);
    let target = player_camera - Vec3::new(0.0, AIM_DROP, 0.0);
    let to_target = target - origin;

    let flat = Vec2::new(to_target.x, to_target.z);
    let flat_len = flat.length();
    let desired_yaw = if flat_len > f32::EPSILON {
        flat.y.atan2(flat.x)
    } else {
        agent.yaw
    };

    agent.pivot.yaw =
        normalize_angle_diff(desired_yaw - agent.yaw).clamp(-PIVOT_YAW_LIMIT, PIVOT_YAW_LIMIT);
    agent.pivot.pitch = to_target
        .y
        .atan2(flat_len)
        .clamp(PIVOT_PITCH_MIN, PIVOT_PITCH_MAX);
}

/// The tighter aiming gate: the weapon axis must sit inside the aiming cone
/// of the ray to the player, and that ray must be unobstructed. A missing
/// muzzle degrades the origin to the eye and the margin to the body one.
fn evaluate_aim(agent: &Agent, blockers: &BlockerWorld, player_camera: Vec3) -> bool {
    let (origin, stop_short) = match agent.muzzle_position() {
        Some(muzzle) => (muzzle, MUZZLE_LOS_STOP_SHORT),
        None => (agent.eye_position(), BODY_LOS_STOP_SHORT),
    };

    let to_player = player_camera - origin;
    if to_player.length_squared() <= f32::EPSILON {
        return true;
    }

    let deviation = angle_between(agent.weapon_direction(), to_player);
    if deviation > agent.profile.aiming_fov * 0.5 {
        return false;
    }

    blockers.line_clear(origin, player_camera, stop_short)
}

/// Fire gate, independent of the aiming flag: cooldown and range first, then
/// the per-attempt roll, then a fresh body-LOS cast taken at the moment of
/// firing, since the world may have changed since the alert check. Only a fully
/// successful attempt registers a hit and resets the cooldown stamp.
fn try_fire(
    agent: &mut Agent,
    blockers: &BlockerWorld,
    player_camera: Vec3,
    now_ms: u64,
    rng: &mut SeededRandom,
) -> bool {
    if let Some(until) = agent.reload_until_ms {
        if now_ms < until {
            return false;
        }
        agent.reload_until_ms = None;
        agent.rounds_left = agent.profile.magazine_size;
        log::debug!("agent {} reloaded", agent.id);
    }

    if let Some(last) = agent.last_shot_ms {
        if now_ms.saturating_sub(last) < agent.profile.fire_cooldown_ms {
            return false;
        }
    }

    let eye = agent.eye_position();
    if (player_camera - eye).length() > agent.profile.fire_range {
        return false;
    }

    if !rng.next_bool(agent.profile.hit_chance) {
        return false;
    }

    if !blockers.line_clear(eye, player_camera, BODY_LOS_STOP_SHORT) {
        return false;
    }

    agent.last_shot_ms = Some(now_ms);
    agent.rounds_left = agent.rounds_left.saturating_sub(1);
    if agent.rounds_left == 0 {
        agent.reload_until_ms = Some(now_ms + agent.profile.reload_ms);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironsight_physics::{Aabb, EntityRef};

    fn open_ground() -> BlockerWorld {
        BlockerWorld::new()
    }

    fn wall_between() -> BlockerWorld {
        // Wall across x=5, tall enough to cut every sightline used below.
        let mut world = BlockerWorld::new();
        world.insert(
            EntityRef(99),
            Aabb::from_center(Vec3::new(5.0, 2.0, 0.0), Vec3::new(0.2, 2.0, 10.0)),
        );
        world
    }

    /// Agent at the origin facing +X, player camera 10 units down-range.
    fn face_off() -> (Agent, Vec3) {
        (Agent::new(1, Vec3::ZERO, 0.0), Vec3::new(10.0, 1.7, 0.0))
    }

    fn sure_shot(agent: &mut Agent) {
        agent.profile.hit_chance = 1.0;
    }

    // ========================================================================
    // Alert transitions
    // ========================================================================

    #[test]
    fn facing_player_alerts_on_that_frame() {
        let (mut agent, camera) = face_off();
        let world = open_ground();
        let mut rng = SeededRandom::new(1);

        let outcome = update_agent(&mut agent, &world, camera, 0, &mut rng);
        assert!(agent.is_alert);
        assert!(outcome.became_alert);
    }

    #[test]
    fn facing_away_never_alerts() {
        let world = open_ground();
        let mut rng = SeededRandom::new(1);
        let mut agent = Agent::new(1, Vec3::ZERO, std::f32::consts::PI); // 180 degrees away
        agent.profile.vision_fov = 80f32.to_radians();

        // Close, far, and point-blank: never alerted while facing away.
        for camera in [
            Vec3::new(2.0, 1.7, 0.0),
            Vec3::new(10.0, 1.7, 0.0),
            Vec3::new(25.0, 1.7, 0.0),
        ] {
            update_agent(&mut agent, &world, camera, 0, &mut rng);
            assert!(!agent.is_alert, "alerted by camera at {:?}", camera);
        }
    }

    #[test]
    fn distance_gates_detection() {
        let world = open_ground();
        let mut rng = SeededRandom::new(1);
        let (mut agent, _) = face_off();

        update_agent(&mut agent, &world, Vec3::new(35.0, 1.7, 0.0), 0, &mut rng);
        assert!(!agent.is_alert);

        update_agent(&mut agent, &world, Vec3::new(25.0, 1.7, 0.0), 0, &mut rng);
        assert!(agent.is_alert);
    }

    #[test]
    fn wall_blocks_detection() {
        let world = wall_between();
        let mut rng = SeededRandom::new(1);
        let (mut agent, camera) = face_off();

        update_agent(&mut agent, &world, camera, 0, &mut rng);
        assert!(!agent.is_alert);
    }

    #[test]
    fn alert_is_monotonic() {
        let world = open_ground();
        let mut rng = SeededRandom::new(1);
        let (mut agent, camera) = face_off();
        agent.profile.hit_chance = 0.0; // isolate the alert flag

        update_agent(&mut agent, &world, camera, 0, &mut rng);
        assert!(agent.is_alert);

        // Player retreats far out of view distance and behind the agent.
        update_agent(&mut agent, &world, Vec3::new(-100.0, 1.7, 0.0), 16, &mut rng);
        assert!(agent.is_alert, "alert must not revert while alive");
    }

    #[test]
    fn dead_agent_is_frozen() {
        let world = open_ground();
        let mut rng = SeededRandom::new(1);
        let (mut agent, camera) = face_off();
        agent.take_damage(200);

        let outcome = update_agent(&mut agent, &world, camera, 0, &mut rng);
        assert_eq!(outcome, PerceptionOutcome::default());
        assert!(!agent.is_alert);
        assert!(!agent.aiming_at_player);
    }

    // ========================================================================
    // Weapon pivot and aiming
    // ========================================================================

    #[test]
    fn unaware_weapon_rests_lowered() {
        let world = open_ground();
        let mut rng = SeededRandom::new(1);
        // Player behind the agent: stays unaware, weapon lowered.
        let mut agent = Agent::new(1, Vec3::ZERO, 0.0);
        update_agent(&mut agent, &world, Vec3::new(-10.0, 1.7, 0.0), 0, &mut rng);

        assert_eq!(agent.pivot.yaw, 0.0);
        assert_eq!(agent.pivot.pitch, LOWERED_PITCH);
        assert!(!agent.aiming_at_player);
    }

    #[test]
    fn alert_agent_aims_at_facing_player() {
        let world = open_ground();
        let mut rng = SeededRandom::new(1);
        let (mut agent, camera) = face_off();
        agent.profile.hit_chance = 0.0;

        update_agent(&mut agent, &world, camera, 0, &mut rng);
        assert!(agent.is_alert);
        assert!(agent.aiming_at_player);
        // Weapon tracks nearly level, slightly below the camera height.
        assert!(agent.pivot.yaw.abs() < 0.05);
    }

    #[test]
    fn pivot_clamps_against_the_torso() {
        let world = open_ground();
        let mut rng = SeededRandom::new(1);
        let (mut agent, _) = face_off();
        agent.is_alert = true;

        // Player far off to the side and high above.
        update_agent(&mut agent, &world, Vec3::new(0.5, 20.0, 8.0), 0, &mut rng);
        assert!(agent.pivot.yaw <= PIVOT_YAW_LIMIT + 1e-5);
        assert!(agent.pivot.pitch <= PIVOT_PITCH_MAX + 1e-5);
        assert!(agent.pivot.pitch >= PIVOT_PITCH_MIN - 1e-5);
    }

    #[test]
    fn aiming_needs_the_tight_cone() {
        let world = open_ground();
        let mut rng = SeededRandom::new(1);
        let (mut agent, camera) = face_off();
        agent.profile.hit_chance = 0.0;

        update_agent(&mut agent, &world, camera, 0, &mut rng);
        assert!(agent.aiming_at_player);

        // Pin the pivot sideways: the player leaves the aiming cone even
        // though the vision cone still contains them.
        agent.pivot.yaw = 1.0;
        let aimed = evaluate_aim(&agent, &world, camera);
        assert!(!aimed);
    }

    #[test]
    fn wall_breaks_the_aim_even_when_trained() {
        let mut world = open_ground();
        let mut rng = SeededRandom::new(1);
        let (mut agent, camera) = face_off();
        agent.profile.hit_chance = 0.0;

        update_agent(&mut agent, &world, camera, 0, &mut rng);
        assert!(agent.aiming_at_player);

        world.insert(
            EntityRef(5),
            Aabb::from_center(Vec3::new(5.0, 2.0, 0.0), Vec3::new(0.2, 2.0, 10.0)),
        );
        update_agent(&mut agent, &world, camera, 16, &mut rng);
        assert!(agent.is_alert, "alert is sticky");
        assert!(!agent.aiming_at_player, "aim is re-derived every frame");
    }

    #[test]
    fn missing_muzzle_degrades_to_body_los() {
        let world = open_ground();
        let mut rng = SeededRandom::new(1);
        let (mut agent, camera) = face_off();
        agent.profile.hit_chance = 0.0;
        agent.muzzle = None;

        update_agent(&mut agent, &world, camera, 0, &mut rng);
        assert!(
            agent.aiming_at_player,
            "aim evaluation must fall back to the body check, not fail"
        );
    }

    // ========================================================================
    // Fire gating
    // ========================================================================

    #[test]
    fn cooldown_blocks_back_to_back_hits() {
        let world = open_ground();
        let mut rng = SeededRandom::new(1);
        let (mut agent, camera) = face_off();
        sure_shot(&mut agent);

        let first = update_agent(&mut agent, &world, camera, 10_000, &mut rng);
        assert!(first.landed_hit);
        assert_eq!(agent.last_shot_ms, Some(10_000));

        // Inside the cooldown window: every other condition holds, no hit.
        let blocked = update_agent(&mut agent, &world, camera, 11_999, &mut rng);
        assert!(!blocked.landed_hit);
        assert_eq!(agent.last_shot_ms, Some(10_000));

        // At the boundary the gate opens.
        let second = update_agent(&mut agent, &world, camera, 12_000, &mut rng);
        assert!(second.landed_hit);
        assert_eq!(agent.last_shot_ms, Some(12_000));
    }

    #[test]
    fn range_gates_fire_but_not_alert() {
        let world = open_ground();
        let mut rng = SeededRandom::new(1);
        let (mut agent, _) = face_off();
        sure_shot(&mut agent);

        // Seen at 20 units (inside view distance, outside fire range).
        let camera = Vec3::new(20.0, 1.7, 0.0);
        let outcome = update_agent(&mut agent, &world, camera, 0, &mut rng);
        assert!(agent.is_alert);
        assert!(!outcome.landed_hit);

        // Step inside fire range.
        let outcome = update_agent(&mut agent, &world, Vec3::new(14.0, 1.7, 0.0), 16, &mut rng);
        assert!(outcome.landed_hit);
    }

    #[test]
    fn fire_requires_los_at_the_moment_of_firing() {
        let mut world = open_ground();
        let mut rng = SeededRandom::new(1);
        let (mut agent, camera) = face_off();
        sure_shot(&mut agent);

        update_agent(&mut agent, &world, camera, 0, &mut rng);
        assert!(agent.is_alert);
        // Fired on the alert frame; wait out the cooldown behind new cover.
        world.insert(
            EntityRef(5),
            Aabb::from_center(Vec3::new(5.0, 2.0, 0.0), Vec3::new(0.2, 2.0, 10.0)),
        );

        let outcome = update_agent(&mut agent, &world, camera, 10_000, &mut rng);
        assert!(
            !outcome.landed_hit,
            "an alert agent without current LOS must not land hits"
        );
    }

    #[test]
    fn failed_roll_does_not_touch_the_cooldown() {
        let world = open_ground();
        let mut rng = SeededRandom::new(1);
        let (mut agent, camera) = face_off();
        agent.profile.hit_chance = 0.0;

        let outcome = update_agent(&mut agent, &world, camera, 5_000, &mut rng);
        assert!(!outcome.landed_hit);
        assert!(agent.last_shot_ms.is_none());
        assert_eq!(agent.rounds_left, agent.profile.magazine_size);
    }

    #[test]
    fn emptying_the_magazine_forces_a_reload() {
        let world = open_ground();
        let mut rng = SeededRandom::new(1);
        let (mut agent, camera) = face_off();
        sure_shot(&mut agent);
        agent.profile.magazine_size = 2;
        agent.rounds_left = 2;
        agent.profile.fire_cooldown_ms = 0;

        assert!(update_agent(&mut agent, &world, camera, 1_000, &mut rng).landed_hit);
        assert!(update_agent(&mut agent, &world, camera, 1_016, &mut rng).landed_hit);
        assert!(agent.reload_until_ms.is_some());

        // Mid-reload, no hits.
        assert!(!update_agent(&mut agent, &world, camera, 2_000, &mut rng).landed_hit);

        // Reload complete: magazine refilled, firing resumes.
        assert!(update_agent(&mut agent, &world, camera, 1_016 + 2_500, &mut rng).landed_hit);
        assert_eq!(agent.rounds_left, 1);
    }

    #[test]
    fn alert_and_hit_can_land_on_the_same_frame() {
        let world = open_ground();
        let mut rng = SeededRandom::new(1);
        let (mut agent, camera) = face_off();
        sure_shot(&mut agent);

        let outcome = update_agent(&mut agent, &world, camera, 0, &mut rng);
        assert!(outcome.became_alert && outcome.landed_hit);
    }

    // ========================================================================
    // Angle helpers
    // ========================================================================

    #[test]
    fn angle_diff_wraps() {
        use std::f32::consts::PI;
        assert!((normalize_angle_diff(3.0 * PI) - PI).abs() < 1e-5);
        assert!((normalize_angle_diff(-3.0 * PI) + PI).abs() < 1e-5);
        assert_eq!(normalize_angle_diff(0.5), 0.5);
    }
}
