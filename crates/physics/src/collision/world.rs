//! Blocker storage and the queries that run against it.
//!
//! A [`BlockerWorld`] is the flat set of currently solid obstacles. It is
//! owned by whoever tracks world membership (the game-side registry); this
//! module only answers geometric questions about it.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::volume::Aabb;

/// Identifier of a blocker slot inside a [`BlockerWorld`].
pub type BlockerId = u32;

/// Non-owning back-reference to the logical entity a collidable belongs to.
///
/// Stored on every blocker so a ray hit resolves its owner in O(1) instead of
/// walking any kind of scene hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef(pub u32);

/// One solid obstacle: owner back-reference plus its current volume.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Blocker {
    pub id: BlockerId,
    pub owner: EntityRef,
    pub aabb: Aabb,
    /// Disabled blockers are skipped by every query. A blocker is never
    /// enabled while its owner is logically passable.
    pub enabled: bool,
}

/// Result of a ray cast against the blocker set.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// Distance from the ray origin to the nearest intersection.
    pub distance: f32,
    /// World-space intersection point.
    pub point: Vec3,
    /// Which blocker was struck.
    pub blocker: BlockerId,
    /// The entity that owns the struck blocker.
    pub owner: EntityRef,
}

/// The current set of solid obstacles.
///
/// Queries are linear scans; the set holds tens of entries, so a spatial
/// index would cost more than it saves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockerWorld {
    blockers: Vec<Blocker>,
    next_id: BlockerId,
}

impl BlockerWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a blocker and return its id.
    pub fn insert(&mut self, owner: EntityRef, aabb: Aabb) -> BlockerId {
        let id = self.next_id;
        self.next_id += 1;
        self.blockers.push(Blocker {
            id,
            owner,
            aabb,
            enabled: true,
        });
        id
    }

    /// Drop one blocker. Returns whether anything was removed.
    pub fn remove(&mut self, id: BlockerId) -> bool {
        let before = self.blockers.len();
        self.blockers.retain(|b| b.id != id);
        self.blockers.len() != before
    }

    /// Drop every blocker.
    pub fn clear(&mut self) {
        self.blockers.clear();
    }

    /// Replace the volume of one blocker, keeping its identity.
    pub fn set_volume(&mut self, id: BlockerId, aabb: Aabb) {
        if let Some(blocker) = self.blockers.iter_mut().find(|b| b.id == id) {
            blocker.aabb = aabb;
        }
    }

    pub fn len(&self) -> usize {
        self.blockers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blockers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Blocker> {
        self.blockers.iter()
    }

    /// Player-occupancy test: true when a vertical segment centered at
    /// `point`, of the given half-extent, overlaps an enabled blocker's
    /// vertical extent AND the point's horizontal projection falls inside
    /// that blocker's footprint expanded by `radius`.
    ///
    /// This is a cylinder-vs-expanded-box approximation, not an exact
    /// capsule-box test; the corner regions it over-approximates are smaller
    /// than a boot. An empty set trivially answers unblocked.
    pub fn point_blocked(&self, point: Vec3, vertical_half_extent: f32, radius: f32) -> bool {
        self.blockers.iter().filter(|b| b.enabled).any(|b| {
            b.aabb.overlaps_vertical(point.y, vertical_half_extent)
                && b.aabb.contains_xz_expanded(point, radius)
        })
    }

    /// Nearest intersection of a ray with the enabled blocker set.
    ///
    /// Only blockers are considered: agents, the player, and decorative
    /// geometry never intercept a ray here.
    pub fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }

        let mut nearest: Option<RayHit> = None;
        for blocker in self.blockers.iter().filter(|b| b.enabled) {
            if let Some(distance) = blocker.aabb.ray_hit(origin, dir, max_distance) {
                let closer = nearest.map_or(true, |hit| distance < hit.distance);
                if closer {
                    nearest = Some(RayHit {
                        distance,
                        point: origin + dir * distance,
                        blocker: blocker.id,
                        owner: blocker.owner,
                    });
                }
            }
        }
        nearest
    }

    /// Whether the straight line from `from` to `to` is unobstructed.
    ///
    /// The cast stops `stop_short` before `to`: the far endpoint otherwise
    /// lands exactly on a blocker face when the target hugs cover, and the
    /// slab test reads a grazing hit.
    pub fn line_clear(&self, from: Vec3, to: Vec3, stop_short: f32) -> bool {
        let delta = to - from;
        let distance = delta.length();
        if distance <= stop_short {
            return true;
        }
        self.cast_ray(from, delta / distance, distance - stop_short)
            .is_none()
    }
}
