//! Axis-aligned bounding volumes.
//!
//! Every blocker is tracked as an AABB recomputed from its world transform.
//! Yawed boxes (swinging door leaves, parked vehicles) are conservatively
//! bounded by the AABB of their rotated footprint.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Build from a center point and half-extents.
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Bound a box rotated around the Y axis: the XZ footprint corners are
    /// rotated and re-bounded, the vertical extent is unchanged.
    pub fn from_yawed_box(center: Vec3, half_extents: Vec3, yaw: f32) -> Self {
        let (sin, cos) = yaw.sin_cos();
        let ex = half_extents.x * cos.abs() + half_extents.z * sin.abs();
        let ez = half_extents.x * sin.abs() + half_extents.z * cos.abs();
        Self {
            min: Vec3::new(center.x - ex, center.y - half_extents.y, center.z - ez),
            max: Vec3::new(center.x + ex, center.y + half_extents.y, center.z + ez),
        }
    }

    /// Whether the vertical segment `[y - half_extent, y + half_extent]`
    /// overlaps this box's vertical extent. Closed interval on both ends.
    #[inline]
    pub fn overlaps_vertical(&self, y: f32, half_extent: f32) -> bool {
        y + half_extent >= self.min.y && y - half_extent <= self.max.y
    }

    /// Whether the point's horizontal projection falls inside this box's
    /// footprint expanded outward by `radius` on all four sides.
    #[inline]
    pub fn contains_xz_expanded(&self, point: Vec3, radius: f32) -> bool {
        point.x >= self.min.x - radius
            && point.x <= self.max.x + radius
            && point.z >= self.min.z - radius
            && point.z <= self.max.z + radius
    }

    /// Ray-box intersection using the slab method.
    ///
    /// `dir` must be normalized. Returns the entry distance, or the exit
    /// distance when the origin starts inside the box; `None` when the ray
    /// misses or the hit lies beyond `max_distance`.
    pub fn ray_hit(&self, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<f32> {
        let inv_dir = Vec3::new(
            if dir.x.abs() > 1e-6 { 1.0 / dir.x } else { f32::MAX },
            if dir.y.abs() > 1e-6 { 1.0 / dir.y } else { f32::MAX },
            if dir.z.abs() > 1e-6 { 1.0 / dir.z } else { f32::MAX },
        );

        let t1 = (self.min.x - origin.x) * inv_dir.x;
        let t2 = (self.max.x - origin.x) * inv_dir.x;
        let t3 = (self.min.y - origin.y) * inv_dir.y;
        let t4 = (self.max.y - origin.y) * inv_dir.y;
        let t5 = (self.min.z - origin.z) * inv_dir.z;
        let t6 = (self.max.z - origin.z) * inv_dir.z;

        let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
        let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

        if tmax < 0.0 || tmin > tmax {
            return None;
        }

        let t = if tmin >= 0.0 { tmin } else { tmax };
        (t >= 0.0 && t <= max_distance).then_some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_center_round_trip() {
        let aabb = Aabb::from_center(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.5, 1.0, 2.0));
        assert_eq!(aabb.min, Vec3::new(0.5, 1.0, 1.0));
        assert_eq!(aabb.max, Vec3::new(1.5, 3.0, 5.0));
    }

    #[test]
    fn yawed_box_quarter_turn_swaps_extents() {
        let aabb = Aabb::from_yawed_box(
            Vec3::ZERO,
            Vec3::new(2.0, 1.0, 0.5),
            std::f32::consts::FRAC_PI_2,
        );
        assert!((aabb.max.x - 0.5).abs() < 1e-4, "x extent {}", aabb.max.x);
        assert!((aabb.max.z - 2.0).abs() < 1e-4, "z extent {}", aabb.max.z);
        assert_eq!(aabb.max.y, 1.0);
    }

    #[test]
    fn vertical_overlap() {
        let aabb = Aabb::from_center(Vec3::new(0.0, 1.5, 0.0), Vec3::new(1.0, 1.5, 1.0));
        assert!(aabb.overlaps_vertical(0.9, 0.9));
        assert!(aabb.overlaps_vertical(4.0, 1.0)); // touches max at y=3
        assert!(!aabb.overlaps_vertical(4.5, 1.0));
        assert!(!aabb.overlaps_vertical(-2.0, 1.0));
    }

    #[test]
    fn expanded_footprint_containment() {
        let aabb = Aabb::from_center(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let radius = 0.35;

        assert!(aabb.contains_xz_expanded(Vec3::new(1.3, 1.0, 0.0), radius));
        assert!(!aabb.contains_xz_expanded(Vec3::new(1.4, 1.0, 0.0), radius));
        assert!(aabb.contains_xz_expanded(Vec3::new(0.0, 1.0, -1.34), radius));
        assert!(!aabb.contains_xz_expanded(Vec3::new(0.0, 1.0, -1.36), radius));
    }

    #[test]
    fn expanded_boundary_is_stable() {
        // A point exactly on the expanded edge must answer the same on
        // repeated calls with unchanged state.
        let aabb = Aabb::from_center(Vec3::ZERO, Vec3::ONE);
        let edge = Vec3::new(1.35, 0.0, 0.0);
        let first = aabb.contains_xz_expanded(edge, 0.35);
        for _ in 0..10 {
            assert_eq!(aabb.contains_xz_expanded(edge, 0.35), first);
        }
    }

    #[test]
    fn ray_hits_front_face() {
        let aabb = Aabb::from_center(Vec3::new(10.0, 1.0, 0.0), Vec3::new(1.0, 2.0, 2.0));
        let t = aabb.ray_hit(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 100.0);
        assert!(t.is_some());
        assert!((t.unwrap() - 9.0).abs() < 1e-3, "hit at {:?}", t);
    }

    #[test]
    fn ray_misses_behind() {
        let aabb = Aabb::from_center(Vec3::new(10.0, 1.0, 0.0), Vec3::new(1.0, 2.0, 2.0));
        assert!(aabb.ray_hit(Vec3::new(0.0, 1.0, 0.0), -Vec3::X, 100.0).is_none());
    }

    #[test]
    fn ray_respects_max_distance() {
        let aabb = Aabb::from_center(Vec3::new(10.0, 1.0, 0.0), Vec3::new(1.0, 2.0, 2.0));
        assert!(aabb.ray_hit(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 8.0).is_none());
        assert!(aabb.ray_hit(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 9.5).is_some());
    }

    #[test]
    fn ray_from_inside_reports_exit() {
        let aabb = Aabb::from_center(Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0));
        let t = aabb.ray_hit(Vec3::ZERO, Vec3::X, 100.0);
        assert!(t.is_some());
        assert!((t.unwrap() - 2.0).abs() < 1e-3);
    }
}
