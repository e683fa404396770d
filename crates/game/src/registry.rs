//! The blocker registry: which world objects currently obstruct space.
//!
//! Membership is decided here; geometry is answered by the owned
//! [`BlockerWorld`]. The registry never mutates world objects; it only
//! reads their classification and transforms.

use ironsight_physics::{BlockerId, BlockerWorld};

use crate::world::{ObjectId, WorldObject};

/// Tracks the solid subset of the world's objects and owns the physics-side
/// blocker set that every query runs against.
#[derive(Debug, Default)]
pub struct BlockerRegistry {
    blockers: BlockerWorld,
    tracked: Vec<(ObjectId, BlockerId)>,
}

impl BlockerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wholesale re-scan: drop everything, then track every object whose
    /// classification blocks unconditionally and every door that is neither
    /// open nor breached.
    pub fn rebuild(&mut self, objects: &[WorldObject]) {
        self.blockers.clear();
        self.tracked.clear();
        for obj in objects.iter().filter(|o| o.blocks()) {
            let id = self.blockers.insert(obj.entity_ref(), obj.bounding_volume());
            self.tracked.push((obj.id, id));
        }
        log::debug!(
            "blocker registry rebuilt: {} solid of {} objects",
            self.tracked.len(),
            objects.len()
        );
    }

    /// Recompute every tracked volume from its object's live transform.
    /// Cheap for static geometry; required for animating doors.
    pub fn refresh_volumes(&mut self, objects: &[WorldObject]) {
        for &(object_id, blocker_id) in &self.tracked {
            if let Some(obj) = objects.iter().find(|o| o.id == object_id) {
                self.blockers.set_volume(blocker_id, obj.bounding_volume());
            }
        }
    }

    /// Track one more object without a full rebuild.
    pub fn add(&mut self, object: &WorldObject) {
        if self.contains(object.id) {
            return;
        }
        let id = self
            .blockers
            .insert(object.entity_ref(), object.bounding_volume());
        self.tracked.push((object.id, id));
    }

    /// Stop tracking an object (after a breach) without a full rebuild.
    pub fn remove(&mut self, object_id: ObjectId) {
        if let Some(index) = self.tracked.iter().position(|&(oid, _)| oid == object_id) {
            let (_, blocker_id) = self.tracked.swap_remove(index);
            self.blockers.remove(blocker_id);
        }
    }

    /// The query surface for movement and perception.
    pub fn blockers(&self) -> &BlockerWorld {
        &self.blockers
    }

    pub fn contains(&self, object_id: ObjectId) -> bool {
        self.tracked.iter().any(|&(oid, _)| oid == object_id)
    }

    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }
}
