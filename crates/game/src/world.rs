//! World objects, their classification, and the mission world.
//!
//! A mission's geometry is a flat list of classified objects. Classification
//! is a closed enum matched exhaustively by the registry scan; there are no
//! ad hoc tag flags to sniff. The [`World`] owns the objects *and* the
//! blocker registry derived from them, and is re-created wholesale when a
//! new mission loads.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ironsight_physics::{Aabb, EntityRef};

use crate::door::Door;
use crate::registry::BlockerRegistry;

/// Unique identifier for a world object.
pub type ObjectId = u32;

/// Closed classification of world objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Wall,
    Cover,
    Barrier,
    Vehicle,
    Door,
    /// Visual-only geometry; never collides and never blocks sight.
    Decor,
}

impl ObjectKind {
    /// Kinds that block unconditionally. Doors block by state; decor never.
    pub fn always_blocks(self) -> bool {
        matches!(
            self,
            ObjectKind::Wall | ObjectKind::Cover | ObjectKind::Barrier | ObjectKind::Vehicle
        )
    }
}

/// One object in the mission world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    /// Center of the object's volume.
    pub position: Vec3,
    pub half_extents: Vec3,
    /// Base orientation around the vertical axis.
    pub yaw: f32,
    /// Door state; present exactly when `kind` is [`ObjectKind::Door`].
    pub door: Option<Door>,
}

impl WorldObject {
    pub fn new(id: ObjectId, kind: ObjectKind, position: Vec3, half_extents: Vec3) -> Self {
        Self {
            id,
            kind,
            position,
            half_extents,
            yaw: 0.0,
            door: None,
        }
    }

    /// A closed door leaf hinged at `position`.
    pub fn door(id: ObjectId, position: Vec3, half_extents: Vec3, yaw: f32) -> Self {
        Self {
            id,
            kind: ObjectKind::Door,
            position,
            half_extents,
            yaw,
            door: Some(Door::closed()),
        }
    }

    /// Whether this object currently obstructs movement and sightlines.
    pub fn blocks(&self) -> bool {
        if self.kind.always_blocks() {
            return true;
        }
        match (&self.kind, &self.door) {
            (ObjectKind::Door, Some(door)) => door.is_blocking(),
            _ => false,
        }
    }

    /// Orientation including the door swing, if any.
    pub fn current_yaw(&self) -> f32 {
        self.yaw + self.door.as_ref().map_or(0.0, |d| d.swing())
    }

    /// Current bounding volume, recomputed from the live transform.
    pub fn bounding_volume(&self) -> Aabb {
        Aabb::from_yawed_box(self.position, self.half_extents, self.current_yaw())
    }

    /// Back-reference handed to the physics side so a ray hit resolves the
    /// owning object in O(1).
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef(self.id)
    }
}

/// Errors detected while assembling a mission world.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("duplicate object id {0}")]
    DuplicateId(ObjectId),
    #[error("object {0} is a door without door state")]
    MissingDoorState(ObjectId),
    #[error("object {0} carries door state but is a {1:?}")]
    UnexpectedDoorState(ObjectId, ObjectKind),
}

/// The mission world: the object set plus the blocker registry derived from
/// it.
#[derive(Debug)]
pub struct World {
    objects: Vec<WorldObject>,
    registry: BlockerRegistry,
    fallback_spawn: Vec3,
}

impl World {
    /// Assemble a world and build its initial registry.
    ///
    /// `fallback_spawn` is the one coordinate the mission vouches for when
    /// the spawn-safety search comes up empty.
    pub fn from_objects(
        objects: Vec<WorldObject>,
        fallback_spawn: Vec3,
    ) -> Result<Self, WorldError> {
        for (i, obj) in objects.iter().enumerate() {
            if objects[..i].iter().any(|other| other.id == obj.id) {
                return Err(WorldError::DuplicateId(obj.id));
            }
            match (obj.kind, &obj.door) {
                (ObjectKind::Door, None) => return Err(WorldError::MissingDoorState(obj.id)),
                (kind, Some(_)) if kind != ObjectKind::Door => {
                    return Err(WorldError::UnexpectedDoorState(obj.id, kind))
                }
                _ => {}
            }
        }

        let mut world = Self {
            objects,
            registry: BlockerRegistry::new(),
            fallback_spawn,
        };
        world.registry.rebuild(&world.objects);
        log::info!(
            "world assembled: {} objects, {} solid",
            world.objects.len(),
            world.registry.len()
        );
        Ok(world)
    }

    pub fn objects(&self) -> &[WorldObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn registry(&self) -> &BlockerRegistry {
        &self.registry
    }

    pub fn fallback_spawn(&self) -> Vec3 {
        self.fallback_spawn
    }

    /// Recompute every tracked blocker volume from live transforms. Runs at
    /// the top of each frame, before any query; animating doors move their
    /// volumes between frames.
    pub fn refresh_volumes(&mut self) {
        self.registry.refresh_volumes(&self.objects);
    }

    /// Rebuild the registry after a door flag change so membership matches
    /// the world before the next query. A caller that flips door flags and
    /// skips this observes stale collision until the next natural rebuild.
    pub fn notify_door_state_changed(&mut self) {
        self.registry.rebuild(&self.objects);
    }

    /// Start the open swing on a door. Returns whether anything changed.
    pub fn open_door(&mut self, id: ObjectId, now_ms: u64) -> bool {
        let changed = self
            .objects
            .iter_mut()
            .find(|o| o.id == id)
            .and_then(|o| o.door.as_mut())
            .map_or(false, |door| door.begin_open(now_ms));
        if changed {
            log::debug!("door {} opening", id);
            self.notify_door_state_changed();
        }
        changed
    }

    /// Breach a door: instant, leaf destroyed, permanent.
    /// Returns whether anything changed.
    pub fn breach_door(&mut self, id: ObjectId) -> bool {
        let changed = self
            .objects
            .iter_mut()
            .find(|o| o.id == id)
            .and_then(|o| o.door.as_mut())
            .map_or(false, |door| door.breach());
        if changed {
            log::debug!("door {} breached", id);
            // Incremental removal is enough; a breach only ever shrinks the set.
            self.registry.remove(id);
        }
        changed
    }

    /// Advance door animations.
    pub fn update_doors(&mut self, now_ms: u64) {
        for obj in &mut self.objects {
            if let Some(door) = obj.door.as_mut() {
                door.update(now_ms);
            }
        }
    }

    /// A small compound for tests and host development: a walled yard with
    /// cover crates, a barrier, a parked vehicle hull, and two doors in the
    /// inner partition.
    pub fn training_compound() -> Self {
        let mut objects = Vec::new();
        let mut next_id = 0u32;
        let mut push = |o: WorldObject| objects.push(o);

        let wall_h = 1.5;
        let yard = 20.0;

        // Perimeter walls
        for &(x, z, hx, hz) in &[
            (0.0, -yard, yard, 0.25),
            (0.0, yard, yard, 0.25),
            (-yard, 0.0, 0.25, yard),
            (yard, 0.0, 0.25, yard),
        ] {
            push(WorldObject::new(
                next_id,
                ObjectKind::Wall,
                Vec3::new(x, wall_h, z),
                Vec3::new(hx, wall_h, hz),
            ));
            next_id += 1;
        }

        // Inner partition with two door gaps
        push(WorldObject::new(
            next_id,
            ObjectKind::Wall,
            Vec3::new(-7.0, wall_h, 0.0),
            Vec3::new(5.0, wall_h, 0.25),
        ));
        next_id += 1;
        push(WorldObject::new(
            next_id,
            ObjectKind::Wall,
            Vec3::new(7.0, wall_h, 0.0),
            Vec3::new(5.0, wall_h, 0.25),
        ));
        next_id += 1;

        push(WorldObject::door(
            next_id,
            Vec3::new(-1.0, wall_h, 0.0),
            Vec3::new(1.0, wall_h, 0.1),
            0.0,
        ));
        next_id += 1;
        push(WorldObject::door(
            next_id,
            Vec3::new(1.0, wall_h, 0.0),
            Vec3::new(1.0, wall_h, 0.1),
            0.0,
        ));
        next_id += 1;

        // Cover crates
        push(WorldObject::new(
            next_id,
            ObjectKind::Cover,
            Vec3::new(-5.0, 0.6, 7.0),
            Vec3::new(0.8, 0.6, 0.8),
        ));
        next_id += 1;
        push(WorldObject::new(
            next_id,
            ObjectKind::Cover,
            Vec3::new(4.0, 0.6, -6.0),
            Vec3::new(0.8, 0.6, 0.8),
        ));
        next_id += 1;

        // Concrete barrier and a vehicle hull
        push(WorldObject::new(
            next_id,
            ObjectKind::Barrier,
            Vec3::new(8.0, 0.5, 6.0),
            Vec3::new(1.5, 0.5, 0.4),
        ));
        next_id += 1;
        push(WorldObject::new(
            next_id,
            ObjectKind::Vehicle,
            Vec3::new(-10.0, 0.9, -8.0),
            Vec3::new(2.2, 0.9, 1.0),
        ));
        next_id += 1;

        // A decorative sign that must never collide
        push(WorldObject::new(
            next_id,
            ObjectKind::Decor,
            Vec3::new(0.0, 2.5, -19.0),
            Vec3::new(1.0, 0.5, 0.05),
        ));

        Self::from_objects(objects, Vec3::new(0.0, 0.0, 10.0))
            .expect("training compound is well-formed")
    }
}
