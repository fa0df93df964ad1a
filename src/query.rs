//! Collision queries the movement code runs against world geometry.
//!
//! Backends implement [`CollisionQuery`] with raw geometric answers. The
//! [`Sweeper`] layers the controller's contact conventions on top: casts are
//! extended by [`HIT_EPSILON`] and then backed off so the volume never comes to
//! rest exactly on a surface.

use glam::Vec3;

use crate::config::HIT_EPSILON;

// Below this, -n.d is treated as a grazing contact
const MIN_BACKOFF_DOT: f32 = 1e-3;

/// Opaque handle to a piece of world geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

/// Axis-aligned box collider whose base sits on the entity position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hull {
    pub half_extents: Vec3,
}

impl Hull {
    pub fn new(horizontal_size: f32, height: f32) -> Self {
        Self {
            half_extents: Vec3::new(horizontal_size / 2.0, height / 2.0, horizontal_size / 2.0),
        }
    }

    pub fn height(&self) -> f32 {
        self.half_extents.y * 2.0
    }

    /// Box center for an entity standing at `origin`.
    pub fn center(&self, origin: Vec3) -> Vec3 {
        origin + Vec3::Y * self.half_extents.y
    }

    /// Every face pulled in by `margin`. The base rises by `margin` too, so
    /// place it at `origin + Y * margin` to keep the center where it was.
    pub fn shrunk(&self, margin: f32) -> Self {
        Self {
            half_extents: (self.half_extents - Vec3::splat(margin)).max(Vec3::ZERO),
        }
    }
}

/// First blocking contact found by a cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Distance along the cast direction until touching.
    pub distance: f32,
    /// Surface normal facing the caster.
    pub normal: Vec3,
    pub surface: SurfaceId,
}

/// Minimum translation separating an overlapping volume from geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    pub direction: Vec3,
    pub distance: f32,
}

/// Synchronous, read-only queries against world geometry.
///
/// Positions passed in are entity origins (the base of the hull). Volumes that
/// already overlap geometry at the start of a cast are not reported by
/// `cast_hull`; recovering from those is left to the caller.
pub trait CollisionQuery {
    /// Sweep `hull` from `origin` along unit `direction`.
    fn cast_hull(
        &self,
        hull: &Hull,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<Contact>;

    fn overlaps(&self, hull: &Hull, origin: Vec3) -> bool;

    /// Resolve the deepest overlap of `hull` at `origin`, if any.
    fn penetration(&self, hull: &Hull, origin: Vec3) -> Option<Penetration>;

    /// Thin ray cast along unit `direction`.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<Contact>;
}

impl<T: CollisionQuery + ?Sized> CollisionQuery for &T {
    fn cast_hull(
        &self,
        hull: &Hull,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<Contact> {
        (**self).cast_hull(hull, origin, direction, max_distance)
    }

    fn overlaps(&self, hull: &Hull, origin: Vec3) -> bool {
        (**self).overlaps(hull, origin)
    }

    fn penetration(&self, hull: &Hull, origin: Vec3) -> Option<Penetration> {
        (**self).penetration(hull, origin)
    }

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<Contact> {
        (**self).raycast(origin, direction, max_distance)
    }
}

/// Outcome of a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepResult {
    pub hit: bool,
    /// Distance that can be travelled safely, never negative.
    pub distance: f32,
    /// Contact normal, zero when nothing was hit.
    pub normal: Vec3,
    pub surface: Option<SurfaceId>,
}

impl SweepResult {
    fn clear(distance: f32) -> Self {
        Self {
            hit: false,
            distance,
            normal: Vec3::ZERO,
            surface: None,
        }
    }
}

/// Runs queries for one hull against one backend.
pub struct Sweeper<'a, Q: CollisionQuery + ?Sized> {
    world: &'a Q,
    hull: Hull,
}

impl<'a, Q: CollisionQuery + ?Sized> Sweeper<'a, Q> {
    pub fn new(world: &'a Q, hull: Hull) -> Self {
        Self { world, hull }
    }

    pub fn hull(&self) -> Hull {
        self.hull
    }

    /// Sweep from `origin` along `direction` up to `max_distance`.
    ///
    /// On a hit the distance is shortened so the hull stops [`HIT_EPSILON`]
    /// away from the surface along its normal.
    pub fn sweep(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> SweepResult {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return SweepResult::clear(0.0);
        }
        let max_distance = max_distance.max(0.0);

        match self
            .world
            .cast_hull(&self.hull, origin, direction, max_distance + HIT_EPSILON)
        {
            Some(contact) => {
                let n_dot = (-contact.normal.dot(direction)).max(MIN_BACKOFF_DOT);
                let backup = HIT_EPSILON / n_dot;
                SweepResult {
                    hit: true,
                    distance: (contact.distance - backup).max(0.0),
                    normal: contact.normal,
                    surface: Some(contact.surface),
                }
            }
            None => SweepResult::clear(max_distance),
        }
    }

    pub fn overlaps(&self, origin: Vec3) -> bool {
        self.world.overlaps(&self.hull, origin)
    }

    /// Overlap test with the hull shrunk by [`HIT_EPSILON`], ignoring resting contact.
    pub fn overlaps_inset(&self, origin: Vec3) -> bool {
        let inset = self.hull.shrunk(HIT_EPSILON);
        self.world.overlaps(&inset, origin + Vec3::Y * HIT_EPSILON)
    }

    pub fn penetration_of(&self, origin: Vec3) -> Option<Penetration> {
        self.world
            .penetration(&self.hull, origin)
            .filter(|p| p.distance.is_finite() && p.direction.length_squared() > 0.0)
    }

    pub fn raycast_down(&self, origin: Vec3, max_distance: f32) -> SweepResult {
        match self.world.raycast(origin, Vec3::NEG_Y, max_distance) {
            Some(contact) => SweepResult {
                hit: true,
                distance: contact.distance.max(0.0),
                normal: contact.normal,
                surface: Some(contact.surface),
            },
            None => SweepResult::clear(max_distance),
        }
    }
}
