//! Static world made of axis-aligned boxes.
//!
//! Every query is exact, which makes this backend the reference for tests and
//! for blockout levels built from boxes.

use glam::Vec3;

use crate::error::WorldError;
use crate::query::{CollisionQuery, Contact, Hull, Penetration, SurfaceId};

// Directions with a smaller component than this are treated as parallel to that axis
const PARALLEL_EPSILON: f32 = 1e-8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    fn of_hull(hull: &Hull, origin: Vec3) -> Self {
        Self::from_center(hull.center(origin), hull.half_extents)
    }

    /// Strict overlap; touching faces do not count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

#[derive(Debug, Clone, Copy)]
struct Solid {
    aabb: Aabb,
    surface: SurfaceId,
}

#[derive(Debug, Clone, Default)]
pub struct BoxWorld {
    solids: Vec<Solid>,
}

impl BoxWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a solid box by center and half extents.
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3) -> Result<SurfaceId, WorldError> {
        self.add_aabb(Aabb::from_center(center, half_extents))
    }

    pub fn add_aabb(&mut self, aabb: Aabb) -> Result<SurfaceId, WorldError> {
        let size = aabb.max - aabb.min;
        if !(size.x > 0.0 && size.y > 0.0 && size.z > 0.0) || !size.is_finite() {
            return Err(WorldError::DegenerateBox(size.to_array()));
        }
        let surface = SurfaceId(self.solids.len() as u32);
        self.solids.push(Solid { aabb, surface });
        Ok(surface)
    }

    pub fn len(&self) -> usize {
        self.solids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }
}

/// Sweep `moving` along unit `direction` against `target`.
///
/// Returns the entry distance and the face normal of `target` that was hit.
/// Boxes overlapping at the start, and grazing contacts, report nothing.
fn sweep_aabb(moving: &Aabb, direction: Vec3, max_distance: f32, target: &Aabb) -> Option<(f32, Vec3)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut normal = Vec3::ZERO;

    for axis in 0..3 {
        let d = direction[axis];
        if d.abs() < PARALLEL_EPSILON {
            if moving.max[axis] <= target.min[axis] || moving.min[axis] >= target.max[axis] {
                return None;
            }
            continue;
        }

        let (near, far) = if d > 0.0 {
            (target.min[axis] - moving.max[axis], target.max[axis] - moving.min[axis])
        } else {
            (target.max[axis] - moving.min[axis], target.min[axis] - moving.max[axis])
        };
        let t_near = near / d;
        let t_far = far / d;

        if t_near > t_enter {
            t_enter = t_near;
            normal = Vec3::ZERO;
            normal[axis] = -d.signum();
        }
        t_exit = t_exit.min(t_far);
    }

    if t_enter >= t_exit || t_enter < 0.0 || t_enter > max_distance {
        return None;
    }
    Some((t_enter, normal))
}

/// Slab test of a ray against `target`; rays starting inside report nothing.
fn ray_aabb(origin: Vec3, direction: Vec3, max_distance: f32, target: &Aabb) -> Option<(f32, Vec3)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut normal = Vec3::ZERO;

    for axis in 0..3 {
        let d = direction[axis];
        if d.abs() < PARALLEL_EPSILON {
            if origin[axis] < target.min[axis] || origin[axis] > target.max[axis] {
                return None;
            }
            continue;
        }
        let (near, far) = if d > 0.0 {
            (target.min[axis] - origin[axis], target.max[axis] - origin[axis])
        } else {
            (target.max[axis] - origin[axis], target.min[axis] - origin[axis])
        };
        let t_near = near / d;
        if t_near > t_enter {
            t_enter = t_near;
            normal = Vec3::ZERO;
            normal[axis] = -d.signum();
        }
        t_exit = t_exit.min(far / d);
    }

    if t_enter > t_exit || t_enter < 0.0 || t_enter > max_distance {
        return None;
    }
    Some((t_enter, normal))
}

/// Smallest axis push that separates `a` from `b`.
fn min_translation(a: &Aabb, b: &Aabb) -> Penetration {
    let mut best = Penetration {
        direction: Vec3::ZERO,
        distance: f32::INFINITY,
    };
    let a_center = a.center();
    let b_center = b.center();

    for axis in 0..3 {
        let push_positive = b.max[axis] - a.min[axis];
        let push_negative = a.max[axis] - b.min[axis];
        let (distance, sign) = if push_positive < push_negative
            || (push_positive == push_negative && a_center[axis] >= b_center[axis])
        {
            (push_positive, 1.0)
        } else {
            (push_negative, -1.0)
        };
        if distance < best.distance {
            let mut direction = Vec3::ZERO;
            direction[axis] = sign;
            best = Penetration { direction, distance };
        }
    }
    best
}

impl CollisionQuery for BoxWorld {
    fn cast_hull(
        &self,
        hull: &Hull,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<Contact> {
        let moving = Aabb::of_hull(hull, origin);
        self.solids
            .iter()
            .filter_map(|solid| {
                sweep_aabb(&moving, direction, max_distance, &solid.aabb).map(|(distance, normal)| {
                    Contact {
                        distance,
                        normal,
                        surface: solid.surface,
                    }
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn overlaps(&self, hull: &Hull, origin: Vec3) -> bool {
        let volume = Aabb::of_hull(hull, origin);
        self.solids.iter().any(|solid| solid.aabb.overlaps(&volume))
    }

    fn penetration(&self, hull: &Hull, origin: Vec3) -> Option<Penetration> {
        let volume = Aabb::of_hull(hull, origin);
        self.solids
            .iter()
            .filter(|solid| solid.aabb.overlaps(&volume))
            .map(|solid| min_translation(&volume, &solid.aabb))
            .max_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<Contact> {
        self.solids
            .iter()
            .filter_map(|solid| {
                ray_aabb(origin, direction, max_distance, &solid.aabb).map(|(distance, normal)| {
                    Contact {
                        distance,
                        normal,
                        surface: solid.surface,
                    }
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
