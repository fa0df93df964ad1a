//! Collide-and-slide movement solver.
//!
//! Moves a volume along its velocity for one tick. Each bump iteration sweeps
//! as far as possible, then redirects the velocity so it slides along every
//! plane touched since the last actual travel. Two planes that cannot both be
//! satisfied by a single-plane slide form a crease, and motion continues along
//! their intersection line. Anything more tangled stops the volume.

use glam::Vec3;

use crate::config::{MAX_BUMPS, MAX_CONTACT_PLANES, STOP_EPSILON};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::query::{CollisionQuery, Sweeper};

/// Remove the component of `velocity` going through the plane with `normal`.
///
/// The result is never longer than the input.
pub fn project_on_plane(velocity: Vec3, normal: Vec3) -> Vec3 {
    velocity - normal * velocity.dot(normal)
}

/// Contact normals collected since the last iteration that actually moved.
#[derive(Debug, Clone, Copy)]
pub struct ContactPlaneSet {
    normals: [Vec3; MAX_CONTACT_PLANES],
    len: usize,
}

/// The plane set already holds [`MAX_CONTACT_PLANES`] normals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneSetFull;

impl Default for ContactPlaneSet {
    fn default() -> Self {
        Self {
            normals: [Vec3::ZERO; MAX_CONTACT_PLANES],
            len: 0,
        }
    }
}

impl ContactPlaneSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, normal: Vec3) -> Result<(), PlaneSetFull> {
        if self.len >= MAX_CONTACT_PLANES {
            return Err(PlaneSetFull);
        }
        self.normals[self.len] = normal;
        self.len += 1;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[Vec3] {
        &self.normals[..self.len]
    }

    /// Slide `velocity` along the planes.
    ///
    /// Tries each plane in insertion order and keeps the first projection that
    /// does not point into any other plane. With exactly two conflicting planes
    /// the velocity follows their crease. Returns `None` when no direction fits.
    pub fn clip(&self, velocity: Vec3) -> Option<Vec3> {
        let planes = self.as_slice();

        for (i, &plane) in planes.iter().enumerate() {
            let clipped = project_on_plane(velocity, plane);
            let conflicts = planes
                .iter()
                .enumerate()
                .any(|(j, &other)| j != i && clipped.dot(other) < 0.0);
            if !conflicts {
                return Some(clipped);
            }
        }

        if let [first, second] = planes {
            let crease = first.cross(*second).normalize_or_zero();
            return Some(crease * crease.dot(velocity));
        }

        None
    }
}

/// Why the solver stopped iterating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideEnd {
    /// Velocity fell to the stop threshold.
    Stopped,
    /// Final sweep completed without contact.
    Clear,
    /// Velocity turned against the tick's starting velocity.
    Oscillation,
    /// No slide direction satisfies the contact planes.
    Wedged,
    /// More contact planes than the solver tracks.
    Overflow,
    /// Remaining tick time went negative.
    OutOfTime,
    /// Every bump iteration was used.
    BumpLimit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideOutcome {
    pub bumps: usize,
    pub end: SlideEnd,
    /// Whether any sweep this tick hit geometry.
    pub touched: bool,
}

/// Advance `position` and `velocity` by `dt`, sliding along blocking geometry.
///
/// Always terminates within [`MAX_BUMPS`] iterations. Whatever state was
/// reached when an iteration limit trips is kept as the result.
pub fn collide_and_slide<Q: CollisionQuery + ?Sized>(
    sweeper: &Sweeper<'_, Q>,
    position: &mut Vec3,
    velocity: &mut Vec3,
    dt: f32,
    diagnostics: &mut Diagnostics,
) -> SlideOutcome {
    let start_velocity = *velocity;
    let mut pre_clip_velocity = start_velocity;
    let mut planes = ContactPlaneSet::new();
    let mut time_left = dt.max(0.0);
    let mut touched = false;

    for bump in 0..MAX_BUMPS {
        let bumps = bump + 1;
        let speed = velocity.length();
        if speed <= STOP_EPSILON {
            *velocity = Vec3::ZERO;
            return SlideOutcome {
                bumps,
                end: SlideEnd::Stopped,
                touched,
            };
        }

        let direction = *velocity / speed;
        let attempted = speed * time_left;
        let sweep = sweeper.sweep(*position, direction, attempted);

        if !sweep.hit {
            *position += direction * sweep.distance;
            return SlideOutcome {
                bumps,
                end: SlideEnd::Clear,
                touched,
            };
        }
        touched = true;

        if sweep.distance > 0.0 {
            *position += direction * sweep.distance;

            let mut fraction = if attempted > 0.0 {
                sweep.distance / attempted
            } else {
                1.0
            };
            if fraction > 1.0 {
                diagnostics.report(Diagnostic::TravelFractionOvershoot { fraction });
                fraction = 1.0;
            }
            time_left -= fraction * time_left;

            planes.clear();
            pre_clip_velocity = *velocity;
        }

        if planes.push(sweep.normal).is_err() {
            diagnostics.report(Diagnostic::PlaneSetOverflow);
            *velocity = Vec3::ZERO;
            return SlideOutcome {
                bumps,
                end: SlideEnd::Overflow,
                touched,
            };
        }

        match planes.clip(pre_clip_velocity) {
            Some(clipped) => *velocity = clipped,
            None => {
                diagnostics.report(Diagnostic::ConflictingPlanes {
                    planes: planes.len(),
                });
                *velocity = Vec3::ZERO;
                return SlideOutcome {
                    bumps,
                    end: SlideEnd::Wedged,
                    touched,
                };
            }
        }

        if velocity.dot(start_velocity) < 0.0 {
            *velocity = Vec3::ZERO;
            return SlideOutcome {
                bumps,
                end: SlideEnd::Oscillation,
                touched,
            };
        }

        if time_left < 0.0 {
            diagnostics.report(Diagnostic::TimeBudgetExhausted);
            return SlideOutcome {
                bumps,
                end: SlideEnd::OutOfTime,
                touched,
            };
        }
    }

    diagnostics.report(Diagnostic::BumpLimitReached);
    SlideOutcome {
        bumps: MAX_BUMPS,
        end: SlideEnd::BumpLimit,
        touched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Hull;
    use crate::world::{Aabb, BoxWorld};

    const DT: f32 = 0.02;

    fn room() -> BoxWorld {
        let mut world = BoxWorld::new();
        // floor
        world
            .add_aabb(Aabb {
                min: Vec3::new(-20.0, -1.0, -20.0),
                max: Vec3::new(20.0, 0.0, 20.0),
            })
            .unwrap();
        // wall facing -X at x = 1
        world
            .add_aabb(Aabb {
                min: Vec3::new(1.0, 0.0, -20.0),
                max: Vec3::new(2.0, 3.0, 20.0),
            })
            .unwrap();
        world
    }

    fn run(world: &BoxWorld, position: &mut Vec3, velocity: &mut Vec3, dt: f32) -> SlideOutcome {
        let sweeper = Sweeper::new(world, Hull::new(0.5, 2.0));
        let mut diagnostics = Diagnostics::new();
        collide_and_slide(&sweeper, position, velocity, dt, &mut diagnostics)
    }

    #[test]
    fn test_project_never_grows() {
        let normals = [
            Vec3::X,
            Vec3::new(1.0, 1.0, 0.0).normalize(),
            Vec3::new(-0.3, 0.2, 0.9).normalize(),
        ];
        let velocities = [
            Vec3::new(3.0, -2.0, 1.0),
            Vec3::new(-5.0, 0.0, 0.5),
            Vec3::new(0.1, 9.0, -4.0),
        ];
        for n in normals {
            for v in velocities {
                assert!(project_on_plane(v, n).length() <= v.length() + 1e-6);
            }
        }
    }

    #[test]
    fn test_zero_velocity_is_noop() {
        let world = room();
        let mut position = Vec3::new(0.0, 0.02, 0.0);
        let mut velocity = Vec3::ZERO;
        let outcome = run(&world, &mut position, &mut velocity, DT);
        assert_eq!(position, Vec3::new(0.0, 0.02, 0.0));
        assert_eq!(velocity, Vec3::ZERO);
        assert_eq!(outcome.end, SlideEnd::Stopped);
        assert_eq!(outcome.bumps, 1);
    }

    #[test]
    fn test_free_move_covers_full_distance() {
        let world = room();
        let mut position = Vec3::new(-5.0, 0.02, 0.0);
        let mut velocity = Vec3::new(0.0, 0.0, 5.0);
        let outcome = run(&world, &mut position, &mut velocity, DT);
        assert_eq!(outcome.end, SlideEnd::Clear);
        assert!(!outcome.touched);
        assert!((position.z - 0.1).abs() < 1e-6);
        assert_eq!(velocity, Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_slides_along_wall() {
        let world = room();
        let mut position = Vec3::new(0.70, 0.02, 0.0);
        let mut velocity = Vec3::new(5.0, 0.0, 5.0);
        let outcome = run(&world, &mut position, &mut velocity, DT);
        assert!(outcome.touched);
        // hull face stops HIT_EPSILON short of x = 1
        assert!(position.x <= 0.75 - 0.02 + 1e-5);
        assert!(velocity.x.abs() < 1e-6);
        assert!((velocity.z - 5.0).abs() < 1e-5);
        assert!(position.z > 0.0);
    }

    #[test]
    fn test_head_on_wall_stops() {
        let world = room();
        let mut position = Vec3::new(0.70, 0.02, 0.0);
        let mut velocity = Vec3::new(5.0, 0.0, 0.0);
        run(&world, &mut position, &mut velocity, DT);
        assert_eq!(velocity, Vec3::ZERO);
        assert!(position.x < 0.75);
    }

    #[test]
    fn test_terminates_within_bump_limit() {
        let world = room();
        let mut position = Vec3::new(0.0, 0.02, 0.0);
        let mut velocity = Vec3::new(200.0, -50.0, 30.0);
        let outcome = run(&world, &mut position, &mut velocity, 1.0);
        assert!(outcome.bumps <= MAX_BUMPS);
        assert!(position.is_finite());
        assert!(velocity.is_finite());
    }

    #[test]
    fn test_clip_prefers_first_compatible_plane() {
        let mut planes = ContactPlaneSet::new();
        planes.push(Vec3::NEG_X).unwrap();
        let v = planes.clip(Vec3::new(3.0, 0.0, 1.0)).unwrap();
        assert_eq!(v, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_clip_follows_crease() {
        let a = Vec3::new(-1.0, 0.0, -1.0).normalize();
        let b = Vec3::new(-1.0, 0.0, 1.0).normalize();
        let mut planes = ContactPlaneSet::new();
        planes.push(a).unwrap();
        planes.push(b).unwrap();

        let incoming = Vec3::new(4.0, 1.5, 0.3);
        let v = planes.clip(incoming).unwrap();
        let line = a.cross(b).normalize();
        assert!(v.cross(line).length() < 1e-5);
        assert!((v.length() - incoming.dot(line).abs()).abs() < 1e-5);
    }

    #[test]
    fn test_clip_three_conflicting_planes_fails() {
        let mut planes = ContactPlaneSet::new();
        planes.push(Vec3::new(-1.0, 0.0, -1.0).normalize()).unwrap();
        planes.push(Vec3::new(-1.0, 0.0, 1.0).normalize()).unwrap();
        planes.push(Vec3::new(-1.0, -1.0, 0.0).normalize()).unwrap();
        assert_eq!(planes.clip(Vec3::new(5.0, 1.0, 0.0)), None);
    }

    #[test]
    fn test_plane_set_capacity() {
        let mut planes = ContactPlaneSet::new();
        for _ in 0..MAX_CONTACT_PLANES {
            planes.push(Vec3::Y).unwrap();
        }
        assert_eq!(planes.push(Vec3::Y), Err(PlaneSetFull));
        assert_eq!(planes.len(), MAX_CONTACT_PLANES);
    }
}
