//! Grounded-state detection.

use glam::Vec3;

use crate::config::GROUND_CHECK_DIST;
use crate::query::{CollisionQuery, SurfaceId, Sweeper, SweepResult};

/// Result of a ground check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ground {
    pub grounded: bool,
    pub surface: Option<SurfaceId>,
    pub normal: Option<Vec3>,
}

impl Ground {
    pub const AIRBORNE: Ground = Ground {
        grounded: false,
        surface: None,
        normal: None,
    };

    fn on(hit: &SweepResult) -> Self {
        Self {
            grounded: true,
            surface: hit.surface,
            normal: Some(hit.normal),
        }
    }
}

/// Decides whether a position stands on walkable ground.
#[derive(Debug, Clone, Copy)]
pub struct GroundClassifier {
    min_walkable_normal_y: f32,
}

impl GroundClassifier {
    pub fn new(min_walkable_normal_y: f32) -> Self {
        Self {
            min_walkable_normal_y,
        }
    }

    pub fn is_walkable(&self, normal: Vec3) -> bool {
        normal.y > self.min_walkable_normal_y
    }

    /// Classify `position`.
    ///
    /// A short hull sweep finds the supporting surface. When that surface is too
    /// steep, a thin ray straight down from the base gets one more chance: on a
    /// slope edge the ray can land on the walkable top while the hull corner rests
    /// on the steep side. `just_jumped` suppresses grounding entirely.
    pub fn classify<Q: CollisionQuery + ?Sized>(
        &self,
        sweeper: &Sweeper<'_, Q>,
        position: Vec3,
        just_jumped: bool,
    ) -> Ground {
        if just_jumped {
            return Ground::AIRBORNE;
        }

        let hit = sweeper.sweep(position, Vec3::NEG_Y, GROUND_CHECK_DIST);
        if !hit.hit {
            return Ground::AIRBORNE;
        }
        if self.is_walkable(hit.normal) {
            return Ground::on(&hit);
        }

        // TODO: sample the four base corners instead of a single center ray
        let ray = sweeper.raycast_down(position, GROUND_CHECK_DIST * 2.0);
        if ray.hit && self.is_walkable(ray.normal) {
            return Ground::on(&ray);
        }

        Ground::AIRBORNE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Contact, Hull, Penetration};

    /// Ground whose hull contact and ray contact can report different normals.
    struct Slope {
        hull_normal: Vec3,
        ray_normal: Option<Vec3>,
    }

    impl CollisionQuery for Slope {
        fn cast_hull(&self, _: &Hull, origin: Vec3, dir: Vec3, max: f32) -> Option<Contact> {
            let distance = origin.y;
            (dir.y < 0.0 && distance <= max).then_some(Contact {
                distance,
                normal: self.hull_normal,
                surface: SurfaceId(1),
            })
        }

        fn overlaps(&self, _: &Hull, _: Vec3) -> bool {
            false
        }

        fn penetration(&self, _: &Hull, _: Vec3) -> Option<Penetration> {
            None
        }

        fn raycast(&self, origin: Vec3, _: Vec3, max: f32) -> Option<Contact> {
            let normal = self.ray_normal?;
            (origin.y <= max).then_some(Contact {
                distance: origin.y,
                normal,
                surface: SurfaceId(2),
            })
        }
    }

    fn normal_with_y(y: f32) -> Vec3 {
        Vec3::new((1.0 - y * y).sqrt(), y, 0.0)
    }

    fn classify(world: &Slope, position: Vec3) -> Ground {
        let classifier = GroundClassifier::new(55f32.to_radians().cos());
        let sweeper = Sweeper::new(world, Hull::new(0.5, 2.0));
        classifier.classify(&sweeper, position, false)
    }

    #[test]
    fn test_flat_ground_is_walkable() {
        let world = Slope {
            hull_normal: Vec3::Y,
            ray_normal: None,
        };
        let ground = classify(&world, Vec3::new(0.0, 0.02, 0.0));
        assert!(ground.grounded);
        assert_eq!(ground.surface, Some(SurfaceId(1)));
    }

    #[test]
    fn test_slope_threshold_both_sides() {
        let threshold = 55f32.to_radians().cos();
        let above = Slope {
            hull_normal: normal_with_y(threshold + 1e-4),
            ray_normal: None,
        };
        let at = Slope {
            hull_normal: normal_with_y(threshold),
            ray_normal: None,
        };
        let below = Slope {
            hull_normal: normal_with_y(threshold - 1e-4),
            ray_normal: None,
        };
        assert!(classify(&above, Vec3::new(0.0, 0.02, 0.0)).grounded);
        assert!(!classify(&at, Vec3::new(0.0, 0.02, 0.0)).grounded);
        assert!(!classify(&below, Vec3::new(0.0, 0.02, 0.0)).grounded);
    }

    #[test]
    fn test_ray_fallback_rescues_slope_edge() {
        let world = Slope {
            hull_normal: normal_with_y(0.3),
            ray_normal: Some(Vec3::Y),
        };
        let ground = classify(&world, Vec3::new(0.0, 0.02, 0.0));
        assert!(ground.grounded);
        assert_eq!(ground.surface, Some(SurfaceId(2)));
    }

    #[test]
    fn test_steep_ray_fallback_still_airborne() {
        let world = Slope {
            hull_normal: normal_with_y(0.3),
            ray_normal: Some(normal_with_y(0.4)),
        };
        assert_eq!(classify(&world, Vec3::new(0.0, 0.02, 0.0)), Ground::AIRBORNE);
    }

    #[test]
    fn test_too_high_is_airborne() {
        let world = Slope {
            hull_normal: Vec3::Y,
            ray_normal: Some(Vec3::Y),
        };
        assert!(!classify(&world, Vec3::new(0.0, 0.5, 0.0)).grounded);
    }

    #[test]
    fn test_just_jumped_suppresses_grounding() {
        let world = Slope {
            hull_normal: Vec3::Y,
            ray_normal: None,
        };
        let classifier = GroundClassifier::new(0.5);
        let sweeper = Sweeper::new(&world, Hull::new(0.5, 2.0));
        assert!(!classifier.classify(&sweeper, Vec3::new(0.0, 0.02, 0.0), true).grounded);
    }
}
