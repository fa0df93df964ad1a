//! Stair stepping.
//!
//! A grounded move is solved twice: once as-is and once lifted by the step
//! height and settled back down afterwards. The lifted attempt wins only when it
//! lands on walkable ground and carries the entity further horizontally.
//! Diagnostics of the losing attempt are discarded.

use glam::Vec3;

use crate::diagnostics::Diagnostics;
use crate::ground::{Ground, GroundClassifier};
use crate::query::{CollisionQuery, Sweeper};
use crate::slide::collide_and_slide;

// Rises below this are settling noise, not a step
const MIN_STEP_RISE: f32 = 1e-3;

/// Final state chosen by the step resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepMove {
    pub position: Vec3,
    pub velocity: Vec3,
    pub ground: Ground,
    /// Height gained when the stepped path was taken.
    pub stepped_up: Option<f32>,
}

fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    let d = b - a;
    (d.x * d.x + d.z * d.z).sqrt()
}

pub struct StepResolver {
    pub step_height: f32,
    pub classifier: GroundClassifier,
}

impl StepResolver {
    pub fn new(step_height: f32, classifier: GroundClassifier) -> Self {
        Self {
            step_height,
            classifier,
        }
    }

    pub fn resolve<Q: CollisionQuery + ?Sized>(
        &self,
        sweeper: &Sweeper<'_, Q>,
        position: Vec3,
        velocity: Vec3,
        dt: f32,
        diagnostics: &mut Diagnostics,
    ) -> StepMove {
        // Regular move, then stick to ground directly below
        let mut reg_position = position;
        let mut reg_velocity = velocity;
        let mut reg_diagnostics = Diagnostics::deferred();
        collide_and_slide(sweeper, &mut reg_position, &mut reg_velocity, dt, &mut reg_diagnostics);

        let down = sweeper.sweep(reg_position, Vec3::NEG_Y, self.step_height);
        let settled = reg_position + Vec3::NEG_Y * down.distance;
        let settled_ground = self.classifier.classify(sweeper, settled, false);
        let reg_ground = if settled_ground.grounded {
            reg_position = settled;
            settled_ground
        } else {
            self.classifier.classify(sweeper, reg_position, false)
        };

        // Lifted move
        let up = sweeper.sweep(position, Vec3::Y, self.step_height);
        let mut step_position = position + Vec3::Y * up.distance;
        let mut step_velocity = velocity;
        let mut step_diagnostics = Diagnostics::deferred();
        collide_and_slide(
            sweeper,
            &mut step_position,
            &mut step_velocity,
            dt,
            &mut step_diagnostics,
        );

        let down = sweeper.sweep(step_position, Vec3::NEG_Y, self.step_height + up.distance);
        step_position += Vec3::NEG_Y * down.distance;
        let step_ground = self.classifier.classify(sweeper, step_position, false);

        let regular = StepMove {
            position: reg_position,
            velocity: reg_velocity,
            ground: reg_ground,
            stepped_up: None,
        };

        let reg_reach = horizontal_distance(position, reg_position);
        let further = horizontal_distance(position, step_position) > reg_reach;
        if !step_ground.grounded || !further {
            diagnostics.merge(reg_diagnostics);
            return regular;
        }
        diagnostics.merge(step_diagnostics);

        // Keep upward momentum from ramps
        step_velocity.y = step_velocity.y.max(reg_velocity.y);
        let rise = step_position.y - position.y;
        log::trace!("stepped {rise:.3} at {step_position:?}");

        StepMove {
            position: step_position,
            velocity: step_velocity,
            ground: step_ground,
            stepped_up: (rise > MIN_STEP_RISE).then_some(rise),
        }
    }
}
