//! Escape from geometry the volume ended up inside of.

use glam::Vec3;

use crate::config::{HIT_EPSILON, STUCK_ESCAPE_HEIGHT, STUCK_TICK_LIMIT};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::query::{CollisionQuery, Sweeper};

/// Tracks how many consecutive ticks the volume has been overlapping geometry.
#[derive(Debug, Default, Clone, Copy)]
pub struct StuckRecovery {
    ticks_stuck: u32,
}

impl StuckRecovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticks_stuck(&self) -> u32 {
        self.ticks_stuck
    }

    pub fn reset(&mut self) {
        self.ticks_stuck = 0;
    }

    /// Check for overlap at `position` and push the volume out if needed.
    ///
    /// Returns whether the volume was stuck this tick. Resting contact does not
    /// count; the test uses the hull pulled in by [`HIT_EPSILON`].
    pub fn resolve<Q: CollisionQuery + ?Sized>(
        &mut self,
        sweeper: &Sweeper<'_, Q>,
        position: &mut Vec3,
        velocity: &mut Vec3,
        diagnostics: &mut Diagnostics,
    ) -> bool {
        if !sweeper.overlaps_inset(*position) {
            self.ticks_stuck = 0;
            return false;
        }

        self.ticks_stuck += 1;
        diagnostics.report(Diagnostic::Stuck {
            ticks: self.ticks_stuck,
        });
        *velocity = Vec3::ZERO;

        if self.ticks_stuck > STUCK_TICK_LIMIT {
            diagnostics.report(Diagnostic::SevereStuck {
                ticks: self.ticks_stuck,
            });
            *position += Vec3::Y * STUCK_ESCAPE_HEIGHT;
            return true;
        }

        match sweeper.penetration_of(*position) {
            Some(penetration) => {
                let push = penetration.distance + HIT_EPSILON * 2.0;
                *position += penetration.direction.normalize() * push;
            }
            None => {
                diagnostics.report(Diagnostic::PenetrationUnresolved);
                *position += Vec3::Y * STUCK_ESCAPE_HEIGHT;
            }
        }
        true
    }
}
