//! Stance and gait state machine.
//!
//! Body posture ({Standing, Crouching}) and gait ({Idle, Walking, Sprinting})
//! are tracked together so that illegal combinations cannot be built: sprinting
//! is only reachable while standing, and crouching drops out of a sprint.

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Body posture, which decides the collider height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Stance {
    #[default]
    Standing,
    Crouching,
}

/// How fast the entity is trying to move on the ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gait {
    #[default]
    Idle,
    Walking,
    Sprinting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Locomotion {
    stance: Stance,
    gait: Gait,
}

impl Locomotion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stance(&self) -> Stance {
        self.stance
    }

    pub fn gait(&self) -> Gait {
        self.gait
    }

    pub fn is_crouching(&self) -> bool {
        self.stance == Stance::Crouching
    }

    pub fn is_sprinting(&self) -> bool {
        self.gait == Gait::Sprinting
    }

    pub fn crouch(&mut self) {
        self.stance = Stance::Crouching;
        if self.gait == Gait::Sprinting {
            self.gait = Gait::Walking;
        }
    }

    pub fn stand(&mut self) {
        self.stance = Stance::Standing;
    }

    /// Enter a sprint. Refused while crouching.
    pub fn try_sprint(&mut self) -> bool {
        if self.stance == Stance::Crouching {
            return false;
        }
        self.gait = Gait::Sprinting;
        true
    }

    pub fn stop_sprint(&mut self) {
        if self.gait == Gait::Sprinting {
            self.gait = Gait::Walking;
        }
    }

    /// Update the gait from the current ground speed.
    ///
    /// At or below `sprint_stop_speed` the entity counts as idle. Above it, a
    /// held sprint button resumes sprinting if the stance allows it.
    pub fn refresh_gait(&mut self, speed: f32, sprint_held: bool, sprint_stop_speed: f32) {
        if speed <= sprint_stop_speed {
            self.gait = Gait::Idle;
            return;
        }
        if self.gait == Gait::Sprinting {
            return;
        }
        if !(sprint_held && self.try_sprint()) {
            self.gait = Gait::Walking;
        }
    }

    /// Ground speed cap for the current state.
    pub fn max_speed(&self, config: &Config) -> f32 {
        match (self.stance, self.gait) {
            (Stance::Crouching, _) => config.crouching_speed,
            (Stance::Standing, Gait::Sprinting) => config.sprinting_speed,
            (Stance::Standing, _) => config.walking_speed,
        }
    }
}
