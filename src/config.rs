use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// Solver constants
pub const HIT_EPSILON: f32 = 0.02; // min distance kept from any surface
pub const GROUND_CHECK_DIST: f32 = 0.01;
pub const STOP_EPSILON: f32 = 0.001; // solver stops at or below this speed
pub const MAX_BUMPS: usize = 8; // sweep iterations per tick
pub const MAX_CONTACT_PLANES: usize = 8; // simultaneous contact planes per tick

// Stuck recovery
pub const STUCK_TICK_LIMIT: u32 = 5;
pub const STUCK_ESCAPE_HEIGHT: f32 = 0.5;

// Airborne crouch raises the feet by this fraction of the height difference
pub const AIR_CROUCH_SHIFT_DIVISOR: f32 = 1.5;

/// Movement tunables. Read-only while simulating.
///
/// Field names serialize in camelCase so a tunable table can be loaded
/// from JSON; missing entries fall back to [`Config::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    // Ground movement
    pub walking_speed: f32,
    pub sprinting_speed: f32,
    pub crouching_speed: f32,
    pub friction: f32,
    pub acceleration: f32,
    /// Lower bound on the speed used by friction, for sharper stops.
    pub stop_speed_floor: f32,
    /// Sprint ends when speed drops to or below this.
    pub sprint_stop_speed: f32,
    pub step_height: f32,
    pub max_walkable_slope_deg: f32,
    pub jump_impulse: f32,

    // Air movement
    pub air_speed: f32,
    pub air_acceleration: f32,
    pub gravity: f32,

    // Collider
    pub horizontal_size: f32,
    pub standing_height: f32,
    pub crouching_height: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            walking_speed: 6.25,
            sprinting_speed: 8.5,
            crouching_speed: 3.55,
            friction: 3.5,
            acceleration: 6.7,
            stop_speed_floor: 6.0,
            sprint_stop_speed: 1.0,
            step_height: 0.7,
            max_walkable_slope_deg: 55.0,
            jump_impulse: 6.0,
            air_speed: 1.0,
            air_acceleration: 20.0,
            gravity: 15.0,
            horizontal_size: 0.5,
            standing_height: 2.0,
            crouching_height: 1.2,
        }
    }
}

impl Config {
    /// Parse a tunable table, filling anything missing from the defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("walkingSpeed", self.walking_speed),
            ("sprintingSpeed", self.sprinting_speed),
            ("crouchingSpeed", self.crouching_speed),
            ("horizontalSize", self.horizontal_size),
            ("standingHeight", self.standing_height),
            ("crouchingHeight", self.crouching_height),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        let non_negative = [
            ("friction", self.friction),
            ("acceleration", self.acceleration),
            ("stopSpeedFloor", self.stop_speed_floor),
            ("sprintStopSpeed", self.sprint_stop_speed),
            ("stepHeight", self.step_height),
            ("jumpImpulse", self.jump_impulse),
            ("airSpeed", self.air_speed),
            ("airAcceleration", self.air_acceleration),
            ("gravity", self.gravity),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::Negative { name, value });
            }
        }

        if self.crouching_height >= self.standing_height {
            return Err(ConfigError::CrouchNotLower {
                crouching: self.crouching_height,
                standing: self.standing_height,
            });
        }

        if !(self.max_walkable_slope_deg > 0.0 && self.max_walkable_slope_deg < 90.0) {
            return Err(ConfigError::SlopeOutOfRange(self.max_walkable_slope_deg));
        }

        Ok(())
    }

    /// Normals with a vertical component above this are walkable.
    pub fn min_walkable_normal_y(&self) -> f32 {
        self.max_walkable_slope_deg.to_radians().cos()
    }

    pub fn collider_height(&self, crouching: bool) -> f32 {
        if crouching {
            self.crouching_height
        } else {
            self.standing_height
        }
    }

    /// Vertical feet offset applied when crouching or standing in the air.
    pub fn air_crouch_shift(&self) -> f32 {
        (self.standing_height - self.crouching_height) / AIR_CROUCH_SHIFT_DIVISOR
    }
}
