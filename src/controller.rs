//! Per-tick movement integration.

use glam::Vec3;

use crate::config::Config;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::ConfigError;
use crate::ground::GroundClassifier;
use crate::input::TickInput;
use crate::query::{CollisionQuery, Hull, SurfaceId, Sweeper};
use crate::shaping::{accelerate, apply_friction, clamp_speed};
use crate::slide::collide_and_slide;
use crate::stance::Locomotion;
use crate::step::StepResolver;
use crate::stuck::StuckRecovery;

/// Kinematic state of one entity. Position is the base of the collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
    pub locomotion: Locomotion,
    /// Geometry the entity is standing on.
    pub surface: Option<SurfaceId>,
}

impl MovementState {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            grounded: false,
            locomotion: Locomotion::default(),
            surface: None,
        }
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub diagnostics: Vec<Diagnostic>,
    /// Height gained by a stair step, for view smoothing.
    pub stepped_up: Option<f32>,
    pub jumped: bool,
    pub stuck: bool,
}

/// Owns and advances the movement state of a single entity.
pub struct MovementIntegrator {
    config: Config,
    state: MovementState,
    classifier: GroundClassifier,
    stuck: StuckRecovery,
    just_jumped: bool,
    sprint_was_held: bool,
}

impl MovementIntegrator {
    pub fn new(config: Config, spawn: Vec3) -> Result<Self, ConfigError> {
        config.validate()?;
        let classifier = GroundClassifier::new(config.min_walkable_normal_y());
        Ok(Self {
            config,
            state: MovementState::at(spawn),
            classifier,
            stuck: StuckRecovery::new(),
            just_jumped: false,
            sprint_was_held: false,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &MovementState {
        &self.state
    }

    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.state.velocity
    }

    pub fn is_grounded(&self) -> bool {
        self.state.grounded
    }

    pub fn is_crouching(&self) -> bool {
        self.state.locomotion.is_crouching()
    }

    pub fn is_sprinting(&self) -> bool {
        self.state.locomotion.is_sprinting()
    }

    pub fn surface(&self) -> Option<SurfaceId> {
        self.state.surface
    }

    pub fn collider_height(&self) -> f32 {
        self.config.collider_height(self.is_crouching())
    }

    fn hull(&self) -> Hull {
        Hull::new(self.config.horizontal_size, self.collider_height())
    }

    /// Move to `position` at rest, as on respawn. Stance is kept.
    pub fn teleport(&mut self, position: Vec3) {
        log::debug!("teleport to {position:?}");
        self.state.position = position;
        self.state.velocity = Vec3::ZERO;
        self.state.grounded = false;
        self.state.surface = None;
        self.just_jumped = false;
        self.stuck.reset();
    }

    /// Advance one fixed tick against `world`.
    pub fn tick<Q: CollisionQuery + ?Sized>(&mut self, world: &Q, input: &TickInput) -> TickReport {
        let mut diagnostics = Diagnostics::new();
        let dt = input.dt.max(0.0);
        let wish = Vec3::new(input.wish_direction.x, 0.0, input.wish_direction.z).normalize_or_zero();

        self.just_jumped = false;
        self.update_sprint_button(input.sprint_held);

        let jumped = input.jump_pressed && self.state.grounded;
        if jumped {
            self.jump();
        }

        self.update_crouch(world, input.crouch_held);

        let sweeper = Sweeper::new(world, self.hull());
        let ground = self
            .classifier
            .classify(&sweeper, self.state.position, self.just_jumped);
        self.state.grounded = ground.grounded;
        self.state.surface = ground.surface;

        let stepped_up = if self.state.grounded {
            self.ground_move(&sweeper, wish, input.sprint_held, dt, &mut diagnostics)
        } else {
            self.air_move(&sweeper, wish, dt, &mut diagnostics);
            None
        };

        let stuck = self.stuck.resolve(
            &sweeper,
            &mut self.state.position,
            &mut self.state.velocity,
            &mut diagnostics,
        );

        TickReport {
            diagnostics: diagnostics.into_vec(),
            stepped_up,
            jumped,
            stuck,
        }
    }

    fn update_sprint_button(&mut self, held: bool) {
        if held && !self.sprint_was_held {
            self.state.locomotion.try_sprint();
        } else if !held && self.sprint_was_held {
            self.state.locomotion.stop_sprint();
        }
        self.sprint_was_held = held;
    }

    fn jump(&mut self) {
        self.state.velocity.y += self.config.jump_impulse;
        self.state.grounded = false;
        self.state.surface = None;
        self.just_jumped = true;
    }

    /// Follow the crouch button. In the air the feet move instead of the head
    /// so the body stays centered. Standing up is undone when there is no room.
    fn update_crouch<Q: CollisionQuery + ?Sized>(&mut self, world: &Q, crouch_held: bool) {
        let crouching = self.state.locomotion.is_crouching();
        let shift = if self.state.grounded {
            0.0
        } else {
            self.config.air_crouch_shift()
        };

        if crouch_held && !crouching {
            self.state.locomotion.crouch();
            self.state.position.y += shift;
        } else if !crouch_held && crouching {
            self.state.locomotion.stand();
            self.state.position.y -= shift;

            let standing = Sweeper::new(world, self.hull());
            if standing.overlaps(self.state.position) {
                log::debug!("no room to stand at {:?}", self.state.position);
                self.state.locomotion.crouch();
                self.state.position.y += shift;
            }
        }
    }

    fn ground_move<Q: CollisionQuery + ?Sized>(
        &mut self,
        sweeper: &Sweeper<'_, Q>,
        wish: Vec3,
        sprint_held: bool,
        dt: f32,
        diagnostics: &mut Diagnostics,
    ) -> Option<f32> {
        let config = &self.config;
        let state = &mut self.state;
        state.velocity.y = 0.0;

        let max_speed = state.locomotion.max_speed(config);
        state
            .locomotion
            .refresh_gait(state.velocity.length(), sprint_held, config.sprint_stop_speed);

        let mut velocity = apply_friction(state.velocity, config.friction, config.stop_speed_floor, dt);
        velocity = accelerate(velocity, wish, config.acceleration, max_speed, dt);
        velocity = clamp_speed(velocity, max_speed);
        state.velocity = velocity;

        if velocity == Vec3::ZERO {
            return None;
        }

        let resolver = StepResolver::new(config.step_height, self.classifier);
        let step = resolver.resolve(sweeper, state.position, velocity, dt, diagnostics);
        state.position = step.position;
        state.velocity = step.velocity;
        state.grounded = step.ground.grounded;
        state.surface = step.ground.surface;
        step.stepped_up
    }

    fn air_move<Q: CollisionQuery + ?Sized>(
        &mut self,
        sweeper: &Sweeper<'_, Q>,
        wish: Vec3,
        dt: f32,
        diagnostics: &mut Diagnostics,
    ) {
        let config = &self.config;
        let state = &mut self.state;

        state.velocity = accelerate(state.velocity, wish, config.air_acceleration, config.air_speed, dt);

        // Split gravity around the move
        let half_gravity = config.gravity * dt * 0.5;
        state.velocity.y -= half_gravity;
        collide_and_slide(sweeper, &mut state.position, &mut state.velocity, dt, diagnostics);
        state.velocity.y -= half_gravity;

        let ground = self
            .classifier
            .classify(sweeper, state.position, self.just_jumped);
        state.grounded = ground.grounded;
        state.surface = ground.surface;
    }
}
