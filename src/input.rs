use glam::{Vec2, Vec3};

/// Everything the integrator reads from the outside for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Desired horizontal direction in world space. Zero for no input.
    pub wish_direction: Vec3,
    pub crouch_held: bool,
    pub sprint_held: bool,
    /// True only on the tick the jump button went down.
    pub jump_pressed: bool,
    pub dt: f32,
}

impl TickInput {
    pub fn idle(dt: f32) -> Self {
        Self {
            wish_direction: Vec3::ZERO,
            crouch_held: false,
            sprint_held: false,
            jump_pressed: false,
            dt,
        }
    }

    /// Input that only walks along `wish_direction`.
    pub fn walk(wish_direction: Vec3, dt: f32) -> Self {
        Self {
            wish_direction,
            ..Self::idle(dt)
        }
    }
}

/// Turn stick/keyboard axes into a world-space wish direction.
///
/// `axes.x` strafes right, `axes.y` moves forward. Yaw is the camera's
/// horizontal rotation in radians, with yaw 0 looking down -Z.
pub fn wish_direction_from_axes(axes: Vec2, yaw: f32) -> Vec3 {
    let axes = axes.normalize_or_zero();
    let forward = Vec3::new(yaw.sin(), 0.0, -yaw.cos());
    let right = Vec3::new(yaw.cos(), 0.0, yaw.sin());
    forward * axes.y + right * axes.x
}
