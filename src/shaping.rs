//! Friction and acceleration.

use glam::Vec3;

/// Slow `velocity` down.
///
/// Below `stop_speed` the drop is computed as if moving at `stop_speed`, so
/// slow movement comes to rest quickly instead of decaying forever.
pub fn apply_friction(velocity: Vec3, friction: f32, stop_speed: f32, dt: f32) -> Vec3 {
    let speed = velocity.length();
    if speed == 0.0 {
        return velocity;
    }

    let control = speed.max(stop_speed);
    let new_speed = (speed - control * friction * dt).max(0.0);
    velocity * (new_speed / speed)
}

/// Accelerate toward `wish_dir` without pushing the speed along it past `max_speed`.
pub fn accelerate(velocity: Vec3, wish_dir: Vec3, acceleration: f32, max_speed: f32, dt: f32) -> Vec3 {
    let mut add = acceleration * max_speed * dt;

    let projected = wish_dir.dot(velocity);
    if projected + add > max_speed {
        add = (max_speed - projected).max(0.0);
    }

    velocity + wish_dir * add
}

/// Scale `velocity` down to at most `max_speed`.
pub fn clamp_speed(velocity: Vec3, max_speed: f32) -> Vec3 {
    let speed = velocity.length();
    if speed > max_speed {
        velocity * (max_speed / speed)
    } else {
        velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 50.0;

    #[test]
    fn test_friction_zero_velocity_noop() {
        assert_eq!(apply_friction(Vec3::ZERO, 3.5, 6.0, DT), Vec3::ZERO);
    }

    #[test]
    fn test_friction_uses_stop_speed_floor() {
        let v = Vec3::new(1.0, 0.0, 0.0);
        let slowed = apply_friction(v, 3.5, 6.0, DT);
        // drop = 6 * 3.5 * 0.02 = 0.42
        assert!((slowed.x - 0.58).abs() < 1e-5);
    }

    #[test]
    fn test_friction_reaches_exact_zero_without_reversing() {
        let (friction, stop, dt) = (3.5, 6.0, DT);
        let start = 2.3f32;
        let mut v = Vec3::new(start, 0.0, 0.0);
        let bound = (start / (stop * friction * dt)).ceil() as usize;
        let mut ticks = 0;
        while v != Vec3::ZERO {
            v = apply_friction(v, friction, stop, dt);
            assert!(v.x >= 0.0);
            ticks += 1;
            assert!(ticks <= bound, "still moving after {ticks} ticks");
        }
        assert_eq!(ticks, bound);
    }

    #[test]
    fn test_accelerate_caps_projected_speed() {
        let v = accelerate(Vec3::ZERO, Vec3::X, 6.7, 6.25, DT);
        assert!((v.x - 6.7 * 6.25 * DT).abs() < 1e-5);

        let fast = Vec3::new(6.2, 0.0, 0.0);
        let v = accelerate(fast, Vec3::X, 6.7, 6.25, DT);
        assert!((v.x - 6.25).abs() < 1e-5);
    }

    #[test]
    fn test_accelerate_never_adds_against_overspeed() {
        let fast = Vec3::new(10.0, 0.0, 0.0);
        assert_eq!(accelerate(fast, Vec3::X, 6.7, 6.25, DT), fast);
    }

    #[test]
    fn test_accelerate_sideways_adds_full_amount() {
        let v = Vec3::new(6.25, 0.0, 0.0);
        let turned = accelerate(v, Vec3::Z, 6.7, 6.25, DT);
        assert!((turned.z - 6.7 * 6.25 * DT).abs() < 1e-5);
        assert_eq!(turned.x, 6.25);
    }

    #[test]
    fn test_clamp_speed() {
        let v = clamp_speed(Vec3::new(3.0, 0.0, 4.0), 2.5);
        assert!((v.length() - 2.5).abs() < 1e-5);
        assert_eq!(clamp_speed(Vec3::X, 2.0), Vec3::X);
    }
}
