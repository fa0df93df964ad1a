//! Headless demo: walks an entity through a small box course and logs its state.
//!
//! Usage: `locomotion-demo [tunables.json]`. Set `RUST_LOG=debug` to see
//! solver diagnostics and stair steps.

use std::fs;
use std::process;

use glam::{Vec2, Vec3};
use locomotion::{
    wish_direction_from_axes, Aabb, BoxWorld, Config, MovementIntegrator, TickInput, WorldError,
};

const TICK_RATE: f32 = 50.0;
const SPAWN: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Floor, a 0.5 high step at z = -4, a low ceiling slab over z in [-18, -11]
/// that only fits a crouching body, and a wall closing the course at z = -21.
fn build_course() -> Result<BoxWorld, WorldError> {
    let mut world = BoxWorld::new();
    world.add_aabb(Aabb {
        min: Vec3::new(-10.0, -1.0, -25.0),
        max: Vec3::new(10.0, 0.0, 10.0),
    })?;
    world.add_aabb(Aabb {
        min: Vec3::new(-10.0, 0.0, -25.0),
        max: Vec3::new(10.0, 0.5, -4.0),
    })?;
    world.add_aabb(Aabb {
        min: Vec3::new(-10.0, 2.0, -18.0),
        max: Vec3::new(10.0, 3.0, -11.0),
    })?;
    world.add_aabb(Aabb {
        min: Vec3::new(-10.0, 0.5, -22.0),
        max: Vec3::new(10.0, 4.0, -21.0),
    })?;
    Ok(world)
}

fn load_config() -> Config {
    let Some(path) = std::env::args().nth(1) else {
        return Config::default();
    };
    let parsed = fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|json| Config::from_json_str(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(config) => {
            log::info!("Loaded tunables from {}", path);
            config
        }
        Err(e) => {
            log::error!("Failed to load {}: {}", path, e);
            process::exit(1);
        }
    }
}

/// Scripted input for tick `n`.
fn script(n: u32, dt: f32) -> TickInput {
    // Face -Z the whole run
    let forward = wish_direction_from_axes(Vec2::Y, 0.0);
    match n {
        25 => TickInput {
            jump_pressed: true,
            ..TickInput::idle(dt)
        },
        0..=74 => TickInput::idle(dt),
        75..=124 => TickInput::walk(forward, dt),
        125..=149 => TickInput {
            sprint_held: true,
            ..TickInput::walk(forward, dt)
        },
        150..=249 => TickInput {
            crouch_held: true,
            ..TickInput::walk(forward, dt)
        },
        _ => TickInput::walk(forward, dt),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config();
    let world = match build_course() {
        Ok(world) => world,
        Err(e) => {
            log::error!("Failed to build course: {}", e);
            process::exit(1);
        }
    };
    let mut mover = match MovementIntegrator::new(config, SPAWN) {
        Ok(mover) => mover,
        Err(e) => {
            log::error!("Invalid tunables: {}", e);
            process::exit(1);
        }
    };

    log::info!("Running course with {} boxes", world.len());
    let dt = 1.0 / TICK_RATE;
    for n in 0..400 {
        let report = mover.tick(&world, &script(n, dt));

        if let Some(rise) = report.stepped_up {
            log::info!("tick {}: stepped up {:.2}", n, rise);
        }
        if report.jumped {
            log::info!("tick {}: jumped", n);
        }
        for diagnostic in &report.diagnostics {
            log::debug!("tick {}: {}", n, diagnostic);
        }
        if n % 25 == 0 {
            let p = mover.position();
            let v = mover.velocity();
            log::info!(
                "tick {:3}: pos ({:6.2}, {:5.2}, {:6.2}) speed {:5.2} grounded={} crouching={} sprinting={}",
                n,
                p.x,
                p.y,
                p.z,
                Vec2::new(v.x, v.z).length(),
                mover.is_grounded(),
                mover.is_crouching(),
                mover.is_sprinting(),
            );
        }
    }

    let p = mover.position();
    log::info!("Finished at ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z);
}
