//! Kinematic first-person movement: collide-and-slide against static geometry,
//! stair stepping, ground detection, crouching, sprinting and stuck recovery.
//!
//! The world is reached only through [`CollisionQuery`]. [`BoxWorld`] and
//! [`MeshWorld`] are the bundled backends.

pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod error;
pub mod ground;
pub mod input;
pub mod mesh_world;
pub mod query;
pub mod shaping;
pub mod slide;
pub mod stance;
pub mod step;
pub mod stuck;
pub mod world;

pub use config::Config;
pub use controller::{MovementIntegrator, MovementState, TickReport};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{ConfigError, WorldError};
pub use input::{wish_direction_from_axes, TickInput};
pub use mesh_world::MeshWorld;
pub use query::{CollisionQuery, Contact, Hull, Penetration, SurfaceId};
pub use stance::{Gait, Locomotion, Stance};
pub use world::{Aabb, BoxWorld};
