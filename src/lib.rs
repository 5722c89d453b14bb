//! Bouncing Balls - elastic circles in a box under gravity
//!
//! Core modules:
//! - `sim`: Deterministic simulation (integration, wall and ball collisions)
//! - `settings`: JSON-backed simulation configuration
//! - `error`: Error type shared by construction, stepping and config loading

pub mod error;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use settings::SimConfig;
pub use sim::{Ball, BallSnapshot, CollisionModel, Color, PhysicsParams, Preset, World};

use glam::DVec2;

/// Simulation configuration constants
pub mod consts {
    /// Default timestep used by the driver (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;

    /// Default box dimensions (meters)
    pub const AREA_WIDTH: f64 = 4.0;
    pub const AREA_HEIGHT: f64 = 3.0;

    /// Gravitational acceleration (m/s², negative = down)
    pub const GRAVITY: f64 = -9.82;

    /// Slack on wall tests so a ball resting on the boundary still reflects
    pub const WALL_MARGIN: f64 = 0.01;
    /// Added to the squared contact distance when testing ball pairs
    pub const COLLISION_MARGIN: f64 = 0.01;

    /// A ball may only collide again once its cooldown exceeds this many steps
    pub const COOLDOWN_STEPS: f64 = 2.0;
}

/// Convert cartesian (x, y) to polar (angle, radius)
///
/// The angle is in radians within (-π, π].
#[inline]
pub fn rect_to_polar(x: f64, y: f64) -> (f64, f64) {
    (y.atan2(x), (x * x + y * y).sqrt())
}

/// Convert polar (radius, angle) to cartesian (x, y)
#[inline]
pub fn polar_to_rect(radius: f64, angle: f64) -> DVec2 {
    DVec2::new(radius * angle.cos(), radius * angle.sin())
}
