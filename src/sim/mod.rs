//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only, no wall clock
//! - Seeded RNG only
//! - Stable iteration order (ball sequence order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod preset;
pub mod state;
pub mod tick;

pub use collision::{
    CollisionModel, WallContact, balls_touching, reflect_off_walls, transfer_momentum_1d,
    transfer_momentum_2d, wall_contact,
};
pub use preset::Preset;
pub use state::{Ball, BallSnapshot, Color, PhysicsParams, World};
