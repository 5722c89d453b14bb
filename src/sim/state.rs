//! World state and core simulation types
//!
//! Everything a renderer needs to draw a frame is readable from here; nothing
//! outside `sim` mutates it.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision::CollisionModel;
use super::preset::Preset;
use crate::consts::*;
use crate::error::SimError;

/// Display color, carried through the simulation untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: DVec2,
    pub vel: DVec2,
    /// Fixed for the ball's lifetime; also determines mass
    pub radius: f64,
    pub color: Color,
    /// Seconds since this ball last resolved a ball-ball collision.
    /// Contacts are ignored until it exceeds two timesteps.
    #[serde(default)]
    pub collision_cooldown: f64,
}

impl Ball {
    pub fn new(pos: DVec2, vel: DVec2, radius: f64, color: Color) -> Self {
        Self {
            pos,
            vel,
            radius,
            color,
            collision_cooldown: 0.0,
        }
    }

    /// Mass proxy: area of the disc up to a constant factor
    #[inline]
    pub fn mass(&self) -> f64 {
        self.radius * self.radius
    }

    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass() * self.vel.length_squared()
    }

    #[inline]
    pub fn momentum(&self) -> DVec2 {
        self.vel * self.mass()
    }

    /// Read-only view handed to display code
    pub fn snapshot(&self) -> BallSnapshot {
        BallSnapshot {
            x: self.pos.x,
            y: self.pos.y,
            radius: self.radius,
            color: self.color,
        }
    }
}

/// What a renderer reads after each step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: Color,
}

/// Tunable physical constants for a world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Vertical acceleration applied every step (negative = down)
    pub gravity: f64,
    /// Slack used by the wall tests
    pub wall_margin: f64,
    /// Tolerance added to the squared contact distance
    pub collision_margin: f64,
    /// Momentum transfer used when two balls touch
    pub collision_model: CollisionModel,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            wall_margin: WALL_MARGIN,
            collision_margin: COLLISION_MARGIN,
            collision_model: CollisionModel::default(),
        }
    }
}

impl PhysicsParams {
    /// Gravity must be finite; both margins finite and non-negative
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.gravity.is_finite() {
            return Err(SimError::InvalidParams {
                field: "gravity",
                value: self.gravity,
            });
        }
        for (field, value) in [
            ("wall_margin", self.wall_margin),
            ("collision_margin", self.collision_margin),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::InvalidParams { field, value });
            }
        }
        Ok(())
    }
}

/// The box and the balls inside it
///
/// Deserializing goes through the same checks as `World::with_balls`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "WorldData")]
pub struct World {
    width: f64,
    height: f64,
    /// Fixed set of balls, processed in this order every step
    pub(crate) balls: Vec<Ball>,
    pub(crate) params: PhysicsParams,
    /// Simulated seconds so far
    pub(crate) elapsed: f64,
    /// Completed steps
    pub(crate) steps: u64,
}

impl World {
    /// Create a world with the default three-ball scene
    pub fn new(width: f64, height: f64) -> Result<Self, SimError> {
        Self::with_preset(width, height, &Preset::default())
    }

    /// Create a world populated from a preset
    pub fn with_preset(width: f64, height: f64, preset: &Preset) -> Result<Self, SimError> {
        check_bounds(width, height)?;
        let balls = preset.build(width, height)?;
        let world = Self::with_balls(width, height, balls)?;
        log::info!(
            "World {}x{} created from {} preset with {} balls",
            width,
            height,
            preset.as_str(),
            world.balls.len()
        );
        Ok(world)
    }

    /// Create a world from caller-supplied balls
    ///
    /// The ball count is fixed from here on.
    pub fn with_balls(width: f64, height: f64, balls: Vec<Ball>) -> Result<Self, SimError> {
        check_bounds(width, height)?;

        let limit = width.min(height) / 2.0;
        for (index, ball) in balls.iter().enumerate() {
            if !ball.radius.is_finite() || ball.radius <= 0.0 {
                return Err(SimError::InvalidRadius {
                    index,
                    radius: ball.radius,
                });
            }
            if ball.radius > limit {
                return Err(SimError::BallTooLarge {
                    index,
                    radius: ball.radius,
                    limit,
                });
            }
        }

        Ok(Self {
            width,
            height,
            balls,
            params: PhysicsParams::default(),
            elapsed: 0.0,
            steps: 0,
        })
    }

    /// Replace the physical constants
    pub fn with_params(mut self, params: PhysicsParams) -> Result<Self, SimError> {
        params.validate()?;
        self.params = params;
        Ok(self)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn params(&self) -> &PhysicsParams {
        &self.params
    }

    /// Balls in processing order (read-only)
    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Display view of every ball
    pub fn snapshot(&self) -> Vec<BallSnapshot> {
        self.balls.iter().map(Ball::snapshot).collect()
    }

    /// Total kinetic energy (½·m·|v|² with m = r²)
    pub fn kinetic_energy(&self) -> f64 {
        self.balls.iter().map(Ball::kinetic_energy).sum()
    }

    /// Total linear momentum
    pub fn momentum(&self) -> DVec2 {
        self.balls.iter().map(Ball::momentum).sum()
    }
}

/// Unchecked wire form of `World`
#[derive(Deserialize)]
struct WorldData {
    width: f64,
    height: f64,
    balls: Vec<Ball>,
    #[serde(default)]
    params: PhysicsParams,
    #[serde(default)]
    elapsed: f64,
    #[serde(default)]
    steps: u64,
}

impl TryFrom<WorldData> for World {
    type Error = SimError;

    fn try_from(data: WorldData) -> Result<Self, Self::Error> {
        let mut world = World::with_balls(data.width, data.height, data.balls)?
            .with_params(data.params)?;
        world.elapsed = data.elapsed;
        world.steps = data.steps;
        Ok(world)
    }
}

fn check_bounds(width: f64, height: f64) -> Result<(), SimError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidBounds { width, height })
    }
}
