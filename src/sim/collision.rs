//! Collision detection and response
//!
//! Walls are axis-aligned and only ever flip a velocity component. Ball pairs
//! exchange momentum along the line joining their centers; the component
//! perpendicular to that line is left alone (no friction, no spin).

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::state::Ball;
use crate::error::SimError;
use crate::{polar_to_rect, rect_to_polar};

/// How momentum is exchanged when two balls touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionModel {
    /// Elastic collision along the line of centers, mass = radius²
    #[default]
    Elastic2D,
    /// Legacy x-axis-only exchange with mass = radius.
    /// Only meaningful for balls sharing a horizontal line.
    Legacy1D,
}

impl CollisionModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionModel::Elastic2D => "Elastic2D",
            CollisionModel::Legacy1D => "Legacy1D",
        }
    }

    /// Apply this model to a touching pair
    pub fn resolve(&self, b1: &mut Ball, b2: &mut Ball) -> Result<(), SimError> {
        match self {
            CollisionModel::Elastic2D => transfer_momentum_2d(b1, b2),
            CollisionModel::Legacy1D => {
                transfer_momentum_1d(b1, b2);
                Ok(())
            }
        }
    }
}

/// Which walls a ball is touching this step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    pub x: bool,
    pub y: bool,
}

impl WallContact {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Test a ball against the box `[0, width] × [0, height]`
///
/// Each axis is tested on its own so corners reflect both components.
pub fn wall_contact(ball: &Ball, width: f64, height: f64, margin: f64) -> WallContact {
    let r = ball.radius;
    let (x, y) = (ball.pos.x, ball.pos.y);
    WallContact {
        x: x - margin < r || x + margin > width - r,
        y: y - margin < r || y + margin > height - r,
    }
}

/// Flip the velocity components for the touched walls
///
/// Position is not clamped; a ball that overshot is carried back by the
/// reflected velocity on the next step.
pub fn reflect_off_walls(ball: &mut Ball, contact: WallContact) {
    if contact.x {
        ball.vel.x = -ball.vel.x;
    }
    if contact.y {
        ball.vel.y = -ball.vel.y;
    }
}

/// Contact test for a ball pair
///
/// Compares squared center distance against the squared radius sum plus
/// `margin`. The margin widens the contact zone slightly.
#[inline]
pub fn balls_touching(a: &Ball, b: &Ball, margin: f64) -> bool {
    let reach = a.radius + b.radius;
    a.pos.distance_squared(b.pos) <= reach * reach + margin
}

/// Elastic collision between two discs, mass proportional to radius²
///
/// Velocities are split into a normal part (along the line of centers) and a
/// tangent part. The normal parts go through the 1D elastic equations, the
/// tangent parts are kept.
///
/// Fails with `CoincidentCenters` when the centers coincide and with
/// `NonFiniteSeparation` when their distance is NaN or overflows. Either way
/// both balls are left untouched.
pub fn transfer_momentum_2d(b1: &mut Ball, b2: &mut Ball) -> Result<(), SimError> {
    let m1 = b1.mass();
    let m2 = b2.mass();

    let delta = b2.pos - b1.pos;
    let (angle, distance) = rect_to_polar(delta.x, delta.y);
    if !distance.is_finite() {
        return Err(SimError::NonFiniteSeparation);
    }
    if distance <= 0.0 {
        return Err(SimError::CoincidentCenters);
    }
    let normal = delta / distance;
    // rotate90(x, y) = (-y, x)
    let tangent = normal.perp();

    let u1 = b1.vel.dot(normal);
    let u2 = b2.vel.dot(normal);
    let u1_tangent = b1.vel.dot(tangent);
    let u2_tangent = b2.vel.dot(tangent);

    let (v1, v2) = elastic_1d(m1, m2, u1, u2);

    b1.vel = polar_to_rect(v1, angle) + tangent * u1_tangent;
    b2.vel = polar_to_rect(v2, angle) + tangent * u2_tangent;
    Ok(())
}

/// Legacy x-axis exchange with mass proportional to radius
///
/// Kept for axis-aligned sanity checks; `vel.y` is never touched.
pub fn transfer_momentum_1d(b1: &mut Ball, b2: &mut Ball) {
    let (v1, v2) = elastic_1d(b1.radius, b2.radius, b1.vel.x, b2.vel.x);
    b1.vel.x = v1;
    b2.vel.x = v2;
}

/// Final speeds of a 1D elastic collision
#[inline]
fn elastic_1d(m1: f64, m2: f64, u1: f64, u2: f64) -> (f64, f64) {
    let total = m1 + m2;
    let v1 = (m1 * u1 + 2.0 * m2 * u2 - m2 * u1) / total;
    let v2 = (2.0 * m1 * u1 + m2 * u2 - m1 * u2) / total;
    (v1, v2)
}

/// Normal-direction momentum of a pair, for checking conservation
pub fn normal_momentum(b1: &Ball, b2: &Ball) -> Option<f64> {
    let normal = (b2.pos - b1.pos).try_normalize()?;
    Some(b1.mass() * b1.vel.dot(normal) + b2.mass() * b2.vel.dot(normal))
}

/// Component of `vel` perpendicular to the `from -> to` line
pub fn tangent_component(vel: DVec2, from: DVec2, to: DVec2) -> Option<f64> {
    let normal = (to - from).try_normalize()?;
    Some(vel.dot(normal.perp()))
}
