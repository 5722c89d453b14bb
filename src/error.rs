//! Simulation errors
//!
//! Every variant is a programming or configuration error; nothing here is
//! transient, so callers should fix the input rather than retry.

use std::fmt;

#[derive(Debug)]
pub enum SimError {
    /// Timestep was zero, negative, NaN or infinite
    InvalidTimeStep { dt: f64 },
    /// Box dimensions must be positive and finite
    InvalidBounds { width: f64, height: f64 },
    /// Ball radius must be positive and finite
    InvalidRadius { index: usize, radius: f64 },
    /// Ball cannot fit between opposite walls
    BallTooLarge { index: usize, radius: f64, limit: f64 },
    /// Physics constant outside its allowed range
    InvalidParams { field: &'static str, value: f64 },
    /// Two ball centers coincide, so the collision normal is undefined
    CoincidentCenters,
    /// Distance between two centers is NaN or overflowed to infinity
    NonFiniteSeparation,
    /// Scatter preset ran out of placement attempts
    PlacementFailed { placed: usize, requested: usize },
    Io(std::io::Error),
    Config(serde_json::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidTimeStep { dt } => {
                write!(f, "Invalid timestep {dt}: must be finite and positive")
            }
            SimError::InvalidBounds { width, height } => {
                write!(f, "Invalid bounds {width}x{height}: must be finite and positive")
            }
            SimError::InvalidRadius { index, radius } => {
                write!(f, "Ball {index} has invalid radius {radius}")
            }
            SimError::BallTooLarge {
                index,
                radius,
                limit,
            } => write!(
                f,
                "Ball {index} radius {radius} exceeds half the smaller box side ({limit})"
            ),
            SimError::InvalidParams { field, value } => {
                write!(f, "Invalid physics parameter {field} = {value}")
            }
            SimError::CoincidentCenters => write!(f, "Colliding balls share the same center"),
            SimError::NonFiniteSeparation => {
                write!(f, "Distance between colliding balls is not finite")
            }
            SimError::PlacementFailed { placed, requested } => {
                write!(f, "Only placed {placed} of {requested} balls without overlap")
            }
            SimError::Io(e) => write!(f, "Config I/O error: {e}"),
            SimError::Config(e) => write!(f, "Config parse error: {e}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Io(e) => Some(e),
            SimError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        SimError::Io(e)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Config(e)
    }
}
