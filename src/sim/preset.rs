//! Initial ball configurations
//!
//! Presets are expressed relative to the box so the same scene works at any
//! size. `Scatter` is seeded and therefore reproducible.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{Ball, Color};
use crate::error::SimError;

/// Consecutive rejected placements before `Scatter` gives up
const SCATTER_ATTEMPTS_PER_BALL: usize = 1000;

/// Named starting scene
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Preset {
    /// Three balls of different sizes moving horizontally
    #[default]
    Planar,
    /// Two balls on one horizontal line, for checking the legacy 1D model
    Linear,
    /// Random non-overlapping balls
    Scatter { count: usize, seed: u64 },
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Planar => "Planar",
            Preset::Linear => "Linear",
            Preset::Scatter { .. } => "Scatter",
        }
    }

    /// Build the balls for a `width × height` box
    pub fn build(&self, width: f64, height: f64) -> Result<Vec<Ball>, SimError> {
        match self {
            Preset::Planar => Ok(vec![
                Ball::new(
                    DVec2::new(width / 3.0, height * 0.5),
                    DVec2::new(1.2, 0.0),
                    0.35,
                    Color::BLUE,
                ),
                Ball::new(
                    DVec2::new(2.0 * width / 3.0, height * 0.3),
                    DVec2::new(-1.0, 0.0),
                    0.20,
                    Color::RED,
                ),
                Ball::new(
                    DVec2::new(1.5 * width / 3.0, height * 0.2),
                    DVec2::new(-2.0, 0.0),
                    0.15,
                    Color::GREEN,
                ),
            ]),
            Preset::Linear => Ok(vec![
                Ball::new(
                    DVec2::new(width / 3.0, height * 0.2),
                    DVec2::new(2.0, 0.0),
                    0.2,
                    Color::BLUE,
                ),
                Ball::new(
                    DVec2::new(2.0 * width / 3.0, height * 0.2),
                    DVec2::new(-1.0, 0.0),
                    0.3,
                    Color::RED,
                ),
            ]),
            Preset::Scatter { count, seed } => scatter(width, height, *count, *seed),
        }
    }
}

/// Rejection-sample `count` balls that neither overlap each other nor a wall
fn scatter(width: f64, height: f64, count: usize, seed: u64) -> Result<Vec<Ball>, SimError> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let colors = [Color::BLUE, Color::RED, Color::GREEN];

    // Keep radii well below the box so there is room to place them
    let max_radius = (width.min(height) / 8.0).min(0.35);
    if !width.is_finite() || !height.is_finite() || max_radius.is_nan() || max_radius <= 0.0 {
        return Err(SimError::InvalidBounds { width, height });
    }
    let min_radius = max_radius * 0.3;

    // `count` is caller-controlled, so grow on demand instead of reserving
    let mut balls: Vec<Ball> = Vec::new();
    let mut attempts: u64 = 0;
    let mut rejected = 0;

    while balls.len() < count {
        if rejected >= SCATTER_ATTEMPTS_PER_BALL {
            return Err(SimError::PlacementFailed {
                placed: balls.len(),
                requested: count,
            });
        }
        attempts += 1;

        let radius = rng.random_range(min_radius..max_radius);
        let pos = DVec2::new(
            rng.random_range(radius..(width - radius)),
            rng.random_range(radius..(height - radius)),
        );

        let overlaps = balls
            .iter()
            .any(|other| other.pos.distance(pos) <= other.radius + radius);
        if overlaps {
            rejected += 1;
            continue;
        }
        rejected = 0;

        let angle = rng.random_range(0.0..std::f64::consts::TAU);
        let speed = rng.random_range(0.5..3.0);
        let color = colors[rng.random_range(0..colors.len())];
        balls.push(Ball::new(
            pos,
            crate::polar_to_rect(speed, angle),
            radius,
            color,
        ));
    }

    log::debug!("Scattered {} balls in {} attempts", count, attempts);
    Ok(balls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_matches_reference_scene() {
        let balls = Preset::Planar.build(3.0, 2.0).unwrap();
        assert_eq!(balls.len(), 3);
        assert_eq!(balls[0].pos, DVec2::new(1.0, 1.0));
        assert_eq!(balls[1].vel, DVec2::new(-1.0, 0.0));
        assert_eq!(balls[2].radius, 0.15);
        assert_eq!(balls[2].color, Color::GREEN);
    }

    #[test]
    fn test_linear_balls_share_a_row() {
        let balls = Preset::Linear.build(4.0, 3.0).unwrap();
        assert_eq!(balls.len(), 2);
        assert_eq!(balls[0].pos.y, balls[1].pos.y);
        assert!(balls.iter().all(|b| b.vel.y == 0.0));
    }

    #[test]
    fn test_scatter_is_deterministic() {
        let preset = Preset::Scatter { count: 10, seed: 42 };
        let a = preset.build(4.0, 3.0).unwrap();
        let b = preset.build(4.0, 3.0).unwrap();
        assert_eq!(a, b);

        let other = Preset::Scatter { count: 10, seed: 43 }.build(4.0, 3.0).unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn test_scatter_balls_do_not_overlap() {
        let balls = Preset::Scatter { count: 20, seed: 7 }
            .build(4.0, 3.0)
            .unwrap();
        assert_eq!(balls.len(), 20);
        for (i, a) in balls.iter().enumerate() {
            assert!(a.pos.x >= a.radius && a.pos.x <= 4.0 - a.radius);
            assert!(a.pos.y >= a.radius && a.pos.y <= 3.0 - a.radius);
            for b in &balls[..i] {
                assert!(a.pos.distance(b.pos) > a.radius + b.radius);
            }
        }
    }

    #[test]
    fn test_scatter_gives_up_when_box_is_full() {
        let result = Preset::Scatter { count: 500, seed: 1 }.build(1.0, 1.0);
        assert!(matches!(result, Err(SimError::PlacementFailed { .. })));
    }

    #[test]
    fn test_scatter_huge_count_fails_without_allocating() {
        let result = Preset::Scatter {
            count: usize::MAX / 2,
            seed: 1,
        }
        .build(4.0, 3.0);
        match result {
            Err(SimError::PlacementFailed { placed, requested }) => {
                assert!(placed > 0);
                assert_eq!(requested, usize::MAX / 2);
            }
            other => panic!("expected PlacementFailed, got {other:?}"),
        }
    }
}
