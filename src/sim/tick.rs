//! Simulation step
//!
//! Advances every ball by one timestep, in sequence order. Each ball goes
//! through: cooldown, walls, position, gravity, then contact against the balls
//! already processed this step. Pairs are only tested from the later ball, so
//! a pair is resolved at most once per step.
//!
//! Ball-ball contact is debounced with a per-ball cooldown rather than solved
//! for exact time of impact. Two balls still overlapping right after a bounce
//! would otherwise bounce again on the next step.

use super::collision::{balls_touching, reflect_off_walls, wall_contact};
use super::state::World;
use crate::consts::COOLDOWN_STEPS;
use crate::error::SimError;

impl World {
    /// Advance the world by `dt` seconds of simulated time
    ///
    /// Fails without touching any ball if `dt` is not finite and positive.
    pub fn step(&mut self, dt: f64) -> Result<(), SimError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimError::InvalidTimeStep { dt });
        }

        let width = self.width();
        let height = self.height();
        let params = self.params;

        for i in 0..self.balls.len() {
            let (earlier, rest) = self.balls.split_at_mut(i);
            let ball = &mut rest[0];

            ball.collision_cooldown += dt;

            let contact = wall_contact(ball, width, height, params.wall_margin);
            if contact.any() {
                log::trace!("Ball {} hit wall (x: {}, y: {})", i, contact.x, contact.y);
                reflect_off_walls(ball, contact);
            }

            // Explicit Euler with the already-reflected velocity
            ball.pos += ball.vel * dt;
            ball.vel.y += params.gravity * dt;

            for (j, other) in earlier.iter_mut().enumerate() {
                // Re-checked per candidate: a collision resets the cooldown
                if ball.collision_cooldown <= COOLDOWN_STEPS * dt {
                    continue;
                }
                if !balls_touching(ball, other, params.collision_margin) {
                    continue;
                }

                match params.collision_model.resolve(ball, other) {
                    Ok(()) => {
                        // Only the later ball's timer resets
                        ball.collision_cooldown = 0.0;
                        log::debug!(
                            "Collision {} <-> {} at t={:.4}: v{}={:?} v{}={:?}",
                            i,
                            j,
                            self.elapsed + dt,
                            i,
                            ball.vel,
                            j,
                            other.vel
                        );
                    }
                    Err(e) => log::warn!("Skipping collision {} <-> {}: {}", i, j, e),
                }
            }
        }

        self.elapsed += dt;
        self.steps += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;
    use crate::consts::*;
    use crate::sim::collision::CollisionModel;
    use crate::sim::state::{Ball, Color, PhysicsParams};

    fn ball(x: f64, y: f64, vx: f64, vy: f64, r: f64) -> Ball {
        Ball::new(DVec2::new(x, y), DVec2::new(vx, vy), r, Color::BLUE)
    }

    fn zero_gravity() -> PhysicsParams {
        PhysicsParams {
            gravity: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_invalid_dt() {
        let mut world = World::new(AREA_WIDTH, AREA_HEIGHT).unwrap();
        let before = world.balls().to_vec();

        for dt in [-0.01, 0.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                world.step(dt),
                Err(SimError::InvalidTimeStep { .. })
            ));
        }
        assert_eq!(world.balls(), before.as_slice());
        assert_eq!(world.steps(), 0);
    }

    #[test]
    fn test_left_wall_reflects_regardless_of_dt() {
        for dt in [1e-6, 1e-3, 0.05] {
            let mut world =
                World::with_balls(4.0, 3.0, vec![ball(0.2, 1.5, -1.0, 0.0, 0.2)]).unwrap();
            world.step(dt).unwrap();
            let b = &world.balls()[0];
            assert!(b.vel.x > 0.0, "dt={dt}");
            // Integrated with the reflected velocity
            assert!((b.pos.x - (0.2 + dt)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_floor_reflects_before_gravity() {
        let mut world = World::with_balls(4.0, 3.0, vec![ball(2.0, 0.2, 0.0, -2.0, 0.2)]).unwrap();
        let dt = 0.01;
        world.step(dt).unwrap();
        let b = &world.balls()[0];
        assert!((b.pos.y - (0.2 + 2.0 * dt)).abs() < 1e-12);
        assert!((b.vel.y - (2.0 + GRAVITY * dt)).abs() < 1e-12);
    }

    #[test]
    fn test_free_flight_is_explicit_euler() {
        let mut world = World::with_balls(4.0, 3.0, vec![ball(2.0, 1.5, 1.0, 0.0, 0.2)]).unwrap();
        let dt = 0.1;
        world.step(dt).unwrap();
        world.step(dt).unwrap();
        let b = &world.balls()[0];
        // y after two steps: first step uses vy=0, second vy=g*dt
        assert!((b.pos.y - (1.5 + GRAVITY * dt * dt)).abs() < 1e-12);
        assert!((b.vel.y - 2.0 * GRAVITY * dt).abs() < 1e-12);
        assert!((b.pos.x - 2.2).abs() < 1e-12);
        assert!((world.elapsed() - 0.2).abs() < 1e-12);
        assert_eq!(world.steps(), 2);
    }

    #[test]
    fn test_cooldown_accumulates() {
        let mut world = World::with_balls(4.0, 3.0, vec![ball(2.0, 1.5, 0.0, 0.0, 0.2)]).unwrap();
        world.step(0.01).unwrap();
        world.step(0.02).unwrap();
        assert!((world.balls()[0].collision_cooldown - 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_pair_is_resolved_once_then_debounced() {
        let mut first = ball(1.8, 1.5, 1.0, 0.0, 0.2);
        let mut second = ball(2.2, 1.5, -1.0, 0.0, 0.2);
        first.collision_cooldown = 1.0;
        second.collision_cooldown = 1.0;
        let mut world = World::with_balls(4.0, 3.0, vec![first, second])
            .unwrap()
            .with_params(zero_gravity())
            .unwrap();

        let dt = 0.01;
        world.step(dt).unwrap();
        let balls = world.balls();
        // Swapped (equal masses, head-on)
        assert!((balls[0].vel.x + 1.0).abs() < 1e-9);
        assert!((balls[1].vel.x - 1.0).abs() < 1e-9);
        // Only the later ball was reset
        assert_eq!(balls[1].collision_cooldown, 0.0);
        assert!((balls[0].collision_cooldown - (1.0 + dt)).abs() < 1e-12);

        // Still within contact distance, but the later ball is cooling down
        let after_first = world.balls().to_vec();
        world.step(dt).unwrap();
        let balls = world.balls();
        assert!(balls[0].pos.distance(balls[1].pos) < 0.4 + 0.01);
        assert_eq!(balls[0].vel, after_first[0].vel);
        assert_eq!(balls[1].vel, after_first[1].vel);
    }

    #[test]
    fn test_fresh_balls_do_not_collide_in_first_steps() {
        // Cooldown starts at 0 and must exceed 2·dt
        let mut world = World::with_balls(
            4.0,
            3.0,
            vec![ball(1.8, 1.5, 1.0, 0.0, 0.2), ball(2.2, 1.5, -1.0, 0.0, 0.2)],
        )
        .unwrap()
        .with_params(zero_gravity())
        .unwrap();

        let dt = 0.001;
        world.step(dt).unwrap();
        world.step(dt).unwrap();
        assert_eq!(world.balls()[0].vel.x, 1.0);
        assert_eq!(world.balls()[1].vel.x, -1.0);

        world.step(dt).unwrap();
        assert!(world.balls()[0].vel.x < 0.0);
        assert!(world.balls()[1].vel.x > 0.0);
    }

    #[test]
    fn test_coincident_pair_is_skipped() {
        let mut first = ball(2.0, 1.5, 1.0, 0.0, 0.2);
        let mut second = ball(2.0, 1.5, 1.0, 0.0, 0.2);
        first.collision_cooldown = 1.0;
        second.collision_cooldown = 1.0;
        let mut world = World::with_balls(4.0, 3.0, vec![first, second])
            .unwrap()
            .with_params(zero_gravity())
            .unwrap();

        world.step(0.01).unwrap();
        let balls = world.balls();
        assert_eq!(balls[0].vel, DVec2::new(1.0, 0.0));
        assert_eq!(balls[1].vel, DVec2::new(1.0, 0.0));
        assert!(balls[1].collision_cooldown > 1.0);
    }

    #[test]
    fn test_legacy_model_only_touches_vx() {
        let mut first = ball(1.8, 1.5, 2.0, 0.0, 0.2);
        let mut second = ball(2.25, 1.5, -1.0, 0.0, 0.3);
        first.collision_cooldown = 1.0;
        second.collision_cooldown = 1.0;
        let mut world = World::with_balls(4.0, 3.0, vec![first, second])
            .unwrap()
            .with_params(PhysicsParams {
                collision_model: CollisionModel::Legacy1D,
                ..zero_gravity()
            })
            .unwrap();

        world.step(0.01).unwrap();
        let balls = world.balls();
        assert!((balls[0].vel.x + 1.6).abs() < 1e-9);
        assert!((balls[1].vel.x - 1.4).abs() < 1e-9);
        assert_eq!(balls[0].vel.y, 0.0);
    }

    #[test]
    fn test_default_scene_stays_near_box() {
        // Explicit Euler plus reflect-without-clamp lets balls overshoot a
        // little; they must never escape.
        let mut world = World::new(AREA_WIDTH, AREA_HEIGHT).unwrap();
        for _ in 0..(60 * 30) {
            world.step(SIM_DT).unwrap();
            for b in world.balls() {
                assert!(b.pos.is_finite());
                assert!(b.pos.x > b.radius - 0.5 && b.pos.x < AREA_WIDTH - b.radius + 0.5);
                assert!(b.pos.y > b.radius - 0.5 && b.pos.y < AREA_HEIGHT - b.radius + 0.5);
            }
        }
    }
}
