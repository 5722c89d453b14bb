//! Bouncing Balls headless driver
//!
//! Stands in for a render loop: steps the world at a fixed dt and prints one
//! JSON line per report with the ball snapshot.
//!
//! Usage: `bouncing-balls [settings.json]`

use std::process::ExitCode;

use serde::Serialize;

use bouncing_balls::{BallSnapshot, SimConfig, SimError, World};

#[derive(Serialize)]
struct Report<'a> {
    frame: u64,
    elapsed: f64,
    kinetic_energy: f64,
    balls: &'a [BallSnapshot],
}

fn report(world: &World, frame: u64) -> Result<(), SimError> {
    let balls = world.snapshot();
    let line = serde_json::to_string(&Report {
        frame,
        elapsed: world.elapsed(),
        kinetic_energy: world.kinetic_energy(),
        balls: &balls,
    })?;
    println!("{line}");
    Ok(())
}

fn run(config: &SimConfig) -> Result<(), SimError> {
    let mut world = config.build_world()?;
    let driver = config.driver;
    log::info!(
        "Running {} frames at dt={} ({})",
        driver.frames,
        driver.dt,
        world.params().collision_model.as_str()
    );

    report(&world, 0)?;
    for frame in 1..=driver.frames {
        world.step(driver.dt)?;
        let due = driver.report_every > 0 && frame % driver.report_every == 0;
        if due || frame == driver.frames {
            report(&world, frame)?;
        }
    }

    log::info!(
        "Done: {:.3}s simulated, kinetic energy {:.4}",
        world.elapsed(),
        world.kinetic_energy()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Bouncing Balls starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => SimConfig::default(),
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Simulation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
