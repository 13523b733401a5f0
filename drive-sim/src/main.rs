use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;
use std::time::Duration;

use drive_core::recording::TelemetryRecorder;
use drive_core::{Settings, GLOBAL_CONFIG};
use tracing::{error, info};

mod driver;
mod sim;
mod tuning;
mod vehicles;

use driver::{Driver, ScriptedDriver, WanderDriver};
use sim::SimLoop;
use tuning::TuningWatcher;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}

fn build_driver(settings: &Settings) -> Box<dyn Driver> {
    match settings.driver.to_ascii_lowercase().as_str() {
        "wander" => Box::new(WanderDriver::new(settings.seed)),
        _ => Box::new(ScriptedDriver::demo_lap()),
    }
}

fn run(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let vehicle = vehicles::build_vehicle(settings)?;
    info!(
        vehicle = %settings.vehicle,
        preset = %settings.preset,
        driver = %settings.driver,
        frame_ms = settings.frame_ms,
        "starting simulation"
    );

    let mut sim = SimLoop::new(
        vehicle,
        build_driver(settings),
        Duration::from_millis(settings.frame_ms),
    )
    .realtime(settings.realtime)
    .telemetry_log_every(settings.telemetry_log_ms as f64 / 1000.0);

    if let Some(path) = &settings.tuning_file {
        sim = sim.with_tuning(TuningWatcher::new(
            path,
            settings.tuning_poll_ms as f64 / 1000.0,
        ));
    }
    if let Some(path) = &settings.record_file {
        let file = File::create(path)?;
        sim = sim.with_recorder(TelemetryRecorder::new(BufWriter::new(file)));
    }

    let summary = sim.run(settings.run_secs)?;
    info!(
        frames = summary.frames,
        time = summary.sim_time,
        distance = summary.distance,
        top_speed = summary.top_speed,
        tunings_applied = summary.tunings_applied,
        tunings_rejected = summary.tunings_rejected,
        "simulation finished"
    );
    if let Some(telemetry) = summary.last_telemetry {
        println!("{}", serde_json::to_string_pretty(&telemetry)?);
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    match run(&GLOBAL_CONFIG) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "simulation failed");
            ExitCode::FAILURE
        }
    }
}
