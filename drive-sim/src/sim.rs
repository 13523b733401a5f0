use std::fs::File;
use std::io::BufWriter;
use std::thread;
use std::time::{Duration, Instant};

use drive_core::recording::{FrameRecord, RecordError, TelemetryRecorder};
use drive_core::telemetry::{Telemetry, TelemetryExtras};
use drive_core::physics::clamp_timestep;
use drive_core::VehicleController;
use tracing::{debug, info, warn};

use crate::driver::Driver;
use crate::tuning::{TuningOutcome, TuningWatcher};

pub struct SimSummary {
    pub frames: u64,
    pub sim_time: f64,
    pub distance: f64,
    pub top_speed: f64,
    pub tunings_applied: u32,
    pub tunings_rejected: u32,
    pub last_telemetry: Option<Telemetry>,
}

pub struct SimLoop {
    vehicle: Box<dyn VehicleController>,
    driver: Box<dyn Driver>,
    extras: TelemetryExtras,
    tuning: Option<TuningWatcher>,
    recorder: Option<TelemetryRecorder<BufWriter<File>>>,

    frame_duration: Duration,
    realtime: bool,
    telemetry_log_every: f64,
}

impl SimLoop {
    pub fn new(
        vehicle: Box<dyn VehicleController>,
        driver: Box<dyn Driver>,
        frame_duration: Duration,
    ) -> SimLoop {
        SimLoop {
            vehicle,
            driver,
            extras: TelemetryExtras::new(),
            tuning: None,
            recorder: None,
            frame_duration,
            realtime: false,
            telemetry_log_every: 1.0,
        }
    }

    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    pub fn telemetry_log_every(mut self, seconds: f64) -> Self {
        self.telemetry_log_every = seconds;
        self
    }

    pub fn with_tuning(mut self, tuning: TuningWatcher) -> Self {
        self.tuning = Some(tuning);
        self
    }

    pub fn with_recorder(mut self, recorder: TelemetryRecorder<BufWriter<File>>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    #[cfg(test)]
    pub fn vehicle(&self) -> &dyn VehicleController {
        self.vehicle.as_ref()
    }

    // Drive the vehicle for `run_for` of simulated time, one fixed tick at a time.
    // Simulated time only advances by what the controller actually integrated.
    pub fn run(&mut self, run_for: f64) -> Result<SimSummary, RecordError> {
        let fixed_dt = self.frame_duration.as_secs_f64();
        let mut summary = SimSummary {
            frames: 0,
            sim_time: 0.0,
            distance: 0.0,
            top_speed: 0.0,
            tunings_applied: 0,
            tunings_rejected: 0,
            last_telemetry: None,
        };
        if !self.realtime && clamp_timestep(fixed_dt) == 0.0 {
            warn!(
                frame_duration = ?self.frame_duration,
                "frame duration too short to simulate"
            );
            return Ok(summary);
        }

        let mut next_log = 0.0;
        let mut last_frame = Instant::now();

        while summary.sim_time < run_for {
            let start_time = Instant::now();

            // in realtime mode the step is the wall-clock time since the last
            // frame, clamped like the controller clamps it; after a stall the
            // script and run length follow vehicle time, not the wall clock
            let dt = clamp_timestep(if self.realtime {
                start_time.duration_since(last_frame).as_secs_f64()
            } else {
                fixed_dt
            });
            last_frame = start_time;

            if let Some(tuning) = self.tuning.as_mut() {
                match tuning.poll(summary.sim_time, self.vehicle.as_mut()) {
                    TuningOutcome::Applied => {
                        summary.tunings_applied += 1;
                        info!(
                            path = %tuning.path().display(),
                            time = summary.sim_time,
                            "applied tuning file"
                        );
                    }
                    TuningOutcome::Rejected(err) => {
                        summary.tunings_rejected += 1;
                        warn!(
                            path = %tuning.path().display(),
                            error = %err,
                            "ignored tuning file"
                        );
                    }
                    TuningOutcome::NotDue
                    | TuningOutcome::Unchanged
                    | TuningOutcome::Unreadable => {}
                }
            }

            let command = self.driver.poll(summary.sim_time, dt);
            if let Some(surface) = command.surface {
                debug!(?surface, "surface changed");
                self.vehicle.apply_surface(surface);
            }

            let before = self.vehicle.pose().position;
            self.vehicle.update(dt, &command.inputs);
            let pose = self.vehicle.pose();

            let telemetry = self.vehicle.telemetry(&command.inputs, &self.extras);

            summary.frames += 1;
            summary.sim_time += dt;
            summary.distance += (pose.position - before).length();
            summary.top_speed = summary.top_speed.max(telemetry.speed);

            if summary.sim_time >= next_log {
                next_log = summary.sim_time + self.telemetry_log_every;
                info!(
                    time = summary.sim_time,
                    speed = telemetry.speed,
                    gear = telemetry.gear,
                    rpm = telemetry.rpm,
                    heading = pose.heading,
                    x = pose.position.x,
                    z = pose.position.z,
                    "telemetry"
                );
            }

            if let Some(recorder) = self.recorder.as_mut() {
                recorder.record(&FrameRecord::capture(
                    summary.frames,
                    summary.sim_time,
                    pose,
                    &telemetry,
                ))?;
            }
            summary.last_telemetry = Some(telemetry);

            if self.realtime {
                // wait out the rest of the tick; a slow frame just starts the next one late
                if let Some(remaining) = self.frame_duration.checked_sub(start_time.elapsed()) {
                    thread::sleep(remaining);
                }
            }
        }

        if let Some(recorder) = self.recorder.take() {
            let frames = recorder.frames_written();
            recorder.finish()?;
            info!(frames, "telemetry recording closed");
        }

        Ok(summary)
    }
}
