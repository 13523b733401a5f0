use glam::DVec3;

use crate::params::ParamsError;
use crate::player_inputs::DriverInputs;
use crate::pose::Pose;
use crate::telemetry::{Telemetry, TelemetryExtras};

pub mod car;
pub mod constants;
pub mod gearbox;
pub mod ground;
pub mod motorcycle;
pub mod steering;
pub mod surface;
pub mod suspension;


use constants::MAX_TIMESTEP;
use surface::Surface;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VehicleKind {
    Car,
    Motorcycle,
}

// The contract the simulation loop drives. Car and motorcycle share nothing
// beyond this: each owns its own state shape and its own update order.
pub trait VehicleController {
    fn kind(&self) -> VehicleKind;

    fn update(&mut self, dt: f64, inputs: &DriverInputs);

    fn telemetry(&self, inputs: &DriverInputs, extras: &TelemetryExtras) -> Telemetry;

    fn pose(&self) -> Pose;

    fn velocity(&self) -> f64;

    // collision response scales speed down instantaneously; the factor is
    // clamped so speed stays within [0, max_speed]
    fn scale_velocity(&mut self, factor: f64);

    fn traction_modifier(&self) -> f64;

    fn set_traction_modifier(&mut self, value: f64);

    fn apply_surface(&mut self, surface: Surface);

    fn replace_params_json(&mut self, text: &str) -> Result<(), ParamsError>;
}

// Longitudinal tuning shared by both variants, gathered from a frame's
// parameter snapshot so the velocity stages read one consistent set
#[derive(Copy, Clone, Debug)]
pub(crate) struct Longitudinal {
    pub max_speed: f64,
    pub acceleration: f64,
    pub engine_braking: f64,
    pub manual_braking: f64,
    pub drag: f64,
    pub scrub: f64,
}

pub(crate) struct LongitudinalStep {
    pub velocity: f64,
    // throttle minus braking, before drag and scrub
    pub net_acceleration: f64,
}

impl Longitudinal {
    pub fn step(
        &self,
        velocity: f64,
        inputs: &DriverInputs,
        traction: f64,
        dt: f64,
    ) -> LongitudinalStep {
        let effective_acceleration = self.acceleration * traction;
        let engine_braking = if velocity > 0.0 {
            self.engine_braking
        } else {
            0.0
        };
        let net_acceleration = inputs.throttle * effective_acceleration
            - (inputs.brake * self.manual_braking + engine_braking);

        let mut new_velocity = velocity + net_acceleration * dt;

        // drag and scrub only ever remove speed, and vanish at rest
        let moving = new_velocity.max(0.0);
        new_velocity -= self.drag * moving * moving * dt;
        new_velocity -=
            inputs.steer.abs() * normalized_speed(moving, self.max_speed) * self.scrub * dt;

        LongitudinalStep {
            velocity: new_velocity.clamp(0.0, self.max_speed),
            net_acceleration,
        }
    }
}

pub fn clamp_timestep(dt: f64) -> f64 {
    if dt.is_finite() && dt > 0.0 {
        dt.min(MAX_TIMESTEP)
    } else {
        0.0
    }
}

pub fn normalized_speed(velocity: f64, max_speed: f64) -> f64 {
    (velocity / max_speed).clamp(0.0, 1.0)
}

// first-order exponential approach; the step fraction is capped at 1 so a
// large rate can't overshoot the target
pub fn approach(current: f64, target: f64, rate: f64, dt: f64) -> f64 {
    current + (target - current) * (rate * dt).min(1.0)
}

// heading 0 faces -z, positive heading turns toward -x
pub fn forward_direction(heading: f64) -> DVec3 {
    DVec3::new(-heading.sin(), 0.0, -heading.cos())
}
