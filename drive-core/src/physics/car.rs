use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::constants::{
    CAR_DRAG_COEFFICIENT, CAR_GROUND_AMPLITUDE, CAR_RIDE_HEIGHT, CAR_SCRUB_COEFFICIENT,
    CAR_STEER_FALLOFF, CAR_TURN_SPEED_CAP, MPS_TO_KMH,
};
use super::gearbox::Gearbox;
use super::ground::{GroundProfile, RollingGround};
use super::surface::Surface;
use super::suspension::Suspension;
use super::{
    approach, clamp_timestep, forward_direction, normalized_speed, Longitudinal, VehicleController,
    VehicleKind,
};
use crate::params::{self, CarParams, ParameterSet, ParamsError};
use crate::player_inputs::DriverInputs;
use crate::pose::Pose;
use crate::telemetry::{Attitude, Telemetry, TelemetryExtras};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarState {
    pub position: DVec3,
    pub velocity: f64,
    pub heading: f64,
    pub roll: f64,
    pub pitch: f64,
    pub suspension: Suspension,
    pub traction_modifier: f64,
}

impl Default for CarState {
    fn default() -> Self {
        CarState {
            position: DVec3::new(0.0, CAR_RIDE_HEIGHT, 0.0),
            velocity: 0.0,
            heading: 0.0,
            roll: 0.0,
            pitch: 0.0,
            suspension: Suspension::default(),
            traction_modifier: 1.0,
        }
    }
}

pub struct CarController {
    params: CarParams,
    state: CarState,
    gearbox: Gearbox,
    ground: Box<dyn GroundProfile>,
}

impl CarController {
    pub fn new(params: CarParams) -> Result<CarController, ParamsError> {
        params.validate()?;
        Ok(CarController {
            params,
            state: CarState::default(),
            gearbox: Gearbox::car(),
            ground: Box::new(RollingGround::new(CAR_GROUND_AMPLITUDE)),
        })
    }

    pub fn with_gearbox(mut self, gearbox: Gearbox) -> Self {
        self.gearbox = gearbox;
        self
    }

    pub fn with_ground(mut self, ground: impl GroundProfile + 'static) -> Self {
        self.ground = Box::new(ground);
        self
    }

    pub fn params(&self) -> &CarParams {
        &self.params
    }

    pub fn state(&self) -> &CarState {
        &self.state
    }

    pub fn replace_params(&mut self, candidate: CarParams) -> Result<(), ParamsError> {
        params::replace_validated(&mut self.params, candidate)
    }

    fn step(&mut self, dt: f64, inputs: &DriverInputs) {
        // one snapshot per frame, so a swap can't land halfway through
        let params = self.params;
        let state = &mut self.state;
        let traction = state.traction_modifier;

        // longitudinal, then drag and scrub
        let longitudinal = Longitudinal {
            max_speed: params.max_speed,
            acceleration: params.acceleration,
            engine_braking: params.engine_braking,
            manual_braking: params.manual_braking,
            drag: CAR_DRAG_COEFFICIENT,
            scrub: CAR_SCRUB_COEFFICIENT,
        }
        .step(state.velocity, inputs, traction, dt);
        state.velocity = longitudinal.velocity;

        // full lock is only available at low speed
        let norm_speed = normalized_speed(state.velocity, params.max_speed);
        let steer_limit = (1.0 - CAR_STEER_FALLOFF * norm_speed) * traction;
        let effective_steer = inputs.steer * steer_limit;
        state.heading += effective_steer
            * params.steering_sensitivity
            * state.velocity.min(CAR_TURN_SPEED_CAP)
            * dt;

        // roll is weight transfer, so it goes against the turn
        let roll_target = -effective_steer * norm_speed * params.roll_factor;
        let pitch_target = (longitudinal.net_acceleration / params.acceleration).clamp(-1.0, 1.0)
            * params.pitch_factor;
        state.roll = approach(state.roll, roll_target, params.angular_damping, dt);
        state.pitch = approach(state.pitch, pitch_target, params.angular_damping, dt);

        state.position += forward_direction(state.heading) * state.velocity * dt;

        let ground_height = self.ground.height_at(state.position.x, state.position.z);
        state.suspension.step(
            ground_height,
            params.suspension_stiffness,
            params.suspension_damping,
            dt,
        );
        state.position.y = CAR_RIDE_HEIGHT + state.suspension.vertical_offset;
    }
}

impl VehicleController for CarController {
    fn kind(&self) -> VehicleKind {
        VehicleKind::Car
    }

    fn update(&mut self, dt: f64, inputs: &DriverInputs) {
        let dt = clamp_timestep(dt);
        if dt == 0.0 {
            return;
        }
        self.step(dt, &inputs.sanitized());
    }

    fn telemetry(&self, inputs: &DriverInputs, extras: &TelemetryExtras) -> Telemetry {
        let inputs = inputs.sanitized();
        Telemetry::build(
            self.state.velocity * MPS_TO_KMH,
            self.gearbox.gear_and_rpm(self.state.velocity, inputs.throttle),
            inputs.throttle,
            inputs.brake,
            inputs.steer,
            Attitude::Body {
                body_roll: self.state.roll,
                body_pitch: self.state.pitch,
            },
            extras,
        )
    }

    fn pose(&self) -> Pose {
        Pose {
            position: self.state.position,
            heading: self.state.heading,
            roll: self.state.roll,
            pitch: self.state.pitch,
        }
    }

    fn velocity(&self) -> f64 {
        self.state.velocity
    }

    fn scale_velocity(&mut self, factor: f64) {
        let factor = if factor.is_finite() { factor } else { 0.0 };
        self.state.velocity = (self.state.velocity * factor).clamp(0.0, self.params.max_speed);
    }

    fn traction_modifier(&self) -> f64 {
        self.state.traction_modifier
    }

    fn set_traction_modifier(&mut self, value: f64) {
        self.state.traction_modifier = if value.is_finite() { value.max(0.0) } else { 1.0 };
    }

    fn apply_surface(&mut self, surface: Surface) {
        self.state.traction_modifier = surface.traction_for(self.params.traction_asphalt);
    }

    fn replace_params_json(&mut self, text: &str) -> Result<(), ParamsError> {
        params::replace_from_json(&mut self.params, text)
    }
}
