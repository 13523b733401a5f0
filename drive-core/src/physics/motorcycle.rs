use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::constants::{
    MOTORCYCLE_DRAG_COEFFICIENT, MOTORCYCLE_GROUND_AMPLITUDE, MOTORCYCLE_RIDE_HEIGHT,
    MOTORCYCLE_SCRUB_COEFFICIENT, MPS_TO_KMH,
};
use super::gearbox::Gearbox;
use super::ground::{GroundProfile, RollingGround};
use super::steering::{SteeringContext, SteeringModel};
use super::surface::Surface;
use super::suspension::Suspension;
use super::{
    approach, clamp_timestep, forward_direction, normalized_speed, Longitudinal, VehicleController,
    VehicleKind,
};
use crate::params::{self, MotorcycleParams, ParameterSet, ParamsError};
use crate::player_inputs::DriverInputs;
use crate::pose::Pose;
use crate::telemetry::{Attitude, Telemetry, TelemetryExtras};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotorcycleState {
    pub position: DVec3,
    pub velocity: f64,
    pub heading: f64,
    pub lean: f64,
    pub suspension: Suspension,
    pub traction_modifier: f64,
}

impl Default for MotorcycleState {
    fn default() -> Self {
        MotorcycleState {
            position: DVec3::new(0.0, MOTORCYCLE_RIDE_HEIGHT, 0.0),
            velocity: 0.0,
            heading: 0.0,
            lean: 0.0,
            suspension: Suspension::default(),
            traction_modifier: 1.0,
        }
    }
}

pub struct MotorcycleController {
    params: MotorcycleParams,
    state: MotorcycleState,
    steering_model: SteeringModel,
    gearbox: Gearbox,
    ground: Box<dyn GroundProfile>,
}

impl MotorcycleController {
    pub fn new(params: MotorcycleParams) -> Result<MotorcycleController, ParamsError> {
        params.validate()?;
        Ok(MotorcycleController {
            params,
            state: MotorcycleState::default(),
            steering_model: SteeringModel::default(),
            gearbox: Gearbox::motorcycle(),
            ground: Box::new(RollingGround::new(MOTORCYCLE_GROUND_AMPLITUDE)),
        })
    }

    pub fn with_steering_model(mut self, steering_model: SteeringModel) -> Self {
        self.steering_model = steering_model;
        self
    }

    pub fn with_gearbox(mut self, gearbox: Gearbox) -> Self {
        self.gearbox = gearbox;
        self
    }

    pub fn with_ground(mut self, ground: impl GroundProfile + 'static) -> Self {
        self.ground = Box::new(ground);
        self
    }

    pub fn steering_model(&self) -> SteeringModel {
        self.steering_model
    }

    pub fn set_steering_model(&mut self, steering_model: SteeringModel) {
        self.steering_model = steering_model;
    }

    pub fn params(&self) -> &MotorcycleParams {
        &self.params
    }

    pub fn state(&self) -> &MotorcycleState {
        &self.state
    }

    pub fn replace_params(&mut self, candidate: MotorcycleParams) -> Result<(), ParamsError> {
        params::replace_validated(&mut self.params, candidate)
    }

    fn step(&mut self, dt: f64, inputs: &DriverInputs) {
        let params = self.params;
        let state = &mut self.state;
        let traction = state.traction_modifier;

        let longitudinal = Longitudinal {
            max_speed: params.max_speed,
            acceleration: params.acceleration,
            engine_braking: params.engine_braking,
            manual_braking: params.manual_braking,
            drag: MOTORCYCLE_DRAG_COEFFICIENT,
            scrub: MOTORCYCLE_SCRUB_COEFFICIENT,
        }
        .step(state.velocity, inputs, traction, dt);
        state.velocity = longitudinal.velocity;

        let ctx = SteeringContext {
            steer: inputs.steer,
            velocity: state.velocity,
            normalized_speed: normalized_speed(state.velocity, params.max_speed),
            traction,
            steering_sensitivity: params.steering_sensitivity,
            lean_factor: params.lean_factor,
        };

        // lean settles first; the gyroscopic model turns off the settled angle
        let lean_target = self.steering_model.lean_target(&ctx);
        state.lean = approach(state.lean, lean_target, params.angular_damping, dt);
        state.heading += self.steering_model.yaw_rate(&ctx, state.lean) * dt;

        state.position += forward_direction(state.heading) * state.velocity * dt;

        let ground_height = self.ground.height_at(state.position.x, state.position.z);
        state.suspension.step(
            ground_height,
            params.suspension_stiffness,
            params.suspension_damping,
            dt,
        );
        state.position.y = MOTORCYCLE_RIDE_HEIGHT + state.suspension.vertical_offset;
    }
}

impl VehicleController for MotorcycleController {
    fn kind(&self) -> VehicleKind {
        VehicleKind::Motorcycle
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
            Attitude::Lean {
                lean_angle: self.state.lean,
            },
            extras,
        )
    }

    fn pose(&self) -> Pose {
        Pose {
            position: self.state.position,
            heading: self.state.heading,
            roll: self.state.lean,
            pitch: 0.0,
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
