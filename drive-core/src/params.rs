//! Tuning constants for each vehicle variant.
//!
//! A parameter set is plain data: controllers copy the whole set once per frame,
//! and a replacement is validated in full before it is swapped in, so a frame
//! never sees half of an old set and half of a new one.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::physics::constants::MAX_TIMESTEP;

#[derive(Error, Debug)]
pub enum ParamsError {
    #[error("malformed parameter set: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("malformed parameter set: {0}")]
    MalformedYaml(#[from] serde_yaml::Error),

    #[error("parameter {field} is not a finite number")]
    NonFinite { field: &'static str },

    #[error("parameter {field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    #[error("parameter {field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("suspension stiffness {stiffness}, damping {damping} unstable at a {max_dt}s step")]
    UnstableSuspension {
        stiffness: f64,
        damping: f64,
        max_dt: f64,
    },
}

pub trait ParameterSet: Copy + Serialize + DeserializeOwned {
    fn validate(&self) -> Result<(), ParamsError>;

    fn max_speed(&self) -> f64;

    fn from_json(text: &str) -> Result<Self, ParamsError> {
        let params: Self = serde_json::from_str(text)?;
        params.validate()?;
        Ok(params)
    }

    fn from_yaml(text: &str) -> Result<Self, ParamsError> {
        let params: Self = serde_yaml::from_str(text)?;
        params.validate()?;
        Ok(params)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CarParams {
    pub max_speed: f64,
    pub acceleration: f64,
    pub engine_braking: f64,
    pub manual_braking: f64,
    pub steering_sensitivity: f64,
    pub roll_factor: f64,
    pub pitch_factor: f64,
    pub angular_damping: f64,
    pub traction_asphalt: f64,
    pub suspension_stiffness: f64,
    pub suspension_damping: f64,
}

impl Default for CarParams {
    fn default() -> Self {
        CarParams {
            max_speed: 160.0,
            acceleration: 55.0,
            engine_braking: 4.0,
            manual_braking: 90.0,
            steering_sensitivity: 0.06,
            roll_factor: 0.08,
            pitch_factor: 0.05,
            angular_damping: 6.0,
            traction_asphalt: 1.0,
            suspension_stiffness: 120.0,
            suspension_damping: 12.0,
        }
    }
}

impl ParameterSet for CarParams {
    fn validate(&self) -> Result<(), ParamsError> {
        positive("maxSpeed", self.max_speed)?;
        positive("acceleration", self.acceleration)?;
        non_negative("engineBraking", self.engine_braking)?;
        non_negative("manualBraking", self.manual_braking)?;
        positive("steeringSensitivity", self.steering_sensitivity)?;
        non_negative("rollFactor", self.roll_factor)?;
        non_negative("pitchFactor", self.pitch_factor)?;
        non_negative("angularDamping", self.angular_damping)?;
        non_negative("tractionAsphalt", self.traction_asphalt)?;
        non_negative("suspensionStiffness", self.suspension_stiffness)?;
        non_negative("suspensionDamping", self.suspension_damping)?;
        stable_suspension(self.suspension_stiffness, self.suspension_damping)
    }

    fn max_speed(&self) -> f64 {
        self.max_speed
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MotorcycleParams {
    pub max_speed: f64,
    pub acceleration: f64,
    pub engine_braking: f64,
    pub manual_braking: f64,
    pub steering_sensitivity: f64,
    pub lean_factor: f64,
    pub angular_damping: f64,
    pub traction_asphalt: f64,
    pub suspension_stiffness: f64,
    pub suspension_damping: f64,
}

impl Default for MotorcycleParams {
    fn default() -> Self {
        MotorcycleParams {
            max_speed: 140.0,
            acceleration: 60.0,
            engine_braking: 5.0,
            manual_braking: 80.0,
            steering_sensitivity: 0.07,
            lean_factor: 0.75,
            angular_damping: 5.0,
            traction_asphalt: 1.0,
            suspension_stiffness: 150.0,
            suspension_damping: 14.0,
        }
    }
}

impl ParameterSet for MotorcycleParams {
    fn validate(&self) -> Result<(), ParamsError> {
        positive("maxSpeed", self.max_speed)?;
        positive("acceleration", self.acceleration)?;
        non_negative("engineBraking", self.engine_braking)?;
        non_negative("manualBraking", self.manual_braking)?;
        positive("steeringSensitivity", self.steering_sensitivity)?;
        non_negative("leanFactor", self.lean_factor)?;
        non_negative("angularDamping", self.angular_damping)?;
        non_negative("tractionAsphalt", self.traction_asphalt)?;
        non_negative("suspensionStiffness", self.suspension_stiffness)?;
        non_negative("suspensionDamping", self.suspension_damping)?;
        stable_suspension(self.suspension_stiffness, self.suspension_damping)
    }

    fn max_speed(&self) -> f64 {
        self.max_speed
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ParamsError> {
    if !value.is_finite() {
        return Err(ParamsError::NonFinite { field });
    }
    if value <= 0.0 {
        return Err(ParamsError::NotPositive { field, value });
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ParamsError> {
    if !value.is_finite() {
        return Err(ParamsError::NonFinite { field });
    }
    if value < 0.0 {
        return Err(ParamsError::Negative { field, value });
    }
    Ok(())
}

// The spring/damper is stepped with semi-implicit Euler at up to MAX_TIMESTEP.
// Keep each step from overshooting: the damper may not remove more than the
// whole vertical velocity, and spring plus damper stay inside the stable region.
fn stable_suspension(stiffness: f64, damping: f64) -> Result<(), ParamsError> {
    let damping_step = damping * MAX_TIMESTEP;
    let spring_step = stiffness * MAX_TIMESTEP * MAX_TIMESTEP;
    if damping_step >= 1.0 || spring_step + damping_step >= 2.0 {
        return Err(ParamsError::UnstableSuspension {
            stiffness,
            damping,
            max_dt: MAX_TIMESTEP,
        });
    }
    Ok(())
}

// Swap `candidate` into `current` only if it validates; on failure `current` is
// left exactly as it was
pub(crate) fn replace_validated<P: ParameterSet>(
    current: &mut P,
    candidate: P,
) -> Result<(), ParamsError> {
    match candidate.validate() {
        Ok(()) => {
            *current = candidate;
            info!(max_speed = candidate.max_speed(), "parameter set replaced");
            Ok(())
        }
        Err(err) => {
            warn!(error = %err, "rejected parameter set, keeping previous one");
            Err(err)
        }
    }
}

pub(crate) fn replace_from_json<P: ParameterSet>(
    current: &mut P,
    text: &str,
) -> Result<(), ParamsError> {
    let candidate: P = match serde_json::from_str(text) {
        Ok(candidate) => candidate,
        Err(err) => {
            warn!(error = %err, "rejected malformed parameter set, keeping previous one");
            return Err(err.into());
        }
    };
    replace_validated(current, candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(CarParams::default().validate().is_ok());
        assert!(MotorcycleParams::default().validate().is_ok());
    }

    #[test]
    fn test_parses_camel_case_json() {
        let json = serde_json::to_string(&CarParams::default()).unwrap();
        assert!(json.contains("\"maxSpeed\""));
        assert!(json.contains("\"suspensionDamping\""));

        let params = CarParams::from_json(&json).unwrap();
        assert_eq!(params, CarParams::default());
    }

    #[test]
    fn test_parses_yaml() {
        let yaml = "
maxSpeed: 120.0
acceleration: 40.0
engineBraking: 3.0
manualBraking: 70.0
steeringSensitivity: 0.08
leanFactor: 0.6
angularDamping: 4.0
tractionAsphalt: 0.9
suspensionStiffness: 100.0
suspensionDamping: 10.0
";
        let params = MotorcycleParams::from_yaml(yaml).unwrap();
        assert_eq!(params.max_speed, 120.0);
        assert_eq!(params.lean_factor, 0.6);
    }

    #[test]
    fn test_rejects_wrong_type_and_missing_fields() {
        let result = CarParams::from_json(r#"{"maxSpeed": "fast"}"#);
        assert!(matches!(result, Err(ParamsError::MalformedJson(_))));
    }

    #[test]
    fn test_rejects_unknown_field() {
        let mut value = serde_json::to_value(CarParams::default()).unwrap();
        value["leanFactor"] = serde_json::json!(0.5);
        let result = CarParams::from_json(&value.to_string());
        assert!(matches!(result, Err(ParamsError::MalformedJson(_))));
    }

    #[test]
    fn test_rejects_zero_max_speed() {
        let params = CarParams {
            max_speed: 0.0,
            ..CarParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParamsError::NotPositive {
                field: "maxSpeed",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_negative_damping() {
        let params = MotorcycleParams {
            suspension_damping: -1.0,
            ..MotorcycleParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParamsError::Negative {
                field: "suspensionDamping",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_suspension_too_stiff_for_max_timestep() {
        let overdamped = CarParams {
            suspension_damping: 60.0,
            ..CarParams::default()
        };
        assert!(matches!(
            overdamped.validate(),
            Err(ParamsError::UnstableSuspension { .. })
        ));

        let stiff = MotorcycleParams {
            suspension_stiffness: 2000.0,
            ..MotorcycleParams::default()
        };
        assert!(matches!(
            stiff.validate(),
            Err(ParamsError::UnstableSuspension { .. })
        ));

        // a live offer is refused the same way
        let mut current = CarParams::default();
        let offer = serde_json::to_string(&overdamped).unwrap();
        assert!(matches!(
            replace_from_json(&mut current, &offer),
            Err(ParamsError::UnstableSuspension { .. })
        ));
        assert_eq!(current, CarParams::default());
    }

    #[test]
    fn test_rejects_nan() {
        let params = CarParams {
            roll_factor: f64::NAN,
            ..CarParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParamsError::NonFinite {
                field: "rollFactor"
            })
        ));
    }

    #[test]
    fn test_failed_replacement_keeps_current() {
        let mut current = CarParams::default();
        let candidate = CarParams {
            max_speed: -5.0,
            ..CarParams::default()
        };
        assert!(replace_validated(&mut current, candidate).is_err());
        assert_eq!(current, CarParams::default());

        assert!(replace_from_json::<CarParams>(&mut current, "{").is_err());
        assert_eq!(current, CarParams::default());
    }
}
