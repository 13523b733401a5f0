use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::params::{CarParams, MotorcycleParams};
use crate::physics::steering::SteeringModel;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarPreset {
    Roadster,
    Muscle,
    Rally,
}

impl CarPreset {
    pub fn params(&self) -> CarParams {
        let base = CarParams::default();
        match self {
            CarPreset::Roadster => base,
            // quick in a straight line, wallows in corners
            CarPreset::Muscle => CarParams {
                max_speed: 175.0,
                acceleration: 68.0,
                steering_sensitivity: 0.05,
                roll_factor: 0.12,
                pitch_factor: 0.08,
                suspension_stiffness: 95.0,
                suspension_damping: 9.0,
                ..base
            },
            CarPreset::Rally => CarParams {
                max_speed: 140.0,
                acceleration: 50.0,
                steering_sensitivity: 0.075,
                traction_asphalt: 0.9,
                suspension_stiffness: 80.0,
                suspension_damping: 10.0,
                ..base
            },
        }
    }
}

impl FromStr for CarPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "roadster" => Ok(CarPreset::Roadster),
            "muscle" => Ok(CarPreset::Muscle),
            "rally" => Ok(CarPreset::Rally),
            other => Err(format!("unknown car preset {}", other)),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotorcyclePreset {
    Sport,
    Touring,
    Trials,
}

impl MotorcyclePreset {
    pub fn params(&self) -> MotorcycleParams {
        let base = MotorcycleParams::default();
        match self {
            MotorcyclePreset::Sport => base,
            MotorcyclePreset::Touring => MotorcycleParams {
                max_speed: 120.0,
                acceleration: 42.0,
                lean_factor: 0.55,
                angular_damping: 3.5,
                suspension_stiffness: 110.0,
                ..base
            },
            // built for tight technical sections rather than top speed
            MotorcyclePreset::Trials => MotorcycleParams {
                max_speed: 70.0,
                acceleration: 45.0,
                steering_sensitivity: 0.1,
                lean_factor: 0.4,
                angular_damping: 7.0,
                suspension_stiffness: 90.0,
                suspension_damping: 16.0,
                ..base
            },
        }
    }

    pub fn steering_model(&self) -> SteeringModel {
        match self {
            MotorcyclePreset::Sport | MotorcyclePreset::Touring => SteeringModel::Gyroscopic,
            MotorcyclePreset::Trials => SteeringModel::Agility,
        }
    }
}

impl FromStr for MotorcyclePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sport" => Ok(MotorcyclePreset::Sport),
            "touring" => Ok(MotorcyclePreset::Touring),
            "trials" => Ok(MotorcyclePreset::Trials),
            other => Err(format!("unknown motorcycle preset {}", other)),
        }
    }
}
