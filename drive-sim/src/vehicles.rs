use drive_core::params::ParamsError;
use drive_core::physics::steering::SteeringModel;
use drive_core::presets::{CarPreset, MotorcyclePreset};
use drive_core::{CarController, MotorcycleController, Settings, VehicleController};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("unknown vehicle type {0}, expected car or motorcycle")]
    UnknownVehicle(String),

    #[error("{0}")]
    UnknownOption(String),

    #[error(transparent)]
    Params(#[from] ParamsError),
}

// Build the session's vehicle from the runtime settings: the preset picks the
// starting parameters and, for motorcycles, the steering model
pub fn build_vehicle(settings: &Settings) -> Result<Box<dyn VehicleController>, SetupError> {
    match settings.vehicle.to_ascii_lowercase().as_str() {
        "car" => {
            let preset: CarPreset = settings.preset.parse().map_err(SetupError::UnknownOption)?;
            Ok(Box::new(CarController::new(preset.params())?))
        }
        "motorcycle" | "bike" => {
            let preset: MotorcyclePreset =
                settings.preset.parse().map_err(SetupError::UnknownOption)?;
            let steering_model = match &settings.steering_model {
                Some(name) => name
                    .parse::<SteeringModel>()
                    .map_err(SetupError::UnknownOption)?,
                None => preset.steering_model(),
            };
            Ok(Box::new(
                MotorcycleController::new(preset.params())?.with_steering_model(steering_model),
            ))
        }
        other => Err(SetupError::UnknownVehicle(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drive_core::VehicleKind;

    fn settings(vehicle: &str, preset: &str, steering_model: Option<&str>) -> Settings {
        Settings {
            frame_ms: 16,
            run_secs: 1.0,
            realtime: false,
            vehicle: vehicle.to_string(),
            preset: preset.to_string(),
            steering_model: steering_model.map(str::to_string),
            driver: "scripted".to_string(),
            seed: 1,
            tuning_file: None,
            tuning_poll_ms: 500,
            telemetry_log_ms: 1000,
            record_file: None,
        }
    }

    #[test]
    fn test_builds_each_vehicle_kind() {
        let car = build_vehicle(&settings("car", "muscle", None)).unwrap();
        assert_eq!(car.kind(), VehicleKind::Car);

        let bike = build_vehicle(&settings("motorcycle", "trials", Some("gyroscopic"))).unwrap();
        assert_eq!(bike.kind(), VehicleKind::Motorcycle);
    }

    #[test]
    fn test_rejects_unknown_names() {
        assert!(matches!(
            build_vehicle(&settings("hovercraft", "roadster", None)),
            Err(SetupError::UnknownVehicle(_))
        ));
        assert!(matches!(
            build_vehicle(&settings("car", "sport", None)),
            Err(SetupError::UnknownOption(_))
        ));
        assert!(matches!(
            build_vehicle(&settings("motorcycle", "sport", Some("tank"))),
            Err(SetupError::UnknownOption(_))
        ));
    }
}
