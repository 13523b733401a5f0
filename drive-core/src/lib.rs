pub mod params;
pub mod physics;
pub mod player_inputs;
pub mod pose;
pub mod presets;
pub mod recording;
mod settings;
pub mod telemetry;

pub use settings::{Settings, GLOBAL_CONFIG};

pub use physics::car::CarController;
pub use physics::motorcycle::MotorcycleController;
pub use physics::{VehicleController, VehicleKind};
