use serde::{Deserialize, Serialize};

// DriverInputs is the per-frame snapshot handed to a controller by whatever maps
// keys or pads to driving intent; controllers never hold on to it
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverInputs {
    pub throttle: f64, // [0, 1]
    pub brake: f64,    // [0, 1]
    pub steer: f64,    // [-1, 1], positive turns left
}

impl DriverInputs {
    pub fn new(throttle: f64, brake: f64, steer: f64) -> Self {
        DriverInputs {
            throttle,
            brake,
            steer,
        }
    }

    pub fn coasting() -> Self {
        Self::default()
    }

    // Clamp every channel into its documented range; garbage (NaN, inf) reads
    // as a released control rather than poisoning the integrator
    pub fn sanitized(&self) -> DriverInputs {
        DriverInputs {
            throttle: clamp_or_zero(self.throttle, 0.0, 1.0),
            brake: clamp_or_zero(self.brake, 0.0, 1.0),
            steer: clamp_or_zero(self.steer, -1.0, 1.0),
        }
    }
}

fn clamp_or_zero(value: f64, min: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        0.0
    }
}
