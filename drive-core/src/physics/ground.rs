use super::constants::GROUND_WAVELENGTH;

// Stand-in for terrain: the suspension chases whatever height this reports
// under the vehicle
pub trait GroundProfile {
    fn height_at(&self, x: f64, z: f64) -> f64;
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlatGround(pub f64);

impl GroundProfile for FlatGround {
    fn height_at(&self, _x: f64, _z: f64) -> f64 {
        self.0
    }
}

// Deterministic gentle bumps; zero along both axes, so a vehicle parked at the
// origin sits still
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RollingGround {
    pub amplitude: f64,
    pub wavelength: f64,
}

impl RollingGround {
    pub fn new(amplitude: f64) -> Self {
        RollingGround {
            amplitude,
            wavelength: GROUND_WAVELENGTH,
        }
    }
}

impl GroundProfile for RollingGround {
    fn height_at(&self, x: f64, z: f64) -> f64 {
        let k = std::f64::consts::TAU / self.wavelength;
        self.amplitude * (x * k).sin() * (z * k * 0.7).sin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_ground_zero_at_origin() {
        let ground = RollingGround::new(0.5);
        assert_eq!(ground.height_at(0.0, 0.0), 0.0);
        assert_eq!(ground.height_at(13.0, 0.0), 0.0);
    }

    #[test]
    fn test_rolling_ground_is_bounded() {
        let ground = RollingGround::new(0.04);
        for i in 0..200 {
            let h = ground.height_at(i as f64 * 1.7, i as f64 * -2.3);
            assert!(h.abs() <= 0.04 + 1e-12);
        }
    }
}
