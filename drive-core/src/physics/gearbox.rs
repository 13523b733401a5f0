use thiserror::Error;

use super::constants::MPS_TO_KMH;

// Extra revs added at full throttle on top of the band position
const THROTTLE_RPM_BIAS: f64 = 1200.0;

#[derive(Error, Debug, PartialEq)]
pub enum GearboxError {
    #[error("gear table needs between 1 and 255 breakpoints, got {0}")]
    TableSize(usize),

    #[error("gear breakpoints must be finite and strictly increasing")]
    UnorderedBreakpoints,

    #[error("gear band must be a positive number, got {0}")]
    Band(f64),

    #[error("a banded gearbox needs at least one gear")]
    NoGears,

    #[error("rpm range {idle} to {redline} is not a finite, increasing range")]
    RpmRange { idle: f64, redline: f64 },
}

#[derive(Clone, Debug, PartialEq)]
enum ShiftPattern {
    // gear n covers [breakpoints[n-1], breakpoints[n]) in km/h
    Table(Vec<f64>),
    // uniform bands of `band` speed units
    Banded { band: f64, gears: u8 },
}

// Gear and RPM are cosmetic and deliberately differ per variant, so each
// controller carries its own gearbox
#[derive(Clone, Debug, PartialEq)]
pub struct Gearbox {
    shift: ShiftPattern,
    idle_rpm: f64,
    redline_rpm: f64,
}

impl Gearbox {
    pub fn table(
        breakpoints_kmh: Vec<f64>,
        idle_rpm: f64,
        redline_rpm: f64,
    ) -> Result<Self, GearboxError> {
        if breakpoints_kmh.is_empty() || breakpoints_kmh.len() > u8::MAX as usize {
            return Err(GearboxError::TableSize(breakpoints_kmh.len()));
        }
        let ordered = breakpoints_kmh.iter().all(|breakpoint| breakpoint.is_finite())
            && breakpoints_kmh.windows(2).all(|pair| pair[0] < pair[1]);
        if !ordered {
            return Err(GearboxError::UnorderedBreakpoints);
        }
        check_rpm_range(idle_rpm, redline_rpm)?;

        Ok(Gearbox {
            shift: ShiftPattern::Table(breakpoints_kmh),
            idle_rpm,
            redline_rpm,
        })
    }

    pub fn banded(
        band: f64,
        gears: u8,
        idle_rpm: f64,
        redline_rpm: f64,
    ) -> Result<Self, GearboxError> {
        if !band.is_finite() || band <= 0.0 {
            return Err(GearboxError::Band(band));
        }
        if gears == 0 {
            return Err(GearboxError::NoGears);
        }
        check_rpm_range(idle_rpm, redline_rpm)?;

        Ok(Gearbox {
            shift: ShiftPattern::Banded { band, gears },
            idle_rpm,
            redline_rpm,
        })
    }

    pub fn car() -> Self {
        Gearbox {
            shift: ShiftPattern::Table(vec![0.0, 40.0, 80.0, 130.0, 190.0, 260.0]),
            idle_rpm: 900.0,
            redline_rpm: 8500.0,
        }
    }

    pub fn motorcycle() -> Self {
        Gearbox {
            shift: ShiftPattern::Banded {
                band: 15.0,
                gears: 6,
            },
            idle_rpm: 1200.0,
            redline_rpm: 9000.0,
        }
    }

    pub fn redline(&self) -> f64 {
        self.redline_rpm
    }

    pub fn gear_and_rpm(&self, velocity: f64, throttle: f64) -> (u8, f64) {
        let (gear, position) = match &self.shift {
            ShiftPattern::Table(breakpoints_kmh) => {
                let speed = velocity * MPS_TO_KMH;
                let gear = breakpoints_kmh
                    .iter()
                    .take_while(|breakpoint| speed >= **breakpoint)
                    .count()
                    .max(1);

                let low = breakpoints_kmh[gear - 1];
                // top gear has no upper breakpoint, reuse the width of the one below
                let high = match breakpoints_kmh.get(gear) {
                    Some(high) => *high,
                    None if gear >= 2 => low + (low - breakpoints_kmh[gear - 2]),
                    None => low + 1.0,
                };
                let position = ((speed - low) / (high - low)).clamp(0.0, 1.0);

                // the constructor keeps tables within u8 range
                (gear as u8, position)
            }
            ShiftPattern::Banded { band, gears } => {
                let raw_gear = (velocity / band).floor() as u64 + 1;
                let gear = raw_gear.min(*gears as u64) as u8;
                let position = if raw_gear > *gears as u64 {
                    1.0
                } else {
                    (velocity % band) / band
                };
                (gear, position)
            }
        };

        (gear, self.band_rpm(position, throttle))
    }

    fn band_rpm(&self, position: f64, throttle: f64) -> f64 {
        let rpm = self.idle_rpm
            + (self.redline_rpm - self.idle_rpm) * position
            + throttle * THROTTLE_RPM_BIAS;
        rpm.min(self.redline())
    }
}

fn check_rpm_range(idle: f64, redline: f64) -> Result<(), GearboxError> {
    if idle.is_finite() && redline.is_finite() && idle >= 0.0 && idle < redline {
        Ok(())
    } else {
        Err(GearboxError::RpmRange { idle, redline })
    }
}

#[cfg(test)]
mod tests {
    use super::{Gearbox, GearboxError};

    #[test]
    fn test_car_gear_thresholds() {
        let gearbox = Gearbox::car();
        // 0 km/h, 45 km/h, 100 km/h, 280 km/h
        assert_eq!(gearbox.gear_and_rpm(0.0, 0.0).0, 1);
        assert_eq!(gearbox.gear_and_rpm(12.5, 0.0).0, 2);
        assert_eq!(gearbox.gear_and_rpm(100.0 / 3.6, 0.0).0, 3);
        assert_eq!(gearbox.gear_and_rpm(280.0 / 3.6, 0.0).0, 6);
    }

    #[test]
    fn test_car_rpm_within_band() {
        let gearbox = Gearbox::car();
        let (_, idle) = gearbox.gear_and_rpm(0.0, 0.0);
        assert_eq!(idle, 900.0);

        // halfway through second gear (60 km/h)
        let (gear, rpm) = gearbox.gear_and_rpm(60.0 / 3.6, 0.0);
        assert_eq!(gear, 2);
        assert!((rpm - (900.0 + 7600.0 * 0.5)).abs() < 1e-6);

        let (_, with_throttle) = gearbox.gear_and_rpm(60.0 / 3.6, 1.0);
        assert!(with_throttle > rpm);
    }

    #[test]
    fn test_rpm_capped_at_redline() {
        for gearbox in [Gearbox::car(), Gearbox::motorcycle()] {
            for step in 0..400 {
                let (_, rpm) = gearbox.gear_and_rpm(step as f64 * 0.5, 1.0);
                assert!(rpm <= gearbox.redline());
            }
        }
    }

    #[test]
    fn test_motorcycle_single_band() {
        let gearbox = Gearbox::motorcycle();
        assert_eq!(gearbox.gear_and_rpm(0.0, 0.0).0, 1);
        assert_eq!(gearbox.gear_and_rpm(14.9, 0.0).0, 1);
        assert_eq!(gearbox.gear_and_rpm(15.0, 0.0).0, 2);
        assert_eq!(gearbox.gear_and_rpm(47.0, 0.0).0, 4);
        assert_eq!(gearbox.gear_and_rpm(500.0, 0.0), (6, 9000.0));
    }

    #[test]
    fn test_custom_gearboxes_are_checked() {
        assert_eq!(
            Gearbox::banded(0.0, 6, 1200.0, 9000.0),
            Err(GearboxError::Band(0.0))
        );
        assert!(Gearbox::banded(f64::NAN, 6, 1200.0, 9000.0).is_err());
        assert_eq!(
            Gearbox::banded(10.0, 0, 1200.0, 9000.0),
            Err(GearboxError::NoGears)
        );
        assert!(Gearbox::banded(10.0, 4, 9000.0, 1200.0).is_err());

        assert_eq!(
            Gearbox::table(vec![], 900.0, 8500.0),
            Err(GearboxError::TableSize(0))
        );
        let too_many: Vec<f64> = (0..300).map(|gear| gear as f64 * 5.0).collect();
        assert_eq!(
            Gearbox::table(too_many, 900.0, 8500.0),
            Err(GearboxError::TableSize(300))
        );
        assert_eq!(
            Gearbox::table(vec![0.0, 50.0, 30.0], 900.0, 8500.0),
            Err(GearboxError::UnorderedBreakpoints)
        );

        // the widest table that fits still reports its top gear
        let widest: Vec<f64> = (0..255).map(|gear| gear as f64 * 5.0).collect();
        let gearbox = Gearbox::table(widest, 900.0, 8500.0).unwrap();
        assert_eq!(gearbox.gear_and_rpm(2000.0, 0.0).0, 255);

        let gearbox = Gearbox::banded(10.0, 4, 1000.0, 7000.0).unwrap();
        let (gear, rpm) = gearbox.gear_and_rpm(25.0, 0.0);
        assert_eq!(gear, 3);
        assert!(rpm.is_finite());
    }
}
