use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use drive_core::physics::surface::Surface;
use drive_core::player_inputs::DriverInputs;

// What the driver wants this frame. A surface change stands in for the track
// collaborator telling the vehicle what it is driving on.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DriverCommand {
    pub inputs: DriverInputs,
    pub surface: Option<Surface>,
}

pub trait Driver {
    fn poll(&mut self, time: f64, dt: f64) -> DriverCommand;
}

#[derive(Copy, Clone, Debug)]
pub struct Segment {
    pub duration: f64,
    pub inputs: DriverInputs,
    pub surface: Surface,
}

// Plays a fixed list of segments on repeat
pub struct ScriptedDriver {
    segments: Vec<Segment>,
    current_surface: Option<Surface>,
}

impl ScriptedDriver {
    pub fn new(segments: Vec<Segment>) -> Self {
        ScriptedDriver {
            segments,
            current_surface: None,
        }
    }

    // a lap-ish loop: launch, sweeper, braking zone, a wet chicane, then coast
    pub fn demo_lap() -> Self {
        let segment = |duration, throttle, brake, steer, surface| Segment {
            duration,
            inputs: DriverInputs::new(throttle, brake, steer),
            surface,
        };
        ScriptedDriver::new(vec![
            segment(4.0, 1.0, 0.0, 0.0, Surface::Asphalt),
            segment(2.0, 0.6, 0.0, 0.5, Surface::Asphalt),
            segment(1.0, 0.0, 0.8, 0.0, Surface::Asphalt),
            segment(1.5, 0.8, 0.0, -0.6, Surface::Wet),
            segment(1.5, 0.8, 0.0, 0.6, Surface::Wet),
            segment(2.0, 0.0, 0.0, 0.0, Surface::Asphalt),
        ])
    }

    fn segment_at(&self, time: f64) -> Option<&Segment> {
        let lap: f64 = self.segments.iter().map(|segment| segment.duration).sum();
        if lap <= 0.0 {
            return None;
        }

        let mut into_lap = time.rem_euclid(lap);
        for segment in &self.segments {
            if into_lap < segment.duration {
                return Some(segment);
            }
            into_lap -= segment.duration;
        }
        self.segments.last()
    }
}

impl Driver for ScriptedDriver {
    fn poll(&mut self, time: f64, _dt: f64) -> DriverCommand {
        let segment = match self.segment_at(time) {
            Some(segment) => *segment,
            None => {
                return DriverCommand {
                    inputs: DriverInputs::coasting(),
                    surface: None,
                }
            }
        };

        // only report a surface when it changes
        let surface = if self.current_surface != Some(segment.surface) {
            self.current_surface = Some(segment.surface);
            Some(segment.surface)
        } else {
            None
        };

        DriverCommand {
            inputs: segment.inputs,
            surface,
        }
    }
}

// Random-walk steering on mostly open throttle, reproducible from a seed
pub struct WanderDriver {
    rng: StdRng,
    steer: f64,
    braking_for: f64,
}

impl WanderDriver {
    pub fn new(seed: u64) -> Self {
        WanderDriver {
            rng: StdRng::seed_from_u64(seed),
            steer: 0.0,
            braking_for: 0.0,
        }
    }
}

impl Driver for WanderDriver {
    fn poll(&mut self, _time: f64, dt: f64) -> DriverCommand {
        self.steer = (self.steer + self.rng.gen_range(-1.0..1.0) * 2.0 * dt).clamp(-1.0, 1.0);

        if self.braking_for > 0.0 {
            self.braking_for -= dt;
        } else if self.rng.gen_bool((0.05 * dt).min(1.0)) {
            self.braking_for = self.rng.gen_range(0.3..1.2);
        }

        let inputs = if self.braking_for > 0.0 {
            DriverInputs::new(0.0, 0.7, self.steer)
        } else {
            DriverInputs::new(0.85, 0.0, self.steer)
        };

        DriverCommand {
            inputs,
            surface: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_driver_walks_segments_and_repeats() {
        let mut driver = ScriptedDriver::demo_lap();

        let launch = driver.poll(0.5, 0.016);
        assert_eq!(launch.inputs, DriverInputs::new(1.0, 0.0, 0.0));
        assert_eq!(launch.surface, Some(Surface::Asphalt));

        // surface is only reported on change
        assert_eq!(driver.poll(1.0, 0.016).surface, None);

        let braking = driver.poll(6.5, 0.016);
        assert_eq!(braking.inputs.brake, 0.8);

        let wet = driver.poll(7.2, 0.016);
        assert_eq!(wet.surface, Some(Surface::Wet));

        // 12 second lap, so 12.5 is the launch again
        let again = driver.poll(12.5, 0.016);
        assert_eq!(again.inputs, DriverInputs::new(1.0, 0.0, 0.0));
        assert_eq!(again.surface, Some(Surface::Asphalt));
    }

    #[test]
    fn test_empty_script_coasts() {
        let mut driver = ScriptedDriver::new(vec![]);
        assert_eq!(driver.poll(3.0, 0.016).inputs, DriverInputs::coasting());
    }

    #[test]
    fn test_wander_driver_is_reproducible_and_in_range() {
        let mut a = WanderDriver::new(42);
        let mut b = WanderDriver::new(42);
        for frame in 0..2000 {
            let time = frame as f64 * 0.016;
            let left = a.poll(time, 0.016);
            let right = b.poll(time, 0.016);
            assert_eq!(left, right);
            assert!(left.inputs.steer.abs() <= 1.0);
        }
    }
}
