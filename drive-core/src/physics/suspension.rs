use serde::{Deserialize, Serialize};

// 1-D damped spring between the body and the ground height under it
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Suspension {
    pub vertical_offset: f64,
    pub vertical_velocity: f64,
}

impl Suspension {
    // semi-implicit: the offset integrates with the freshly updated velocity
    pub fn step(&mut self, ground_height: f64, stiffness: f64, damping: f64, dt: f64) {
        let spring_force = stiffness * (ground_height - self.vertical_offset);
        let damping_force = -damping * self.vertical_velocity;

        self.vertical_velocity += (spring_force + damping_force) * dt;
        self.vertical_offset += self.vertical_velocity * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::Suspension;

    #[test]
    fn test_settles_on_constant_ground() {
        for initial in [-1.0, -0.2, 0.0, 0.35, 1.5] {
            let mut suspension = Suspension {
                vertical_offset: initial,
                vertical_velocity: 0.0,
            };
            for _ in 0..3000 {
                suspension.step(0.3, 120.0, 12.0, 1.0 / 60.0);
            }
            assert!((suspension.vertical_offset - 0.3).abs() < 1e-6);
            assert!(suspension.vertical_velocity.abs() < 1e-6);
        }
    }

    #[test]
    fn test_at_rest_stays_at_rest() {
        let mut suspension = Suspension::default();
        for _ in 0..100 {
            suspension.step(0.0, 120.0, 12.0, 1.0 / 60.0);
        }
        assert_eq!(suspension, Suspension::default());
    }

    #[test]
    fn test_stable_at_max_timestep() {
        let mut suspension = Suspension {
            vertical_offset: 1.0,
            vertical_velocity: -2.0,
        };
        for _ in 0..2000 {
            suspension.step(0.0, 150.0, 14.0, 0.05);
        }
        assert!(suspension.vertical_offset.abs() < 1e-6);
    }
}
