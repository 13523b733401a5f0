use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::constants::{
    AGILITY_BOOST, AGILITY_STEER_FALLOFF, GRAVITY, GYRO_BLEND_BAND, GYRO_LOW_SPEED_THRESHOLD,
    MAX_LEAN_ANGLE, MOTORCYCLE_TURN_SPEED_CAP,
};

// How a two-wheeler turns steer input into lean and yaw. Different bikes want
// different feel, so the controller carries the choice explicitly.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SteeringModel {
    // lean first, then turn at the rate the lean angle implies for the current speed
    Gyroscopic,
    // sharp at walking pace, calm at speed; lean is cosmetic
    Agility,
}

impl Default for SteeringModel {
    fn default() -> Self {
        SteeringModel::Gyroscopic
    }
}

// What the steering model needs to know about the current frame
#[derive(Copy, Clone, Debug)]
pub struct SteeringContext {
    pub steer: f64,
    pub velocity: f64,
    pub normalized_speed: f64,
    pub traction: f64,
    pub steering_sensitivity: f64,
    pub lean_factor: f64,
}

impl SteeringModel {
    pub fn lean_target(&self, ctx: &SteeringContext) -> f64 {
        let target = match self {
            SteeringModel::Gyroscopic => {
                // lean fades in as the bike gets going
                let onset = (ctx.velocity / GYRO_LOW_SPEED_THRESHOLD).clamp(0.0, 1.0);
                ctx.steer * ctx.lean_factor * ctx.traction * onset
            }
            SteeringModel::Agility => ctx.steer * ctx.normalized_speed * ctx.lean_factor,
        };
        // tan(lean) is singular at 90 degrees
        target.clamp(-MAX_LEAN_ANGLE, MAX_LEAN_ANGLE)
    }

    // `lean` is the angle after this frame's damping step
    pub fn yaw_rate(&self, ctx: &SteeringContext, lean: f64) -> f64 {
        let turn_speed = ctx.velocity.min(MOTORCYCLE_TURN_SPEED_CAP);
        match self {
            SteeringModel::Gyroscopic => {
                let direct = ctx.steer * ctx.steering_sensitivity * ctx.traction * turn_speed;
                if ctx.velocity < GYRO_LOW_SPEED_THRESHOLD {
                    return direct;
                }
                // hand over from direct steering to the lean-derived rate over
                // the blend band so the turn doesn't snap tighter at the threshold
                let lean_rate = GRAVITY * lean.tan() / ctx.velocity;
                let blend =
                    smoothstep((ctx.velocity - GYRO_LOW_SPEED_THRESHOLD) / GYRO_BLEND_BAND);
                direct + (lean_rate - direct) * blend
            }
            SteeringModel::Agility => {
                let authority = (1.0 - AGILITY_STEER_FALLOFF * ctx.normalized_speed) * ctx.traction;
                let agility = 1.0 + AGILITY_BOOST * (1.0 - ctx.normalized_speed);
                ctx.steer * authority * agility * ctx.steering_sensitivity * turn_speed
            }
        }
    }
}

fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

impl FromStr for SteeringModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gyroscopic" | "gyro" => Ok(SteeringModel::Gyroscopic),
            "agility" => Ok(SteeringModel::Agility),
            other => Err(format!("unknown steering model {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(steer: f64, velocity: f64) -> SteeringContext {
        SteeringContext {
            steer,
            velocity,
            normalized_speed: velocity / 140.0,
            traction: 1.0,
            steering_sensitivity: 0.07,
            lean_factor: 0.75,
        }
    }

    #[test]
    fn test_agility_has_no_lean_at_rest() {
        let ctx = context(1.0, 0.0);
        assert_eq!(SteeringModel::Agility.lean_target(&ctx), 0.0);
    }

    #[test]
    fn test_agility_turns_tighter_at_low_speed() {
        // turn radius = v / yaw_rate
        let slow = context(1.0, 8.0);
        let fast = context(1.0, 80.0);
        let slow_radius = slow.velocity / SteeringModel::Agility.yaw_rate(&slow, 0.0);
        let fast_radius = fast.velocity / SteeringModel::Agility.yaw_rate(&fast, 0.0);
        assert!(slow_radius < fast_radius);
    }

    #[test]
    fn test_gyroscopic_turn_follows_lean() {
        let ctx = context(1.0, 20.0);
        let rate = SteeringModel::Gyroscopic.yaw_rate(&ctx, 0.5);
        assert!((rate - GRAVITY * 0.5_f64.tan() / 20.0).abs() < 1e-12);

        // upright bike above the threshold goes straight whatever the bars say
        assert_eq!(SteeringModel::Gyroscopic.yaw_rate(&ctx, 0.0), 0.0);
    }

    #[test]
    fn test_gyroscopic_low_speed_fallback() {
        let ctx = context(1.0, 2.0);
        let rate = SteeringModel::Gyroscopic.yaw_rate(&ctx, 0.0);
        assert!((rate - 0.07 * 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_gyroscopic_hands_over_smoothly_past_threshold() {
        let yaw_at = |velocity: f64| {
            let ctx = context(1.0, velocity);
            let model = SteeringModel::Gyroscopic;
            model.yaw_rate(&ctx, model.lean_target(&ctx))
        };

        let below = yaw_at(GYRO_LOW_SPEED_THRESHOLD - 0.001);
        let at = yaw_at(GYRO_LOW_SPEED_THRESHOLD);
        assert!((at - below).abs() < 1e-3);

        // no jumps anywhere from below the threshold to past the band
        let mut previous = yaw_at(3.0);
        for step in 1..=7000 {
            let yaw = yaw_at(3.0 + step as f64 * 0.001);
            assert!((yaw - previous).abs() < 5e-3, "yaw jumped to {} from {}", yaw, previous);
            previous = yaw;
        }

        // fully lean-driven once through the band
        let past = GYRO_LOW_SPEED_THRESHOLD + GYRO_BLEND_BAND;
        let ctx = context(1.0, past);
        let lean = SteeringModel::Gyroscopic.lean_target(&ctx);
        assert!((yaw_at(past) - GRAVITY * lean.tan() / past).abs() < 1e-12);
    }

    #[test]
    fn test_models_are_sign_symmetric() {
        for model in [SteeringModel::Gyroscopic, SteeringModel::Agility] {
            for velocity in [1.0, 10.0, 60.0] {
                let left = context(0.6, velocity);
                let right = context(-0.6, velocity);
                let lean = model.lean_target(&left);
                assert_eq!(lean, -model.lean_target(&right));
                let yaw_left = model.yaw_rate(&left, lean);
                let yaw_right = model.yaw_rate(&right, -lean);
                assert!((yaw_left + yaw_right).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("agility".parse::<SteeringModel>(), Ok(SteeringModel::Agility));
        assert_eq!("Gyroscopic".parse::<SteeringModel>(), Ok(SteeringModel::Gyroscopic));
        assert!("tank".parse::<SteeringModel>().is_err());
    }
}
