// every update clamps to this; suspension tuning is checked against it so the
// spring/damper step stays stable
pub const MAX_TIMESTEP: f64 = 0.05;

pub const GRAVITY: f64 = 9.81;

// Quadratic drag dominates near top speed; scrub is the speed shed per second
// at full lock and full speed
pub const CAR_DRAG_COEFFICIENT: f64 = 0.0015;
pub const CAR_SCRUB_COEFFICIENT: f64 = 14.0;
pub const CAR_TURN_SPEED_CAP: f64 = 30.0;
// how much steering authority is lost at top speed
pub const CAR_STEER_FALLOFF: f64 = 0.7;
pub const CAR_RIDE_HEIGHT: f64 = 0.45;
pub const CAR_GROUND_AMPLITUDE: f64 = 0.04;

pub const MOTORCYCLE_DRAG_COEFFICIENT: f64 = 0.0012;
pub const MOTORCYCLE_SCRUB_COEFFICIENT: f64 = 9.0;
pub const MOTORCYCLE_TURN_SPEED_CAP: f64 = 25.0;
pub const MOTORCYCLE_RIDE_HEIGHT: f64 = 0.55;
pub const MOTORCYCLE_GROUND_AMPLITUDE: f64 = 0.025;

// below this speed the lean-to-turn relation is singular, so the bike steers directly
pub const GYRO_LOW_SPEED_THRESHOLD: f64 = 4.0;
// speed range above the threshold over which direct steering hands over to lean
pub const GYRO_BLEND_BAND: f64 = 4.0;
pub const MAX_LEAN_ANGLE: f64 = 1.2;
pub const AGILITY_STEER_FALLOFF: f64 = 0.6;
pub const AGILITY_BOOST: f64 = 1.5;

pub const GROUND_WAVELENGTH: f64 = 24.0;

pub const MPS_TO_KMH: f64 = 3.6;
