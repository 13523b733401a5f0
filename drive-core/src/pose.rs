use glam::DVec3;
use serde::{Deserialize, Serialize};

// Pose is what a scene collaborator needs to place the vehicle body: where it
// is, which way it faces, and how the body is tilted
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: DVec3,
    pub heading: f64, // radians, unbounded
    pub roll: f64,    // car body roll, or motorcycle lean
    pub pitch: f64,   // nose up is positive; always 0 for motorcycles
}
