use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    Asphalt,
    Gravel,
    Grass,
    Wet,
    Ice,
}

impl Surface {
    // grip relative to dry asphalt; the vehicle's tractionAsphalt scales it
    pub fn grip(&self) -> f64 {
        match self {
            Surface::Asphalt => 1.0,
            Surface::Gravel => 0.7,
            Surface::Grass => 0.55,
            Surface::Wet => 0.75,
            Surface::Ice => 0.2,
        }
    }

    pub fn traction_for(&self, traction_asphalt: f64) -> f64 {
        (traction_asphalt * self.grip()).max(0.0)
    }
}

impl FromStr for Surface {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asphalt" => Ok(Surface::Asphalt),
            "gravel" => Ok(Surface::Gravel),
            "grass" => Ok(Surface::Grass),
            "wet" => Ok(Surface::Wet),
            "ice" => Ok(Surface::Ice),
            other => Err(format!("unknown surface {}", other)),
        }
    }
}
