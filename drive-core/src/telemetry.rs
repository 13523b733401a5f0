use serde::{Deserialize, Serialize};

pub type LapNumber = u8;
pub type Placement = u8;

// Mission/progression state is owned elsewhere; telemetry just carries it along
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskProgress {
    pub current_task: String,
    pub progress: u32,
    pub total: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TelemetryExtras {
    pub score: i64,
    pub lap: LapNumber,
    pub position: Placement,
    pub level: u32,
    pub task: Option<TaskProgress>,
}

impl TelemetryExtras {
    pub fn new() -> Self {
        TelemetryExtras {
            score: 0,
            lap: 1,
            position: 1,
            level: 1,
            task: None,
        }
    }
}

impl Default for TelemetryExtras {
    fn default() -> Self {
        Self::new()
    }
}

// Attitude differs by variant: cars report roll and pitch, bikes report lean
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(untagged)]
pub enum Attitude {
    #[serde(rename_all = "camelCase")]
    Body { body_roll: f64, body_pitch: f64 },
    #[serde(rename_all = "camelCase")]
    Lean { lean_angle: f64 },
}

// A HUD snapshot. Built fresh every frame and never mutated afterwards.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    pub speed: f64, // km/h
    pub rpm: f64,
    pub gear: u8,
    pub throttle: f64,
    pub brake: f64,
    pub steering: f64,
    #[serde(flatten)]
    pub attitude: Attitude,
    pub score: i64,
    pub lap: LapNumber,
    pub position: Placement,
    pub level: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_progress: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_total: Option<u32>,
}

impl Telemetry {
    pub fn build(
        speed: f64,
        (gear, rpm): (u8, f64),
        throttle: f64,
        brake: f64,
        steering: f64,
        attitude: Attitude,
        extras: &TelemetryExtras,
    ) -> Telemetry {
        let task = extras.task.as_ref();
        Telemetry {
            speed,
            rpm,
            gear,
            throttle,
            brake,
            steering,
            attitude,
            score: extras.score,
            lap: extras.lap,
            position: extras.position,
            level: extras.level,
            current_task: task.map(|task| task.current_task.clone()),
            task_progress: task.map(|task| task.progress),
            task_total: task.map(|task| task.total),
        }
    }
}
