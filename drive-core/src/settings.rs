use config::{Config, ConfigError, File};
use lazy_static::lazy_static;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub frame_ms: u64,
    pub run_secs: f64,
    // sleep out each frame like a real game loop; off runs as fast as possible
    pub realtime: bool,
    pub vehicle: String,
    pub preset: String,
    // overrides the preset's steering model for motorcycles when present
    pub steering_model: Option<String>,
    pub driver: String,
    pub seed: u64,

    // json parameter set, re-read periodically and swapped in when it changes
    pub tuning_file: Option<String>,
    pub tuning_poll_ms: u64,

    pub telemetry_log_ms: u64,
    pub record_file: Option<String>,
}

impl Settings {
    fn new() -> Result<Settings, ConfigError> {
        let config = Config::builder()
            .set_default("frame_ms", 16)?
            .set_default("run_secs", 20.0)?
            .set_default("realtime", true)?
            .set_default("vehicle", "car")?
            .set_default("preset", "roadster")?
            .set_default("driver", "scripted")?
            .set_default("seed", 7)?
            .set_default("tuning_poll_ms", 500)?
            .set_default("telemetry_log_ms", 1000)?
            .add_source(File::with_name("config.yaml").required(false))
            .build()?;

        config.try_deserialize()
    }
}

lazy_static! {
    pub static ref GLOBAL_CONFIG: Settings = Settings::new().expect("failed to read config file");
}
