use std::fs;
use std::path::{Path, PathBuf};

use drive_core::params::ParamsError;
use drive_core::VehicleController;
use tracing::debug;

#[derive(Debug)]
pub enum TuningOutcome {
    NotDue,
    Unchanged,
    Applied,
    Rejected(ParamsError),
    Unreadable,
}

// Stands in for the tuning advisor: whatever lands in the file is offered to
// the vehicle as a complete replacement parameter set. A refused offer leaves
// the vehicle driving on what it had.
pub struct TuningWatcher {
    path: PathBuf,
    poll_every: f64,
    next_poll: f64,
    last_contents: Option<String>,
}

impl TuningWatcher {
    pub fn new(path: impl Into<PathBuf>, poll_every: f64) -> Self {
        TuningWatcher {
            path: path.into(),
            poll_every,
            next_poll: 0.0,
            last_contents: None,
        }
    }

    pub fn poll(&mut self, time: f64, vehicle: &mut dyn VehicleController) -> TuningOutcome {
        if time < self.next_poll {
            return TuningOutcome::NotDue;
        }
        self.next_poll = time + self.poll_every;

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "tuning file not readable");
                return TuningOutcome::Unreadable;
            }
        };
        if self.last_contents.as_deref() == Some(contents.as_str()) {
            return TuningOutcome::Unchanged;
        }

        // remember even a bad offer so it is judged once, not every poll
        let outcome = match vehicle.replace_params_json(&contents) {
            Ok(()) => TuningOutcome::Applied,
            Err(err) => TuningOutcome::Rejected(err),
        };
        self.last_contents = Some(contents);
        outcome
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
