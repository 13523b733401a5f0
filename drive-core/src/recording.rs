use std::io::{ErrorKind, Read, Write};

use bincode::{DefaultOptions, Options};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pose::Pose;
use crate::telemetry::Telemetry;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("failed to encode or decode a frame: {0}")]
    Codec(#[from] bincode::Error),

    #[error("failed to flush recording: {0}")]
    Io(#[from] std::io::Error),
}

// One simulated frame as seen by the HUD and the renderer. Flat and fixed
// shape, since bincode can't carry the optional HUD fields.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FrameRecord {
    pub frame: u64,
    pub time: f64,
    pub pose: Pose,
    pub speed: f64,
    pub rpm: f64,
    pub gear: u8,
    pub throttle: f64,
    pub brake: f64,
    pub steering: f64,
}

impl FrameRecord {
    pub fn capture(frame: u64, time: f64, pose: Pose, telemetry: &Telemetry) -> Self {
        FrameRecord {
            frame,
            time,
            pose,
            speed: telemetry.speed,
            rpm: telemetry.rpm,
            gear: telemetry.gear,
            throttle: telemetry.throttle,
            brake: telemetry.brake,
            steering: telemetry.steering,
        }
    }
}

pub trait Record: Serialize + DeserializeOwned {
    fn read_record<R: Read>(reader: &mut R) -> bincode::Result<Self> {
        DefaultOptions::new().deserialize_from(reader)
    }
    fn write_record<W: Write>(&self, write: &mut W) -> bincode::Result<()> {
        DefaultOptions::new().serialize_into(write, self)
    }
}

impl Record for FrameRecord {}

pub struct TelemetryRecorder<W: Write> {
    writer: W,
    frames_written: u64,
}

impl<W: Write> TelemetryRecorder<W> {
    pub fn new(writer: W) -> Self {
        TelemetryRecorder {
            writer,
            frames_written: 0,
        }
    }

    pub fn record(&mut self, frame: &FrameRecord) -> Result<(), RecordError> {
        frame.write_record(&mut self.writer)?;
        self.frames_written += 1;
        Ok(())
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn finish(mut self) -> Result<W, RecordError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

// Read frames until the stream runs out; a truncated trailing frame ends the
// read like a clean end of stream does
pub fn read_frames<R: Read>(reader: &mut R) -> Result<Vec<FrameRecord>, RecordError> {
    let mut frames = Vec::new();
    loop {
        match FrameRecord::read_record(reader) {
            Ok(frame) => frames.push(frame),
            Err(err) => {
                if let bincode::ErrorKind::Io(io) = err.as_ref() {
                    if io.kind() == ErrorKind::UnexpectedEof {
                        break;
                    }
                }
                return Err(err.into());
            }
        }
    }
    Ok(frames)
}
