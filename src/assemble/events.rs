use std::{path::PathBuf, time::Duration};

use crate::foundation::error::ErrorKind;

/// Lifecycle events of one assembly run.
#[derive(Clone, Debug, PartialEq)]
pub enum RunEvent {
    /// The run started with this many requested sequences.
    Started { sequences: usize },
    /// All frames were produced and handed to the encoder.
    FramesProduced { frames: u64 },
    /// The output file was finalized.
    VideoCreated { path: PathBuf, frames: u64 },
    /// Wall-clock duration of the run, emitted on success and failure.
    Runtime { elapsed: Duration },
    /// The requested count is outside `[1, available]`.
    BadParameter {
        requested: usize,
        available: Option<usize>,
    },
    /// The dataset base root does not exist.
    DatasetMissing { root: PathBuf },
    /// Any other failure that aborted the run.
    Failed { kind: ErrorKind, message: String },
}

impl RunEvent {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::BadParameter { .. } | Self::DatasetMissing { .. } | Self::Failed { .. }
        )
    }
}

/// Receives run events. This is the logging boundary of the pipeline.
pub trait EventSink {
    fn record(&mut self, event: &RunEvent);
}

/// Forwards events to `tracing` with structured fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn record(&mut self, event: &RunEvent) {
        match event {
            RunEvent::Started { sequences } => {
                tracing::info!(sequences, "started to create frames for {sequences} image sets")
            }
            RunEvent::FramesProduced { frames } => {
                tracing::info!(frames, "successfully created {frames} frames")
            }
            RunEvent::VideoCreated { path, frames } => tracing::info!(
                path = %path.display(),
                frames,
                "successfully created the video file"
            ),
            RunEvent::Runtime { elapsed } => tracing::info!(
                elapsed_secs = elapsed.as_secs_f64(),
                "run finished in {:.6} seconds",
                elapsed.as_secs_f64()
            ),
            RunEvent::BadParameter {
                requested,
                available,
            } => match available {
                Some(n) => tracing::error!(
                    requested,
                    available = n,
                    "the number of sets should be in range [1, {n}]"
                ),
                None => tracing::error!(requested, "the number of sets should be at least 1"),
            },
            RunEvent::DatasetMissing { root } => tracing::error!(
                root = %root.display(),
                "unable to find the dataset with the expected file structure"
            ),
            RunEvent::Failed { kind, message } => {
                tracing::error!(%kind, "run failed: {message}")
            }
        }
    }
}

/// Keeps every event in memory.
#[derive(Clone, Debug, Default)]
pub struct RecordingEventSink {
    pub events: Vec<RunEvent>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> impl Iterator<Item = &RunEvent> {
        self.events.iter().filter(|e| e.is_error())
    }
}

impl EventSink for RecordingEventSink {
    fn record(&mut self, event: &RunEvent) {
        self.events.push(event.clone());
    }
}
