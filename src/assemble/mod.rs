//! Pipeline orchestration: sampling, blending and streaming frames into a sink.

mod assembler;
mod events;
mod timing;

pub use assembler::{AssemblyRequest, AssemblyStats, VideoAssembler};
pub use events::{EventSink, RecordingEventSink, RunEvent, TracingEventSink};
pub use timing::timed;
