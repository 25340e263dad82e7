//! davis-reel builds a single video from a video-object-segmentation dataset.
//!
//! A run samples `k` sequences, blends every base frame with its same-stem segmentation overlay
//! and streams the blended frames, in order, into a [`FrameSink`] (usually [`FfmpegSink`]):
//!
//! - Describe the run with an [`AssemblyConfig`] and an [`AssemblyRequest`]
//! - Create a [`VideoAssembler`]
//! - Call [`VideoAssembler::run`] with a sink and an [`EventSink`] for lifecycle logging
#![forbid(unsafe_code)]

mod foundation;

pub mod assemble;
pub mod blend;
pub mod dataset;
pub mod encode;
pub mod sampler;

pub use crate::foundation::config::{AssemblyConfig, DatasetLayout};
pub use crate::foundation::core::{Fps, FrameGeometry};
pub use crate::foundation::error::{ErrorKind, ReelError, ReelResult};

pub use crate::assemble::{
    AssemblyRequest, AssemblyStats, EventSink, RecordingEventSink, RunEvent, TracingEventSink,
    VideoAssembler, timed,
};
pub use crate::blend::{Frame, FrameBlender};
pub use crate::dataset::{DatasetAccessor, FramePair};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::sampler::{SequenceSampler, sample_sequences, validate_sample_size};
