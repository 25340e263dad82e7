use std::{path::PathBuf, time::Duration};

use crate::{
    assemble::{
        events::{EventSink, RunEvent},
        timing::timed,
    },
    blend::{Frame, FrameBlender},
    dataset::DatasetAccessor,
    encode::{
        ffmpeg::{FfmpegSink, FfmpegSinkOpts},
        sink::{FrameSink, SinkConfig},
    },
    foundation::{
        config::AssemblyConfig,
        core::{Fps, FrameGeometry},
        error::{ReelError, ReelResult},
    },
    sampler::{SequenceSampler, validate_sample_size},
};

/// What to build in one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssemblyRequest {
    /// Number of sequences to sample.
    pub sequences: usize,
    /// Output video path.
    pub output: PathBuf,
}

/// Summary of a successful run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssemblyStats {
    /// Sampled sequence names in encoding order.
    pub sequences: Vec<String>,
    /// Frames handed to the sink.
    pub frames: u64,
    /// Geometry of the first frame, shared by the whole video.
    pub geometry: FrameGeometry,
    pub elapsed: Duration,
}

/// Samples sequences, blends their frames and streams them into a [`FrameSink`].
///
/// Execution is strictly sequential: frames reach the sink in selection order, then listing
/// order within each sequence.
pub struct VideoAssembler {
    cfg: AssemblyConfig,
    accessor: DatasetAccessor,
    blender: FrameBlender,
}

impl VideoAssembler {
    pub fn new(cfg: AssemblyConfig) -> ReelResult<Self> {
        cfg.validate()?;
        let accessor = DatasetAccessor::new(&cfg.dataset, cfg.sort_frames);
        let blender = FrameBlender::new(cfg.opacity)?;
        Ok(Self {
            cfg,
            accessor,
            blender,
        })
    }

    /// Encode to an MP4 at `request.output` via the system `ffmpeg`.
    pub fn render_to_mp4(
        &self,
        request: &AssemblyRequest,
        events: &mut dyn EventSink,
    ) -> ReelResult<AssemblyStats> {
        let mut opts = FfmpegSinkOpts::new(&request.output);
        opts.remove_on_abort = self.cfg.cleanup_partial_output;
        let mut sink = FfmpegSink::new(opts);
        self.run(request, &mut sink, events)
    }

    /// Run the pipeline with a sampler built from the configured seed.
    pub fn run(
        &self,
        request: &AssemblyRequest,
        sink: &mut dyn FrameSink,
        events: &mut dyn EventSink,
    ) -> ReelResult<AssemblyStats> {
        let mut sampler = SequenceSampler::from_seed(self.cfg.seed);
        self.run_with_sampler(request, &mut sampler, sink, events)
    }

    pub fn run_with_sampler(
        &self,
        request: &AssemblyRequest,
        sampler: &mut SequenceSampler,
        sink: &mut dyn FrameSink,
        events: &mut dyn EventSink,
    ) -> ReelResult<AssemblyStats> {
        let (result, elapsed) = timed(|| self.assemble(request, sampler, sink, events));

        if let Err(err) = &result {
            events.record(&failure_event(err));
        }
        events.record(&RunEvent::Runtime { elapsed });

        result.map(|stats| AssemblyStats { elapsed, ..stats })
    }

    fn assemble(
        &self,
        request: &AssemblyRequest,
        sampler: &mut SequenceSampler,
        sink: &mut dyn FrameSink,
        events: &mut dyn EventSink,
    ) -> ReelResult<AssemblyStats> {
        if request.sequences == 0 {
            return Err(ReelError::InvalidSampleSize {
                requested: 0,
                available: None,
            });
        }

        let names = self.accessor.sequence_names()?;
        validate_sample_size(request.sequences, names.len())?;
        events.record(&RunEvent::Started {
            sequences: request.sequences,
        });

        let selection = sampler.sample(&names, request.sequences)?;
        tracing::debug!(?selection, "sampled sequences");

        let mut stream = SinkGuard::new(sink);
        let mut frames = 0u64;
        for sequence in &selection {
            let pairs = self.accessor.frame_pairs(sequence)?;
            tracing::debug!(%sequence, frames = pairs.len(), "blending sequence");
            for pair in &pairs {
                let frame = self.blender.blend_pair(pair)?;
                stream.push(&frame, self.cfg.fps)?;
                frames += 1;
            }
        }

        let Some(geometry) = stream.geometry else {
            return Err(ReelError::NoFrames);
        };
        events.record(&RunEvent::FramesProduced { frames });

        stream.finish()?;
        events.record(&RunEvent::VideoCreated {
            path: request.output.clone(),
            frames,
        });

        Ok(AssemblyStats {
            sequences: selection,
            frames,
            geometry,
            elapsed: Duration::ZERO,
        })
    }
}

fn failure_event(err: &ReelError) -> RunEvent {
    match err {
        ReelError::InvalidSampleSize {
            requested,
            available,
        } => RunEvent::BadParameter {
            requested: *requested,
            available: *available,
        },
        ReelError::DatasetMissing { path } => RunEvent::DatasetMissing { root: path.clone() },
        other => RunEvent::Failed {
            kind: other.kind(),
            message: other.to_string(),
        },
    }
}

/// Opens the sink lazily on the first frame and aborts it on any exit path that skips `finish`.
struct SinkGuard<'a> {
    sink: &'a mut dyn FrameSink,
    geometry: Option<FrameGeometry>,
    open: bool,
}

impl<'a> SinkGuard<'a> {
    fn new(sink: &'a mut dyn FrameSink) -> Self {
        Self {
            sink,
            geometry: None,
            open: false,
        }
    }

    fn push(&mut self, frame: &Frame, fps: Fps) -> ReelResult<()> {
        if self.geometry.is_none() {
            let geometry = frame.geometry();
            self.open = true;
            self.sink.begin(SinkConfig { geometry, fps })?;
            self.geometry = Some(geometry);
            tracing::debug!(%geometry, %fps, "output stream opened");
        }
        self.sink.push_frame(frame)
    }

    fn finish(mut self) -> ReelResult<()> {
        self.sink.end()?;
        self.open = false;
        Ok(())
    }
}

impl Drop for SinkGuard<'_> {
    fn drop(&mut self) {
        if self.open
            && let Err(e) = self.sink.abort()
        {
            tracing::warn!("failed to abort output stream: {e}");
        }
    }
}
