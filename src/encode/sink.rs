use crate::blend::Frame;
use crate::foundation::core::{Fps, FrameGeometry};
use crate::foundation::error::{ReelError, ReelResult};

/// Configuration provided to a [`FrameSink`] once the first frame's geometry is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output geometry; every pushed frame must match it.
    pub geometry: FrameGeometry,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Sink contract for consuming frames in order.
///
/// Lifecycle: `begin` once, `push_frame` zero or more times, then exactly one of `end`
/// (success) or `abort` (failure).
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()>;
    /// Append one frame after all previously pushed frames.
    fn push_frame(&mut self, frame: &Frame) -> ReelResult<()>;
    /// Finalize the output.
    fn end(&mut self) -> ReelResult<()>;
    /// Release resources after a failed run without producing a finished output.
    fn abort(&mut self) -> ReelResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<Frame>,
    finished: bool,
    aborted: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Frames in push order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        self.aborted = false;
        Ok(())
    }

    fn push_frame(&mut self, frame: &Frame) -> ReelResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| ReelError::encode("in-memory sink not started"))?;
        if frame.geometry() != cfg.geometry {
            return Err(ReelError::FrameSizeMismatch {
                expected: cfg.geometry,
                actual: frame.geometry(),
                context: format!("frame {}", self.frames.len()),
            });
        }
        self.frames.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        self.finished = true;
        Ok(())
    }

    fn abort(&mut self) -> ReelResult<()> {
        self.aborted = true;
        Ok(())
    }
}
