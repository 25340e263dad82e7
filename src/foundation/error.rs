use std::path::PathBuf;

use crate::foundation::core::FrameGeometry;

/// Convenience result alias used throughout the crate.
pub type ReelResult<T> = Result<T, ReelError>;

/// Failure category of a [`ReelError`], used for log routing and process exit codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad requested count or other invalid parameter; nothing was read or written.
    Configuration,
    /// The dataset base-image root does not exist.
    DatasetMissing,
    /// A base or overlay frame could not be read or decoded.
    FrameLoad,
    /// Two rasters that must agree on geometry do not.
    FrameSizeMismatch,
    /// The encoder could not be started for the output path.
    EncoderOpen,
    /// The encoder failed after it was started.
    Encode,
    /// The sampled sequences contained no frames at all.
    NoFrames,
    /// Anything else (I/O context chains).
    Other,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Configuration => "configuration",
            Self::DatasetMissing => "dataset-missing",
            Self::FrameLoad => "frame-load",
            Self::FrameSizeMismatch => "frame-size-mismatch",
            Self::EncoderOpen => "encoder-open",
            Self::Encode => "encode",
            Self::NoFrames => "no-frames",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// `available` is `None` when the count was rejected before the dataset was listed.
    #[error("invalid sample size: requested {requested} sequences, {}", describe_available(*available))]
    InvalidSampleSize {
        requested: usize,
        available: Option<usize>,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("dataset not found: '{}' does not exist", path.display())]
    DatasetMissing { path: PathBuf },

    #[error("failed to load frame '{}': {message}", path.display())]
    FrameLoad { path: PathBuf, message: String },

    #[error("frame size mismatch ({context}): expected {expected}, got {actual}")]
    FrameSizeMismatch {
        expected: FrameGeometry,
        actual: FrameGeometry,
        context: String,
    },

    #[error("failed to open encoder: {0}")]
    EncoderOpen(String),

    #[error("encoder error: {0}")]
    Encode(String),

    #[error("sampled sequences contain no frames")]
    NoFrames,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn describe_available(available: Option<usize>) -> String {
    match available {
        Some(n) => format!("expected 1..={n}"),
        None => "expected at least 1".to_owned(),
    }
}

impl ReelError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn frame_load(path: impl Into<PathBuf>, msg: impl std::fmt::Display) -> Self {
        Self::FrameLoad {
            path: path.into(),
            message: msg.to_string(),
        }
    }

    pub fn encoder_open(msg: impl Into<String>) -> Self {
        Self::EncoderOpen(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSampleSize { .. } | Self::Config(_) => ErrorKind::Configuration,
            Self::DatasetMissing { .. } => ErrorKind::DatasetMissing,
            Self::FrameLoad { .. } => ErrorKind::FrameLoad,
            Self::FrameSizeMismatch { .. } => ErrorKind::FrameSizeMismatch,
            Self::EncoderOpen(_) => ErrorKind::EncoderOpen,
            Self::Encode(_) => ErrorKind::Encode,
            Self::NoFrames => ErrorKind::NoFrames,
            Self::Other(_) => ErrorKind::Other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
