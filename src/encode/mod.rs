//! Encoding sinks.
//!
//! Sinks consume blended frames in production order and are driven by the video assembler.

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
