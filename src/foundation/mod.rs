/// Run configuration (dataset layout, opacity, frame rate).
pub mod config;
/// Small value types shared across the pipeline.
pub mod core;
/// Crate-wide error type.
pub mod error;
