//! Read-only access to an on-disk segmentation dataset.

mod accessor;

pub use accessor::{DatasetAccessor, FramePair};
