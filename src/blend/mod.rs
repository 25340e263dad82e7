//! Base/overlay alpha compositing.

mod blender;
mod composite;
mod frame;

pub use blender::FrameBlender;
pub use composite::{blend_channel, blend_rgb8_into};
pub use frame::Frame;
