//! Shared window, GPU and screen-space utilities
//!
//! Everything here is independent of the physics: the simulation hands over
//! positions in meters and this crate turns them into pixels on a window.

pub mod graphics;
pub mod pacer;
pub mod screen;

pub use graphics::*;
pub use pacer::FramePacer;
pub use screen::{ScreenTransform, ScreenUniform};
