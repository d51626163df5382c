//! Pixel, color and error primitives shared by every other layer.

pub mod core;
pub mod error;
pub mod math;
