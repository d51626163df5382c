//! Decoration compositing over the base matrix.
//!
//! Vector layers (frames, logo pads and clips, badges, glyphs) are rasterized with `vello_cpu`;
//! per-pixel work (module fills, gradients, blending) is done directly on premultiplied RGBA8.

pub mod artifact;
pub mod compositor;
pub mod frame;
pub mod geometry;
pub mod gradient;
pub(crate) mod raster;
pub(crate) mod text;
