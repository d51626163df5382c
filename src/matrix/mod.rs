//! Base matrix encoding and its memo.
//!
//! The encoder is an external collaborator behind [`encoder::MatrixEncoder`]; everything above this
//! layer only sees finished [`encoder::BaseMatrix`] values handed out by [`cache::RenderCache`].

pub mod cache;
pub mod encoder;
