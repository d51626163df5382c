//! Session-level entry points: the [`engine::QrEngine`] facade and the debounced
//! [`preview::PreviewController`] that drives it during live editing.

pub mod engine;
pub mod preview;
