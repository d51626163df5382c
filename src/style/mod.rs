//! Style documents and their stable digests.

/// Stable xxh3 digests of content, styles and pixels.
pub mod fingerprint;
/// The `StyleSpec` record, its enums and domain limits.
pub mod spec;
