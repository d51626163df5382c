//! External inputs the compositor draws: logos and fonts.

/// Font discovery over `fontdb`.
pub mod fonts;
/// Background logo loading.
pub mod loader;
/// Logo source parsing and decoding.
pub mod logo;
/// Single-line text shaping.
pub mod text;
