//! qrdecor turns encoded QR matrices into finished, decorated images.
//!
//! The pipeline is split so live editing stays responsive:
//!
//! - A [`RenderCache`] memoizes the expensive encode step by `(content, size, margin, ecc)`,
//!   so color/gradient/frame/logo/text edits never re-encode.
//! - The [`Compositor`] applies gradient, frame, logo and center-text layers in a fixed order.
//! - [`export`] turns a [`RenderedArtifact`] into PNG, JPEG or SVG bytes.
//! - A [`PreviewController`] debounces edits, shows the flat base first and runs the
//!   decoration pass on a later tick; only the latest edit is ever displayed.
//!
//! [`QrEngine`] ties the pieces together for one editing session.
#![forbid(unsafe_code)]

pub mod assets;
pub mod export;
pub mod foundation;
pub mod matrix;
pub mod render;
pub mod session;
pub mod style;

pub use crate::export::{ExportFormat, ExportedFile};
pub use crate::foundation::core::{Bitmap, Color, Rgba8Premul};
pub use crate::foundation::error::{QrError, QrResult};
pub use crate::matrix::cache::{BaseMatrixKey, CacheStats, RenderCache};
pub use crate::matrix::encoder::{BaseMatrix, MatrixEncoder, QrcodegenEncoder};
pub use crate::render::artifact::{ArtifactPhase, RenderedArtifact};
pub use crate::render::compositor::{
    Compositor, LayerKind, LayerOutcome, LayerReport, SkipReason,
};
pub use crate::render::frame::FrameLayout;
pub use crate::session::engine::{EngineOpts, QrEngine};
pub use crate::session::preview::{
    Displayed, Notice, NoticeKind, PreviewController, PreviewOpts, PreviewState, RenderPhase,
};
pub use crate::style::fingerprint::Fingerprint;
pub use crate::style::spec::{
    CenterTextSpec, EccLevel, FrameStyle, GradientDirection, GradientKind, GradientSpec, LogoSpec,
    StyleSpec,
};
