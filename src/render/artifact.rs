use std::sync::Arc;

use crate::foundation::core::Bitmap;
use crate::matrix::encoder::BaseMatrix;
use crate::render::compositor::{Composed, LayerKind, LayerReport};
use crate::style::fingerprint::{Fingerprint, fingerprint_pixels};
use crate::style::spec::StyleSpec;

/// How far through the pipeline an artifact got.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactPhase {
    /// Flat base rendering; decorations not applied yet.
    Base,
    /// Every decoration layer ran (some may have been skipped).
    Decorated,
}

/// Final bitmap of one render together with everything needed to reproduce or export it.
#[derive(Clone, Debug)]
pub struct RenderedArtifact {
    pub bitmap: Bitmap,
    pub content: String,
    pub style: StyleSpec,
    pub phase: ArtifactPhase,
    pub layers: Vec<LayerReport>,
    /// Digest of `bitmap`'s pixels, for golden comparisons.
    pub digest: Fingerprint,
    pub(crate) base: Arc<BaseMatrix>,
    pub(crate) overlay: Option<Bitmap>,
}

impl RenderedArtifact {
    pub(crate) fn base_only(
        bitmap: Bitmap,
        content: &str,
        style: &StyleSpec,
        base: Arc<BaseMatrix>,
    ) -> Self {
        Self {
            digest: fingerprint_pixels(bitmap.width, bitmap.height, &bitmap.data),
            bitmap,
            content: content.to_string(),
            style: style.clone(),
            phase: ArtifactPhase::Base,
            layers: Vec::new(),
            base,
            overlay: None,
        }
    }

    pub(crate) fn decorated(
        composed: Composed,
        content: &str,
        style: &StyleSpec,
        base: Arc<BaseMatrix>,
    ) -> Self {
        let bitmap = composed.bitmap;
        Self {
            digest: fingerprint_pixels(bitmap.width, bitmap.height, &bitmap.data),
            bitmap,
            content: content.to_string(),
            style: style.clone(),
            phase: ArtifactPhase::Decorated,
            layers: composed.layers,
            base,
            overlay: composed.overlay,
        }
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height
    }

    /// The encoded matrix this artifact was drawn from.
    pub fn base_matrix(&self) -> &BaseMatrix {
        &self.base
    }

    /// Frame/logo/text canvas, if any of those layers drew something.
    pub fn overlay(&self) -> Option<&Bitmap> {
        self.overlay.as_ref()
    }

    pub fn layer(&self, kind: LayerKind) -> Option<&LayerReport> {
        self.layers.iter().find(|r| r.layer == kind)
    }
}
