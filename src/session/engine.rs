use std::path::PathBuf;
use std::sync::Arc;

use crate::assets::fonts::FontLibrary;
use crate::assets::loader::{LogoEvent, LogoStatus, LogoStore};
use crate::assets::text::TextShaper;
use crate::export::{self, ExportFormat, ExportedFile};
use crate::foundation::error::{QrError, QrResult};
use crate::matrix::cache::{CacheStats, DEFAULT_CACHE_CAPACITY, RenderCache};
use crate::matrix::encoder::{BaseMatrix, MatrixEncoder, QrcodegenEncoder};
use crate::render::artifact::RenderedArtifact;
use crate::render::compositor::Compositor;
use crate::style::spec::StyleSpec;

/// Options for constructing a [`QrEngine`].
#[derive(Clone, Debug)]
pub struct EngineOpts {
    /// Maximum number of base matrices kept in the render cache.
    pub cache_capacity: usize,
    /// Extra directories scanned for `.ttf`/`.otf`/`.ttc` faces.
    pub font_dirs: Vec<PathBuf>,
    /// Load the platform's installed fonts.
    pub system_fonts: bool,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            cache_capacity: RenderCache::capacity_from_env(DEFAULT_CACHE_CAPACITY),
            font_dirs: Vec::new(),
            system_fonts: true,
        }
    }
}

impl EngineOpts {
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.font_dirs.push(dir.into());
        self
    }

    pub fn with_system_fonts(mut self, system_fonts: bool) -> Self {
        self.system_fonts = system_fonts;
        self
    }
}

/// Owns the render cache, the encoder and the asset machinery for one editing session.
///
/// All mutation goes through `&mut self`; a host sharing an engine across threads wraps it in a
/// mutex.
pub struct QrEngine {
    encoder: Box<dyn MatrixEncoder>,
    cache: RenderCache,
    compositor: Compositor,
    shaper: TextShaper,
    logos: LogoStore,
}

impl QrEngine {
    /// Engine backed by the bundled `qrcodegen` encoder.
    pub fn new(opts: EngineOpts) -> Self {
        Self::with_encoder(QrcodegenEncoder::new(), opts)
    }

    /// Engine backed by a caller-provided encoder.
    pub fn with_encoder(encoder: impl MatrixEncoder + 'static, opts: EngineOpts) -> Self {
        let fonts = FontLibrary::new(&opts.font_dirs, opts.system_fonts);
        let logos = LogoStore::new(fonts.fontdb());
        tracing::debug!(
            cache_capacity = opts.cache_capacity,
            font_faces = fonts.face_count(),
            "engine ready"
        );
        Self {
            encoder: Box::new(encoder),
            cache: RenderCache::new(opts.cache_capacity),
            compositor: Compositor::new(),
            shaper: TextShaper::new(fonts),
            logos,
        }
    }

    /// Render `content` with every decoration in `style`, waiting for the logo if needed.
    ///
    /// A logo that fails to load is skipped and reported on the artifact; only validation and
    /// encoding failures are returned as errors.
    #[tracing::instrument(skip_all, fields(content_len = content.len(), size = style.size))]
    pub fn render(&mut self, content: &str, style: &StyleSpec) -> QrResult<RenderedArtifact> {
        style.validate()?;
        let base = self.base_matrix(content, style)?;
        let logo = style.logo.as_ref().map(|spec| {
            match self.logos.load_blocking(&spec.image_source) {
                Ok(img) => LogoStatus::Ready(img),
                Err(e) => LogoStatus::Failed(e.to_string()),
            }
        });
        let composed = self
            .compositor
            .compose(&base, style, logo.as_ref(), &mut self.shaper)?;
        Ok(RenderedArtifact::decorated(composed, content, style, base))
    }

    /// Flat two-color rendering with no decoration layers.
    #[tracing::instrument(skip_all, fields(content_len = content.len(), size = style.size))]
    pub fn render_base(&mut self, content: &str, style: &StyleSpec) -> QrResult<RenderedArtifact> {
        style.validate()?;
        let base = self.base_matrix(content, style)?;
        let bitmap = Compositor::base_bitmap(&base, style)?;
        Ok(RenderedArtifact::base_only(bitmap, content, style, base))
    }

    /// Run the decoration layers for `artifact`'s style over its base matrix.
    ///
    /// `logo` is the current load state of the style's logo (see [`QrEngine::logo_status`]).
    pub fn decorate(
        &mut self,
        artifact: &RenderedArtifact,
        logo: Option<&LogoStatus>,
    ) -> QrResult<RenderedArtifact> {
        let base = artifact.base.clone();
        let composed =
            self.compositor
                .compose(&base, &artifact.style, logo, &mut self.shaper)?;
        Ok(RenderedArtifact::decorated(
            composed,
            &artifact.content,
            &artifact.style,
            base,
        ))
    }

    /// Non-blocking logo state for `style`, starting a background load on first sight.
    pub fn logo_status(&mut self, style: &StyleSpec) -> Option<LogoStatus> {
        style
            .logo
            .as_ref()
            .map(|spec| self.logos.request(&spec.image_source))
    }

    /// Drain finished background logo loads.
    pub fn poll_logos(&mut self) -> Vec<LogoEvent> {
        self.logos.poll()
    }

    pub fn has_pending_logos(&self) -> bool {
        self.logos.has_pending()
    }

    /// Encode `artifact` for download.
    pub fn export(&self, artifact: &RenderedArtifact, format: ExportFormat) -> QrResult<ExportedFile> {
        export::encode(artifact, format).inspect_err(|e| {
            tracing::warn!(%format, error = %e, "export failed");
        })
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop every cached base matrix and every finished logo load.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.logos.clear();
    }

    fn base_matrix(&mut self, content: &str, style: &StyleSpec) -> QrResult<Arc<BaseMatrix>> {
        let key = style.base_key(content);
        self.cache
            .get_or_encode(&key, self.encoder.as_ref())
            .inspect_err(|e| {
                if matches!(e, QrError::Encoding(_)) {
                    tracing::warn!(error = %e, "encoding failed");
                }
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/engine.rs"]
mod tests;
