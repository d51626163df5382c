use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::error::{QrError, QrResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Longest side used when rasterizing vector logos.
pub const SVG_LOGO_RASTER_PX: u32 = 512;

/// Decoded logo in premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogoImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Where logo bytes come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogoSource {
    /// Local file.
    Path(PathBuf),
    /// Inline `data:` URI payload.
    Inline {
        /// Declared media type, lowercased (may be empty).
        mime: String,
        /// Decoded payload.
        bytes: Vec<u8>,
    },
}

impl LogoSource {
    /// Classify an `image_source` string. Remote URLs are rejected.
    pub fn parse(source: &str) -> QrResult<Self> {
        let s = source.trim();
        if s.is_empty() {
            return Err(QrError::asset_load("logo source must be non-empty"));
        }
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Err(QrError::asset_load(format!(
                "remote logo sources are not supported: '{s}'"
            )));
        }
        if lower.starts_with("data:") {
            return parse_data_uri(s);
        }
        Ok(Self::Path(PathBuf::from(s)))
    }

    fn looks_like_svg(&self, bytes: &[u8]) -> bool {
        let hinted = match self {
            Self::Path(p) => p
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("svg")),
            Self::Inline { mime, .. } => mime == "image/svg+xml",
        };
        hinted || sniff_svg(bytes)
    }
}

fn parse_data_uri(s: &str) -> QrResult<LogoSource> {
    let rest = &s["data:".len()..];
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| QrError::asset_load("data URI is missing ','"))?;
    let mut parts = meta.split(';');
    let mime = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
    if !parts.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(QrError::asset_load("data URI logos must be base64-encoded"));
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| QrError::asset_load(format!("invalid base64 in data URI: {e}")))?;
    Ok(LogoSource::Inline { mime, bytes })
}

fn sniff_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };
    let t = text.trim_start_matches('\u{feff}').trim_start();
    t.starts_with('<') && t.contains("<svg")
}

/// Read and decode a logo. Every failure is reported as [`QrError::AssetLoad`].
pub fn load_logo(source: &str, fontdb: &Arc<usvg::fontdb::Database>) -> QrResult<LogoImage> {
    let src = LogoSource::parse(source)?;
    let bytes = match &src {
        LogoSource::Path(p) => read_file(p)?,
        LogoSource::Inline { bytes, .. } => bytes.clone(),
    };
    if src.looks_like_svg(&bytes) {
        let dir = match &src {
            LogoSource::Path(p) => p.parent().map(Path::to_path_buf),
            LogoSource::Inline { .. } => None,
        };
        decode_svg_logo(&bytes, dir, fontdb)
    } else {
        decode_raster_logo(&bytes)
    }
}

fn read_file(path: &Path) -> QrResult<Vec<u8>> {
    std::fs::read(path)
        .with_context(|| format!("read logo from '{}'", path.display()))
        .map_err(|e| QrError::asset_load(format!("{e:#}")))
}

/// Decode PNG/JPEG/GIF/WebP/... bytes into premultiplied RGBA8.
pub fn decode_raster_logo(bytes: &[u8]) -> QrResult<LogoImage> {
    let dyn_img = image::load_from_memory(bytes)
        .context("decode logo image from memory")
        .map_err(|e| QrError::asset_load(format!("{e:#}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(QrError::asset_load("logo image has zero size"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    Ok(LogoImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Parse an SVG logo and rasterize it so its longer side is [`SVG_LOGO_RASTER_PX`].
pub fn decode_svg_logo(
    bytes: &[u8],
    resources_dir: Option<PathBuf>,
    fontdb: &Arc<usvg::fontdb::Database>,
) -> QrResult<LogoImage> {
    let opts = usvg::Options {
        resources_dir,
        fontdb: fontdb.clone(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(bytes, &opts)
        .context("parse svg logo")
        .map_err(|e| QrError::asset_load(format!("{e:#}")))?;

    let size = tree.size();
    let (sw, sh) = (size.width(), size.height());
    if !sw.is_finite() || !sh.is_finite() || sw <= 0.0 || sh <= 0.0 {
        return Err(QrError::asset_load("svg logo has invalid width/height"));
    }
    let scale = SVG_LOGO_RASTER_PX as f32 / sw.max(sh);
    let width = ((sw * scale).round() as u32).max(1);
    let height = ((sh * scale).round() as u32).max(1);

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| QrError::asset_load("failed to allocate svg logo pixmap"))?;
    let xform = resvg::tiny_skia::Transform::from_scale(
        width as f32 / sw,
        height as f32 / sh,
    );
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    Ok(LogoImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.data().to_vec()),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/logo.rs"]
mod tests;
