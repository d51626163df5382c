//! Downloadable encodings of a rendered artifact.

pub mod raster;
pub mod svg;

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;

use crate::foundation::error::{QrError, QrResult};
use crate::render::artifact::RenderedArtifact;

/// Target file format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    #[serde(alias = "jpeg")]
    Jpg,
    Svg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Svg => "svg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpg => "image/jpeg",
            Self::Svg => "image/svg+xml",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "svg" => Ok(Self::Svg),
            other => Err(QrError::validation(format!(
                "unknown export format '{other}' (expected png, jpg or svg)"
            ))),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Encoded file ready to be written or handed to a download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedFile {
    pub format: ExportFormat,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    /// Write into `dir` (created if missing) and return the full path.
    ///
    /// An existing file of the same name gets a `-1`, `-2`, ... suffix instead of being
    /// overwritten.
    pub fn save_to(&self, dir: &Path) -> QrResult<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create export directory '{}'", dir.display()))
            .map_err(|e| QrError::export(format!("{e:#}")))?;

        let mut path = dir.join(&self.file_name);
        let stem = self
            .file_name
            .strip_suffix(&format!(".{}", self.format.extension()))
            .unwrap_or(&self.file_name)
            .to_string();
        let mut n = 1u32;
        while path.exists() {
            path = dir.join(format!("{stem}-{n}.{}", self.format.extension()));
            n += 1;
        }

        std::fs::write(&path, &self.bytes)
            .with_context(|| format!("write export file '{}'", path.display()))
            .map_err(|e| QrError::export(format!("{e:#}")))?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "exported");
        Ok(path)
    }
}

/// `qr-code-<unix_ms>.<ext>`.
pub fn export_file_name(format: ExportFormat, unix_ms: u128) -> String {
    format!("qr-code-{unix_ms}.{}", format.extension())
}

pub(crate) fn now_unix_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Encode `artifact` as `format`.
///
/// SVG output draws the modules as vectors from the artifact's base matrix and embeds the
/// artifact's decoration overlay (if any) as a PNG.
pub fn encode(artifact: &RenderedArtifact, format: ExportFormat) -> QrResult<ExportedFile> {
    let bytes = match format {
        ExportFormat::Png => raster::encode_png(&artifact.bitmap)?,
        ExportFormat::Jpg => raster::encode_jpeg(&artifact.bitmap)?,
        ExportFormat::Svg => {
            svg::encode_svg(artifact.base_matrix(), &artifact.style, artifact.overlay())?
        }
    };
    Ok(ExportedFile {
        format,
        file_name: export_file_name(format, now_unix_ms()),
        bytes,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/export/file.rs"]
mod tests;
