use crate::foundation::core::Color;
use crate::foundation::error::{QrError, QrResult};
use crate::matrix::cache::BaseMatrixKey;
use serde::{Deserialize, Serialize};

/// Smallest accepted output side length in pixels.
pub const MIN_SIZE_PX: u32 = 64;
/// Largest accepted output side length in pixels.
pub const MAX_SIZE_PX: u32 = 4096;
/// Largest accepted quiet-zone margin, in modules.
pub const MAX_MARGIN_MODULES: u32 = 40;
/// Accepted logo size range, percent of the shorter image side.
pub const LOGO_SIZE_PERCENT_RANGE: std::ops::RangeInclusive<u32> = 10..=40;
/// Largest accepted logo corner radius in pixels.
pub const MAX_LOGO_CORNER_RADIUS_PX: f64 = 200.0;
/// Maximum center badge length, in characters.
pub const MAX_CENTER_TEXT_CHARS: usize = 10;
/// Accepted center badge font size range in pixels.
pub const CENTER_FONT_SIZE_RANGE: std::ops::RangeInclusive<f32> = 6.0..=128.0;
/// Maximum frame caption length, in characters.
pub const MAX_FRAME_LABEL_CHARS: usize = 24;
/// Caption used by labeled frames when none is given.
pub const DEFAULT_FRAME_LABEL: &str = "SCAN ME";

/// Error-correction level, ordered from most capacity to most resilience.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EccLevel {
    /// ~7% recovery.
    #[serde(rename = "L", alias = "low")]
    Low,
    /// ~15% recovery.
    #[default]
    #[serde(rename = "M", alias = "medium")]
    Medium,
    /// ~25% recovery.
    #[serde(rename = "Q", alias = "quartile")]
    Quartile,
    /// ~30% recovery.
    #[serde(rename = "H", alias = "high")]
    High,
}

impl EccLevel {
    /// Ordinal in `0..4`, matching the `L < M < Q < H` ordering.
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::Quartile => 2,
            Self::High => 3,
        }
    }
}

/// Gradient flavor applied to dark modules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientKind {
    #[default]
    None,
    Linear,
    Radial,
}

/// Axis of a linear gradient.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientDirection {
    #[default]
    LeftToRight,
    TopToBottom,
    BottomLeftToTopRight,
    TopLeftToBottomRight,
}

/// Gradient fill description. `secondary_color` is the far-end stop; the near end is the
/// foreground color.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct GradientSpec {
    #[serde(rename = "type")]
    pub kind: GradientKind,
    pub direction: GradientDirection,
    pub secondary_color: Color,
}

impl Default for GradientSpec {
    fn default() -> Self {
        Self {
            kind: GradientKind::None,
            direction: GradientDirection::LeftToRight,
            secondary_color: Color::rgb(0x3b, 0x82, 0xf6),
        }
    }
}

impl GradientSpec {
    pub fn linear(direction: GradientDirection, secondary_color: Color) -> Self {
        Self {
            kind: GradientKind::Linear,
            direction,
            secondary_color,
        }
    }

    pub fn radial(secondary_color: Color) -> Self {
        Self {
            kind: GradientKind::Radial,
            direction: GradientDirection::default(),
            secondary_color,
        }
    }

    pub fn is_none(&self) -> bool {
        self.kind == GradientKind::None
    }
}

/// Frame decoration recipes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameStyle {
    #[default]
    None,
    /// Plain border stroke inset 5px.
    Simple,
    /// Caption as plain text below the code.
    ScanMe,
    /// Caption on a solid black banner strip.
    ScanMeBlack,
    /// Thick border plus a labeled header band.
    Branded,
    /// Border stroked with a foreground to background gradient.
    Modern,
    /// Thin border plus L-shaped corner accents.
    Classic,
    /// Rounded-rectangle border (radius 15px).
    Rounded,
}

impl FrameStyle {
    pub const ALL: [FrameStyle; 8] = [
        FrameStyle::None,
        FrameStyle::Simple,
        FrameStyle::ScanMe,
        FrameStyle::ScanMeBlack,
        FrameStyle::Branded,
        FrameStyle::Modern,
        FrameStyle::Classic,
        FrameStyle::Rounded,
    ];

    pub fn uses_label(self) -> bool {
        matches!(self, Self::ScanMe | Self::ScanMeBlack | Self::Branded)
    }
}

/// Embedded logo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogoSpec {
    /// Filesystem path or `data:<mime>;base64,<payload>` URI.
    pub image_source: String,
    #[serde(default = "default_logo_percent")]
    pub size_percent: u32,
    #[serde(default)]
    pub corner_radius_px: f64,
}

fn default_logo_percent() -> u32 {
    20
}

impl LogoSpec {
    pub fn new(image_source: impl Into<String>) -> Self {
        Self {
            image_source: image_source.into(),
            size_percent: default_logo_percent(),
            corner_radius_px: 0.0,
        }
    }
}

/// Center text badge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CenterTextSpec {
    pub text: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size_px: f32,
    #[serde(default)]
    pub bold: bool,
    #[serde(default = "default_text_color")]
    pub text_color: Color,
    #[serde(default = "default_badge_background")]
    pub background_color: Color,
}

fn default_font_family() -> String {
    "sans-serif".to_string()
}

fn default_font_size() -> f32 {
    16.0
}

fn default_text_color() -> Color {
    Color::BLACK
}

fn default_badge_background() -> Color {
    Color::WHITE
}

impl CenterTextSpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_family: default_font_family(),
            font_size_px: default_font_size(),
            bold: false,
            text_color: default_text_color(),
            background_color: default_badge_background(),
        }
    }

    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Full customization record for one render.
///
/// Only `size`, `margin` and `error_correction_level` (together with the content) affect the
/// encoded matrix; everything else is decoration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct StyleSpec {
    pub size: u32,
    pub margin: u32,
    pub error_correction_level: EccLevel,
    pub foreground_color: Color,
    pub background_color: Color,
    pub gradient: GradientSpec,
    pub frame_style: FrameStyle,
    pub frame_label: Option<String>,
    pub logo: Option<LogoSpec>,
    pub center_text: Option<CenterTextSpec>,
}

impl Default for StyleSpec {
    fn default() -> Self {
        Self {
            size: 300,
            margin: 4,
            error_correction_level: EccLevel::Medium,
            foreground_color: Color::BLACK,
            background_color: Color::WHITE,
            gradient: GradientSpec::default(),
            frame_style: FrameStyle::None,
            frame_label: None,
            logo: None,
            center_text: None,
        }
    }
}

impl StyleSpec {
    /// Parse a JSON style document. Unknown fields are rejected.
    pub fn from_json(json: &str) -> QrResult<Self> {
        serde_json::from_str(json).map_err(|e| QrError::serde(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> QrResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| QrError::serde(e.to_string()))
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_ecc(mut self, ecc: EccLevel) -> Self {
        self.error_correction_level = ecc;
        self
    }

    pub fn with_colors(mut self, foreground: Color, background: Color) -> Self {
        self.foreground_color = foreground;
        self.background_color = background;
        self
    }

    pub fn with_gradient(mut self, gradient: GradientSpec) -> Self {
        self.gradient = gradient;
        self
    }

    pub fn with_frame(mut self, frame: FrameStyle) -> Self {
        self.frame_style = frame;
        self
    }

    pub fn with_frame_label(mut self, label: impl Into<String>) -> Self {
        self.frame_label = Some(label.into());
        self
    }

    pub fn with_logo(mut self, logo: LogoSpec) -> Self {
        self.logo = Some(logo);
        self
    }

    pub fn with_center_text(mut self, text: CenterTextSpec) -> Self {
        self.center_text = Some(text);
        self
    }

    /// Cache key for the encoded matrix this style needs.
    pub fn base_key(&self, content: &str) -> BaseMatrixKey {
        BaseMatrixKey {
            content: content.to_string(),
            size: self.size,
            margin: self.margin,
            ecc: self.error_correction_level,
        }
    }

    /// Center badge, if one is requested with non-blank text.
    pub fn effective_center_text(&self) -> Option<&CenterTextSpec> {
        self.center_text.as_ref().filter(|t| !t.is_blank())
    }

    pub fn frame_label_text(&self) -> &str {
        match self.frame_label.as_deref() {
            Some(s) if !s.trim().is_empty() => s,
            _ => DEFAULT_FRAME_LABEL,
        }
    }

    /// True when anything beyond the flat two-color base is requested.
    pub fn has_decorations(&self) -> bool {
        !self.gradient.is_none()
            || self.frame_style != FrameStyle::None
            || self.logo.is_some()
            || self.effective_center_text().is_some()
    }

    /// Check domain limits. Types are trusted; ranges are not.
    pub fn validate(&self) -> QrResult<()> {
        if !(MIN_SIZE_PX..=MAX_SIZE_PX).contains(&self.size) {
            return Err(QrError::validation(format!(
                "size must be within {MIN_SIZE_PX}..={MAX_SIZE_PX} px (got {})",
                self.size
            )));
        }
        if self.margin > MAX_MARGIN_MODULES {
            return Err(QrError::validation(format!(
                "margin must be <= {MAX_MARGIN_MODULES} modules (got {})",
                self.margin
            )));
        }
        if let Some(label) = &self.frame_label
            && label.chars().count() > MAX_FRAME_LABEL_CHARS
        {
            return Err(QrError::validation(format!(
                "frame_label must be at most {MAX_FRAME_LABEL_CHARS} characters"
            )));
        }
        if let Some(logo) = &self.logo {
            if logo.image_source.trim().is_empty() {
                return Err(QrError::validation("logo image_source must be non-empty"));
            }
            if !LOGO_SIZE_PERCENT_RANGE.contains(&logo.size_percent) {
                return Err(QrError::validation(format!(
                    "logo size_percent must be within {}..={} (got {})",
                    LOGO_SIZE_PERCENT_RANGE.start(),
                    LOGO_SIZE_PERCENT_RANGE.end(),
                    logo.size_percent
                )));
            }
            let r = logo.corner_radius_px;
            if !r.is_finite() || !(0.0..=MAX_LOGO_CORNER_RADIUS_PX).contains(&r) {
                return Err(QrError::validation(format!(
                    "logo corner_radius_px must be finite and within 0..={MAX_LOGO_CORNER_RADIUS_PX}"
                )));
            }
        }
        if let Some(text) = &self.center_text {
            let n = text.text.chars().count();
            if n > MAX_CENTER_TEXT_CHARS {
                return Err(QrError::validation(format!(
                    "center_text must be at most {MAX_CENTER_TEXT_CHARS} characters (got {n})"
                )));
            }
            let fs = text.font_size_px;
            if !fs.is_finite() || !CENTER_FONT_SIZE_RANGE.contains(&fs) {
                return Err(QrError::validation(format!(
                    "center_text font_size_px must be within {}..={}",
                    CENTER_FONT_SIZE_RANGE.start(),
                    CENTER_FONT_SIZE_RANGE.end()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/spec.rs"]
mod tests;
