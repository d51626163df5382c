use std::collections::HashMap;

use crate::assets::fonts::FontLibrary;
use crate::foundation::core::Color;

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Color> for TextBrushRgba8 {
    fn from(c: Color) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Text styling for one shaping request.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRequest<'a> {
    pub text: &'a str,
    pub font_family: &'a str,
    pub size_px: f32,
    pub bold: bool,
    pub color: Color,
}

/// Measured (and, when a face was found, shaped) single-line text.
#[derive(Clone)]
pub struct ShapedText {
    /// Advance width in pixels.
    pub width: f32,
    /// Line height in pixels.
    pub height: f32,
    pub(crate) glyphs: Option<ShapedGlyphs>,
}

#[derive(Clone)]
pub(crate) struct ShapedGlyphs {
    pub(crate) layout: parley::Layout<TextBrushRgba8>,
    pub(crate) font: vello_cpu::peniko::FontData,
}

impl ShapedText {
    /// False when no font face could be resolved and only metrics were estimated.
    pub fn has_glyphs(&self) -> bool {
        self.glyphs.is_some()
    }
}

/// Average advance used when no face is available, as a fraction of the font size.
const FALLBACK_ADVANCE_EM: f32 = 0.6;
const FALLBACK_LINE_EM: f32 = 1.2;

/// Parley-based shaper that resolves faces through a [`FontLibrary`].
pub struct TextShaper {
    fonts: FontLibrary,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    registered: HashMap<usvg::fontdb::ID, (String, vello_cpu::peniko::FontData)>,
    /// Font files copied out of the library so far.
    face_loads: usize,
}

impl TextShaper {
    pub fn new(fonts: FontLibrary) -> Self {
        Self {
            fonts,
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
            face_loads: 0,
        }
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    /// Shape `req` on one line. Missing faces degrade to an estimated box with no glyphs.
    pub fn shape(&mut self, req: &TextRequest<'_>) -> ShapedText {
        let size = if req.size_px.is_finite() && req.size_px > 0.0 {
            req.size_px
        } else {
            1.0
        };

        let Some(id) = self.fonts.resolve_id(req.font_family, req.bold) else {
            tracing::debug!(family = req.font_family, "no font face; estimating text metrics");
            return estimate(req.text, size, req.bold);
        };
        let Some((family_name, font)) = self.register(id) else {
            return estimate(req.text, size, req.bold);
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, req.text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size));
        if req.bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }
        builder.push_default(parley::style::StyleProperty::Brush(req.color.into()));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(req.text);
        layout.break_all_lines(None);

        ShapedText {
            width: layout.width(),
            height: layout.height(),
            glyphs: Some(ShapedGlyphs { layout, font }),
        }
    }

    fn register(&mut self, id: usvg::fontdb::ID) -> Option<(String, vello_cpu::peniko::FontData)> {
        if let Some(hit) = self.registered.get(&id) {
            return Some(hit.clone());
        }

        let face = self.fonts.face_data(id)?;
        self.face_loads += 1;
        let bytes: Vec<u8> = face.data.as_ref().clone();
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id)?;
        let family_name = self.font_ctx.collection.family_name(family_id)?.to_string();

        let font =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), face.index);
        tracing::debug!(family = %family_name, face_loads = self.face_loads, "font face registered");
        self.registered.insert(id, (family_name.clone(), font.clone()));
        Some((family_name, font))
    }
}

fn estimate(text: &str, size: f32, bold: bool) -> ShapedText {
    let em = if bold {
        FALLBACK_ADVANCE_EM * 1.1
    } else {
        FALLBACK_ADVANCE_EM
    };
    ShapedText {
        width: text.chars().count() as f32 * size * em,
        height: size * FALLBACK_LINE_EM,
        glyphs: None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
