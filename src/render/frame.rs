use crate::assets::text::{ShapedText, TextRequest, TextShaper};
use crate::foundation::core::{Color, Point, Rect, byte_len};
use crate::foundation::error::{QrError, QrResult};
use crate::render::geometry::{corner_accents, inset, rect_path, rounded_rect_path};
use crate::render::gradient::gradient_image;
use crate::render::raster::{fill_solid, image_paint, stroke_outline, stroke_solid};
use crate::render::text::{centered_origin, fill_text};
use crate::style::spec::{FrameStyle, GradientDirection, GradientSpec, StyleSpec};

/// Inset of the outer border stroke for most recipes.
pub const FRAME_INSET_PX: f64 = 5.0;
/// Corner radius of the `rounded` frame.
pub const ROUNDED_FRAME_RADIUS_PX: f64 = 15.0;

const SIMPLE_STROKE_PX: f64 = 3.0;
const BRANDED_STROKE_PX: f64 = 8.0;
const MODERN_STROKE_PX: f64 = 4.0;
const CLASSIC_STROKE_PX: f64 = 1.0;
const CLASSIC_ACCENT_STROKE_PX: f64 = 3.0;
const CAPTION_FONT_FAMILY: &str = "sans-serif";

/// Caption font size for labeled frames: 6% of the code's side, kept legible.
pub fn caption_font_px(size: u32) -> f32 {
    (size as f32 * 0.06).clamp(10.0, 48.0)
}

/// Height of the caption band (banner, header) for labeled frames.
pub fn caption_band_px(size: u32) -> u32 {
    (f64::from(caption_font_px(size)) * 1.6).round() as u32
}

/// Where the `size x size` code sits on the output canvas for a frame recipe.
///
/// Labeled recipes never draw over the code: `scan-me` and `scan-me-black` add their caption
/// band below it, and `branded` surrounds it with its border and a header band on top.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameLayout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Top-left corner of the code on the canvas.
    pub code_x: u32,
    pub code_y: u32,
    /// Side of the code, quiet zone included.
    pub code_size: u32,
}

impl FrameLayout {
    pub fn new(frame: FrameStyle, size: u32) -> Self {
        let band = caption_band_px(size);
        let border = BRANDED_STROKE_PX as u32;
        let (canvas_width, canvas_height, code_x, code_y) = match frame {
            FrameStyle::ScanMe | FrameStyle::ScanMeBlack => (size, size + band, 0, 0),
            FrameStyle::Branded => (
                size + 2 * border,
                size + band + 2 * border,
                border,
                border + band,
            ),
            _ => (size, size, 0, 0),
        };
        Self {
            canvas_width,
            canvas_height,
            code_x,
            code_y,
            code_size: size,
        }
    }

    /// The canvas is exactly the code.
    pub fn is_identity(&self) -> bool {
        self.code_x == 0
            && self.code_y == 0
            && self.canvas_width == self.code_size
            && self.canvas_height == self.code_size
    }

    pub fn canvas_rect(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            f64::from(self.canvas_width),
            f64::from(self.canvas_height),
        )
    }

    pub fn code_rect(&self) -> Rect {
        let (x, y) = (f64::from(self.code_x), f64::from(self.code_y));
        let s = f64::from(self.code_size);
        Rect::new(x, y, x + s, y + s)
    }

    /// Copy a premultiplied `code_size x code_size` layer into a transparent canvas buffer.
    pub(crate) fn place_code_layer(&self, layer: &[u8]) -> QrResult<Vec<u8>> {
        let size = self.code_size as usize;
        if layer.len() != byte_len(self.code_size, self.code_size) {
            return Err(QrError::validation("code layer does not match the code size"));
        }
        if self.is_identity() {
            return Ok(layer.to_vec());
        }
        let cw = self.canvas_width as usize;
        let mut out = vec![0u8; byte_len(self.canvas_width, self.canvas_height)];
        if size == 0 {
            return Ok(out);
        }
        for (row, src) in layer.chunks_exact(size * 4).enumerate() {
            let start = ((self.code_y as usize + row) * cw + self.code_x as usize) * 4;
            out[start..start + size * 4].copy_from_slice(src);
        }
        Ok(out)
    }
}

/// Result of drawing a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FrameDraw {
    /// The recipe has a caption but no face was available for its glyphs.
    pub(crate) caption_glyphs_missing: bool,
}

/// Caption shaped ahead of drawing, since shaping needs `&mut TextShaper`.
pub(crate) fn shape_caption(
    shaper: &mut TextShaper,
    style: &StyleSpec,
    layout: &FrameLayout,
) -> Option<ShapedText> {
    let frame = style.frame_style;
    if !frame.uses_label() {
        return None;
    }
    let color = match frame {
        FrameStyle::ScanMeBlack => Color::WHITE,
        FrameStyle::Branded => style.background_color,
        _ => style.foreground_color,
    };
    Some(shaper.shape(&TextRequest {
        text: style.frame_label_text(),
        font_family: CAPTION_FONT_FAMILY,
        size_px: caption_font_px(layout.code_size),
        bold: true,
        color,
    }))
}

/// Draw the frame recipe for `style.frame_style` onto a canvas sized by `layout`.
pub(crate) fn draw_frame(
    ctx: &mut vello_cpu::RenderContext,
    style: &StyleSpec,
    caption: Option<&ShapedText>,
    layout: &FrameLayout,
) -> QrResult<FrameDraw> {
    let (width, height) = (layout.canvas_width, layout.canvas_height);
    let full = layout.canvas_rect();
    let (w, h) = (full.width(), full.height());
    let code = layout.code_rect();
    let border = inset(full, FRAME_INSET_PX);
    let fg = style.foreground_color;
    let mut out = FrameDraw {
        caption_glyphs_missing: false,
    };
    let mut caption_at = |ctx: &mut vello_cpu::RenderContext, center: Point| {
        if let Some(c) = caption
            && !fill_text(ctx, c, centered_origin(c, center))
        {
            out.caption_glyphs_missing = true;
        }
    };

    match style.frame_style {
        FrameStyle::None => {}
        FrameStyle::Simple => stroke_solid(ctx, &rect_path(border), SIMPLE_STROKE_PX, fg),
        FrameStyle::ScanMe => caption_at(ctx, Point::new(w / 2.0, (code.y1 + h) / 2.0)),
        FrameStyle::ScanMeBlack => {
            fill_solid(ctx, &rect_path(Rect::new(0.0, code.y1, w, h)), Color::BLACK);
            caption_at(ctx, Point::new(w / 2.0, (code.y1 + h) / 2.0));
        }
        FrameStyle::Branded => {
            let outer = inset(full, BRANDED_STROKE_PX / 2.0);
            stroke_solid(ctx, &rect_path(outer), BRANDED_STROKE_PX, fg);
            fill_solid(ctx, &rect_path(Rect::new(0.0, 0.0, w, code.y0)), fg);
            caption_at(ctx, Point::new(w / 2.0, code.y0 / 2.0));
        }
        FrameStyle::Modern => {
            let spec = GradientSpec::linear(
                GradientDirection::TopLeftToBottomRight,
                style.background_color,
            );
            let img = gradient_image(&spec, fg, width, height);
            ctx.set_paint(image_paint(&img, width, height)?);
            ctx.fill_path(&crate::render::raster::bezpath_to_cpu(&stroke_outline(
                &rect_path(border),
                MODERN_STROKE_PX,
            )));
        }
        FrameStyle::Classic => {
            stroke_solid(ctx, &rect_path(border), CLASSIC_STROKE_PX, fg);
            let arm = (w.min(h) * 0.1).max(8.0);
            stroke_solid(ctx, &corner_accents(border, arm), CLASSIC_ACCENT_STROKE_PX, fg);
        }
        FrameStyle::Rounded => stroke_solid(
            ctx,
            &rounded_rect_path(border, ROUNDED_FRAME_RADIUS_PX),
            SIMPLE_STROKE_PX,
            fg,
        ),
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
