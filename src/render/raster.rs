use std::sync::Arc;

use crate::foundation::core::{BezPath, Color};
use crate::foundation::error::{QrError, QrResult};

/// Tolerance used when flattening strokes into fill outlines.
const STROKE_TOLERANCE: f64 = 0.1;

/// Reusable `vello_cpu` context that draws one layer at a time into a fresh premultiplied
/// RGBA8 buffer.
#[derive(Default)]
pub(crate) struct Rasterizer {
    ctx: Option<vello_cpu::RenderContext>,
}

impl Rasterizer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Run `f` on a cleared context sized `width x height` and return the rendered layer.
    pub(crate) fn draw_layer(
        &mut self,
        width: u32,
        height: u32,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> QrResult<()>,
    ) -> QrResult<Vec<u8>> {
        let w = to_u16(width, "width")?;
        let h = to_u16(height, "height")?;
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        f(&mut ctx)?;

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);
        Ok(pixmap.data_as_u8_slice().to_vec())
    }
}

fn to_u16(v: u32, what: &str) -> QrResult<u16> {
    v.try_into()
        .map_err(|_| QrError::validation(format!("raster {what} exceeds u16")))
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Fill outline of `path` stroked at `width` px with square caps and miter joins.
pub(crate) fn stroke_outline(path: &BezPath, width: f64) -> BezPath {
    let style = kurbo::Stroke::new(width)
        .with_caps(kurbo::Cap::Square)
        .with_join(kurbo::Join::Miter);
    kurbo::stroke(
        path.elements().iter().copied(),
        &style,
        &kurbo::StrokeOpts::default(),
        STROKE_TOLERANCE,
    )
}

pub(crate) fn fill_solid(ctx: &mut vello_cpu::RenderContext, path: &BezPath, color: Color) {
    ctx.set_paint(color.to_cpu());
    ctx.fill_path(&bezpath_to_cpu(path));
}

pub(crate) fn stroke_solid(
    ctx: &mut vello_cpu::RenderContext,
    path: &BezPath,
    width: f64,
    color: Color,
) {
    fill_solid(ctx, &stroke_outline(path, width), color);
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> QrResult<vello_cpu::Pixmap> {
    let w = to_u16(width, "width")?;
    let h = to_u16(height, "height")?;
    if bytes.len() != crate::foundation::core::byte_len(width, height) {
        return Err(QrError::validation("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

/// Image paint anchored at the user-space origin.
pub(crate) fn image_paint(bytes_premul: &[u8], width: u32, height: u32) -> QrResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
