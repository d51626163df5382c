use crate::assets::text::ShapedText;
use crate::foundation::core::Point;

/// Fill the glyphs of `text` with their layout brush, the layout's top-left placed at `origin`.
///
/// Returns `false` when the text has no glyphs (no face was resolved).
pub(crate) fn fill_text(ctx: &mut vello_cpu::RenderContext, text: &ShapedText, origin: Point) -> bool {
    let Some(g) = &text.glyphs else {
        return false;
    };

    ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
    for line in g.layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.glyphs().map(|gl| vello_cpu::Glyph {
                id: gl.id,
                x: gl.x,
                y: gl.y,
            });
            ctx.glyph_run(&g.font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    true
}

/// Top-left origin that centers `text` on `center`.
pub(crate) fn centered_origin(text: &ShapedText, center: Point) -> Point {
    Point::new(
        (center.x - f64::from(text.width) / 2.0).round(),
        (center.y - f64::from(text.height) / 2.0).round(),
    )
}
