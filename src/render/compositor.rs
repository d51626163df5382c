use std::sync::Arc;

use crate::assets::loader::LogoStatus;
use crate::assets::logo::LogoImage;
use crate::assets::text::{TextRequest, TextShaper};
use crate::foundation::core::{Bitmap, Color, Point, Rect, Vec2};
use crate::foundation::error::{QrError, QrResult};
use crate::foundation::math::{premul_atop_in_place, premul_over_in_place};
use crate::matrix::encoder::BaseMatrix;
use crate::render::frame::{FrameLayout, draw_frame, shape_caption};
use crate::render::geometry::{
    BADGE_PAD_X_PX, BADGE_PAD_Y_PX, LOGO_PAD_PX, badge_rect, contain_rect, logo_rect, pad_rect,
    rect_path, rounded_rect_path,
};
use crate::render::gradient::{dark_module_layer, gradient_image};
use crate::render::raster::{Rasterizer, fill_solid, image_paint};
use crate::render::text::fill_text;
use crate::style::spec::{FrameStyle, LogoSpec, StyleSpec};

/// Decoration layers in the order they are applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Gradient,
    Frame,
    Logo,
    CenterText,
}

impl LayerKind {
    pub const ORDER: [LayerKind; 4] = [
        LayerKind::Gradient,
        LayerKind::Frame,
        LayerKind::Logo,
        LayerKind::CenterText,
    ];
}

/// Why a layer was not drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The style does not ask for it.
    NotRequested,
    /// The logo is still loading.
    LogoPending,
    /// The logo failed to load.
    LogoFailed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayerOutcome {
    Applied,
    /// Drawn without some part (for example text glyphs when no font face exists).
    Degraded(String),
    Skipped(SkipReason),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerReport {
    pub layer: LayerKind,
    pub outcome: LayerOutcome,
}

impl LayerReport {
    fn new(layer: LayerKind, outcome: LayerOutcome) -> Self {
        Self { layer, outcome }
    }

    fn not_requested(layer: LayerKind) -> Self {
        Self::new(layer, LayerOutcome::Skipped(SkipReason::NotRequested))
    }

    pub fn is_applied(&self) -> bool {
        matches!(
            self.outcome,
            LayerOutcome::Applied | LayerOutcome::Degraded(_)
        )
    }
}

/// Output of a full decoration pass.
#[derive(Clone, Debug)]
pub struct Composed {
    pub bitmap: Bitmap,
    /// Frame, logo and text on a transparent canvas, if any of them was drawn.
    pub overlay: Option<Bitmap>,
    /// One report per [`LayerKind::ORDER`] entry.
    pub layers: Vec<LayerReport>,
}

/// Applies the decoration layers onto a working copy of a base matrix.
///
/// Layer order is fixed: gradient, frame, logo, center text. Each vector layer is drawn into
/// its own transparent buffer and composited `over` the layers beneath it.
#[derive(Default)]
pub struct Compositor {
    raster: Rasterizer,
}

impl Compositor {
    pub fn new() -> Self {
        Self {
            raster: Rasterizer::new(),
        }
    }

    /// Flat two-color rendering of `base`: background everywhere, foreground on dark modules.
    pub fn base_bitmap(base: &BaseMatrix, style: &StyleSpec) -> QrResult<Bitmap> {
        let mut out = Bitmap::filled(base.size(), base.size(), style.background_color.premul());
        let dark = dark_module_layer(base.mask(), style.foreground_color);
        premul_over_in_place(&mut out.data, &dark)?;
        Ok(out)
    }

    /// Run every decoration layer in order over `base`.
    ///
    /// `logo` is the load state of `style.logo`; `None` is treated as "not loaded yet". Labeled
    /// frames grow the canvas (see [`FrameLayout`]); the code itself is never painted over by
    /// the frame.
    #[tracing::instrument(skip_all, fields(size = base.size(), frame = ?style.frame_style))]
    pub fn compose(
        &mut self,
        base: &BaseMatrix,
        style: &StyleSpec,
        logo: Option<&LogoStatus>,
        shaper: &mut TextShaper,
    ) -> QrResult<Composed> {
        let size = base.size();
        let layout = FrameLayout::new(style.frame_style, size);
        let mut out = Bitmap::filled(
            layout.canvas_width,
            layout.canvas_height,
            style.background_color.premul(),
        );
        let mut dark = dark_module_layer(base.mask(), style.foreground_color);

        let gradient = if style.gradient.is_none() {
            LayerReport::not_requested(LayerKind::Gradient)
        } else {
            let grad = gradient_image(&style.gradient, style.foreground_color, size, size);
            premul_atop_in_place(&mut dark, &grad)?;
            LayerReport::new(LayerKind::Gradient, LayerOutcome::Applied)
        };
        premul_over_in_place(&mut out.data, &layout.place_code_layer(&dark)?)?;

        // `over` is associative, so stacking frame, logo and text on their own canvas and
        // compositing that once gives the same result as drawing them one by one.
        let top = self.overlay(size, style, logo, shaper)?;
        if let Some(o) = &top.overlay {
            premul_over_in_place(&mut out.data, &o.data)?;
        }

        let mut layers = vec![gradient];
        layers.extend(top.layers);
        Ok(Composed {
            bitmap: out,
            overlay: top.overlay,
            layers,
        })
    }

    /// Frame, logo and text layers alone, on a transparent canvas laid out for a `size` code.
    ///
    /// Both `bitmap` and `overlay` of the result hold that canvas; `overlay` is `None` when no
    /// layer drew anything.
    pub fn overlay(
        &mut self,
        size: u32,
        style: &StyleSpec,
        logo: Option<&LogoStatus>,
        shaper: &mut TextShaper,
    ) -> QrResult<Composed> {
        let layout = FrameLayout::new(style.frame_style, size);
        let mut out = Bitmap::new_transparent(layout.canvas_width, layout.canvas_height);
        let layers = self.decorate_onto(&mut out, &layout, style, logo, shaper)?;
        let overlay = layers
            .iter()
            .any(LayerReport::is_applied)
            .then(|| out.clone());
        Ok(Composed {
            bitmap: out,
            overlay,
            layers,
        })
    }

    fn decorate_onto(
        &mut self,
        dst: &mut Bitmap,
        layout: &FrameLayout,
        style: &StyleSpec,
        logo: Option<&LogoStatus>,
        shaper: &mut TextShaper,
    ) -> QrResult<Vec<LayerReport>> {
        let (w, h) = (dst.width, dst.height);
        let size = layout.code_size;
        let code_origin = Vec2::new(f64::from(layout.code_x), f64::from(layout.code_y));
        let mut reports = Vec::with_capacity(3);

        // Frame.
        if style.frame_style == FrameStyle::None {
            reports.push(LayerReport::not_requested(LayerKind::Frame));
        } else {
            let caption = shape_caption(shaper, style, layout);
            let mut drawn = None;
            let layer = self.raster.draw_layer(w, h, |ctx| {
                drawn = Some(draw_frame(ctx, style, caption.as_ref(), layout)?);
                Ok(())
            })?;
            premul_over_in_place(&mut dst.data, &layer)?;
            let outcome = match drawn {
                Some(d) if d.caption_glyphs_missing => {
                    tracing::warn!("no font face for frame caption; caption glyphs skipped");
                    LayerOutcome::Degraded("no font face for frame caption".to_string())
                }
                _ => LayerOutcome::Applied,
            };
            reports.push(LayerReport::new(LayerKind::Frame, outcome));
        }

        // Logo.
        match (&style.logo, logo) {
            (None, _) => reports.push(LayerReport::not_requested(LayerKind::Logo)),
            (Some(_), None | Some(LogoStatus::Pending)) => reports.push(LayerReport::new(
                LayerKind::Logo,
                LayerOutcome::Skipped(SkipReason::LogoPending),
            )),
            (Some(_), Some(LogoStatus::Failed(msg))) => {
                tracing::debug!(error = %msg, "logo layer skipped");
                reports.push(LayerReport::new(
                    LayerKind::Logo,
                    LayerOutcome::Skipped(SkipReason::LogoFailed(msg.clone())),
                ));
            }
            (Some(spec), Some(LogoStatus::Ready(img))) => {
                let bounds = logo_rect(size, size, spec.size_percent) + code_origin;
                let layer = self.logo_layer(spec, img, bounds, w, h)?;
                premul_over_in_place(&mut dst.data, &layer)?;
                reports.push(LayerReport::new(LayerKind::Logo, LayerOutcome::Applied));
            }
        }

        // Center text.
        match style.effective_center_text() {
            None => reports.push(LayerReport::not_requested(LayerKind::CenterText)),
            Some(t) => {
                let shaped = shaper.shape(&TextRequest {
                    text: &t.text,
                    font_family: &t.font_family,
                    size_px: t.font_size_px,
                    bold: t.bold,
                    color: t.text_color,
                });
                let rect = badge_rect(size, size, f64::from(shaped.width), f64::from(shaped.height))
                    + code_origin;
                let mut glyphs = true;
                let layer = self.raster.draw_layer(w, h, |ctx| {
                    fill_solid(ctx, &rect_path(rect), t.background_color);
                    let origin = Point::new(rect.x0 + BADGE_PAD_X_PX, rect.y0 + BADGE_PAD_Y_PX);
                    glyphs = fill_text(ctx, &shaped, origin);
                    Ok(())
                })?;
                premul_over_in_place(&mut dst.data, &layer)?;
                let outcome = if glyphs {
                    LayerOutcome::Applied
                } else {
                    tracing::warn!(family = %t.font_family, "no font face; center text glyphs skipped");
                    LayerOutcome::Degraded(format!(
                        "no font face for '{}'; badge drawn without glyphs",
                        t.font_family
                    ))
                };
                reports.push(LayerReport::new(LayerKind::CenterText, outcome));
            }
        }

        Ok(reports)
    }

    fn logo_layer(
        &mut self,
        spec: &LogoSpec,
        img: &Arc<LogoImage>,
        bounds: Rect,
        w: u32,
        h: u32,
    ) -> QrResult<Vec<u8>> {
        let target = contain_rect(bounds, img.width, img.height);
        let (tw, th) = (target.width() as u32, target.height() as u32);
        let resized = resize_premul(img, tw, th)?;
        let r = spec.corner_radius_px.max(0.0);
        let pad = pad_rect(target);

        self.raster.draw_layer(w, h, |ctx| {
            let pad_path = if r > 0.0 {
                rounded_rect_path(pad, r + LOGO_PAD_PX)
            } else {
                rect_path(pad)
            };
            fill_solid(ctx, &pad_path, Color::WHITE);

            // Filling the (rounded) logo rect with the image paint clips the logo to it.
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((target.x0, target.y0)));
            ctx.set_paint(image_paint(&resized, tw, th)?);
            let local = Rect::new(0.0, 0.0, f64::from(tw), f64::from(th));
            let clip = if r > 0.0 {
                rounded_rect_path(local, r)
            } else {
                rect_path(local)
            };
            ctx.fill_path(&crate::render::raster::bezpath_to_cpu(&clip));
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            Ok(())
        })
    }
}

/// Resample premultiplied logo pixels to `w x h`.
fn resize_premul(img: &LogoImage, w: u32, h: u32) -> QrResult<Vec<u8>> {
    if img.width == w && img.height == h {
        return Ok(img.rgba8_premul.as_ref().clone());
    }
    let src = image::RgbaImage::from_raw(img.width, img.height, img.rgba8_premul.as_ref().clone())
        .ok_or_else(|| QrError::validation("logo pixel buffer does not match its dimensions"))?;
    let out = image::imageops::resize(&src, w.max(1), h.max(1), image::imageops::FilterType::Triangle);
    Ok(out.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
