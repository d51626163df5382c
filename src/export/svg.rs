//! Vector SVG export.
//!
//! Dark modules become horizontal runs in one `<path>`, filled with the foreground color or an
//! SVG gradient mirroring the raster one. Frame, logo and badge layers stay raster and ride on
//! top as a single embedded PNG, keeping the layer order intact.

use std::fmt::Write as _;

use base64::Engine as _;

use crate::export::raster::encode_png;
use crate::foundation::core::{Bitmap, Color};
use crate::foundation::error::{QrError, QrResult};
use crate::matrix::encoder::BaseMatrix;
use crate::render::frame::FrameLayout;
use crate::style::spec::{GradientDirection, GradientKind, GradientSpec, StyleSpec};

const FILL_ID: &str = "qr-fill";

/// Build the SVG document for a base matrix, its style and the optional decoration overlay.
pub fn encode_svg(base: &BaseMatrix, style: &StyleSpec, overlay: Option<&Bitmap>) -> QrResult<Vec<u8>> {
    let overlay_png = match overlay {
        Some(o) => Some((o.width, o.height, encode_png(o)?)),
        None => None,
    };
    let mut s = String::with_capacity(4096);
    write_document(&mut s, base, style, overlay_png)
        .map_err(|e| QrError::export(format!("svg write failed: {e}")))?;
    Ok(s.into_bytes())
}

fn write_document(
    s: &mut String,
    base: &BaseMatrix,
    style: &StyleSpec,
    overlay_png: Option<(u32, u32, Vec<u8>)>,
) -> std::fmt::Result {
    let size = base.size();
    let layout = FrameLayout::new(style.frame_style, size);
    let (w, h) = (layout.canvas_width, layout.canvas_height);
    writeln!(s, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        s,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    )?;

    if !style.gradient.is_none() {
        writeln!(s, "<defs>")?;
        write_gradient(s, &style.gradient, style.foreground_color, size)?;
        writeln!(s, "</defs>")?;
    }

    writeln!(
        s,
        r#"<rect width="{w}" height="{h}"{}/>"#,
        paint_attrs("fill", style.background_color)
    )?;

    let d = module_path_data(base);
    if !d.is_empty() {
        let fill = if style.gradient.is_none() {
            paint_attrs("fill", style.foreground_color)
        } else {
            format!(r#" fill="url(#{FILL_ID})""#)
        };
        // The gradient is in code space, so it moves with the modules.
        let transform = if layout.is_identity() {
            String::new()
        } else {
            format!(r#" transform="translate({} {})""#, layout.code_x, layout.code_y)
        };
        writeln!(
            s,
            r#"<path shape-rendering="crispEdges"{transform}{fill} d="{d}"/>"#
        )?;
    }

    if let Some((w, h, png)) = overlay_png {
        let b64 = base64::engine::general_purpose::STANDARD.encode(png);
        writeln!(
            s,
            r#"<image x="0" y="0" width="{w}" height="{h}" xlink:href="data:image/png;base64,{b64}"/>"#
        )?;
    }

    writeln!(s, "</svg>")
}

/// Run-length path data for every dark module, in pixel units.
pub fn module_path_data(base: &BaseMatrix) -> String {
    let n = base.modules_per_side();
    let cell = f64::from(base.size()) / f64::from(n.max(1));
    let mut d = String::new();
    for my in 0..n {
        let mut mx = 0;
        while mx < n {
            if !base.module(mx, my) {
                mx += 1;
                continue;
            }
            let start = mx;
            while mx < n && base.module(mx, my) {
                mx += 1;
            }
            let len = f64::from(mx - start) * cell;
            let _ = write!(
                d,
                "M{},{}h{}v{}h-{}z",
                num(f64::from(start) * cell),
                num(f64::from(my) * cell),
                num(len),
                num(cell),
                num(len)
            );
        }
    }
    d
}

fn write_gradient(
    s: &mut String,
    g: &GradientSpec,
    start: Color,
    size: u32,
) -> std::fmt::Result {
    let w = f64::from(size);
    let stops = format!(
        r#"<stop offset="0"{}/><stop offset="1"{}/>"#,
        paint_attrs("stop-color", start),
        paint_attrs("stop-color", g.secondary_color)
    );
    match g.kind {
        GradientKind::None => Ok(()),
        GradientKind::Linear => {
            let (x1, y1, x2, y2) = match g.direction {
                GradientDirection::LeftToRight => (0.0, 0.0, w, 0.0),
                GradientDirection::TopToBottom => (0.0, 0.0, 0.0, w),
                GradientDirection::TopLeftToBottomRight => (0.0, 0.0, w, w),
                GradientDirection::BottomLeftToTopRight => (0.0, w, w, 0.0),
            };
            writeln!(
                s,
                r#"<linearGradient id="{FILL_ID}" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}">{stops}</linearGradient>"#,
                num(x1),
                num(y1),
                num(x2),
                num(y2)
            )
        }
        GradientKind::Radial => {
            let c = w / 2.0;
            let r = (c * c * 2.0).sqrt();
            writeln!(
                s,
                r#"<radialGradient id="{FILL_ID}" gradientUnits="userSpaceOnUse" cx="{}" cy="{}" r="{}">{stops}</radialGradient>"#,
                num(c),
                num(c),
                num(r)
            )
        }
    }
}

/// ` name="#rrggbb"` plus the matching opacity attribute when the color is translucent.
fn paint_attrs(name: &str, c: Color) -> String {
    let hex = format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b);
    if c.is_opaque() {
        return format!(r#" {name}="{hex}""#);
    }
    let opacity_attr = match name {
        "stop-color" => "stop-opacity",
        _ => "fill-opacity",
    };
    format!(
        r#" {name}="{hex}" {opacity_attr}="{}""#,
        num(f64::from(c.a) / 255.0)
    )
}

/// Shortest decimal form with at most three fractional digits.
fn num(v: f64) -> String {
    let r = (v * 1000.0).round() / 1000.0;
    if r.fract() == 0.0 {
        format!("{}", r as i64)
    } else {
        format!("{r}")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/svg.rs"]
mod tests;
