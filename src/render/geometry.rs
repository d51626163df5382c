//! Pixel-space geometry for decoration layers.
//!
//! Every rounded shape in the crate comes from [`rounded_rect_path`], which always emits four
//! quadratic corners.

use crate::foundation::core::{BezPath, Point, Rect};

/// Backing pad around a logo, per side.
pub const LOGO_PAD_PX: f64 = 3.0;
/// Horizontal padding around center badge text.
pub const BADGE_PAD_X_PX: f64 = 5.0;
/// Vertical padding around center badge text.
pub const BADGE_PAD_Y_PX: f64 = 3.0;

/// Closed rounded rectangle: four edges joined by four quadratic corners whose control points
/// sit on the rectangle's corners. `radius` is clamped to `[0, min(w, h) / 2]`.
pub fn rounded_rect_path(rect: Rect, radius: f64) -> BezPath {
    let rect = rect.abs();
    let max_r = (rect.width().min(rect.height()) / 2.0).max(0.0);
    let r = if radius.is_finite() {
        radius.clamp(0.0, max_r)
    } else {
        0.0
    };
    let (x0, y0, x1, y1) = (rect.x0, rect.y0, rect.x1, rect.y1);

    let mut p = BezPath::new();
    p.move_to(Point::new(x0 + r, y0));
    p.line_to(Point::new(x1 - r, y0));
    p.quad_to(Point::new(x1, y0), Point::new(x1, y0 + r));
    p.line_to(Point::new(x1, y1 - r));
    p.quad_to(Point::new(x1, y1), Point::new(x1 - r, y1));
    p.line_to(Point::new(x0 + r, y1));
    p.quad_to(Point::new(x0, y1), Point::new(x0, y1 - r));
    p.line_to(Point::new(x0, y0 + r));
    p.quad_to(Point::new(x0, y0), Point::new(x0 + r, y0));
    p.close_path();
    p
}

/// Closed axis-aligned rectangle path.
pub fn rect_path(rect: Rect) -> BezPath {
    let mut p = BezPath::new();
    p.move_to(Point::new(rect.x0, rect.y0));
    p.line_to(Point::new(rect.x1, rect.y0));
    p.line_to(Point::new(rect.x1, rect.y1));
    p.line_to(Point::new(rect.x0, rect.y1));
    p.close_path();
    p
}

/// `rect` shrunk by `d` on every side.
pub fn inset(rect: Rect, d: f64) -> Rect {
    Rect::new(rect.x0 + d, rect.y0 + d, rect.x1 - d, rect.y1 - d)
}

/// Four open L-shaped polylines hugging the corners of `rect`, each arm `arm` long.
pub fn corner_accents(rect: Rect, arm: f64) -> BezPath {
    let a = arm.clamp(0.0, rect.width().min(rect.height()) / 2.0);
    let (x0, y0, x1, y1) = (rect.x0, rect.y0, rect.x1, rect.y1);

    let mut p = BezPath::new();
    for (corner, dx, dy) in [
        (Point::new(x0, y0), a, a),
        (Point::new(x1, y0), -a, a),
        (Point::new(x1, y1), -a, -a),
        (Point::new(x0, y1), a, -a),
    ] {
        p.move_to(Point::new(corner.x, corner.y + dy));
        p.line_to(corner);
        p.line_to(Point::new(corner.x + dx, corner.y));
    }
    p
}

/// Side length of the logo box: `min(width, height) * percent / 100`, in whole pixels.
pub fn logo_box_side(width: u32, height: u32, percent: u32) -> u32 {
    ((u64::from(width.min(height)) * u64::from(percent)) / 100) as u32
}

/// Logo box centered on the image, snapped to whole pixels.
pub fn logo_rect(width: u32, height: u32, percent: u32) -> Rect {
    let side = logo_box_side(width, height, percent);
    let x0 = (width - side) / 2;
    let y0 = (height - side) / 2;
    Rect::new(
        f64::from(x0),
        f64::from(y0),
        f64::from(x0 + side),
        f64::from(y0 + side),
    )
}

/// Fit a `src_w x src_h` image inside `bounds` preserving aspect ratio, centered and snapped.
pub fn contain_rect(bounds: Rect, src_w: u32, src_h: u32) -> Rect {
    let bw = bounds.width().round().max(1.0);
    let bh = bounds.height().round().max(1.0);
    if src_w == 0 || src_h == 0 {
        return bounds;
    }
    let scale = (bw / f64::from(src_w)).min(bh / f64::from(src_h));
    let w = (f64::from(src_w) * scale).round().clamp(1.0, bw);
    let h = (f64::from(src_h) * scale).round().clamp(1.0, bh);
    let x0 = (bounds.x0 + ((bw - w) / 2.0).floor()).round();
    let y0 = (bounds.y0 + ((bh - h) / 2.0).floor()).round();
    Rect::new(x0, y0, x0 + w, y0 + h)
}

/// White backing pad rectangle for a logo box.
pub fn pad_rect(logo: Rect) -> Rect {
    inset(logo, -LOGO_PAD_PX)
}

/// Badge rectangle for text of the given size, centered on the image.
pub fn badge_rect(width: u32, height: u32, text_w: f64, text_h: f64) -> Rect {
    let bw = text_w.max(0.0) + 2.0 * BADGE_PAD_X_PX;
    let bh = text_h.max(0.0) + 2.0 * BADGE_PAD_Y_PX;
    let cx = f64::from(width) / 2.0;
    let cy = f64::from(height) / 2.0;
    Rect::new(cx - bw / 2.0, cy - bh / 2.0, cx + bw / 2.0, cy + bh / 2.0)
}

#[cfg(test)]
#[path = "../../tests/unit/render/geometry.rs"]
mod tests;
