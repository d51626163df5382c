use crate::foundation::core::Color;
use crate::style::spec::{GradientDirection, GradientKind, GradientSpec};

/// Gradient parameter in `[0, 1]` at pixel center `(x + 0.5, y + 0.5)`.
///
/// Linear gradients project onto the axis spanning the image in `direction`; radial gradients
/// reach `1` at the distance from the center to a corner.
pub fn gradient_t(kind: GradientKind, direction: GradientDirection, x: u32, y: u32, w: u32, h: u32) -> f32 {
    let (wf, hf) = (w.max(1) as f32, h.max(1) as f32);
    let px = x as f32 + 0.5;
    let py = y as f32 + 0.5;

    let t = match kind {
        GradientKind::None => 0.0,
        GradientKind::Linear => match direction {
            GradientDirection::LeftToRight => px / wf,
            GradientDirection::TopToBottom => py / hf,
            GradientDirection::TopLeftToBottomRight => (px * wf + py * hf) / (wf * wf + hf * hf),
            GradientDirection::BottomLeftToTopRight => {
                (px * wf + (hf - py) * hf) / (wf * wf + hf * hf)
            }
        },
        GradientKind::Radial => {
            let (cx, cy) = (wf / 2.0, hf / 2.0);
            let reach = (cx * cx + cy * cy).sqrt();
            ((px - cx).powi(2) + (py - cy).powi(2)).sqrt() / reach
        }
    };
    t.clamp(0.0, 1.0)
}

/// Full-image premultiplied RGBA8 gradient from `start` (t = 0) to `spec.secondary_color`.
pub fn gradient_image(spec: &GradientSpec, start: Color, w: u32, h: u32) -> Vec<u8> {
    let mut bytes = vec![0u8; crate::foundation::core::byte_len(w, h)];
    for y in 0..h {
        for x in 0..w {
            let t = gradient_t(spec.kind, spec.direction, x, y, w, h);
            let c = start.lerp(spec.secondary_color, t).premul().to_array();
            let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
            bytes[idx..idx + 4].copy_from_slice(&c);
        }
    }
    bytes
}

/// Premultiplied RGBA8 layer holding `color` on dark pixels of `mask` and nothing elsewhere.
pub fn dark_module_layer(mask: &[u8], color: Color) -> Vec<u8> {
    let px = color.premul().to_array();
    let mut out = vec![0u8; mask.len() * 4];
    for (dst, &m) in out.chunks_exact_mut(4).zip(mask) {
        if m != 0 {
            dst.copy_from_slice(&px);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/gradient.rs"]
mod tests;
