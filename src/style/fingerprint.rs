use crate::foundation::core::Color;
use crate::style::spec::{
    CenterTextSpec, FrameStyle, GradientDirection, GradientKind, LogoSpec, StyleSpec,
};
use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x51c0_de0d_ec0a_a7e5;

/// Stable 128-bit digest of a (content, style) request or of a pixel buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Fingerprint everything that influences the final pixels of a render.
pub fn fingerprint_request(content: &str, style: &StyleSpec) -> Fingerprint {
    let mut h = StableHasher::new();
    h.write_u8(b'R');
    h.write_str(content);
    write_style(&mut h, style);
    h.finish()
}

/// Fingerprint raw pixel bytes together with their dimensions.
pub fn fingerprint_pixels(width: u32, height: u32, data: &[u8]) -> Fingerprint {
    let mut h = StableHasher::new();
    h.write_u8(b'P');
    h.write_u32(width);
    h.write_u32(height);
    h.write_bytes(data);
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f32(&mut self, v: f32) {
        self.write_u32(v.to_bits());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    fn write_color(&mut self, c: Color) {
        self.write_bytes(&[c.r, c.g, c.b, c.a]);
    }

    fn finish(self) -> Fingerprint {
        let v = self.inner.digest128();
        Fingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_style(h: &mut StableHasher, s: &StyleSpec) {
    h.write_u32(s.size);
    h.write_u32(s.margin);
    h.write_u8(s.error_correction_level.ordinal());
    write_decorations(h, s);
}

fn write_decorations(h: &mut StableHasher, s: &StyleSpec) {
    h.write_color(s.foreground_color);
    h.write_color(s.background_color);

    h.write_u8(match s.gradient.kind {
        GradientKind::None => 0,
        GradientKind::Linear => 1,
        GradientKind::Radial => 2,
    });
    if s.gradient.kind != GradientKind::None {
        h.write_u8(match s.gradient.direction {
            GradientDirection::LeftToRight => 0,
            GradientDirection::TopToBottom => 1,
            GradientDirection::BottomLeftToTopRight => 2,
            GradientDirection::TopLeftToBottomRight => 3,
        });
        h.write_color(s.gradient.secondary_color);
    }

    write_frame(h, s.frame_style);
    if s.frame_style.uses_label() {
        h.write_str(s.frame_label_text());
    }

    match &s.logo {
        Some(logo) => {
            h.write_u8(1);
            write_logo(h, logo);
        }
        None => h.write_u8(0),
    }

    match s.effective_center_text() {
        Some(t) => {
            h.write_u8(1);
            write_center_text(h, t);
        }
        None => h.write_u8(0),
    }
}

fn write_frame(h: &mut StableHasher, f: FrameStyle) {
    let tag = FrameStyle::ALL
        .iter()
        .position(|x| *x == f)
        .unwrap_or_default();
    h.write_u8(tag as u8);
}

fn write_logo(h: &mut StableHasher, logo: &LogoSpec) {
    h.write_str(&logo.image_source);
    h.write_u32(logo.size_percent);
    h.write_f64(logo.corner_radius_px);
}

fn write_center_text(h: &mut StableHasher, t: &CenterTextSpec) {
    h.write_str(&t.text);
    h.write_str(&t.font_family);
    h.write_f32(t.font_size_px);
    h.write_bool(t.bold);
    h.write_color(t.text_color);
    h.write_color(t.background_color);
}

#[cfg(test)]
#[path = "../../tests/unit/style/fingerprint.rs"]
mod tests;
