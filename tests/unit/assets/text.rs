use super::*;

fn req(text: &str, bold: bool) -> TextRequest<'_> {
    TextRequest {
        text,
        font_family: "sans-serif",
        size_px: 20.0,
        bold,
        color: Color::BLACK,
    }
}

#[test]
fn missing_faces_fall_back_to_estimates() {
    let mut shaper = TextShaper::new(FontLibrary::empty());
    let t = shaper.shape(&req("ABCD", false));
    assert!(!t.has_glyphs());
    assert!((t.width - 4.0 * 20.0 * FALLBACK_ADVANCE_EM).abs() < 1e-4);
    assert!((t.height - 24.0).abs() < 1e-4);

    let b = shaper.shape(&req("ABCD", true));
    assert!(b.width > t.width);
}

#[test]
fn estimates_count_characters_not_bytes() {
    let mut shaper = TextShaper::new(FontLibrary::empty());
    let ascii = shaper.shape(&req("ab", false));
    let wide = shaper.shape(&req("éü", false));
    assert_eq!(ascii.width, wide.width);
}

#[test]
fn system_fonts_shape_when_available() {
    let lib = FontLibrary::new(&[], true);
    if lib.face_count() == 0 {
        return;
    }
    let mut shaper = TextShaper::new(lib);
    let t = shaper.shape(&req("SCAN ME", true));
    assert!(t.has_glyphs());
    assert!(t.width > 0.0);
    assert!(t.height > 0.0);
}

#[test]
fn repeated_shaping_copies_the_face_once() {
    let lib = FontLibrary::new(&[], true);
    if lib.face_count() == 0 {
        return;
    }
    let mut shaper = TextShaper::new(lib);
    let first = shaper.shape(&req("AB", false));
    if !first.has_glyphs() {
        return;
    }
    for text in ["CD", "EF", "GH"] {
        assert!(shaper.shape(&req(text, false)).has_glyphs());
    }
    assert_eq!(shaper.face_loads, 1);
    assert_eq!(shaper.registered.len(), 1);
}

#[test]
fn missing_faces_copy_nothing() {
    let mut shaper = TextShaper::new(FontLibrary::empty());
    shaper.shape(&req("AB", false));
    assert_eq!(shaper.face_loads, 0);
}
