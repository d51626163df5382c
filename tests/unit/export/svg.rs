use super::*;
use crate::foundation::core::Rgba8Premul;
use crate::style::spec::{FrameStyle, GradientSpec};

fn base() -> BaseMatrix {
    // Row 0: dark dark light; row 1: light dark light; row 2: all light.
    let sym = [true, true, false, false, true, false, false, false, false];
    BaseMatrix::from_symbol(&sym, 3, 90, 0).unwrap()
}

fn render(svg: &[u8]) -> resvg::tiny_skia::Pixmap {
    let tree = usvg::Tree::from_data(svg, &usvg::Options::default()).unwrap();
    let size = tree.size();
    let mut pixmap =
        resvg::tiny_skia::Pixmap::new(size.width() as u32, size.height() as u32).unwrap();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap.as_mut());
    pixmap
}

fn px(p: &resvg::tiny_skia::Pixmap, x: u32, y: u32) -> [u8; 4] {
    let c = p.pixel(x, y).unwrap();
    [c.red(), c.green(), c.blue(), c.alpha()]
}

#[test]
fn module_runs_are_merged_per_row() {
    assert_eq!(module_path_data(&base()), "M0,0h60v30h-60zM30,30h30v30h-30z");
}

#[test]
fn flat_svg_renders_like_the_raster() {
    let style = StyleSpec::default();
    let svg = encode_svg(&base(), &style, None).unwrap();
    let text = String::from_utf8(svg.clone()).unwrap();
    assert!(text.contains("<path"));
    assert!(!text.contains("<image"));
    assert!(!text.to_ascii_lowercase().contains("placeholder"));

    let p = render(&svg);
    assert_eq!(px(&p, 10, 10), [0, 0, 0, 255]);
    assert_eq!(px(&p, 45, 45), [0, 0, 0, 255]);
    assert_eq!(px(&p, 75, 15), [255, 255, 255, 255]);
}

#[test]
fn gradient_is_expressed_in_svg() {
    let style = StyleSpec::default()
        .with_colors(Color::rgb(255, 0, 0), Color::WHITE)
        .with_gradient(GradientSpec::linear(
            GradientDirection::LeftToRight,
            Color::rgb(0, 0, 255),
        ));
    let svg = encode_svg(&base(), &style, None).unwrap();
    let text = String::from_utf8(svg.clone()).unwrap();
    assert!(text.contains("<linearGradient"));
    assert!(text.contains("url(#qr-fill)"));

    let p = render(&svg);
    let left = px(&p, 2, 10);
    let right = px(&p, 58, 10);
    assert!(left[0] > right[0]);
    assert!(left[2] < right[2]);
}

#[test]
fn overlay_is_embedded_as_png_on_top() {
    let mut overlay = Bitmap::new_transparent(90, 90);
    let green = Rgba8Premul::from_straight_rgba(0, 255, 0, 255).to_array();
    for y in 40..50u32 {
        for x in 40..50u32 {
            let i = ((y * 90 + x) * 4) as usize;
            overlay.data[i..i + 4].copy_from_slice(&green);
        }
    }
    let svg = encode_svg(&base(), &StyleSpec::default(), Some(&overlay)).unwrap();
    let text = String::from_utf8(svg.clone()).unwrap();
    assert!(text.contains("data:image/png;base64,"));

    let p = render(&svg);
    let mid = px(&p, 45, 45);
    assert!(mid[1] > 245 && mid[0] < 10 && mid[3] == 255, "{mid:?}");
    assert_eq!(px(&p, 10, 10), [0, 0, 0, 255]);
}

#[test]
fn labeled_frame_canvas_offsets_the_modules() {
    let style = StyleSpec::default().with_frame(FrameStyle::Branded);
    let layout = FrameLayout::new(FrameStyle::Branded, 90);
    let svg = encode_svg(&base(), &style, None).unwrap();
    let text = String::from_utf8(svg.clone()).unwrap();
    assert!(text.contains(&format!(
        r#"width="{}" height="{}""#,
        layout.canvas_width, layout.canvas_height
    )));
    assert!(text.contains(&format!(
        r#"transform="translate({} {})""#,
        layout.code_x, layout.code_y
    )));

    let p = render(&svg);
    assert_eq!(p.width(), layout.canvas_width);
    assert_eq!(px(&p, layout.code_x + 10, layout.code_y + 10), [0, 0, 0, 255]);
    assert_eq!(
        px(&p, layout.code_x + 75, layout.code_y + 15),
        [255, 255, 255, 255]
    );
}

#[test]
fn translucent_colors_carry_opacity() {
    assert_eq!(
        paint_attrs("fill", Color::rgba(255, 0, 0, 128)),
        r##" fill="#ff0000" fill-opacity="0.502""##
    );
    assert_eq!(paint_attrs("stop-color", Color::BLACK), r##" stop-color="#000000""##);
    assert_eq!(num(1.0 / 3.0), "0.333");
    assert_eq!(num(30.0), "30");
}
