use super::*;
use crate::foundation::core::Rect;
use crate::render::geometry::rect_path;

fn px(buf: &[u8], w: u32, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * w + x) * 4) as usize;
    [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
}

#[test]
fn solid_fill_covers_only_the_path() {
    let mut r = Rasterizer::new();
    let out = r
        .draw_layer(16, 16, |ctx| {
            fill_solid(ctx, &rect_path(Rect::new(4.0, 4.0, 12.0, 12.0)), Color::rgb(255, 0, 0));
            Ok(())
        })
        .unwrap();
    assert_eq!(out.len(), 16 * 16 * 4);
    assert_eq!(px(&out, 16, 8, 8), [255, 0, 0, 255]);
    assert_eq!(px(&out, 16, 1, 1), [0, 0, 0, 0]);
}

#[test]
fn context_is_reset_between_layers() {
    let mut r = Rasterizer::new();
    r.draw_layer(8, 8, |ctx| {
        fill_solid(ctx, &rect_path(Rect::new(0.0, 0.0, 8.0, 8.0)), Color::BLACK);
        Ok(())
    })
    .unwrap();
    let second = r.draw_layer(8, 8, |_| Ok(())).unwrap();
    assert!(second.iter().all(|&b| b == 0));
}

#[test]
fn stroke_outline_straddles_the_path() {
    let mut r = Rasterizer::new();
    let out = r
        .draw_layer(20, 20, |ctx| {
            stroke_solid(ctx, &rect_path(Rect::new(5.0, 5.0, 15.0, 15.0)), 2.0, Color::BLACK);
            Ok(())
        })
        .unwrap();
    assert_eq!(px(&out, 20, 5, 10)[3], 255);
    assert_eq!(px(&out, 20, 10, 10)[3], 0);
    assert_eq!(px(&out, 20, 1, 1)[3], 0);
}

#[test]
fn image_paint_round_trips_pixels() {
    let src = vec![10u8, 20, 30, 255, 0, 0, 0, 0, 1, 2, 3, 4, 128, 0, 0, 128];
    let mut r = Rasterizer::new();
    let out = r
        .draw_layer(2, 2, |ctx| {
            ctx.set_paint(image_paint(&src, 2, 2)?);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, 2.0, 2.0));
            Ok(())
        })
        .unwrap();
    let a = px(&out, 2, 0, 0);
    assert!(a[3] >= 250, "{a:?}");
    assert!(a[0].abs_diff(10) <= 2 && a[2].abs_diff(30) <= 2, "{a:?}");
    assert!(px(&out, 2, 1, 0)[3] <= 5);
}

#[test]
fn oversized_layers_are_rejected() {
    let mut r = Rasterizer::new();
    assert!(r.draw_layer(70_000, 1, |_| Ok(())).is_err());
    assert!(pixmap_from_premul_bytes(&[0; 3], 1, 1).is_err());
}
