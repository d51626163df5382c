use super::*;
use kurbo::{PathEl, Shape};

#[test]
fn rounded_rect_has_four_quadratic_corners_and_exact_bounds() {
    let r = Rect::new(10.0, 20.0, 110.0, 70.0);
    let p = rounded_rect_path(r, 15.0);

    let quads = p
        .elements()
        .iter()
        .filter(|el| matches!(el, PathEl::QuadTo(..)))
        .count();
    assert_eq!(quads, 4);
    assert!(matches!(p.elements().last(), Some(PathEl::ClosePath)));

    let bb = p.bounding_box();
    assert!((bb.x0 - r.x0).abs() < 1e-9);
    assert!((bb.y0 - r.y0).abs() < 1e-9);
    assert!((bb.x1 - r.x1).abs() < 1e-9);
    assert!((bb.y1 - r.y1).abs() < 1e-9);
}

#[test]
fn rounded_rect_radius_is_clamped() {
    let r = Rect::new(0.0, 0.0, 20.0, 10.0);
    let p = rounded_rect_path(r, 500.0);
    let PathEl::MoveTo(start) = p.elements()[0] else {
        panic!("path must start with move_to");
    };
    assert_eq!(start, Point::new(5.0, 0.0));
    assert_eq!(p.bounding_box(), r);

    let zero = rounded_rect_path(r, f64::NAN);
    assert_eq!(zero.bounding_box(), r);
}

#[test]
fn logo_box_is_twenty_percent_and_centered() {
    let r = logo_rect(300, 300, 20);
    assert_eq!(r, Rect::new(120.0, 120.0, 180.0, 180.0));
    assert_eq!(pad_rect(r), Rect::new(117.0, 117.0, 183.0, 183.0));

    let odd = logo_rect(301, 301, 20);
    assert_eq!(odd.width(), 60.0);
    assert!((odd.center().x - 150.5).abs() <= 1.0);
}

#[test]
fn contain_keeps_aspect_inside_box() {
    let b = Rect::new(120.0, 120.0, 180.0, 180.0);
    assert_eq!(contain_rect(b, 10, 10), b);
    let wide = contain_rect(b, 200, 100);
    assert_eq!(wide.width(), 60.0);
    assert_eq!(wide.height(), 30.0);
    assert_eq!(wide.y0, 135.0);
}

#[test]
fn badge_adds_fixed_padding_around_text() {
    let r = badge_rect(300, 300, 40.0, 20.0);
    assert_eq!(r.width(), 50.0);
    assert_eq!(r.height(), 26.0);
    assert_eq!(r.center(), Point::new(150.0, 150.0));
}

#[test]
fn corner_accents_are_four_open_ls() {
    let p = corner_accents(Rect::new(0.0, 0.0, 100.0, 100.0), 10.0);
    let moves = p
        .elements()
        .iter()
        .filter(|el| matches!(el, PathEl::MoveTo(_)))
        .count();
    assert_eq!(moves, 4);
    assert!(!p.elements().iter().any(|el| matches!(el, PathEl::ClosePath)));
}
