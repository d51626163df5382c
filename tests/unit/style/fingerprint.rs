use super::*;
use crate::style::spec::GradientSpec;

#[test]
fn request_fingerprint_is_stable_for_equal_inputs() {
    let s = StyleSpec::default().with_frame(FrameStyle::Simple);
    assert_eq!(
        fingerprint_request("abc", &s),
        fingerprint_request("abc", &s.clone())
    );
}

#[test]
fn request_fingerprint_tracks_content_and_decorations() {
    let s = StyleSpec::default();
    let a = fingerprint_request("abc", &s);
    assert_ne!(a, fingerprint_request("abd", &s));
    assert_ne!(
        a,
        fingerprint_request("abc", &s.clone().with_frame(FrameStyle::Rounded))
    );
    assert_ne!(
        a,
        fingerprint_request(
            "abc",
            &s.clone()
                .with_gradient(GradientSpec::radial(Color::rgb(1, 2, 3)))
        )
    );
}

#[test]
fn unused_gradient_fields_do_not_change_fingerprint() {
    let a = StyleSpec::default();
    let mut b = StyleSpec::default();
    b.gradient.secondary_color = Color::rgb(9, 9, 9);
    b.gradient.direction = GradientDirection::TopToBottom;
    assert_eq!(fingerprint_request("x", &a), fingerprint_request("x", &b));
}

#[test]
fn request_fingerprint_tracks_matrix_inputs() {
    let a = StyleSpec::default();
    let b = StyleSpec::default().with_size(512).with_margin(1);
    assert_ne!(fingerprint_request("x", &a), fingerprint_request("x", &b));
}

#[test]
fn pixel_fingerprint_includes_dimensions() {
    let data = vec![0u8; 16];
    assert_ne!(
        fingerprint_pixels(2, 2, &data),
        fingerprint_pixels(4, 1, &data)
    );
    assert_eq!(fingerprint_pixels(2, 2, &data).to_string().len(), 32);
}
