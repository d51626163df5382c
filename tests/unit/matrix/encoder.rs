use super::*;

#[test]
fn symbol_is_scaled_to_requested_size_with_quiet_zone() {
    // 2x2 symbol with a single dark module at the top-left, 1-module margin => 4 modules.
    let symbol = [true, false, false, false];
    let m = BaseMatrix::from_symbol(&symbol, 2, 8, 1).unwrap();
    assert_eq!(m.size(), 8);
    assert_eq!(m.modules_per_side(), 4);
    assert!(!m.module(0, 0));
    assert!(m.module(1, 1));
    assert!(!m.module(2, 1));

    // Each module is 2x2 pixels.
    assert!(!m.is_dark(1, 1));
    assert!(m.is_dark(2, 2));
    assert!(m.is_dark(3, 3));
    assert!(!m.is_dark(4, 3));
    assert_eq!(m.dark_pixel_count(), 4);
    assert!(!m.is_dark(100, 100));
}

#[test]
fn rejects_size_smaller_than_module_count() {
    let symbol = vec![false; 21 * 21];
    let err = BaseMatrix::from_symbol(&symbol, 21, 20, 4).unwrap_err();
    assert!(matches!(err, QrError::Encoding(_)));
}

#[test]
fn qrcodegen_encodes_example_url() {
    let m = QrcodegenEncoder::new()
        .encode_matrix("https://example.com", 300, 4, EccLevel::Medium)
        .unwrap();
    assert_eq!(m.size(), 300);
    assert_eq!(m.mask().len(), 300 * 300);
    // Quiet zone corner is light; the top-left finder pattern starts dark right after it.
    assert!(!m.is_dark(0, 0));
    let first = m.modules_per_side();
    assert!(first >= 21 + 8);
    assert!(m.module(4, 4));
    assert!(m.dark_pixel_count() > 0);
}

#[test]
fn qrcodegen_rejects_empty_and_oversized_content() {
    let enc = QrcodegenEncoder::new();
    assert!(matches!(
        enc.encode_matrix("", 300, 4, EccLevel::Medium),
        Err(QrError::Encoding(_))
    ));

    let huge = "x".repeat(5000);
    assert!(matches!(
        enc.encode_matrix(&huge, 300, 4, EccLevel::High),
        Err(QrError::Encoding(_))
    ));
}

#[test]
fn qrcodegen_is_deterministic() {
    let enc = QrcodegenEncoder::new();
    let a = enc
        .encode_matrix("hello", 128, 2, EccLevel::Low)
        .unwrap();
    let b = enc
        .encode_matrix("hello", 128, 2, EccLevel::Low)
        .unwrap();
    assert_eq!(a, b);
}
