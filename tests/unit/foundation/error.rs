use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        QrError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(QrError::encoding("x").to_string().contains("encoding error:"));
    assert!(
        QrError::asset_load("x")
            .to_string()
            .contains("asset load error:")
    );
    assert!(QrError::export("x").to_string().contains("export error:"));
    assert!(
        QrError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = QrError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
