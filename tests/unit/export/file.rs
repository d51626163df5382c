use std::sync::Arc;

use super::*;
use crate::matrix::encoder::BaseMatrix;
use crate::render::compositor::Compositor;
use crate::style::spec::StyleSpec;

fn artifact() -> RenderedArtifact {
    let sym = [true, false, false, true];
    let base = Arc::new(BaseMatrix::from_symbol(&sym, 2, 80, 1).unwrap());
    let style = StyleSpec::default().with_size(80).with_margin(1);
    let bitmap = Compositor::base_bitmap(&base, &style).unwrap();
    RenderedArtifact::base_only(bitmap, "x", &style, base)
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("qrdecor-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn format_parsing_accepts_jpeg_alias() {
    assert_eq!("PNG".parse::<ExportFormat>().unwrap(), ExportFormat::Png);
    assert_eq!("jpeg".parse::<ExportFormat>().unwrap(), ExportFormat::Jpg);
    assert_eq!("svg".parse::<ExportFormat>().unwrap(), ExportFormat::Svg);
    assert!(matches!(
        "gif".parse::<ExportFormat>(),
        Err(QrError::Validation(_))
    ));
    assert_eq!(ExportFormat::Jpg.mime_type(), "image/jpeg");
}

#[test]
fn file_names_follow_the_convention() {
    assert_eq!(
        export_file_name(ExportFormat::Svg, 1_700_000_000_123),
        "qr-code-1700000000123.svg"
    );
}

#[test]
fn encode_dispatches_per_format() {
    let a = artifact();
    let png = encode(&a, ExportFormat::Png).unwrap();
    assert_eq!(&png.bytes[..4], &[0x89, b'P', b'N', b'G']);
    assert!(png.file_name.starts_with("qr-code-") && png.file_name.ends_with(".png"));

    let jpg = encode(&a, ExportFormat::Jpg).unwrap();
    assert_eq!(&jpg.bytes[..2], &[0xff, 0xd8]);
    assert!(jpg.file_name.ends_with(".jpg"));

    let svg = encode(&a, ExportFormat::Svg).unwrap();
    let text = String::from_utf8(svg.bytes).unwrap();
    assert!(text.starts_with("<?xml"));
    assert!(text.contains("<path"));
}

#[test]
fn save_creates_dir_and_never_overwrites() {
    let dir = scratch_dir("save");
    let file = ExportedFile {
        format: ExportFormat::Png,
        file_name: "qr-code-1.png".to_string(),
        bytes: vec![1, 2, 3],
    };
    let first = file.save_to(&dir).unwrap();
    let second = file.save_to(&dir).unwrap();
    assert_eq!(first.file_name().unwrap(), "qr-code-1.png");
    assert_eq!(second.file_name().unwrap(), "qr-code-1-1.png");
    assert_eq!(std::fs::read(&second).unwrap(), vec![1, 2, 3]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn save_failure_is_an_export_error() {
    let dir = scratch_dir("blocked");
    std::fs::create_dir_all(dir.parent().unwrap()).unwrap();
    std::fs::write(&dir, b"not a directory").unwrap();
    let file = ExportedFile {
        format: ExportFormat::Jpg,
        file_name: "qr-code-2.jpg".to_string(),
        bytes: vec![0],
    };
    let err = file.save_to(&dir).unwrap_err();
    assert!(matches!(err, QrError::Export(_)), "{err:?}");
    let _ = std::fs::remove_file(&dir);
}
