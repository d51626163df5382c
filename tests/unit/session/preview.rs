use std::io::Cursor;

use base64::Engine as _;

use super::*;
use crate::foundation::error::QrResult;
use crate::matrix::encoder::{BaseMatrix, MatrixEncoder, QrcodegenEncoder};
use crate::render::artifact::ArtifactPhase;
use crate::render::compositor::LayerKind;
use crate::session::engine::EngineOpts;
use crate::style::spec::{EccLevel, FrameStyle, LogoSpec};

const MS: Duration = Duration::from_millis(1);

/// Rejects one specific content string, encodes everything else.
struct RejectContent(&'static str);

impl MatrixEncoder for RejectContent {
    fn encode_matrix(
        &self,
        content: &str,
        size: u32,
        margin: u32,
        ecc: EccLevel,
    ) -> QrResult<BaseMatrix> {
        if content == self.0 {
            return Err(QrError::encoding("content too long for ECC level"));
        }
        QrcodegenEncoder::new().encode_matrix(content, size, margin, ecc)
    }
}

fn engine_opts() -> EngineOpts {
    EngineOpts::default().with_system_fonts(false)
}

fn controller() -> PreviewController {
    PreviewController::new(QrEngine::new(engine_opts()), PreviewOpts::default())
}

fn png_data_uri() -> String {
    let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(buf)
    )
}

/// Tick with the real clock until the controller is idle.
fn settle(c: &mut PreviewController) {
    let give_up = Instant::now() + Duration::from_secs(10);
    while !c.is_idle() {
        assert!(Instant::now() < give_up, "controller never settled: {:?}", c.state());
        if let Some(at) = c.next_deadline() {
            let now = Instant::now();
            if at > now {
                std::thread::sleep(at - now);
            }
        }
        c.tick(Instant::now());
    }
}

fn shown(c: &PreviewController) -> &RenderedArtifact {
    c.displayed_artifact().expect("an artifact is displayed")
}

#[test]
fn nothing_renders_before_the_debounce_elapses() {
    let mut c = controller();
    let t0 = Instant::now();
    assert!(c.update("hello", StyleSpec::default(), t0));
    assert_eq!(c.next_deadline(), Some(t0 + 30 * MS));
    assert!(!c.tick(t0 + 10 * MS));
    assert!(matches!(c.displayed(), Displayed::Nothing));

    assert!(c.tick(t0 + 30 * MS));
    assert!(c.is_idle());
    assert_eq!(shown(&c).phase, ArtifactPhase::Base);
    assert_eq!(c.next_deadline(), None);
}

#[test]
fn edits_restart_the_debounce() {
    let mut c = controller();
    let t0 = Instant::now();
    c.update("a", StyleSpec::default(), t0);
    c.update("ab", StyleSpec::default(), t0 + 20 * MS);
    assert!(!c.tick(t0 + 30 * MS));
    assert!(c.tick(t0 + 50 * MS));
    assert_eq!(shown(&c).content, "ab");
}

#[test]
fn base_is_shown_before_decorations() {
    let mut c = controller();
    let t0 = Instant::now();
    c.update("hello", StyleSpec::default().with_frame(FrameStyle::Simple), t0);

    assert!(c.tick(t0 + 30 * MS));
    assert_eq!(c.state(), PreviewState::Rendering(RenderPhase::Decorations));
    assert_eq!(shown(&c).phase, ArtifactPhase::Base);
    assert_eq!(c.next_deadline(), Some(t0 + 30 * MS));

    assert!(c.tick(t0 + 31 * MS));
    assert!(c.is_idle());
    let a = shown(&c);
    assert_eq!(a.phase, ArtifactPhase::Decorated);
    assert!(a.layer(LayerKind::Frame).unwrap().is_applied());
}

#[test]
fn identical_updates_are_ignored() {
    let mut c = controller();
    let t0 = Instant::now();
    assert!(c.update("same", StyleSpec::default(), t0));
    c.tick(t0 + 30 * MS);
    let g = c.generation();
    assert!(!c.update("same", StyleSpec::default(), t0 + 40 * MS));
    assert_eq!(c.generation(), g);
    assert!(c.is_idle());
}

#[test]
fn newer_edit_supersedes_pending_decorations() {
    let mut c = controller();
    let t0 = Instant::now();
    let style_a = StyleSpec::default().with_frame(FrameStyle::Simple);
    let style_b = StyleSpec::default().with_frame(FrameStyle::Rounded);

    c.update("A", style_a, t0);
    c.tick(t0 + 30 * MS);
    assert_eq!(c.state(), PreviewState::Rendering(RenderPhase::Decorations));

    c.update("B", style_b.clone(), t0 + 31 * MS);
    // A's decoration pass never runs: the controller waits for B's debounce instead.
    assert!(!c.tick(t0 + 32 * MS));
    assert_eq!(shown(&c).content, "A");

    c.tick(t0 + 61 * MS);
    c.tick(t0 + 62 * MS);
    assert!(c.is_idle());
    let a = shown(&c);
    assert_eq!(a.content, "B");
    assert_eq!(a.style, style_b);
    assert_eq!(a.phase, ArtifactPhase::Decorated);
}

#[test]
fn encoding_failure_shows_placeholder_and_recovers() {
    let engine = QrEngine::with_encoder(RejectContent("bad"), engine_opts());
    let mut c = PreviewController::new(engine, PreviewOpts::default());
    let t0 = Instant::now();

    c.update("bad", StyleSpec::default(), t0);
    assert!(c.tick(t0 + 30 * MS));
    assert!(c.is_idle());
    match c.displayed() {
        Displayed::Placeholder { content, error } => {
            assert_eq!(content, "bad");
            assert!(matches!(error, QrError::Encoding(_)));
        }
        other => panic!("expected placeholder, got {other:?}"),
    }

    c.update("good", StyleSpec::default(), t0 + 100 * MS);
    c.tick(t0 + 130 * MS);
    assert_eq!(shown(&c).content, "good");
}

#[test]
fn logo_arrives_after_a_partial_pass() {
    let mut c = controller();
    let style = StyleSpec::default()
        .with_frame(FrameStyle::Simple)
        .with_logo(LogoSpec::new(png_data_uri()));
    let t0 = Instant::now();
    c.update("logo", style, t0);
    c.tick(t0 + 30 * MS);
    c.tick(t0 + 31 * MS);

    // First sight of the logo always starts a background load.
    assert_eq!(c.state(), PreviewState::Rendering(RenderPhase::AwaitingLogo));
    let partial = shown(&c);
    assert!(partial.layer(LayerKind::Frame).unwrap().is_applied());
    assert!(!partial.layer(LayerKind::Logo).unwrap().is_applied());

    settle(&mut c);
    assert!(shown(&c).layer(LayerKind::Logo).unwrap().is_applied());
    assert!(c.drain_notices().is_empty());
}

#[test]
fn missing_logo_records_an_asset_notice() {
    let mut c = controller();
    let style = StyleSpec::default()
        .with_frame(FrameStyle::Classic)
        .with_logo(LogoSpec::new("/no/such/logo.png"));
    c.update("x", style, Instant::now());
    settle(&mut c);

    let a = shown(&c);
    assert!(a.layer(LayerKind::Frame).unwrap().is_applied());
    assert!(!a.layer(LayerKind::Logo).unwrap().is_applied());
    let notices = c.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Asset);
    assert!(c.drain_notices().is_empty());
}

#[test]
fn export_failures_become_notices() {
    let mut c = controller();
    let dir = std::env::temp_dir().join(format!("qrdecor-preview-export-{}", std::process::id()));
    assert!(c.export(ExportFormat::Png, &dir).is_err());
    let notices = c.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Export);

    c.update("save me", StyleSpec::default(), Instant::now());
    settle(&mut c);
    let path = c.export(ExportFormat::Jpg, &dir).unwrap();
    assert!(path.exists());
    assert!(c.is_idle());
    let _ = std::fs::remove_dir_all(&dir);
}
