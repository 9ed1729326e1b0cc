//! Integration tests for complete photobooth pipeline workflows
//!
//! These tests verify end-to-end session behavior without the remote
//! service, using mock removal services and on-disk frame fixtures.

use async_trait::async_trait;
use dailysnap::{
    AssetRole, AssetStore, BackgroundRemovalService, BoothError, Compositor, FrameCatalog,
    ImagePayload, PhotoSession, PipelineState, Result,
};
use image::{DynamicImage, Rgba, RgbaImage};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Removal service that returns a fixed cutout and counts invocations.
struct CountingRemoval {
    cutout: ImagePayload,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl BackgroundRemovalService for CountingRemoval {
    async fn remove_background(&self, _photo: &ImagePayload) -> Result<ImagePayload> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.cutout.clone())
    }
}

/// Removal service that always fails like an exhausted API account.
struct FailingRemoval;

#[async_trait]
impl BackgroundRemovalService for FailingRemoval {
    async fn remove_background(&self, _photo: &ImagePayload) -> Result<ImagePayload> {
        Err(BoothError::service(402, "credits exhausted"))
    }
}

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> DynamicImage {
    let mut img = RgbaImage::new(width, height);
    for pixel in img.pixels_mut() {
        *pixel = Rgba(rgba);
    }
    DynamicImage::ImageRgba8(img)
}

fn write_layer(root: &Path, relative: &str, image: &DynamicImage) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    image.save(&path).unwrap();
}

/// Lay down all built-in frame layers under a temporary assets root.
fn builtin_assets() -> TempDir {
    let dir = TempDir::new().unwrap();
    // Opaque backgrounds, semi-transparent foreground.
    write_layer(dir.path(), "frame 01/Queva layer 1.png", &solid(120, 180, [10, 10, 40, 255]));
    write_layer(dir.path(), "frame 01/Queva layer 3.png", &solid(60, 90, [200, 0, 0, 0]));
    write_layer(dir.path(), "frame 02/Numero layer 1.png", &solid(100, 150, [0, 0, 0, 255]));
    write_layer(dir.path(), "frame 03/VOGUE layer 1.png", &solid(120, 180, [255, 255, 255, 255]));
    dir
}

fn subject_cutout() -> ImagePayload {
    ImagePayload::from_image(&solid(40, 50, [0, 255, 0, 255])).unwrap()
}

fn photo() -> ImagePayload {
    ImagePayload::from_image(&solid(40, 50, [90, 90, 90, 255])).unwrap()
}

fn session_with_counter(assets: &TempDir) -> (PhotoSession, Arc<AtomicUsize>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let calls = Arc::new(AtomicUsize::new(0));
    let remover = CountingRemoval {
        cutout: subject_cutout(),
        calls: Arc::clone(&calls),
    };
    let session = PhotoSession::new(
        Box::new(remover),
        Compositor::new(AssetStore::new(assets.path())),
        FrameCatalog::builtin(),
    );
    (session, calls)
}

#[tokio::test]
async fn test_full_print_pipeline() {
    let assets = builtin_assets();
    let (mut session, calls) = session_with_counter(&assets);

    let composite = session.print(&photo(), "queva").await.unwrap();

    assert_eq!(session.state(), PipelineState::Done);
    assert_eq!(session.selected_frame(), Some("queva"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(session.cutout().is_some());
    assert_eq!(session.result().unwrap().as_str(), composite.as_str());

    // Canvas dimensions equal the background's native dimensions.
    let decoded = composite.decode().unwrap();
    assert_eq!((decoded.width(), decoded.height()), (120, 180));
}

#[tokio::test]
async fn test_switch_frame_does_not_reinvoke_removal() {
    let assets = builtin_assets();
    let (mut session, calls) = session_with_counter(&assets);

    session.print(&photo(), "queva").await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    session.switch_frame("numero").await.unwrap();
    session.switch_frame("vogue").await.unwrap();
    session.switch_frame("queva").await.unwrap();

    // The cutout is computed once per subject; frame switches reuse it.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(session.selected_frame(), Some("queva"));
    assert_eq!(session.state(), PipelineState::Done);
}

#[tokio::test]
async fn test_switch_frame_reuses_stable_cutout() {
    let assets = builtin_assets();
    let (mut session, _calls) = session_with_counter(&assets);

    session.print(&photo(), "numero").await.unwrap();
    let cutout_before = session.cutout().unwrap().as_str().to_string();

    session.switch_frame("vogue").await.unwrap();
    assert_eq!(session.cutout().unwrap().as_str(), cutout_before);
}

#[tokio::test]
async fn test_session_matches_direct_operation_sequence() {
    // No hidden state: the session's merge + overlay result equals invoking
    // the two operations directly in sequence against the same cutout.
    let assets = builtin_assets();
    let (mut session, _calls) = session_with_counter(&assets);
    let via_session = session.print(&photo(), "queva").await.unwrap();

    let compositor = Compositor::new(AssetStore::new(assets.path()));
    let frame = FrameCatalog::builtin().get("queva").unwrap().clone();
    let merged = compositor
        .merge_with_background(&subject_cutout(), &frame.background, frame.placement)
        .await
        .unwrap();
    let direct = compositor
        .overlay_foreground(&merged, frame.foreground.as_deref().unwrap())
        .await
        .unwrap();

    assert_eq!(
        via_session.decode().unwrap().to_rgba8(),
        direct.decode().unwrap().to_rgba8()
    );
}

#[tokio::test]
async fn test_frame_without_foreground_skips_overlay() {
    let assets = builtin_assets();
    let (mut session, _calls) = session_with_counter(&assets);

    session.print(&photo(), "numero").await.unwrap();
    let timings = session.timings();
    assert_eq!(timings.overlay_ms, 0);
    assert_eq!(session.state(), PipelineState::Done);
}

#[tokio::test]
async fn test_removal_failure_aborts_pipeline() {
    let assets = builtin_assets();
    let mut session = PhotoSession::new(
        Box::new(FailingRemoval),
        Compositor::new(AssetStore::new(assets.path())),
        FrameCatalog::builtin(),
    );

    let err = session.print(&photo(), "queva").await.unwrap_err();
    assert_eq!(err.service_status(), Some(402));
    assert_eq!(session.state(), PipelineState::Failed);
    assert!(session.cutout().is_none());
    assert!(session.result().is_none());
}

#[tokio::test]
async fn test_failed_switch_clears_previous_result() {
    let assets = builtin_assets();
    let (mut session, _calls) = session_with_counter(&assets);

    session.print(&photo(), "queva").await.unwrap();
    assert!(session.result().is_some());

    // Break one background layer, then switch onto it.
    std::fs::remove_file(assets.path().join("frame 02/Numero layer 1.png")).unwrap();
    let err = session.switch_frame("numero").await.unwrap_err();
    assert!(err.is_asset_load(AssetRole::Background));

    // No stale composite may be displayed as if current.
    assert_eq!(session.state(), PipelineState::Failed);
    assert!(session.result().is_none());

    // The cutout survives; recovery on an intact frame works.
    let recovered = session.switch_frame("vogue").await.unwrap();
    assert_eq!(session.state(), PipelineState::Done);
    assert_eq!(session.result().unwrap().as_str(), recovered.as_str());
}

#[tokio::test]
async fn test_missing_foreground_fails_with_foreground_role() {
    let assets = builtin_assets();
    let (mut session, _calls) = session_with_counter(&assets);

    std::fs::remove_file(assets.path().join("frame 01/Queva layer 3.png")).unwrap();
    let err = session.print(&photo(), "queva").await.unwrap_err();
    assert!(err.is_asset_load(AssetRole::Foreground));
    assert_eq!(session.state(), PipelineState::Failed);
}

#[tokio::test]
async fn test_reset_requires_fresh_removal() {
    let assets = builtin_assets();
    let (mut session, calls) = session_with_counter(&assets);

    session.print(&photo(), "queva").await.unwrap();
    session.reset();
    assert_eq!(session.state(), PipelineState::Idle);

    let err = session.switch_frame("vogue").await.unwrap_err();
    assert!(matches!(err, BoothError::InvalidConfig(_)));

    session.print(&photo(), "vogue").await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
