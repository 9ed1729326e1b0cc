//! Placement and compositing scenario tests
//!
//! Exercises the merge/overlay operations against on-disk fixtures, pinning
//! the numeric placement behavior the frames depend on.

use dailysnap::{placement_rect, AssetStore, Compositor, FrameCatalog, ImagePayload, Placement};
use image::{DynamicImage, Rgba, RgbaImage};
use std::path::Path;
use tempfile::TempDir;

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> DynamicImage {
    let mut img = RgbaImage::new(width, height);
    for pixel in img.pixels_mut() {
        *pixel = Rgba(rgba);
    }
    DynamicImage::ImageRgba8(img)
}

fn write_layer(root: &Path, name: &str, image: &DynamicImage) {
    image.save(root.join(name)).unwrap();
}

fn compositor(dir: &TempDir) -> Compositor {
    Compositor::new(AssetStore::new(dir.path()))
}

fn placement_for(frame_id: &str) -> Placement {
    FrameCatalog::builtin().get(frame_id).unwrap().placement
}

const BLUE: [u8; 4] = [0, 0, 200, 255];
const RED: [u8; 4] = [200, 0, 0, 255];

#[tokio::test]
async fn test_vogue_subject_wider_than_canvas_clips() {
    // Subject 800x1000 on vogue 1200x1800: target 1440x1800 at x = -120.
    // Wider than the canvas; the draw clips and must not fail.
    let dir = TempDir::new().unwrap();
    write_layer(dir.path(), "vogue-bg.png", &solid(1200, 1800, BLUE));

    let cutout = ImagePayload::from_image(&solid(800, 1000, RED)).unwrap();
    let merged = compositor(&dir)
        .merge_with_background(&cutout, "vogue-bg.png", placement_for("vogue"))
        .await
        .unwrap();

    let canvas = merged.decode().unwrap().to_rgba8();
    assert_eq!(canvas.dimensions(), (1200, 1800));

    // Full-height subject: covered at the top and bottom rows, both edges
    // clipped away, so even the canvas corners show subject pixels.
    assert_eq!(canvas.get_pixel(0, 0), &Rgba(RED));
    assert_eq!(canvas.get_pixel(1199, 1799), &Rgba(RED));
}

#[tokio::test]
async fn test_numero_vertical_offset() {
    // numero 1000x1500: y = 1500 * 0.18 = 270.
    let dir = TempDir::new().unwrap();
    write_layer(dir.path(), "numero-bg.png", &solid(1000, 1500, BLUE));

    let cutout = ImagePayload::from_image(&solid(500, 1000, RED)).unwrap();
    let merged = compositor(&dir)
        .merge_with_background(&cutout, "numero-bg.png", placement_for("numero"))
        .await
        .unwrap();

    let canvas = merged.decode().unwrap().to_rgba8();
    // Above the subject's top edge the background shows through; below it
    // the subject covers the canvas center.
    assert_eq!(canvas.get_pixel(500, 200), &Rgba(BLUE));
    assert_eq!(canvas.get_pixel(500, 300), &Rgba(RED));
}

#[tokio::test]
async fn test_merge_preserves_cutout_transparency() {
    let dir = TempDir::new().unwrap();
    write_layer(dir.path(), "bg.png", &solid(200, 300, BLUE));

    // Fully transparent cutout: the background must remain untouched.
    let cutout = ImagePayload::from_image(&solid(100, 150, [255, 255, 255, 0])).unwrap();
    let merged = compositor(&dir)
        .merge_with_background(&cutout, "bg.png", Placement::default())
        .await
        .unwrap();

    let canvas = merged.decode().unwrap().to_rgba8();
    for pixel in canvas.pixels() {
        assert_eq!(pixel, &Rgba(BLUE));
    }
}

#[tokio::test]
async fn test_merge_is_idempotent() {
    // Identical inputs yield pixel-identical output across invocations.
    let dir = TempDir::new().unwrap();
    write_layer(dir.path(), "bg.png", &solid(300, 450, BLUE));

    let cutout = ImagePayload::from_image(&solid(120, 200, RED)).unwrap();
    let comp = compositor(&dir);

    let first = comp
        .merge_with_background(&cutout, "bg.png", Placement::default())
        .await
        .unwrap();
    let second = comp
        .merge_with_background(&cutout, "bg.png", Placement::default())
        .await
        .unwrap();

    assert_eq!(first.as_str(), second.as_str());
}

#[tokio::test]
async fn test_overlay_stretches_foreground_to_base() {
    let dir = TempDir::new().unwrap();
    // Foreground smaller than the base, opaque everywhere.
    write_layer(dir.path(), "fg.png", &solid(10, 10, RED));

    let base = ImagePayload::from_image(&solid(80, 120, BLUE)).unwrap();
    let composite = compositor(&dir)
        .overlay_foreground(&base, "fg.png")
        .await
        .unwrap();

    let canvas = composite.decode().unwrap().to_rgba8();
    assert_eq!(canvas.dimensions(), (80, 120));
    // Stretched to full canvas: every corner is foreground.
    assert_eq!(canvas.get_pixel(0, 0), &Rgba(RED));
    assert_eq!(canvas.get_pixel(79, 119), &Rgba(RED));
}

#[tokio::test]
async fn test_overlay_preserves_foreground_transparency() {
    let dir = TempDir::new().unwrap();
    write_layer(dir.path(), "fg.png", &solid(40, 60, [0, 0, 0, 0]));

    let base = ImagePayload::from_image(&solid(40, 60, BLUE)).unwrap();
    let composite = compositor(&dir)
        .overlay_foreground(&base, "fg.png")
        .await
        .unwrap();

    let canvas = composite.decode().unwrap().to_rgba8();
    for pixel in canvas.pixels() {
        assert_eq!(pixel, &Rgba(BLUE));
    }
}

#[test]
fn test_placement_table_matches_frame_catalog() {
    // The §-by-§ numeric pins: queva/default {0.85, 0.10}, numero
    // {0.85, 0.18}, vogue {1.0, 0.0}.
    let queva = placement_for("queva");
    assert_eq!((queva.height_factor, queva.y_factor), (0.85, 0.10));

    let numero = placement_for("numero");
    assert_eq!((numero.height_factor, numero.y_factor), (0.85, 0.18));

    let vogue = placement_for("vogue");
    assert_eq!((vogue.height_factor, vogue.y_factor), (1.0, 0.0));

    // And the derived rectangle for the canonical vogue scenario.
    let rect = placement_rect((1200, 1800), (800, 1000), vogue);
    assert_eq!((rect.width, rect.height), (1440, 1800));
    assert_eq!((rect.x, rect.y), (-120, 0));
}
