//! Canvas compositing operations
//!
//! The two drawing operations of the pipeline: merging a subject cutout onto
//! a frame background at a frame-specific scale and position, and overlaying
//! a frame foreground at full-canvas scale. Both are pure transforms: the
//! compositing surface is allocated fresh per call and dropped after use, and
//! no input is mutated.

use crate::{
    assets::AssetStore,
    error::{AssetRole, BoothError, Result},
    frame::Placement,
    payload::ImagePayload,
};
use image::{imageops, DynamicImage};
use log::debug;

/// Computed target rectangle for drawing the subject onto a background.
///
/// `x` may be negative when the scaled subject is wider than the canvas; the
/// draw clips instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementRect {
    /// Left edge of the subject on the canvas
    pub x: i64,
    /// Top edge of the subject on the canvas
    pub y: i64,
    /// Scaled subject width
    pub width: u32,
    /// Scaled subject height
    pub height: u32,
}

/// Compute where the subject lands on the background canvas.
///
/// Target height is `background_height * height_factor`; width follows the
/// subject's native aspect ratio; horizontal placement is centered; the top
/// edge sits at `background_height * y_factor`.
#[must_use]
pub fn placement_rect(
    background: (u32, u32),
    subject: (u32, u32),
    placement: Placement,
) -> PlacementRect {
    let (bg_width, bg_height) = background;
    let (subject_width, subject_height) = subject;

    let target_height = f64::from(bg_height) * placement.height_factor;
    let aspect = f64::from(subject_width) / f64::from(subject_height);
    let target_width = target_height * aspect;

    let x = (f64::from(bg_width) - target_width) / 2.0;
    let y = f64::from(bg_height) * placement.y_factor;

    PlacementRect {
        x: x.round() as i64,
        y: y.round() as i64,
        width: target_width.round().max(1.0) as u32,
        height: target_height.round().max(1.0) as u32,
    }
}

/// Performs the merge and overlay operations against a frame asset store.
#[derive(Debug, Clone)]
pub struct Compositor {
    assets: AssetStore,
}

impl Compositor {
    /// Create a compositor loading frame layers through `assets`.
    #[must_use]
    pub fn new(assets: AssetStore) -> Self {
        Self { assets }
    }

    /// The frame asset store this compositor loads layers through.
    #[must_use]
    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Composite a subject cutout onto a frame background layer.
    ///
    /// The canvas takes the background's native dimensions; the cutout is
    /// scaled and positioned per the frame's placement constants and drawn
    /// on top, preserving its transparency. A subject wider than the canvas
    /// is clipped, never an error.
    ///
    /// # Arguments
    /// * `cutout` - Background-removed subject payload
    /// * `background` - Background layer path, relative to the assets root
    /// * `placement` - The frame's placement constants
    ///
    /// # Errors
    /// - `AssetLoad` (background or subject) when either image cannot be
    ///   loaded, failing independently per asset
    /// - `Render` when the compositing surface cannot be acquired
    pub async fn merge_with_background(
        &self,
        cutout: &ImagePayload,
        background: &str,
        placement: Placement,
    ) -> Result<ImagePayload> {
        let background = self
            .assets
            .load_layer(background, AssetRole::Background)
            .await?;
        let subject = decode_payload(cutout, AssetRole::Subject)?;

        ensure_surface(&background)?;
        if subject.width() == 0 || subject.height() == 0 {
            return Err(BoothError::render("subject image has zero area"));
        }

        let rect = placement_rect(
            (background.width(), background.height()),
            (subject.width(), subject.height()),
            placement,
        );
        debug!(
            "merging subject {}x{} onto {}x{} canvas at ({}, {}) scaled to {}x{}",
            subject.width(),
            subject.height(),
            background.width(),
            background.height(),
            rect.x,
            rect.y,
            rect.width,
            rect.height
        );

        let scaled = subject
            .resize_exact(rect.width, rect.height, imageops::FilterType::Triangle)
            .to_rgba8();

        let mut canvas = background.to_rgba8();
        imageops::overlay(&mut canvas, &scaled, rect.x, rect.y);

        ImagePayload::from_image(&DynamicImage::ImageRgba8(canvas))
    }

    /// Layer a frame foreground over a previously-composited image.
    ///
    /// The foreground is stretched to the base image's dimensions and drawn
    /// directly on top, preserving the foreground's own transparency.
    ///
    /// # Errors
    /// - `AssetLoad` (base or foreground) when either image cannot be
    ///   loaded, failing independently per asset
    /// - `Render` when the compositing surface cannot be acquired
    pub async fn overlay_foreground(
        &self,
        base: &ImagePayload,
        foreground: &str,
    ) -> Result<ImagePayload> {
        let base = decode_payload(base, AssetRole::Base)?;
        let foreground = self
            .assets
            .load_layer(foreground, AssetRole::Foreground)
            .await?;

        ensure_surface(&base)?;
        debug!(
            "overlaying foreground {}x{} stretched over {}x{} base",
            foreground.width(),
            foreground.height(),
            base.width(),
            base.height()
        );

        let stretched = foreground
            .resize_exact(base.width(), base.height(), imageops::FilterType::Triangle)
            .to_rgba8();

        let mut canvas = base.to_rgba8();
        imageops::overlay(&mut canvas, &stretched, 0, 0);

        ImagePayload::from_image(&DynamicImage::ImageRgba8(canvas))
    }
}

/// Decode a pipeline payload, attributing failures to the given asset role.
fn decode_payload(payload: &ImagePayload, role: AssetRole) -> Result<DynamicImage> {
    payload
        .decode()
        .map_err(|e| BoothError::asset_load(role, e.to_string()))
}

/// The canvas takes the base layer's dimensions; a zero-area layer leaves
/// nothing to draw on.
fn ensure_surface(layer: &DynamicImage) -> Result<()> {
    if layer.width() == 0 || layer.height() == 0 {
        return Err(BoothError::render("compositing surface has zero area"));
    }
    Ok(())
}
