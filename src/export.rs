//! Export of final composites
//!
//! The export surface sits outside the compositing contract proper: it takes
//! a final composite payload and writes it to disk under the
//! `daily-snap-<frame-id>-<timestamp>.png` naming pattern (or an explicit
//! path), honoring the configured output format.

use crate::{
    config::OutputFormat,
    error::Result,
    payload::ImagePayload,
};
use chrono::{DateTime, Utc};
use log::info;
use std::path::{Path, PathBuf};

/// File name for an exported composite.
#[must_use]
pub fn export_file_name(frame_id: &str, format: OutputFormat, at: DateTime<Utc>) -> String {
    format!(
        "daily-snap-{}-{}.{}",
        frame_id,
        at.timestamp_millis(),
        format.extension()
    )
}

/// Export a composite into `dir` under the standard naming pattern.
///
/// # Errors
/// - Malformed composite payload
/// - Encoding or filesystem failure
pub fn export_composite(
    composite: &ImagePayload,
    frame_id: &str,
    dir: &Path,
    format: OutputFormat,
    jpeg_quality: u8,
) -> Result<PathBuf> {
    let path = dir.join(export_file_name(frame_id, format, Utc::now()));
    save_composite(composite, &path, format, jpeg_quality)?;
    Ok(path)
}

/// Save a composite payload to an explicit path.
///
/// # Errors
/// - Malformed composite payload
/// - Encoding or filesystem failure
pub fn save_composite(
    composite: &ImagePayload,
    path: &Path,
    format: OutputFormat,
    jpeg_quality: u8,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let image = composite.decode()?;
    match format {
        OutputFormat::Png => {
            image.save_with_format(path, image::ImageFormat::Png)?;
        },
        OutputFormat::Jpeg => {
            // JPEG carries no alpha; flatten to RGB first.
            let rgb_image = image.to_rgb8();
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                std::fs::File::create(path)?,
                jpeg_quality,
            );
            encoder.encode_image(&rgb_image)?;
        },
    }

    info!("exported composite to {}", path.display());
    Ok(())
}
