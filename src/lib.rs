#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]

//! # Dailysnap Photobooth Compositing Library
//!
//! A photobooth compositing pipeline: remove the background from a subject
//! photo via a remote image API, composite the cutout onto a decorative
//! frame's background layer at frame-specific scale and position, and layer
//! an optional frame foreground on top.
//!
//! Three pure, independent async operations compose into the pipeline:
//!
//! - **Background removal**: delegates to a remote service
//!   ([`removal::ClipdropClient`]); the local responsibility is encoding
//!   conversion only.
//! - **Background merge**: draws the frame background at native resolution
//!   and the cutout on top, scaled and positioned per the frame's
//!   [`Placement`] constants ([`Compositor::merge_with_background`]).
//! - **Foreground overlay**: stretches the frame foreground to the base
//!   image's dimensions and draws it on top
//!   ([`Compositor::overlay_foreground`]).
//!
//! All images cross stage boundaries as data-URI payloads
//! ([`ImagePayload`]). A [`PhotoSession`] drives the pipeline, caches the
//! cutout, and re-renders frame switches without re-invoking removal.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dailysnap::{print_photo_from_bytes, BoothConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = BoothConfig::builder()
//!     .api_key("sk-...")
//!     .assets_root("assets")
//!     .build()?;
//!
//! let photo = std::fs::read("capture.jpg")?;
//! let composite = print_photo_from_bytes(&photo, "vogue", &config).await?;
//! dailysnap::save_composite(
//!     &composite,
//!     std::path::Path::new("edition.png"),
//!     config.output_format,
//!     config.jpeg_quality,
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Frame switching
//!
//! ```rust,no_run
//! use dailysnap::{BoothConfig, ImagePayload, PhotoSession};
//!
//! # async fn example(photo: ImagePayload) -> anyhow::Result<()> {
//! let config = BoothConfig::builder().api_key("sk-...").build()?;
//! let mut session = PhotoSession::from_config(&config)?;
//!
//! // Removal runs once; the cutout is cached.
//! session.print(&photo, "queva").await?;
//!
//! // Re-renders against the cached cutout, bypassing removal.
//! let on_vogue = session.switch_frame("vogue").await?;
//! # let _ = on_vogue;
//! # Ok(())
//! # }
//! ```
//!
//! ## Library vs CLI Usage
//!
//! All pipeline functionality is available by default; enable the `cli`
//! feature for the command-line interface and tracing subscriber setup.

pub mod assets;
#[cfg(feature = "cli")]
pub mod cli;
pub mod compose;
pub mod config;
pub mod error;
pub mod export;
pub mod frame;
pub mod payload;
pub mod removal;
pub mod session;
#[cfg(feature = "cli")]
pub mod tracing_config;

// Public API exports
pub use assets::AssetStore;
pub use compose::{placement_rect, Compositor, PlacementRect};
pub use config::{BoothConfig, BoothConfigBuilder, OutputFormat};
pub use error::{AssetRole, BoothError, Result};
pub use export::{export_composite, export_file_name, save_composite};
pub use frame::{FrameCatalog, FrameDescriptor, Placement};
pub use payload::ImagePayload;
pub use removal::{BackgroundRemovalService, ClipdropClient, DEFAULT_ENDPOINT};
pub use session::{PhotoSession, PipelineState, PipelineTimings};

#[cfg(feature = "cli")]
pub use tracing_config::{init_cli_tracing, spans, TracingConfig, TracingFormat};

/// Run the full pipeline once for a subject photo payload.
///
/// Creates a one-shot session from `config`; use [`PhotoSession`] directly
/// when the cutout should be reused across frame switches.
///
/// # Errors
/// - Any configuration, removal, load, or render failure
pub async fn print_photo(
    photo: &ImagePayload,
    frame_id: &str,
    config: &BoothConfig,
) -> Result<ImagePayload> {
    let mut session = PhotoSession::from_config(config)?;
    session.print(photo, frame_id).await
}

/// Run the full pipeline once for raw encoded photo bytes.
///
/// Accepts any image format the pipeline can decode (JPEG, PNG, WebP, ...);
/// suitable for web uploads and memory-based processing.
///
/// # Errors
/// - Unrecognized image bytes
/// - Any configuration, removal, load, or render failure
pub async fn print_photo_from_bytes(
    photo_bytes: &[u8],
    frame_id: &str,
    config: &BoothConfig,
) -> Result<ImagePayload> {
    let photo = ImagePayload::from_encoded_bytes(photo_bytes)?;
    print_photo(&photo, frame_id, config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_compiles() {
        // Basic compilation test to ensure API is well-formed
        let _config = BoothConfig::default();
        let _catalog = FrameCatalog::builtin();
    }
}
