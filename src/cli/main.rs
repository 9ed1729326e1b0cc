//! Photobooth CLI tool
//!
//! Command-line interface for the dailysnap compositing pipeline: removes
//! the background from a photo, composites it onto a decorative frame, and
//! exports the final edition.

use super::config::{CliConfigBuilder, API_KEY_ENV};
use crate::{
    assets::AssetStore,
    compose::Compositor,
    error::Result as BoothResult,
    export::{export_composite, save_composite},
    frame::FrameCatalog,
    payload::ImagePayload,
    removal::BackgroundRemovalService,
    session::PhotoSession,
    tracing_config::init_cli_tracing,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

/// Photobooth compositing CLI tool
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "dailysnap")]
pub struct Cli {
    /// Input photo file (use "-" for stdin)
    #[arg(value_name = "INPUT", required_unless_present = "list_frames")]
    pub input: Option<String>,

    /// Output file [default: daily-snap-<frame>-<timestamp> in the export directory]
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Directory for auto-named exports
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub export_dir: PathBuf,

    /// Frame to composite with
    #[arg(short, long, default_value = "queva")]
    pub frame: String,

    /// Directory frame layer paths resolve against
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub assets_dir: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = CliOutputFormat::Png)]
    pub format: CliOutputFormat,

    /// JPEG quality (0-100)
    #[arg(long, default_value_t = 90)]
    pub jpeg_quality: u8,

    /// API key for the background-removal service [default: $DAILYSNAP_API_KEY]
    #[arg(short, long)]
    pub api_key: Option<String>,

    /// Background-removal endpoint override
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Treat the input as an already background-removed cutout (skips the remote call)
    #[arg(long)]
    pub cutout: bool,

    /// List available frames and exit
    #[arg(long)]
    pub list_frames: bool,

    /// Emit --list-frames output as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging (-v: DEBUG, -vv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum CliOutputFormat {
    Png,
    Jpeg,
}

/// Removal stand-in for `--cutout`: the input already has a transparent
/// background, so the removal stage passes it through untouched.
struct PassthroughRemoval;

#[async_trait]
impl BackgroundRemovalService for PassthroughRemoval {
    async fn remove_background(&self, photo: &ImagePayload) -> BoothResult<ImagePayload> {
        Ok(photo.clone())
    }
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_cli_tracing(cli.verbose).context("Failed to initialize tracing")?;

    if cli.list_frames {
        return list_frames(cli.json);
    }

    CliConfigBuilder::validate_cli(&cli).context("Invalid CLI arguments")?;
    let config = CliConfigBuilder::from_cli(&cli).context("Failed to build configuration")?;

    let input = cli.input.as_deref().context("An input photo is required")?;
    let photo = read_photo(input)?;

    info!("Starting photobooth pipeline");
    info!("Input: {}", input);
    info!("Frame: {}, assets root: {}", cli.frame, cli.assets_dir.display());

    let mut session = if cli.cutout {
        PhotoSession::new(
            Box::new(PassthroughRemoval),
            Compositor::new(AssetStore::new(config.assets_root.clone())),
            FrameCatalog::builtin(),
        )
    } else {
        PhotoSession::from_config(&config).with_context(|| {
            format!(
                "Failed to create session (is --api-key or {} set?)",
                API_KEY_ENV
            )
        })?
    };

    let spinner = create_stage_spinner();
    spinner.set_message(if cli.cutout {
        "Compositing edition..."
    } else {
        "Printing edition (removal, merge, overlay)..."
    });

    let composite = match session.print(&photo, &cli.frame).await {
        Ok(composite) => {
            spinner.finish_with_message("✅ Edition printed");
            composite
        },
        Err(e) => {
            spinner.finish_with_message("❌ Pipeline failed");
            return Err(e).context("Pipeline failed");
        },
    };

    let timings = session.timings();
    info!(
        "Stages: removal {}ms, merge {}ms, overlay {}ms (total {}ms)",
        timings.removal_ms, timings.merge_ms, timings.overlay_ms, timings.total_ms
    );

    let written = match &cli.output {
        Some(path) => {
            save_composite(&composite, path, config.output_format, config.jpeg_quality)
                .context("Failed to save composite")?;
            path.clone()
        },
        None => export_composite(
            &composite,
            &cli.frame,
            &cli.export_dir,
            config.output_format,
            config.jpeg_quality,
        )
        .context("Failed to export composite")?,
    };

    println!("📰 {}", written.display());
    Ok(())
}

/// Read the input photo from a file or stdin and wrap it as a payload.
fn read_photo(input: &str) -> Result<ImagePayload> {
    let bytes = if input == "-" {
        let mut buffer = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buffer)
            .context("Failed to read photo from stdin")?;
        buffer
    } else {
        std::fs::read(input).with_context(|| format!("Failed to read photo '{}'", input))?
    };

    ImagePayload::from_encoded_bytes(&bytes)
        .with_context(|| format!("'{}' is not a supported image", input))
}

/// List the built-in frames.
fn list_frames(as_json: bool) -> Result<()> {
    let catalog = FrameCatalog::builtin();

    if as_json {
        println!("{}", serde_json::to_string_pretty(catalog.frames())?);
        return Ok(());
    }

    println!("📦 Available frames:");
    for frame in catalog.frames() {
        let layers = if frame.has_foreground() {
            "background + foreground"
        } else {
            "background only"
        };
        println!(
            "  • {} ({}): {}, height {:.0}%, offset {:.0}%",
            frame.id,
            frame.name,
            layers,
            frame.placement.height_factor * 100.0,
            frame.placement.y_factor * 100.0
        );
    }
    println!("💡 Select one with: dailysnap --frame FRAME input.jpg");
    Ok(())
}

fn create_stage_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
