//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::{Cli, CliOutputFormat};
use crate::config::{BoothConfig, OutputFormat};
use anyhow::{Context, Result};

/// Environment variable consulted when `--api-key` is absent.
pub(crate) const API_KEY_ENV: &str = "DAILYSNAP_API_KEY";

/// Convert CLI arguments to a `BoothConfig`
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build `BoothConfig` from CLI arguments
    pub(crate) fn from_cli(cli: &Cli) -> Result<BoothConfig> {
        let api_key = cli
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok());

        let output_format = match cli.format {
            CliOutputFormat::Png => OutputFormat::Png,
            CliOutputFormat::Jpeg => OutputFormat::Jpeg,
        };

        let mut builder = BoothConfig::builder()
            .assets_root(cli.assets_dir.clone())
            .default_frame(cli.frame.clone())
            .output_format(output_format)
            .jpeg_quality(cli.jpeg_quality);

        if let Some(endpoint) = &cli.endpoint {
            builder = builder.endpoint(endpoint.clone());
        }
        if let Some(api_key) = api_key {
            builder = builder.api_key(api_key);
        }

        builder.build().context("Invalid configuration")
    }

    /// Validate CLI arguments for consistency
    pub(crate) fn validate_cli(cli: &Cli) -> Result<()> {
        if cli.jpeg_quality > 100 {
            anyhow::bail!(
                "Invalid JPEG quality: {} (valid range: 0-100)",
                cli.jpeg_quality
            );
        }

        if !cli.cutout && cli.api_key.is_none() && std::env::var(API_KEY_ENV).is_err() {
            anyhow::bail!(
                "An API key is required for background removal. \
                 Pass --api-key, set {}, or use --cutout with an already-removed input.",
                API_KEY_ENV
            );
        }

        Ok(())
    }
}
