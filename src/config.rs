//! Configuration types for the photobooth pipeline

use crate::{
    error::{BoothError, Result},
    removal::DEFAULT_ENDPOINT,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output image format for exported composites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// PNG with alpha channel transparency
    Png,
    /// JPEG (no transparency, alpha dropped)
    Jpeg,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Png
    }
}

impl OutputFormat {
    /// File extension for the format (without the dot).
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Png => write!(f, "png"),
            Self::Jpeg => write!(f, "jpeg"),
        }
    }
}

/// Configuration for a photobooth session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoothConfig {
    /// Remote background-removal endpoint
    pub endpoint: String,

    /// API credential for the removal service (None when removal is driven
    /// through a substitute service or skipped entirely)
    pub api_key: Option<String>,

    /// Directory frame layer paths resolve against
    pub assets_root: PathBuf,

    /// Frame selected when a session starts
    pub default_frame: String,

    /// Export format
    pub output_format: OutputFormat,

    /// JPEG quality (0-100, only used for JPEG output)
    pub jpeg_quality: u8,
}

impl Default for BoothConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            assets_root: PathBuf::from("."),
            default_frame: "queva".to_string(),
            output_format: OutputFormat::default(),
            jpeg_quality: 90,
        }
    }
}

impl BoothConfig {
    /// Create a new configuration builder for fluent construction.
    #[must_use]
    pub fn builder() -> BoothConfigBuilder {
        BoothConfigBuilder::default()
    }

    /// Validate all configuration parameters.
    ///
    /// # Errors
    /// - Invalid JPEG quality value (must be 0-100)
    /// - Empty endpoint or default frame identifier
    pub fn validate(&self) -> Result<()> {
        if self.jpeg_quality > 100 {
            return Err(BoothError::config_value_error(
                "JPEG quality",
                self.jpeg_quality,
                "0-100",
                Some(90),
            ));
        }

        if self.endpoint.is_empty() {
            return Err(BoothError::invalid_config(
                "removal endpoint must not be empty",
            ));
        }

        if self.default_frame.is_empty() {
            return Err(BoothError::invalid_config(
                "default frame identifier must not be empty",
            ));
        }

        Ok(())
    }
}

/// Builder for `BoothConfig`
#[derive(Debug, Default)]
pub struct BoothConfigBuilder {
    config: BoothConfig,
}

impl BoothConfigBuilder {
    /// Set the remote removal endpoint.
    #[must_use]
    pub fn endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Set the removal API credential.
    #[must_use]
    pub fn api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.config.api_key = Some(api_key.into());
        self
    }

    /// Set the assets root directory.
    #[must_use]
    pub fn assets_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.config.assets_root = root.into();
        self
    }

    /// Set the frame selected when a session starts.
    #[must_use]
    pub fn default_frame<S: Into<String>>(mut self, frame_id: S) -> Self {
        self.config.default_frame = frame_id.into();
        self
    }

    /// Set the export format.
    #[must_use]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// Set JPEG quality, clamped to 100.
    #[must_use]
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.min(100);
        self
    }

    /// Validate and produce the configuration.
    ///
    /// # Errors
    /// - Any validation failure from [`BoothConfig::validate`]
    pub fn build(self) -> Result<BoothConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
