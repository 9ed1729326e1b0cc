//! Error types for photobooth compositing operations

use thiserror::Error;

/// Result type alias for photobooth compositing operations
pub type Result<T> = std::result::Result<T, BoothError>;

/// Which image a load failure refers to.
///
/// Merge loads a background and a subject; overlay loads a base and a
/// foreground. Each load fails independently so callers can tell which asset
/// was at fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetRole {
    /// Frame background layer
    Background,
    /// Background-removed subject cutout
    Subject,
    /// Frame foreground decoration layer
    Foreground,
    /// Previously-composited base image
    Base,
}

impl std::fmt::Display for AssetRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Background => write!(f, "background"),
            Self::Subject => write!(f, "subject"),
            Self::Foreground => write!(f, "foreground"),
            Self::Base => write!(f, "base"),
        }
    }
}

/// Comprehensive error types for photobooth compositing operations
#[derive(Error, Debug)]
pub enum BoothError {
    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding errors outside the per-asset load paths
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// The remote background-removal service answered with a non-success status
    #[error("background-removal service error ({status}): {body}")]
    Service {
        /// HTTP status code returned by the remote service
        status: u16,
        /// Error body returned by the remote service
        body: String,
    },

    /// Transport failure reaching the remote background-removal service
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// An image asset failed to load or decode
    #[error("failed to load {role} image: {detail}")]
    AssetLoad {
        /// Which of the operation's inputs failed
        role: AssetRole,
        /// Load or decode failure details
        detail: String,
    },

    /// The compositing surface could not be acquired
    #[error("render error: {0}")]
    Render(String),

    /// A data-URI image payload was malformed
    #[error("invalid image payload: {0}")]
    Payload(String),

    /// Invalid configuration or parameters
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BoothError {
    /// Create a new service error from a remote status code and error body
    pub fn service<S: Into<String>>(status: u16, body: S) -> Self {
        Self::Service {
            status,
            body: body.into(),
        }
    }

    /// Create a new asset load error for the given role
    pub fn asset_load<S: Into<String>>(role: AssetRole, detail: S) -> Self {
        Self::AssetLoad {
            role,
            detail: detail.into(),
        }
    }

    /// Create a new render error
    pub fn render<S: Into<String>>(msg: S) -> Self {
        Self::Render(msg.into())
    }

    /// Create a new payload error
    pub fn payload<S: Into<String>>(msg: S) -> Self {
        Self::Payload(msg.into())
    }

    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create configuration error with valid ranges
    pub fn config_value_error<T: std::fmt::Display>(
        parameter: &str,
        value: T,
        valid_range: &str,
        recommended: Option<T>,
    ) -> Self {
        let recommendation = match recommended {
            Some(rec) => format!(" Recommended: {}", rec),
            None => String::new(),
        };

        Self::InvalidConfig(format!(
            "Invalid {}: {} (valid range: {}).{}",
            parameter, value, valid_range, recommendation
        ))
    }

    /// True when this error names the given asset role
    #[must_use]
    pub fn is_asset_load(&self, expected: AssetRole) -> bool {
        matches!(self, Self::AssetLoad { role, .. } if *role == expected)
    }

    /// Remote status code, when the error came from the removal service
    #[must_use]
    pub fn service_status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = BoothError::invalid_config("test config error");
        assert!(matches!(err, BoothError::InvalidConfig(_)));

        let err = BoothError::service(402, "credits exhausted");
        assert_eq!(err.service_status(), Some(402));
    }

    #[test]
    fn test_error_display() {
        let err = BoothError::service(400, "image_file missing");
        assert_eq!(
            err.to_string(),
            "background-removal service error (400): image_file missing"
        );

        let err = BoothError::asset_load(AssetRole::Foreground, "no such file");
        assert_eq!(err.to_string(), "failed to load foreground image: no such file");
    }

    #[test]
    fn test_asset_role_matching() {
        let err = BoothError::asset_load(AssetRole::Background, "truncated PNG");
        assert!(err.is_asset_load(AssetRole::Background));
        assert!(!err.is_asset_load(AssetRole::Subject));
        assert_eq!(err.service_status(), None);
    }

    #[test]
    fn test_config_value_error() {
        let err = BoothError::config_value_error("JPEG quality", 150, "0-100", Some(90));
        let text = err.to_string();
        assert!(text.contains("JPEG quality"));
        assert!(text.contains("150"));
        assert!(text.contains("0-100"));
        assert!(text.contains("Recommended: 90"));
    }
}
