//! Remote background removal
//!
//! Background removal delegates entirely to a remote image API; the local
//! responsibility is encoding conversion only. The payload is decoded to
//! binary, submitted as a multipart request under a fixed field name with an
//! API-key header, and the binary response is re-encoded back into the
//! pipeline's data-URI payload format.
//!
//! A single attempt, no retry, no timeout: a failure is surfaced to the
//! caller as-is.

use crate::{
    error::{BoothError, Result},
    payload::ImagePayload,
};
use async_trait::async_trait;
use log::debug;
use reqwest::multipart::{Form, Part};

/// Default remote endpoint for background removal.
pub const DEFAULT_ENDPOINT: &str = "https://clipdrop-api.co/remove-background/v1";

/// Multipart field name the remote API expects the binary image under.
const IMAGE_FIELD: &str = "image_file";

/// Header carrying the API credential.
const API_KEY_HEADER: &str = "x-api-key";

/// Seam for the background-removal stage.
///
/// The session drives the pipeline through this trait so the remote service
/// can be substituted; implementations must return a cutout payload with
/// background pixels made transparent and the visible subject unchanged.
#[async_trait]
pub trait BackgroundRemovalService: Send + Sync {
    /// Produce a cutout payload from a subject photo payload.
    ///
    /// # Errors
    /// - `Service` when the remote call returns a non-success status
    /// - `Network` when the remote service cannot be reached
    /// - `Payload` when the input payload is malformed
    async fn remove_background(&self, photo: &ImagePayload) -> Result<ImagePayload>;
}

/// Production removal service backed by the ClipDrop remove-background API.
#[derive(Debug, Clone)]
pub struct ClipdropClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl ClipdropClient {
    /// Create a client against the default endpoint.
    ///
    /// The underlying HTTP client carries no timeout: a stalled remote call
    /// blocks its operation indefinitely, matching the pipeline's
    /// single-attempt contract.
    ///
    /// # Errors
    /// - HTTP client construction failure
    pub fn new<S: Into<String>>(api_key: S) -> Result<Self> {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    /// Create a client against a custom endpoint.
    ///
    /// # Errors
    /// - HTTP client construction failure
    pub fn with_endpoint<S: Into<String>, E: Into<String>>(api_key: S, endpoint: E) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    /// The endpoint this client submits to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl BackgroundRemovalService for ClipdropClient {
    async fn remove_background(&self, photo: &ImagePayload) -> Result<ImagePayload> {
        let bytes = photo.to_bytes()?;
        debug!(
            "submitting {} bytes ({}) to {}",
            bytes.len(),
            photo.media_type(),
            self.endpoint
        );

        let part = Part::bytes(bytes)
            .file_name("capture.png")
            .mime_str(photo.media_type())?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(BoothError::service(status.as_u16(), body));
        }

        let cutout = response.bytes().await?;
        debug!("received {} byte cutout", cutout.len());
        Ok(ImagePayload::from_png_bytes(&cutout))
    }
}
