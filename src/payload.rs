//! Data-URI image payloads exchanged between pipeline stages
//!
//! Every image crossing a stage boundary travels as a `data:` URI string
//! (self-describing, embeddable in markup). This is a boundary convention
//! inherited from the interchange format external consumers expect, not a
//! wire protocol.

use crate::error::{BoothError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Media type every pipeline stage emits. Inputs may carry any decodable
/// media type; outputs are always PNG so transparency survives.
pub const PNG_MEDIA_TYPE: &str = "image/png";

/// An encoded image at some processing stage, stored as a data-URI string.
///
/// Payloads are immutable: each pipeline operation produces a new payload
/// from its inputs and leaves the inputs untouched.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload(String);

impl ImagePayload {
    /// Wrap an existing data-URI string, validating its shape.
    ///
    /// # Errors
    /// - Missing `data:` scheme or base64 marker
    pub fn from_data_uri<S: Into<String>>(uri: S) -> Result<Self> {
        let uri = uri.into();
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| BoothError::payload("missing 'data:' scheme"))?;
        let (media_type, _) = rest
            .split_once(";base64,")
            .ok_or_else(|| BoothError::payload("missing ';base64,' marker"))?;
        if media_type.is_empty() {
            return Err(BoothError::payload("empty media type"));
        }
        Ok(Self(uri))
    }

    /// Build a PNG payload from already-encoded PNG bytes.
    #[must_use]
    pub fn from_png_bytes(bytes: &[u8]) -> Self {
        Self(format!("data:{};base64,{}", PNG_MEDIA_TYPE, BASE64.encode(bytes)))
    }

    /// Build a payload from encoded image bytes of any supported format,
    /// sniffing the media type from the content.
    ///
    /// # Errors
    /// - Unrecognized image format
    pub fn from_encoded_bytes(bytes: &[u8]) -> Result<Self> {
        let format = image::guess_format(bytes)
            .map_err(|e| BoothError::payload(format!("unrecognized image format: {}", e)))?;
        Ok(Self(format!(
            "data:{};base64,{}",
            format.to_mime_type(),
            BASE64.encode(bytes)
        )))
    }

    /// Encode a decoded image as a PNG payload.
    ///
    /// # Errors
    /// - PNG encoding failure
    pub fn from_image(image: &DynamicImage) -> Result<Self> {
        let mut buffer = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .map_err(|e| BoothError::payload(format!("failed to encode PNG payload: {}", e)))?;
        Ok(Self::from_png_bytes(&buffer))
    }

    /// Media type declared by the payload (e.g. `image/png`).
    #[must_use]
    pub fn media_type(&self) -> &str {
        // Shape was validated at construction; both markers are present.
        self.0
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map_or(PNG_MEDIA_TYPE, |(media_type, _)| media_type)
    }

    /// Decode the payload back to raw encoded-image bytes.
    ///
    /// This is the encoding-conversion half of the removal contract: the
    /// remote service wants binary, the pipeline speaks data URIs.
    ///
    /// # Errors
    /// - Invalid base64 content
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let encoded = self
            .0
            .split_once(";base64,")
            .map_or("", |(_, encoded)| encoded);
        BASE64
            .decode(encoded)
            .map_err(|e| BoothError::payload(format!("invalid base64 content: {}", e)))
    }

    /// Decode the payload to a pixel image.
    ///
    /// # Errors
    /// - Invalid base64 content
    /// - Undecodable image data
    pub fn decode(&self) -> Result<DynamicImage> {
        let bytes = self.to_bytes()?;
        image::load_from_memory(&bytes)
            .map_err(|e| BoothError::payload(format!("undecodable image data: {}", e)))
    }

    /// The underlying data-URI string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the payload, returning the data-URI string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

// Payloads are routinely megabytes of base64; dumping them into logs or
// assertion output is useless. Show the media type and length instead.
impl std::fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePayload")
            .field("media_type", &self.media_type())
            .field("len", &self.0.len())
            .finish()
    }
}
