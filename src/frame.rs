//! Frame descriptors and the built-in frame catalog
//!
//! A frame is a named decorative background/foreground image pair applied
//! around the subject. Descriptors are defined statically at startup and
//! never mutated. Placement constants live on the descriptor itself, so
//! nothing downstream ever infers behavior from asset naming.

use crate::error::{BoothError, Result};
use serde::{Deserialize, Serialize};

/// Per-frame constants controlling the cutout's scale and vertical offset
/// relative to the background canvas.
///
/// The target subject height is `background_height * height_factor`; the
/// subject's top edge sits at `background_height * y_factor`. Horizontal
/// placement is always centered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Fraction of the background height the subject occupies
    pub height_factor: f64,
    /// Fraction of the background height above the subject's top edge
    pub y_factor: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            height_factor: 0.85,
            y_factor: 0.10,
        }
    }
}

impl Placement {
    /// Placement whose bottom edge touches the canvas bottom at the given
    /// subject height.
    #[must_use]
    pub fn bottom_anchored(height_factor: f64) -> Self {
        Self {
            height_factor,
            y_factor: 1.0 - height_factor,
        }
    }
}

/// An immutable description of one decorative frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameDescriptor {
    /// Stable identifier used for selection and export naming
    pub id: String,
    /// Display name
    pub name: String,
    /// Background layer path, relative to the assets root
    pub background: String,
    /// Optional foreground decoration layer path, relative to the assets root
    pub foreground: Option<String>,
    /// Thumbnail path, relative to the assets root
    pub thumbnail: String,
    /// Scale and vertical-offset constants for the subject cutout
    pub placement: Placement,
}

impl FrameDescriptor {
    /// Whether rendering this frame includes the foreground overlay stage.
    #[must_use]
    pub fn has_foreground(&self) -> bool {
        self.foreground.is_some()
    }
}

/// The static set of frames available to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameCatalog {
    frames: Vec<FrameDescriptor>,
}

impl FrameCatalog {
    /// Build a catalog from descriptors, rejecting duplicate identifiers.
    ///
    /// # Errors
    /// - Empty catalog
    /// - Two descriptors sharing an identifier
    pub fn new(frames: Vec<FrameDescriptor>) -> Result<Self> {
        if frames.is_empty() {
            return Err(BoothError::invalid_config("frame catalog is empty"));
        }
        for (i, frame) in frames.iter().enumerate() {
            if frames[..i].iter().any(|other| other.id == frame.id) {
                return Err(BoothError::invalid_config(format!(
                    "duplicate frame id '{}'",
                    frame.id
                )));
            }
        }
        Ok(Self { frames })
    }

    /// The three built-in frames shipped with the booth.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            frames: vec![
                FrameDescriptor {
                    id: "queva".to_string(),
                    name: "QUEVA".to_string(),
                    background: "frame 01/Queva layer 1.png".to_string(),
                    foreground: Some("frame 01/Queva layer 3.png".to_string()),
                    thumbnail: "frame 01/Queva layer 1.png".to_string(),
                    placement: Placement {
                        height_factor: 0.85,
                        y_factor: 0.10,
                    },
                },
                FrameDescriptor {
                    id: "numero".to_string(),
                    name: "NUMERO".to_string(),
                    background: "frame 02/Numero layer 1.png".to_string(),
                    foreground: None,
                    thumbnail: "frame 02/Numero layer 1.png".to_string(),
                    placement: Placement {
                        height_factor: 0.85,
                        y_factor: 0.18,
                    },
                },
                FrameDescriptor {
                    id: "vogue".to_string(),
                    name: "VOGUE".to_string(),
                    background: "frame 03/VOGUE layer 1.png".to_string(),
                    foreground: None,
                    thumbnail: "frame 03/VOGUE layer 1.png".to_string(),
                    // Full height, bottom edge touching the canvas bottom.
                    placement: Placement::bottom_anchored(1.0),
                },
            ],
        }
    }

    /// Look up a frame by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FrameDescriptor> {
        self.frames.iter().find(|frame| frame.id == id)
    }

    /// Look up a frame by identifier, failing with a configuration error.
    ///
    /// # Errors
    /// - Unknown frame identifier
    pub fn require(&self, id: &str) -> Result<&FrameDescriptor> {
        self.get(id).ok_or_else(|| {
            BoothError::invalid_config(format!(
                "unknown frame '{}' (available: {})",
                id,
                self.frames
                    .iter()
                    .map(|frame| frame.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
    }

    /// All descriptors, in definition order.
    #[must_use]
    pub fn frames(&self) -> &[FrameDescriptor] {
        &self.frames
    }
}

impl Default for FrameCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_placement_constants() {
        let catalog = FrameCatalog::builtin();

        let queva = catalog.get("queva").unwrap();
        assert_eq!(queva.placement.height_factor, 0.85);
        assert_eq!(queva.placement.y_factor, 0.10);
        assert!(queva.has_foreground());

        let numero = catalog.get("numero").unwrap();
        assert_eq!(numero.placement.height_factor, 0.85);
        assert_eq!(numero.placement.y_factor, 0.18);
        assert!(!numero.has_foreground());

        let vogue = catalog.get("vogue").unwrap();
        assert_eq!(vogue.placement.height_factor, 1.0);
        assert_eq!(vogue.placement.y_factor, 0.0);
        assert!(!vogue.has_foreground());
    }

    #[test]
    fn test_lookup() {
        let catalog = FrameCatalog::builtin();
        assert!(catalog.get("numero").is_some());
        assert!(catalog.get("polaroid").is_none());

        let err = catalog.require("polaroid").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("polaroid"));
        assert!(text.contains("queva"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let frame = FrameCatalog::builtin().get("queva").unwrap().clone();
        let result = FrameCatalog::new(vec![frame.clone(), frame]);
        assert!(result.is_err());
    }

    #[test]
    fn test_catalog_serializes() {
        let catalog = FrameCatalog::builtin();
        let json = serde_json::to_string(&catalog).unwrap();
        let parsed: FrameCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, catalog);
    }
}
