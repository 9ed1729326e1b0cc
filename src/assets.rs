//! Frame asset loading
//!
//! Resolves frame layer references against an assets root and decodes them.
//! Every load re-reads and re-decodes from disk: the original asset fetches
//! are cache-busted on every use, and this store preserves that freshness
//! guarantee by holding no cache. Each load failure names the asset role it
//! belongs to, so merge and overlay failures stay distinguishable per input.

use crate::error::{AssetRole, BoothError, Result};
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// Loads frame layer images from the filesystem.
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    /// Create a store resolving relative layer paths against `root`.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// The assets root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a layer reference to an absolute path.
    #[must_use]
    pub fn resolve(&self, layer: &str) -> PathBuf {
        let path = Path::new(layer);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Load and decode one frame layer.
    ///
    /// The read is a suspend point; decoding happens synchronously once the
    /// bytes are in memory.
    ///
    /// # Errors
    /// - `AssetLoad` with the given role when the file cannot be read or the
    ///   bytes cannot be decoded
    pub async fn load_layer(&self, layer: &str, role: AssetRole) -> Result<DynamicImage> {
        let path = self.resolve(layer);
        log::debug!("loading {} layer from {}", role, path.display());

        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            BoothError::asset_load(role, format!("cannot read '{}': {}", path.display(), e))
        })?;

        image::load_from_memory(&bytes).map_err(|e| {
            BoothError::asset_load(role, format!("cannot decode '{}': {}", path.display(), e))
        })
    }
}
