//! Local media storage for captured frames
//!
//! The data model stores only a stable reference path per detection; the
//! bytes live here. Keys embed the sha256 checksum, so two uploads of the
//! same filename with different content land under distinct keys.

use anyhow::{Context, Result};
use plume_common::checksum::compute_bytes_checksum;
use plume_common::types::ChecksumAlgorithm;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

pub mod config;

/// Outcome of a successful store operation.
#[derive(Debug, Clone)]
pub struct StoredImage {
    /// Reference path relative to the media root; this is what the
    /// detections table records.
    pub key: String,
    pub checksum: String,
    pub size: i64,
}

#[derive(Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(config: config::StorageConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.media_root)
            .context("Failed to create media root directory")?;

        info!(root = %config.media_root.display(), "Media store initialized");

        Ok(Self {
            root: config.media_root,
        })
    }

    /// Build the storage key for an uploaded frame.
    ///
    /// Layout: `<camera_id>/<checksum[..16]>-<filename>`.
    pub fn build_key(&self, camera_id: &str, checksum: &str, filename: &str) -> String {
        let prefix = &checksum[..16.min(checksum.len())];
        format!("{}/{}-{}", camera_id, prefix, filename)
    }

    /// Write a frame to the store and return its stable reference.
    #[instrument(skip(self, data), fields(camera_id = %camera_id, filename = %filename))]
    pub async fn store(
        &self,
        camera_id: &str,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<StoredImage> {
        let checksum = compute_bytes_checksum(&data, ChecksumAlgorithm::Sha256);
        let size = data.len() as i64;
        let key = self.build_key(camera_id, &checksum, filename);

        let path = self.resolve(&key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create media subdirectory")?;
        }

        debug!(bytes = size, key = %key, "Writing frame to media store");

        tokio::fs::write(&path, &data)
            .await
            .with_context(|| format!("Failed to write frame to {}", path.display()))?;

        info!(key = %key, "Frame stored");

        Ok(StoredImage {
            key,
            checksum,
            size,
        })
    }

    /// Read a frame back by its reference key.
    #[instrument(skip(self))]
    pub async fn load(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.resolve(key)?;
        let data = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read frame {}", key))?;

        debug!(bytes = data.len(), key = %key, "Frame loaded");

        Ok(data)
    }

    /// Absolute path for a key, rejecting traversal outside the root.
    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        if relative
            .components()
            .any(|c| !matches!(c, std::path::Component::Normal(_)))
        {
            anyhow::bail!("Invalid media key: {}", key);
        }
        Ok(self.root.join(relative))
    }
}
