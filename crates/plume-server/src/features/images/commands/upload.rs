//! Image upload command
//!
//! Accepts the captured frame bytes, verifies the camera exists, and hands
//! the blob to the media store. Only the returned reference key is meant to
//! be written into the detections table.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::storage::MediaStore;

const MAX_IMAGE_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct UploadImageCommand {
    pub camera_id: String,
    pub filename: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadImageResponse {
    pub camera_id: String,
    pub filename: String,
    /// Stable reference path for the detections table
    pub image_path: String,
    pub checksum: String,
    pub size: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadImageError {
    #[error("Filename must be a plain name without path separators")]
    InvalidFilename,

    #[error("Image data is empty")]
    EmptyImage,

    #[error("Image exceeds the maximum size of {MAX_IMAGE_BYTES} bytes")]
    TooLarge,

    #[error("Camera '{0}' not found")]
    CameraNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl UploadImageCommand {
    pub fn validate(&self) -> Result<(), UploadImageError> {
        let name = self.filename.trim();
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name == "."
            || name == ".."
        {
            return Err(UploadImageError::InvalidFilename);
        }

        if self.data.is_empty() {
            return Err(UploadImageError::EmptyImage);
        }

        if self.data.len() > MAX_IMAGE_BYTES {
            return Err(UploadImageError::TooLarge);
        }

        Ok(())
    }
}

#[tracing::instrument(
    skip(pool, media, command),
    fields(camera_id = %command.camera_id, filename = %command.filename, bytes = command.data.len())
)]
pub async fn handle(
    pool: PgPool,
    media: MediaStore,
    command: UploadImageCommand,
) -> Result<UploadImageResponse, UploadImageError> {
    command.validate()?;

    let camera_exists: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM cameras WHERE camera_id = $1")
            .bind(&command.camera_id)
            .fetch_optional(&pool)
            .await?;

    if camera_exists.is_none() {
        return Err(UploadImageError::CameraNotFound(command.camera_id));
    }

    let stored = media
        .store(&command.camera_id, &command.filename, command.data)
        .await?;

    tracing::info!(image_path = %stored.key, "Image uploaded");

    Ok(UploadImageResponse {
        camera_id: command.camera_id,
        filename: command.filename,
        image_path: stored.key,
        checksum: stored.checksum,
        size: stored.size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_command() -> UploadImageCommand {
        UploadImageCommand {
            camera_id: "CAM-042".to_string(),
            filename: "frame.jpg".to_string(),
            data: b"jpeg bytes".to_vec(),
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(base_command().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_path_separators() {
        let mut cmd = base_command();
        cmd.filename = "../escape.jpg".to_string();
        assert!(matches!(cmd.validate(), Err(UploadImageError::InvalidFilename)));

        cmd.filename = "a\\b.jpg".to_string();
        assert!(matches!(cmd.validate(), Err(UploadImageError::InvalidFilename)));
    }

    #[test]
    fn test_validation_rejects_dot_names() {
        let mut cmd = base_command();
        cmd.filename = "..".to_string();
        assert!(matches!(cmd.validate(), Err(UploadImageError::InvalidFilename)));
    }

    #[test]
    fn test_validation_rejects_empty_data() {
        let mut cmd = base_command();
        cmd.data = vec![];
        assert!(matches!(cmd.validate(), Err(UploadImageError::EmptyImage)));
    }

    #[test]
    fn test_validation_rejects_oversized_data() {
        let mut cmd = base_command();
        cmd.data = vec![0u8; MAX_IMAGE_BYTES + 1];
        assert!(matches!(cmd.validate(), Err(UploadImageError::TooLarge)));
    }
}
