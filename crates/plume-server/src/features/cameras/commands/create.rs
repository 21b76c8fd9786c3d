//! Register camera command
//!
//! Cameras are looked up by their public `camera_id` string, not the row
//! UUID. Uniqueness of `camera_id` is enforced by the database.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{
    validate_coordinates, validate_identifier, validate_name, NameValidationError,
    RangeValidationError,
};

/// Command to register a new camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCameraCommand {
    /// Public camera identifier (must be unique)
    pub camera_id: String,

    /// Human-readable location description
    pub location: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub installation_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCameraResponse {
    pub id: Uuid,
    pub camera_id: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub is_active: bool,
    pub installation_date: NaiveDate,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateCameraError {
    #[error("Camera identifier validation failed: {0}")]
    IdentifierValidation(#[from] NameValidationError),

    #[error("Coordinate out of range: {0}")]
    CoordinateOutOfRange(#[from] RangeValidationError),

    #[error("Both latitude and longitude must be provided together")]
    PartialCoordinates,

    #[error("Camera '{0}' already exists")]
    DuplicateCamera(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreateCameraCommand {
    pub fn validate(&self) -> Result<(), CreateCameraError> {
        validate_identifier(&self.camera_id, "camera_id", 64)?;
        validate_name(&self.location, "location", 200)?;

        if self.latitude.is_some() != self.longitude.is_some() {
            return Err(CreateCameraError::PartialCoordinates);
        }
        validate_coordinates(self.latitude, self.longitude)?;

        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(camera_id = %command.camera_id))]
pub async fn handle(
    pool: PgPool,
    command: CreateCameraCommand,
) -> Result<CreateCameraResponse, CreateCameraError> {
    command.validate()?;

    tracing::info!(location = %command.location, "Registering camera");

    let record = sqlx::query_as::<_, CameraRecord>(
        r#"
        INSERT INTO cameras (camera_id, location, latitude, longitude, installation_date)
        VALUES ($1, $2, $3, $4, COALESCE($5, CURRENT_DATE))
        RETURNING id, camera_id, location, latitude, longitude, is_active, installation_date
        "#,
    )
    .bind(&command.camera_id)
    .bind(&command.location)
    .bind(command.latitude)
    .bind(command.longitude)
    .bind(command.installation_date)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return CreateCameraError::DuplicateCamera(command.camera_id.clone());
            }
        }
        CreateCameraError::Database(e)
    })?;

    tracing::info!(camera_uuid = %record.id, "Camera registered successfully");

    Ok(CreateCameraResponse {
        id: record.id,
        camera_id: record.camera_id,
        location: record.location,
        latitude: record.latitude,
        longitude: record.longitude,
        is_active: record.is_active,
        installation_date: record.installation_date,
    })
}

#[derive(Debug, sqlx::FromRow)]
struct CameraRecord {
    id: Uuid,
    camera_id: String,
    location: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    is_active: bool,
    installation_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_command() -> CreateCameraCommand {
        CreateCameraCommand {
            camera_id: "CAM-042".to_string(),
            location: "Main St & 5th Ave".to_string(),
            latitude: Some(40.7128),
            longitude: Some(-74.0060),
            installation_date: None,
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(base_command().validate().is_ok());
    }

    #[test]
    fn test_validation_empty_camera_id() {
        let mut cmd = base_command();
        cmd.camera_id = "".to_string();
        assert!(matches!(
            cmd.validate(),
            Err(CreateCameraError::IdentifierValidation(_))
        ));
    }

    #[test]
    fn test_validation_camera_id_with_path_chars() {
        for id in ["../frames", "cam/042", "cam 042"] {
            let mut cmd = base_command();
            cmd.camera_id = id.to_string();
            assert!(matches!(
                cmd.validate(),
                Err(CreateCameraError::IdentifierValidation(_))
            ));
        }
    }

    #[test]
    fn test_validation_latitude_out_of_range() {
        let mut cmd = base_command();
        cmd.latitude = Some(91.0);
        assert!(matches!(
            cmd.validate(),
            Err(CreateCameraError::CoordinateOutOfRange(_))
        ));
    }

    #[test]
    fn test_validation_partial_coordinates() {
        let mut cmd = base_command();
        cmd.longitude = None;
        assert!(matches!(
            cmd.validate(),
            Err(CreateCameraError::PartialCoordinates)
        ));
    }

    #[test]
    fn test_validation_no_coordinates_is_fine() {
        let mut cmd = base_command();
        cmd.latitude = None;
        cmd.longitude = None;
        assert!(cmd.validate().is_ok());
    }
}
