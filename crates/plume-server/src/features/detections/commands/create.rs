//! Create detection command
//!
//! Entry point for the capture pipeline. A detection references an existing
//! camera by its public identifier and, when the plate is already known, a
//! registered vehicle. Inference output fields are NOT accepted here; they
//! are written later through the record-results operation.

use chrono::{DateTime, Utc};
use plume_common::types::ReviewStatus;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{
    validate_identifier, validate_name, validate_optional_range, NameValidationError,
    RangeValidationError,
};

/// Command to record a new detection event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDetectionCommand {
    /// Public identifier of the capturing camera
    pub camera_id: String,

    /// License plate of a registered vehicle, when already known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,

    /// Reference path of the captured image (from the image upload endpoint)
    pub image_path: String,

    /// Environmental snapshot at capture time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_condition: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_quality_index: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDetectionResponse {
    pub id: Uuid,
    pub camera_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<Uuid>,
    pub image_path: String,
    pub review_status: ReviewStatus,
    pub is_violation: bool,
    pub detected_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateDetectionError {
    #[error("Field validation failed: {0}")]
    FieldValidation(#[from] NameValidationError),

    #[error("Snapshot value out of range: {0}")]
    SnapshotOutOfRange(#[from] RangeValidationError),

    #[error("Camera '{0}' not found")]
    CameraNotFound(String),

    #[error("Vehicle with license plate '{0}' not found")]
    VehicleNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreateDetectionCommand {
    pub fn validate(&self) -> Result<(), CreateDetectionError> {
        validate_name(&self.image_path, "image_path", 500)?;
        validate_identifier(&self.camera_id, "camera_id", 64)?;

        validate_optional_range(self.humidity, "humidity", 0.0, 100.0)?;
        if let Some(aqi) = self.air_quality_index {
            validate_optional_range(Some(f64::from(aqi)), "air_quality_index", 0.0, 1000.0)?;
        }

        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(camera_id = %command.camera_id))]
pub async fn handle(
    pool: PgPool,
    command: CreateDetectionCommand,
) -> Result<CreateDetectionResponse, CreateDetectionError> {
    command.validate()?;

    let camera_uuid: Uuid = sqlx::query_scalar("SELECT id FROM cameras WHERE camera_id = $1")
        .bind(&command.camera_id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| CreateDetectionError::CameraNotFound(command.camera_id.clone()))?;

    let vehicle_uuid = match command.license_plate {
        Some(ref plate) => Some(
            sqlx::query_scalar::<_, Uuid>(
                "SELECT id FROM vehicles WHERE UPPER(license_plate) = UPPER($1)",
            )
            .bind(plate)
            .fetch_optional(&pool)
            .await?
            .ok_or_else(|| CreateDetectionError::VehicleNotFound(plate.clone()))?,
        ),
        None => None,
    };

    tracing::info!("Recording detection event");

    let record = sqlx::query_as::<_, DetectionRecord>(
        r#"
        INSERT INTO detections
            (camera_id, vehicle_id, image_path, weather_condition, temperature, humidity,
             air_quality_index)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, vehicle_id, image_path, review_status, is_violation, detected_at
        "#,
    )
    .bind(camera_uuid)
    .bind(vehicle_uuid)
    .bind(&command.image_path)
    .bind(&command.weather_condition)
    .bind(command.temperature)
    .bind(command.humidity)
    .bind(command.air_quality_index)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_foreign_key_violation() {
                return CreateDetectionError::CameraNotFound(command.camera_id.clone());
            }
        }
        CreateDetectionError::Database(e)
    })?;

    tracing::info!(detection_id = %record.id, "Detection recorded");

    Ok(CreateDetectionResponse {
        id: record.id,
        camera_id: command.camera_id,
        vehicle_id: record.vehicle_id,
        image_path: record.image_path,
        review_status: record.review_status,
        is_violation: record.is_violation,
        detected_at: record.detected_at,
    })
}

#[derive(Debug, sqlx::FromRow)]
struct DetectionRecord {
    id: Uuid,
    vehicle_id: Option<Uuid>,
    image_path: String,
    review_status: ReviewStatus,
    is_violation: bool,
    detected_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_command() -> CreateDetectionCommand {
        CreateDetectionCommand {
            camera_id: "CAM-042".to_string(),
            license_plate: Some("ABC-1234".to_string()),
            image_path: "CAM-042/deadbeefdeadbeef-frame.jpg".to_string(),
            weather_condition: Some("clear".to_string()),
            temperature: Some(21.5),
            humidity: Some(40.0),
            air_quality_index: Some(42),
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(base_command().validate().is_ok());
    }

    #[test]
    fn test_validation_empty_image_path() {
        let mut cmd = base_command();
        cmd.image_path = "".to_string();
        assert!(matches!(
            cmd.validate(),
            Err(CreateDetectionError::FieldValidation(_))
        ));
    }

    #[test]
    fn test_validation_humidity_out_of_range() {
        let mut cmd = base_command();
        cmd.humidity = Some(120.0);
        assert!(matches!(
            cmd.validate(),
            Err(CreateDetectionError::SnapshotOutOfRange(_))
        ));
    }

    #[test]
    fn test_validation_negative_aqi() {
        let mut cmd = base_command();
        cmd.air_quality_index = Some(-1);
        assert!(matches!(
            cmd.validate(),
            Err(CreateDetectionError::SnapshotOutOfRange(_))
        ));
    }

    #[test]
    fn test_validation_snapshot_optional() {
        let mut cmd = base_command();
        cmd.weather_condition = None;
        cmd.temperature = None;
        cmd.humidity = None;
        cmd.air_quality_index = None;
        assert!(cmd.validate().is_ok());
    }
}
