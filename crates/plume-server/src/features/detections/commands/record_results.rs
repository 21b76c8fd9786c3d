//! Record detection results command
//!
//! Seam for the external inference pipeline. Writes the analysis output
//! fields and stamps `processed_at` exactly once. The `WHERE processed_at
//! IS NULL` guard makes the stamp immutable; a second call is rejected with
//! a conflict rather than silently overwriting the first result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{
    validate_optional_range, validate_range, RangeValidationError,
};

/// Command to record inference results for a detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResultsCommand {
    #[serde(skip)]
    pub detection_id: Uuid,

    pub smoke_detected: bool,

    /// Measured smoke opacity in percent, when smoke was detected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoke_opacity: Option<f64>,

    pub confidence_score: f64,

    pub vehicle_detected: bool,

    /// Plate text read from the image, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_plate_detected: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResultsResponse {
    pub id: Uuid,
    pub smoke_detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoke_opacity: Option<f64>,
    pub confidence_score: f64,
    pub vehicle_detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_plate_detected: Option<String>,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum RecordResultsError {
    #[error("Result value out of range: {0}")]
    OutOfRange(#[from] RangeValidationError),

    #[error("Detection not found")]
    NotFound,

    #[error("Detection results have already been recorded")]
    AlreadyProcessed,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RecordResultsCommand {
    pub fn validate(&self) -> Result<(), RecordResultsError> {
        validate_range(self.confidence_score, "confidence_score", 0.0, 1.0)?;
        validate_optional_range(self.smoke_opacity, "smoke_opacity", 0.0, 100.0)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(detection_id = %command.detection_id))]
pub async fn handle(
    pool: PgPool,
    command: RecordResultsCommand,
) -> Result<RecordResultsResponse, RecordResultsError> {
    command.validate()?;

    let updated = sqlx::query_as::<_, ResultsRecord>(
        r#"
        UPDATE detections
        SET smoke_detected = $2,
            smoke_opacity = $3,
            confidence_score = $4,
            vehicle_detected = $5,
            license_plate_detected = $6,
            processed_at = now()
        WHERE id = $1 AND processed_at IS NULL
        RETURNING id, smoke_detected, smoke_opacity, confidence_score, vehicle_detected,
                  license_plate_detected, processed_at
        "#,
    )
    .bind(command.detection_id)
    .bind(command.smoke_detected)
    .bind(command.smoke_opacity)
    .bind(command.confidence_score)
    .bind(command.vehicle_detected)
    .bind(&command.license_plate_detected)
    .fetch_optional(&pool)
    .await?;

    match updated {
        Some(record) => {
            tracing::info!(
                smoke_detected = record.smoke_detected,
                confidence = record.confidence_score,
                "Detection results recorded"
            );
            Ok(RecordResultsResponse {
                id: record.id,
                smoke_detected: record.smoke_detected,
                smoke_opacity: record.smoke_opacity,
                confidence_score: record.confidence_score,
                vehicle_detected: record.vehicle_detected,
                license_plate_detected: record.license_plate_detected,
                processed_at: record.processed_at,
            })
        },
        None => {
            // Distinguish a missing row from an already-processed one
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM detections WHERE id = $1)")
                    .bind(command.detection_id)
                    .fetch_one(&pool)
                    .await?;

            if exists {
                Err(RecordResultsError::AlreadyProcessed)
            } else {
                Err(RecordResultsError::NotFound)
            }
        },
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ResultsRecord {
    id: Uuid,
    smoke_detected: bool,
    smoke_opacity: Option<f64>,
    confidence_score: f64,
    vehicle_detected: bool,
    license_plate_detected: Option<String>,
    processed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_command() -> RecordResultsCommand {
        RecordResultsCommand {
            detection_id: Uuid::new_v4(),
            smoke_detected: true,
            smoke_opacity: Some(35.0),
            confidence_score: 0.92,
            vehicle_detected: true,
            license_plate_detected: Some("ABC-1234".to_string()),
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(base_command().validate().is_ok());
    }

    #[test]
    fn test_validation_confidence_above_one() {
        let mut cmd = base_command();
        cmd.confidence_score = 1.01;
        assert!(matches!(cmd.validate(), Err(RecordResultsError::OutOfRange(_))));
    }

    #[test]
    fn test_validation_confidence_negative() {
        let mut cmd = base_command();
        cmd.confidence_score = -0.1;
        assert!(matches!(cmd.validate(), Err(RecordResultsError::OutOfRange(_))));
    }

    #[test]
    fn test_validation_opacity_above_hundred() {
        let mut cmd = base_command();
        cmd.smoke_opacity = Some(100.5);
        assert!(matches!(cmd.validate(), Err(RecordResultsError::OutOfRange(_))));
    }

    #[test]
    fn test_validation_boundaries_inclusive() {
        let mut cmd = base_command();
        cmd.confidence_score = 0.0;
        cmd.smoke_opacity = Some(0.0);
        assert!(cmd.validate().is_ok());

        cmd.confidence_score = 1.0;
        cmd.smoke_opacity = Some(100.0);
        assert!(cmd.validate().is_ok());
    }
}
