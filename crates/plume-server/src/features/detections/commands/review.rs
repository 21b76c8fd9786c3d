//! Review detection command
//!
//! Transitions a detection out of `pending` into one of the terminal review
//! states. Confirming creates the violation record in the same transaction
//! that flips `is_violation`, so the flag and the violation row cannot
//! diverge under concurrent reviewers. The `WHERE review_status = 'pending'`
//! guard rejects a second transition instead of overwriting the first.

use chrono::{DateTime, Utc};
use plume_common::types::{ReviewStatus, Severity};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{
    validate_name, validate_optional_range, NameValidationError, RangeValidationError,
};

/// Command to review a pending detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDetectionCommand {
    #[serde(skip)]
    pub detection_id: Uuid,

    /// Target state; must not be `pending`
    pub status: ReviewStatus,

    /// Identifier of the reviewer
    pub reviewed_by: String,

    /// Required when confirming
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fine_amount: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDetectionResponse {
    pub id: Uuid,
    pub review_status: ReviewStatus,
    pub is_violation: bool,
    pub reviewed_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation: Option<ViolationCreated>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViolationCreated {
    pub id: Uuid,
    pub detection_id: Uuid,
    pub violation_type: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fine_amount: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReviewDetectionError {
    #[error("Review target status must not be 'pending'")]
    PendingNotAllowed,

    #[error("Severity is required when confirming a detection")]
    SeverityRequired,

    #[error("Reviewer validation failed: {0}")]
    ReviewerValidation(#[from] NameValidationError),

    #[error("Fine amount out of range: {0}")]
    FineOutOfRange(#[from] RangeValidationError),

    #[error("Detection not found")]
    NotFound,

    #[error("Detection has already been reviewed")]
    AlreadyReviewed,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ReviewDetectionCommand {
    pub fn validate(&self) -> Result<(), ReviewDetectionError> {
        if self.status == ReviewStatus::Pending {
            return Err(ReviewDetectionError::PendingNotAllowed);
        }

        validate_name(&self.reviewed_by, "reviewed_by", 100)?;

        if self.status == ReviewStatus::Confirmed && self.severity.is_none() {
            return Err(ReviewDetectionError::SeverityRequired);
        }

        validate_optional_range(self.fine_amount, "fine_amount", 0.0, f64::MAX)?;

        Ok(())
    }
}

#[tracing::instrument(
    skip(pool, command),
    fields(detection_id = %command.detection_id, status = %command.status)
)]
pub async fn handle(
    pool: PgPool,
    command: ReviewDetectionCommand,
) -> Result<ReviewDetectionResponse, ReviewDetectionError> {
    command.validate()?;

    let confirming = command.status == ReviewStatus::Confirmed;

    let mut tx = pool.begin().await?;

    let updated = sqlx::query_as::<_, ReviewedRecord>(
        r#"
        UPDATE detections
        SET review_status = $2,
            reviewed_by = $3,
            is_violation = $4
        WHERE id = $1 AND review_status = 'pending'
        RETURNING id, review_status, is_violation, reviewed_by
        "#,
    )
    .bind(command.detection_id)
    .bind(command.status)
    .bind(&command.reviewed_by)
    .bind(confirming)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(record) = updated else {
        tx.rollback().await?;

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM detections WHERE id = $1)")
                .bind(command.detection_id)
                .fetch_one(&pool)
                .await?;

        return if exists {
            Err(ReviewDetectionError::AlreadyReviewed)
        } else {
            Err(ReviewDetectionError::NotFound)
        };
    };

    let violation = if confirming {
        // validate() guarantees severity is present when confirming
        let severity = command
            .severity
            .ok_or(ReviewDetectionError::SeverityRequired)?;

        let violation = sqlx::query_as::<_, ViolationRecord>(
            r#"
            INSERT INTO violations (detection_id, severity, fine_amount)
            VALUES ($1, $2, $3)
            RETURNING id, detection_id, violation_type, severity, fine_amount, created_at
            "#,
        )
        .bind(command.detection_id)
        .bind(severity)
        .bind(command.fine_amount)
        .fetch_one(&mut *tx)
        .await?;

        Some(ViolationCreated {
            id: violation.id,
            detection_id: violation.detection_id,
            violation_type: violation.violation_type,
            severity: violation.severity,
            fine_amount: violation.fine_amount,
            created_at: violation.created_at,
        })
    } else {
        None
    };

    tx.commit().await?;

    tracing::info!(
        status = %record.review_status,
        is_violation = record.is_violation,
        "Detection reviewed"
    );

    Ok(ReviewDetectionResponse {
        id: record.id,
        review_status: record.review_status,
        is_violation: record.is_violation,
        reviewed_by: record.reviewed_by,
        violation,
    })
}

#[derive(Debug, sqlx::FromRow)]
struct ReviewedRecord {
    id: Uuid,
    review_status: ReviewStatus,
    is_violation: bool,
    reviewed_by: String,
}

#[derive(Debug, sqlx::FromRow)]
struct ViolationRecord {
    id: Uuid,
    detection_id: Uuid,
    violation_type: String,
    severity: Severity,
    fine_amount: Option<f64>,
    created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_command() -> ReviewDetectionCommand {
        ReviewDetectionCommand {
            detection_id: Uuid::new_v4(),
            status: ReviewStatus::Confirmed,
            reviewed_by: "inspector-7".to_string(),
            severity: Some(Severity::High),
            fine_amount: Some(250.0),
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(base_command().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_pending_target() {
        let mut cmd = base_command();
        cmd.status = ReviewStatus::Pending;
        assert!(matches!(
            cmd.validate(),
            Err(ReviewDetectionError::PendingNotAllowed)
        ));
    }

    #[test]
    fn test_validation_confirm_requires_severity() {
        let mut cmd = base_command();
        cmd.severity = None;
        assert!(matches!(
            cmd.validate(),
            Err(ReviewDetectionError::SeverityRequired)
        ));
    }

    #[test]
    fn test_validation_false_positive_without_severity() {
        let mut cmd = base_command();
        cmd.status = ReviewStatus::FalsePositive;
        cmd.severity = None;
        cmd.fine_amount = None;
        assert!(cmd.validate().is_ok());
    }

    #[test]
    fn test_validation_negative_fine() {
        let mut cmd = base_command();
        cmd.fine_amount = Some(-10.0);
        assert!(matches!(
            cmd.validate(),
            Err(ReviewDetectionError::FineOutOfRange(_))
        ));
    }

    #[test]
    fn test_validation_requires_reviewer() {
        let mut cmd = base_command();
        cmd.reviewed_by = " ".to_string();
        assert!(matches!(
            cmd.validate(),
            Err(ReviewDetectionError::ReviewerValidation(_))
        ));
    }
}
