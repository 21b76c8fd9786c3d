use chrono::{DateTime, Utc};
use plume_common::types::Severity;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetViolationQuery {
    pub detection_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetViolationResponse {
    pub id: Uuid,
    pub detection_id: Uuid,
    pub violation_type: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fine_amount: Option<f64>,
    pub authority_notified: bool,
    pub owner_notified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authority_notified_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_notified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetViolationError {
    #[error("Violation not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool), fields(detection_id = %query.detection_id))]
pub async fn handle(
    pool: PgPool,
    query: GetViolationQuery,
) -> Result<GetViolationResponse, GetViolationError> {
    let record = sqlx::query_as::<_, ViolationRecord>(
        r#"
        SELECT id, detection_id, violation_type, severity, fine_amount,
               authority_notified, owner_notified, authority_notified_at, owner_notified_at,
               created_at
        FROM violations
        WHERE detection_id = $1
        "#,
    )
    .bind(query.detection_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetViolationError::NotFound)?;

    Ok(GetViolationResponse {
        id: record.id,
        detection_id: record.detection_id,
        violation_type: record.violation_type,
        severity: record.severity,
        fine_amount: record.fine_amount,
        authority_notified: record.authority_notified,
        owner_notified: record.owner_notified,
        authority_notified_at: record.authority_notified_at,
        owner_notified_at: record.owner_notified_at,
        created_at: record.created_at,
    })
}

#[derive(Debug, sqlx::FromRow)]
struct ViolationRecord {
    id: Uuid,
    detection_id: Uuid,
    violation_type: String,
    severity: Severity,
    fine_amount: Option<f64>,
    authority_notified: bool,
    owner_notified: bool,
    authority_notified_at: Option<DateTime<Utc>>,
    owner_notified_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}
