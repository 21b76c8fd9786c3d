use chrono::{DateTime, Utc};
use plume_common::types::{ReviewStatus, Severity};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDetectionQuery {
    pub detection_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDetectionResponse {
    pub id: Uuid,
    pub camera_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    pub image_path: String,

    pub smoke_detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoke_opacity: Option<f64>,
    pub confidence_score: f64,
    pub vehicle_detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_plate_detected: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_quality_index: Option<i32>,

    pub detected_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,

    pub is_violation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    pub review_status: ReviewStatus,

    /// Violation record, present only for confirmed detections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation: Option<ViolationDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViolationDetail {
    pub id: Uuid,
    pub violation_type: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fine_amount: Option<f64>,
    pub authority_notified: bool,
    pub owner_notified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetDetectionError {
    #[error("Detection not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool), fields(detection_id = %query.detection_id))]
pub async fn handle(
    pool: PgPool,
    query: GetDetectionQuery,
) -> Result<GetDetectionResponse, GetDetectionError> {
    let row = sqlx::query_as::<_, DetectionRow>(
        r#"
        SELECT d.id,
               c.camera_id,
               d.vehicle_id,
               v.license_plate,
               d.image_path,
               d.smoke_detected,
               d.smoke_opacity,
               d.confidence_score,
               d.vehicle_detected,
               d.license_plate_detected,
               d.weather_condition,
               d.temperature,
               d.humidity,
               d.air_quality_index,
               d.detected_at,
               d.processed_at,
               d.is_violation,
               d.reviewed_by,
               d.review_status,
               vio.id AS violation_id,
               vio.violation_type,
               vio.severity,
               vio.fine_amount,
               vio.authority_notified,
               vio.owner_notified,
               vio.created_at AS violation_created_at
        FROM detections d
        JOIN cameras c ON c.id = d.camera_id
        LEFT JOIN vehicles v ON v.id = d.vehicle_id
        LEFT JOIN violations vio ON vio.detection_id = d.id
        WHERE d.id = $1
        "#,
    )
    .bind(query.detection_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetDetectionError::NotFound)?;

    let violation = match (row.violation_id, row.severity) {
        (Some(id), Some(severity)) => Some(ViolationDetail {
            id,
            violation_type: row.violation_type.unwrap_or_default(),
            severity,
            fine_amount: row.fine_amount,
            authority_notified: row.authority_notified.unwrap_or(false),
            owner_notified: row.owner_notified.unwrap_or(false),
            created_at: row.violation_created_at.unwrap_or(row.detected_at),
        }),
        _ => None,
    };

    Ok(GetDetectionResponse {
        id: row.id,
        camera_id: row.camera_id,
        vehicle_id: row.vehicle_id,
        license_plate: row.license_plate,
        image_path: row.image_path,
        smoke_detected: row.smoke_detected,
        smoke_opacity: row.smoke_opacity,
        confidence_score: row.confidence_score,
        vehicle_detected: row.vehicle_detected,
        license_plate_detected: row.license_plate_detected,
        weather_condition: row.weather_condition,
        temperature: row.temperature,
        humidity: row.humidity,
        air_quality_index: row.air_quality_index,
        detected_at: row.detected_at,
        processed_at: row.processed_at,
        is_violation: row.is_violation,
        reviewed_by: row.reviewed_by,
        review_status: row.review_status,
        violation,
    })
}

#[derive(Debug, sqlx::FromRow)]
struct DetectionRow {
    id: Uuid,
    camera_id: String,
    vehicle_id: Option<Uuid>,
    license_plate: Option<String>,
    image_path: String,
    smoke_detected: bool,
    smoke_opacity: Option<f64>,
    confidence_score: f64,
    vehicle_detected: bool,
    license_plate_detected: Option<String>,
    weather_condition: Option<String>,
    temperature: Option<f64>,
    humidity: Option<f64>,
    air_quality_index: Option<i32>,
    detected_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
    is_violation: bool,
    reviewed_by: Option<String>,
    review_status: ReviewStatus,
    violation_id: Option<Uuid>,
    violation_type: Option<String>,
    severity: Option<Severity>,
    fine_amount: Option<f64>,
    authority_notified: Option<bool>,
    owner_notified: Option<bool>,
    violation_created_at: Option<DateTime<Utc>>,
}
