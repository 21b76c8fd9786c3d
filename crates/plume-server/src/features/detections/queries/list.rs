use chrono::{DateTime, Utc};
use plume_common::types::ReviewStatus;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::PaginationMeta;
use crate::features::shared::pagination::PaginationParams;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListDetectionsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,

    /// Filter by public camera identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_status: Option<ReviewStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_violation: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionListItem {
    pub id: Uuid,
    pub camera_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    pub smoke_detected: bool,
    pub confidence_score: f64,
    pub review_status: ReviewStatus,
    pub is_violation: bool,
    pub detected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListDetectionsResponse {
    pub items: Vec<DetectionListItem>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, thiserror::Error)]
pub enum ListDetectionsError {
    #[error("Invalid pagination: {0}")]
    InvalidPagination(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool, query), fields(page = ?query.page))]
pub async fn handle(
    pool: PgPool,
    query: ListDetectionsQuery,
) -> Result<ListDetectionsResponse, ListDetectionsError> {
    let pagination = PaginationParams::new(query.page, query.per_page);
    pagination
        .validate()
        .map_err(ListDetectionsError::InvalidPagination)?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM detections d
        JOIN cameras c ON c.id = d.camera_id
        WHERE ($1::text IS NULL OR c.camera_id = $1)
          AND ($2::review_status IS NULL OR d.review_status = $2)
          AND ($3::boolean IS NULL OR d.is_violation = $3)
        "#,
    )
    .bind(&query.camera_id)
    .bind(query.review_status)
    .bind(query.is_violation)
    .fetch_one(&pool)
    .await?;

    let items = sqlx::query_as::<_, DetectionRow>(
        r#"
        SELECT d.id,
               c.camera_id,
               v.license_plate,
               d.smoke_detected,
               d.confidence_score,
               d.review_status,
               d.is_violation,
               d.detected_at
        FROM detections d
        JOIN cameras c ON c.id = d.camera_id
        LEFT JOIN vehicles v ON v.id = d.vehicle_id
        WHERE ($1::text IS NULL OR c.camera_id = $1)
          AND ($2::review_status IS NULL OR d.review_status = $2)
          AND ($3::boolean IS NULL OR d.is_violation = $3)
        ORDER BY d.detected_at DESC
        LIMIT $4 OFFSET $5
        "#,
    )
    .bind(&query.camera_id)
    .bind(query.review_status)
    .bind(query.is_violation)
    .bind(pagination.per_page())
    .bind(pagination.offset())
    .fetch_all(&pool)
    .await?
    .into_iter()
    .map(|row| DetectionListItem {
        id: row.id,
        camera_id: row.camera_id,
        license_plate: row.license_plate,
        smoke_detected: row.smoke_detected,
        confidence_score: row.confidence_score,
        review_status: row.review_status,
        is_violation: row.is_violation,
        detected_at: row.detected_at,
    })
    .collect();

    Ok(ListDetectionsResponse {
        items,
        pagination: PaginationMeta::new(pagination.page(), pagination.per_page(), total),
    })
}

#[derive(Debug, sqlx::FromRow)]
struct DetectionRow {
    id: Uuid,
    camera_id: String,
    license_plate: Option<String>,
    smoke_detected: bool,
    confidence_score: f64,
    review_status: ReviewStatus,
    is_violation: bool,
    detected_at: DateTime<Utc>,
}
