use chrono::{DateTime, Utc};
use plume_common::types::Severity;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::PaginationMeta;
use crate::features::shared::pagination::PaginationParams;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListViolationsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViolationListItem {
    pub id: Uuid,
    pub detection_id: Uuid,
    pub violation_type: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fine_amount: Option<f64>,
    pub authority_notified: bool,
    pub owner_notified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListViolationsResponse {
    pub items: Vec<ViolationListItem>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, thiserror::Error)]
pub enum ListViolationsError {
    #[error("Invalid pagination: {0}")]
    InvalidPagination(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool, query), fields(page = ?query.page))]
pub async fn handle(
    pool: PgPool,
    query: ListViolationsQuery,
) -> Result<ListViolationsResponse, ListViolationsError> {
    let pagination = PaginationParams::new(query.page, query.per_page);
    pagination
        .validate()
        .map_err(ListViolationsError::InvalidPagination)?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM violations
        WHERE ($1::severity IS NULL OR severity = $1)
        "#,
    )
    .bind(query.severity)
    .fetch_one(&pool)
    .await?;

    let items = sqlx::query_as::<_, ViolationRow>(
        r#"
        SELECT id, detection_id, violation_type, severity, fine_amount,
               authority_notified, owner_notified, created_at
        FROM violations
        WHERE ($1::severity IS NULL OR severity = $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(query.severity)
    .bind(pagination.per_page())
    .bind(pagination.offset())
    .fetch_all(&pool)
    .await?
    .into_iter()
    .map(|row| ViolationListItem {
        id: row.id,
        detection_id: row.detection_id,
        violation_type: row.violation_type,
        severity: row.severity,
        fine_amount: row.fine_amount,
        authority_notified: row.authority_notified,
        owner_notified: row.owner_notified,
        created_at: row.created_at,
    })
    .collect();

    Ok(ListViolationsResponse {
        items,
        pagination: PaginationMeta::new(pagination.page(), pagination.per_page(), total),
    })
}

#[derive(Debug, sqlx::FromRow)]
struct ViolationRow {
    id: Uuid,
    detection_id: Uuid,
    violation_type: String,
    severity: Severity,
    fine_amount: Option<f64>,
    authority_notified: bool,
    owner_notified: bool,
    created_at: DateTime<Utc>,
}
