use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::PaginationMeta;
use crate::features::shared::pagination::PaginationParams;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListStandardsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardListItem {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub max_smoke_opacity: f64,
    pub is_active: bool,
    pub effective_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListStandardsResponse {
    pub items: Vec<StandardListItem>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, thiserror::Error)]
pub enum ListStandardsError {
    #[error("Invalid pagination: {0}")]
    InvalidPagination(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool, query), fields(active = ?query.active))]
pub async fn handle(
    pool: PgPool,
    query: ListStandardsQuery,
) -> Result<ListStandardsResponse, ListStandardsError> {
    let pagination = PaginationParams::new(query.page, query.per_page);
    pagination
        .validate()
        .map_err(ListStandardsError::InvalidPagination)?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM compliance_standards
        WHERE ($1::boolean IS NULL OR is_active = $1)
        "#,
    )
    .bind(query.active)
    .fetch_one(&pool)
    .await?;

    let items = sqlx::query_as::<_, StandardRow>(
        r#"
        SELECT id, name, description, max_smoke_opacity, is_active, effective_date, created_at
        FROM compliance_standards
        WHERE ($1::boolean IS NULL OR is_active = $1)
        ORDER BY effective_date DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(query.active)
    .bind(pagination.per_page())
    .bind(pagination.offset())
    .fetch_all(&pool)
    .await?
    .into_iter()
    .map(|row| StandardListItem {
        id: row.id,
        name: row.name,
        description: row.description,
        max_smoke_opacity: row.max_smoke_opacity,
        is_active: row.is_active,
        effective_date: row.effective_date,
        created_at: row.created_at,
    })
    .collect();

    Ok(ListStandardsResponse {
        items,
        pagination: PaginationMeta::new(pagination.page(), pagination.per_page(), total),
    })
}

#[derive(Debug, sqlx::FromRow)]
struct StandardRow {
    id: Uuid,
    name: String,
    description: String,
    max_smoke_opacity: f64,
    is_active: bool,
    effective_date: NaiveDate,
    created_at: DateTime<Utc>,
}
