use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::PaginationMeta;
use crate::features::shared::pagination::PaginationParams;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListCamerasQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,

    /// Filter to active or inactive cameras only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraListItem {
    pub id: Uuid,
    pub camera_id: String,
    pub location: String,
    pub is_active: bool,
    pub installation_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListCamerasResponse {
    pub items: Vec<CameraListItem>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, thiserror::Error)]
pub enum ListCamerasError {
    #[error("Invalid pagination: {0}")]
    InvalidPagination(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool, query), fields(page = ?query.page))]
pub async fn handle(
    pool: PgPool,
    query: ListCamerasQuery,
) -> Result<ListCamerasResponse, ListCamerasError> {
    let pagination = PaginationParams::new(query.page, query.per_page);
    pagination
        .validate()
        .map_err(ListCamerasError::InvalidPagination)?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM cameras
        WHERE ($1::boolean IS NULL OR is_active = $1)
        "#,
    )
    .bind(query.is_active)
    .fetch_one(&pool)
    .await?;

    let items = sqlx::query_as::<_, CameraRow>(
        r#"
        SELECT id, camera_id, location, is_active, installation_date
        FROM cameras
        WHERE ($1::boolean IS NULL OR is_active = $1)
        ORDER BY camera_id
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(query.is_active)
    .bind(pagination.per_page())
    .bind(pagination.offset())
    .fetch_all(&pool)
    .await?
    .into_iter()
    .map(|row| CameraListItem {
        id: row.id,
        camera_id: row.camera_id,
        location: row.location,
        is_active: row.is_active,
        installation_date: row.installation_date,
    })
    .collect();

    Ok(ListCamerasResponse {
        items,
        pagination: PaginationMeta::new(pagination.page(), pagination.per_page(), total),
    })
}

#[derive(Debug, sqlx::FromRow)]
struct CameraRow {
    id: Uuid,
    camera_id: String,
    location: String,
    is_active: bool,
    installation_date: NaiveDate,
}
