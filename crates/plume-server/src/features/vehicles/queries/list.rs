use chrono::{DateTime, Utc};
use plume_common::types::VehicleType;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::PaginationMeta;
use crate::features::shared::pagination::PaginationParams;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListVehiclesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,

    /// Filter by vehicle classification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<VehicleType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleListItem {
    pub id: Uuid,
    pub license_plate: String,
    pub vehicle_type: VehicleType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListVehiclesResponse {
    pub items: Vec<VehicleListItem>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, thiserror::Error)]
pub enum ListVehiclesError {
    #[error("Invalid pagination: {0}")]
    InvalidPagination(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool, query), fields(page = ?query.page))]
pub async fn handle(
    pool: PgPool,
    query: ListVehiclesQuery,
) -> Result<ListVehiclesResponse, ListVehiclesError> {
    let pagination = PaginationParams::new(query.page, query.per_page);
    pagination
        .validate()
        .map_err(ListVehiclesError::InvalidPagination)?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM vehicles
        WHERE ($1::vehicle_type IS NULL OR vehicle_type = $1)
        "#,
    )
    .bind(query.vehicle_type)
    .fetch_one(&pool)
    .await?;

    let items = sqlx::query_as::<_, VehicleRow>(
        r#"
        SELECT id, license_plate, vehicle_type, created_at
        FROM vehicles
        WHERE ($1::vehicle_type IS NULL OR vehicle_type = $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(query.vehicle_type)
    .bind(pagination.per_page())
    .bind(pagination.offset())
    .fetch_all(&pool)
    .await?
    .into_iter()
    .map(|row| VehicleListItem {
        id: row.id,
        license_plate: row.license_plate,
        vehicle_type: row.vehicle_type,
        created_at: row.created_at,
    })
    .collect();

    Ok(ListVehiclesResponse {
        items,
        pagination: PaginationMeta::new(pagination.page(), pagination.per_page(), total),
    })
}

#[derive(Debug, sqlx::FromRow)]
struct VehicleRow {
    id: Uuid,
    license_plate: String,
    vehicle_type: VehicleType,
    created_at: DateTime<Utc>,
}
