use chrono::{DateTime, NaiveDate, Utc};
use plume_common::types::AirQualityTrend;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::PaginationMeta;
use crate::features::shared::pagination::PaginationParams;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListImpactQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactListItem {
    pub id: Uuid,
    pub location: String,
    pub measurement_date: NaiveDate,
    pub total_violations: i32,
    pub total_vehicles_detected: i32,
    pub compliant_vehicles: i32,
    pub violation_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_aqi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_quality_trend: Option<AirQualityTrend>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListImpactResponse {
    pub items: Vec<ImpactListItem>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, thiserror::Error)]
pub enum ListImpactError {
    #[error("Invalid pagination: {0}")]
    InvalidPagination(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool, query), fields(location = ?query.location))]
pub async fn handle(
    pool: PgPool,
    query: ListImpactQuery,
) -> Result<ListImpactResponse, ListImpactError> {
    let pagination = PaginationParams::new(query.page, query.per_page);
    pagination
        .validate()
        .map_err(ListImpactError::InvalidPagination)?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM environmental_impact
        WHERE ($1::text IS NULL OR location = $1)
        "#,
    )
    .bind(&query.location)
    .fetch_one(&pool)
    .await?;

    let items = sqlx::query_as::<_, ImpactRow>(
        r#"
        SELECT id, location, measurement_date, total_violations, total_vehicles_detected,
               compliant_vehicles, violation_rate, average_aqi, air_quality_trend, created_at
        FROM environmental_impact
        WHERE ($1::text IS NULL OR location = $1)
        ORDER BY measurement_date DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(&query.location)
    .bind(pagination.per_page())
    .bind(pagination.offset())
    .fetch_all(&pool)
    .await?
    .into_iter()
    .map(|row| ImpactListItem {
        id: row.id,
        location: row.location,
        measurement_date: row.measurement_date,
        total_violations: row.total_violations,
        total_vehicles_detected: row.total_vehicles_detected,
        compliant_vehicles: row.compliant_vehicles,
        violation_rate: row.violation_rate,
        average_aqi: row.average_aqi,
        air_quality_trend: row.air_quality_trend,
        created_at: row.created_at,
    })
    .collect();

    Ok(ListImpactResponse {
        items,
        pagination: PaginationMeta::new(pagination.page(), pagination.per_page(), total),
    })
}

#[derive(Debug, sqlx::FromRow)]
struct ImpactRow {
    id: Uuid,
    location: String,
    measurement_date: NaiveDate,
    total_violations: i32,
    total_vehicles_detected: i32,
    compliant_vehicles: i32,
    violation_rate: f64,
    average_aqi: Option<f64>,
    air_quality_trend: Option<AirQualityTrend>,
    created_at: DateTime<Utc>,
}
