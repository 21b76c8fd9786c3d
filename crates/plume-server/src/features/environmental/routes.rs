//! Environmental data API routes
//!
//! - `POST /api/v1/environmental/weather` - Append a weather measurement
//! - `POST /api/v1/environmental/air-quality` - Append an air quality measurement
//! - `GET /api/v1/environmental/nearest` - Nearest measurements to a timestamp
//! - `POST /api/v1/environmental/impact` - Upsert a per-day impact aggregate
//! - `GET /api/v1/environmental/impact` - List impact aggregates

use crate::api::response::{ApiResponse, ErrorResponse};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;

use super::{
    commands::{
        RecordAirQualityCommand, RecordAirQualityError, RecordWeatherCommand, RecordWeatherError,
        UpsertImpactCommand, UpsertImpactError,
    },
    queries::{FindNearestError, FindNearestQuery, ListImpactError, ListImpactQuery},
};

pub fn environmental_routes() -> Router<PgPool> {
    Router::new()
        .route("/weather", post(record_weather))
        .route("/air-quality", post(record_air_quality))
        .route("/nearest", get(find_nearest))
        .route("/impact", post(upsert_impact).get(list_impact))
}

#[tracing::instrument(skip(pool, command), fields(location = %command.location))]
async fn record_weather(
    State(pool): State<PgPool>,
    Json(command): Json<RecordWeatherCommand>,
) -> Result<Response, EnvironmentalApiError> {
    let response = super::commands::record_weather::handle(pool, command).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool, command), fields(location = %command.location))]
async fn record_air_quality(
    State(pool): State<PgPool>,
    Json(command): Json<RecordAirQualityCommand>,
) -> Result<Response, EnvironmentalApiError> {
    let response = super::commands::record_air_quality::handle(pool, command).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool, query))]
async fn find_nearest(
    State(pool): State<PgPool>,
    Query(query): Query<FindNearestQuery>,
) -> Result<Response, EnvironmentalApiError> {
    let response = super::queries::find_nearest::handle(pool, query).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool, command), fields(location = %command.location))]
async fn upsert_impact(
    State(pool): State<PgPool>,
    Json(command): Json<UpsertImpactCommand>,
) -> Result<Response, EnvironmentalApiError> {
    let response = super::commands::upsert_impact::handle(pool, command).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool, query))]
async fn list_impact(
    State(pool): State<PgPool>,
    Query(query): Query<ListImpactQuery>,
) -> Result<Response, EnvironmentalApiError> {
    let response = super::queries::list_impact::handle(pool, query).await?;

    let meta = json!({ "pagination": response.pagination });

    Ok((StatusCode::OK, Json(ApiResponse::success_with_meta(response.items, meta)))
        .into_response())
}

#[derive(Debug)]
enum EnvironmentalApiError {
    Weather(RecordWeatherError),
    AirQuality(RecordAirQualityError),
    Impact(UpsertImpactError),
    Nearest(FindNearestError),
    ListImpact(ListImpactError),
}

impl From<RecordWeatherError> for EnvironmentalApiError {
    fn from(err: RecordWeatherError) -> Self {
        Self::Weather(err)
    }
}

impl From<RecordAirQualityError> for EnvironmentalApiError {
    fn from(err: RecordAirQualityError) -> Self {
        Self::AirQuality(err)
    }
}

impl From<UpsertImpactError> for EnvironmentalApiError {
    fn from(err: UpsertImpactError) -> Self {
        Self::Impact(err)
    }
}

impl From<FindNearestError> for EnvironmentalApiError {
    fn from(err: FindNearestError) -> Self {
        Self::Nearest(err)
    }
}

impl From<ListImpactError> for EnvironmentalApiError {
    fn from(err: ListImpactError) -> Self {
        Self::ListImpact(err)
    }
}

impl IntoResponse for EnvironmentalApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            EnvironmentalApiError::Weather(RecordWeatherError::FieldValidation(_))
            | EnvironmentalApiError::AirQuality(RecordAirQualityError::FieldValidation(_))
            | EnvironmentalApiError::Impact(UpsertImpactError::FieldValidation(_))
            | EnvironmentalApiError::Nearest(FindNearestError::LocationRequired)
            | EnvironmentalApiError::Nearest(FindNearestError::InvalidTolerance)
            | EnvironmentalApiError::ListImpact(ListImpactError::InvalidPagination(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            },

            EnvironmentalApiError::Weather(RecordWeatherError::OutOfRange(_))
            | EnvironmentalApiError::AirQuality(RecordAirQualityError::OutOfRange(_))
            | EnvironmentalApiError::AirQuality(RecordAirQualityError::CategoryMismatch { .. })
            | EnvironmentalApiError::Impact(UpsertImpactError::OutOfRange(_))
            | EnvironmentalApiError::Impact(UpsertImpactError::InconsistentCounts { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            },

            EnvironmentalApiError::Weather(RecordWeatherError::Database(_))
            | EnvironmentalApiError::AirQuality(RecordAirQualityError::Database(_))
            | EnvironmentalApiError::Impact(UpsertImpactError::Database(_))
            | EnvironmentalApiError::Nearest(FindNearestError::Database(_))
            | EnvironmentalApiError::ListImpact(ListImpactError::Database(_)) => {
                tracing::error!("Database error in environmental API: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            },
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "A database error occurred".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

impl std::fmt::Display for EnvironmentalApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weather(e) => write!(f, "{}", e),
            Self::AirQuality(e) => write!(f, "{}", e),
            Self::Impact(e) => write!(f, "{}", e),
            Self::Nearest(e) => write!(f, "{}", e),
            Self::ListImpact(e) => write!(f, "{}", e),
        }
    }
}
