//! Vehicle registry API routes
//!
//! - `POST /api/v1/vehicles` - Register a vehicle
//! - `GET /api/v1/vehicles` - List vehicles with pagination
//! - `GET /api/v1/vehicles/:plate` - Get a vehicle by license plate

use crate::api::response::{ApiResponse, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;

use super::{
    commands::{CreateVehicleCommand, CreateVehicleError},
    queries::{GetVehicleError, GetVehicleQuery, ListVehiclesError, ListVehiclesQuery},
};

pub fn vehicles_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_vehicle).get(list_vehicles))
        .route("/:plate", get(get_vehicle))
}

#[tracing::instrument(skip(pool, command), fields(license_plate = %command.license_plate))]
async fn create_vehicle(
    State(pool): State<PgPool>,
    Json(command): Json<CreateVehicleCommand>,
) -> Result<Response, VehicleApiError> {
    let response = super::commands::create::handle(pool, command).await?;

    tracing::info!(vehicle_id = %response.id, "Vehicle registered via API");

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool), fields(plate = %plate))]
async fn get_vehicle(
    State(pool): State<PgPool>,
    Path(plate): Path<String>,
) -> Result<Response, VehicleApiError> {
    let query = GetVehicleQuery {
        license_plate: plate,
    };

    let response = super::queries::get::handle(pool, query).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool, query))]
async fn list_vehicles(
    State(pool): State<PgPool>,
    Query(query): Query<ListVehiclesQuery>,
) -> Result<Response, VehicleApiError> {
    let response = super::queries::list::handle(pool, query).await?;

    let meta = json!({ "pagination": response.pagination });

    Ok((StatusCode::OK, Json(ApiResponse::success_with_meta(response.items, meta)))
        .into_response())
}

/// Unified error type for vehicle API endpoints
#[derive(Debug)]
enum VehicleApiError {
    Create(CreateVehicleError),
    Get(GetVehicleError),
    List(ListVehiclesError),
}

impl From<CreateVehicleError> for VehicleApiError {
    fn from(err: CreateVehicleError) -> Self {
        Self::Create(err)
    }
}

impl From<GetVehicleError> for VehicleApiError {
    fn from(err: GetVehicleError) -> Self {
        Self::Get(err)
    }
}

impl From<ListVehiclesError> for VehicleApiError {
    fn from(err: ListVehiclesError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for VehicleApiError {
    fn into_response(self) -> Response {
        match self {
            VehicleApiError::Create(CreateVehicleError::PlateValidation(_))
            | VehicleApiError::Create(CreateVehicleError::OwnerNameValidation(_))
            | VehicleApiError::Create(CreateVehicleError::EmailInvalid(_)) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            VehicleApiError::Create(CreateVehicleError::DuplicatePlate(plate)) => {
                let error = ErrorResponse::new(
                    "CONFLICT",
                    format!("Vehicle with license plate '{}' already exists", plate),
                );
                (StatusCode::CONFLICT, Json(error)).into_response()
            },
            VehicleApiError::Create(CreateVehicleError::Database(_)) => {
                tracing::error!("Database error during vehicle registration: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },

            VehicleApiError::Get(GetVehicleError::PlateRequired) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            VehicleApiError::Get(GetVehicleError::NotFound) => {
                let error = ErrorResponse::new("NOT_FOUND", "Vehicle not found");
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            VehicleApiError::Get(GetVehicleError::Database(_)) => {
                tracing::error!("Database error during vehicle retrieval: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },

            VehicleApiError::List(ListVehiclesError::InvalidPagination(_)) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            VehicleApiError::List(ListVehiclesError::Database(_)) => {
                tracing::error!("Database error during vehicle listing: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
        }
    }
}

impl std::fmt::Display for VehicleApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create(e) => write!(f, "{}", e),
            Self::Get(e) => write!(f, "{}", e),
            Self::List(e) => write!(f, "{}", e),
        }
    }
}
