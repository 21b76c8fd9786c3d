//! Camera registry API routes
//!
//! - `POST /api/v1/cameras` - Register a camera
//! - `GET /api/v1/cameras` - List cameras with pagination
//! - `GET /api/v1/cameras/:camera_id` - Get a camera by its public identifier

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
    commands::{CreateCameraCommand, CreateCameraError},
    queries::{GetCameraError, GetCameraQuery, ListCamerasError, ListCamerasQuery},
};

pub fn cameras_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_camera).get(list_cameras))
        .route("/:camera_id", get(get_camera))
}

#[tracing::instrument(skip(pool, command), fields(camera_id = %command.camera_id))]
async fn create_camera(
    State(pool): State<PgPool>,
    Json(command): Json<CreateCameraCommand>,
) -> Result<Response, CameraApiError> {
    let response = super::commands::create::handle(pool, command).await?;

    tracing::info!(camera_uuid = %response.id, "Camera registered via API");

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool))]
async fn get_camera(
    State(pool): State<PgPool>,
    Path(camera_id): Path<String>,
) -> Result<Response, CameraApiError> {
    let query = GetCameraQuery { camera_id };

    let response = super::queries::get::handle(pool, query).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool, query))]
async fn list_cameras(
    State(pool): State<PgPool>,
    Query(query): Query<ListCamerasQuery>,
) -> Result<Response, CameraApiError> {
    let response = super::queries::list::handle(pool, query).await?;

    let meta = json!({ "pagination": response.pagination });

    Ok((StatusCode::OK, Json(ApiResponse::success_with_meta(response.items, meta)))
        .into_response())
}

#[derive(Debug)]
enum CameraApiError {
    Create(CreateCameraError),
    Get(GetCameraError),
    List(ListCamerasError),
}

impl From<CreateCameraError> for CameraApiError {
    fn from(err: CreateCameraError) -> Self {
        Self::Create(err)
    }
}

impl From<GetCameraError> for CameraApiError {
    fn from(err: GetCameraError) -> Self {
        Self::Get(err)
    }
}

impl From<ListCamerasError> for CameraApiError {
    fn from(err: ListCamerasError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for CameraApiError {
    fn into_response(self) -> Response {
        match self {
            CameraApiError::Create(CreateCameraError::IdentifierValidation(_))
            | CameraApiError::Create(CreateCameraError::CoordinateOutOfRange(_))
            | CameraApiError::Create(CreateCameraError::PartialCoordinates) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            CameraApiError::Create(CreateCameraError::DuplicateCamera(ref camera_id)) => {
                let error = ErrorResponse::new(
                    "CONFLICT",
                    format!("Camera '{}' already exists", camera_id),
                );
                (StatusCode::CONFLICT, Json(error)).into_response()
            },
            CameraApiError::Create(CreateCameraError::Database(_)) => {
                tracing::error!("Database error during camera registration: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },

            CameraApiError::Get(GetCameraError::IdentifierRequired) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            CameraApiError::Get(GetCameraError::NotFound) => {
                let error = ErrorResponse::new("NOT_FOUND", "Camera not found");
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            CameraApiError::Get(GetCameraError::Database(_)) => {
                tracing::error!("Database error during camera retrieval: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },

            CameraApiError::List(ListCamerasError::InvalidPagination(_)) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            CameraApiError::List(ListCamerasError::Database(_)) => {
                tracing::error!("Database error during camera listing: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
        }
    }
}

impl std::fmt::Display for CameraApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create(e) => write!(f, "{}", e),
            Self::Get(e) => write!(f, "{}", e),
            Self::List(e) => write!(f, "{}", e),
        }
    }
}
