//! Detection lifecycle API routes
//!
//! - `POST /api/v1/detections` - Record a detection event
//! - `POST /api/v1/detections/:id/results` - Record inference results (once)
//! - `POST /api/v1/detections/:id/review` - Transition out of pending review
//! - `GET /api/v1/detections/:id` - Detail with embedded violation
//! - `GET /api/v1/detections` - Newest-first paginated list

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
use uuid::Uuid;

use super::{
    commands::{
        CreateDetectionCommand, CreateDetectionError, RecordResultsCommand, RecordResultsError,
        ReviewDetectionCommand, ReviewDetectionError,
    },
    queries::{GetDetectionError, GetDetectionQuery, ListDetectionsError, ListDetectionsQuery},
};

pub fn detections_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_detection).get(list_detections))
        .route("/:id", get(get_detection))
        .route("/:id/results", post(record_results))
        .route("/:id/review", post(review_detection))
}

#[tracing::instrument(skip(pool, command), fields(camera_id = %command.camera_id))]
async fn create_detection(
    State(pool): State<PgPool>,
    Json(command): Json<CreateDetectionCommand>,
) -> Result<Response, DetectionApiError> {
    let response = super::commands::create::handle(pool, command).await?;

    tracing::info!(detection_id = %response.id, "Detection recorded via API");

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool, command), fields(detection_id = %id))]
async fn record_results(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Json(mut command): Json<RecordResultsCommand>,
) -> Result<Response, DetectionApiError> {
    command.detection_id = id;

    let response = super::commands::record_results::handle(pool, command).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool, command), fields(detection_id = %id))]
async fn review_detection(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Json(mut command): Json<ReviewDetectionCommand>,
) -> Result<Response, DetectionApiError> {
    command.detection_id = id;

    let response = super::commands::review::handle(pool, command).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool))]
async fn get_detection(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Response, DetectionApiError> {
    let query = GetDetectionQuery { detection_id: id };

    let response = super::queries::get::handle(pool, query).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool, query))]
async fn list_detections(
    State(pool): State<PgPool>,
    Query(query): Query<ListDetectionsQuery>,
) -> Result<Response, DetectionApiError> {
    let response = super::queries::list::handle(pool, query).await?;

    let meta = json!({ "pagination": response.pagination });

    Ok((StatusCode::OK, Json(ApiResponse::success_with_meta(response.items, meta)))
        .into_response())
}

#[derive(Debug)]
enum DetectionApiError {
    Create(CreateDetectionError),
    Results(RecordResultsError),
    Review(ReviewDetectionError),
    Get(GetDetectionError),
    List(ListDetectionsError),
}

impl From<CreateDetectionError> for DetectionApiError {
    fn from(err: CreateDetectionError) -> Self {
        Self::Create(err)
    }
}

impl From<RecordResultsError> for DetectionApiError {
    fn from(err: RecordResultsError) -> Self {
        Self::Results(err)
    }
}

impl From<ReviewDetectionError> for DetectionApiError {
    fn from(err: ReviewDetectionError) -> Self {
        Self::Review(err)
    }
}

impl From<GetDetectionError> for DetectionApiError {
    fn from(err: GetDetectionError) -> Self {
        Self::Get(err)
    }
}

impl From<ListDetectionsError> for DetectionApiError {
    fn from(err: ListDetectionsError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for DetectionApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            DetectionApiError::Create(CreateDetectionError::FieldValidation(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            },
            DetectionApiError::Create(CreateDetectionError::SnapshotOutOfRange(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            },
            DetectionApiError::Create(CreateDetectionError::CameraNotFound(_))
            | DetectionApiError::Create(CreateDetectionError::VehicleNotFound(_)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            },

            DetectionApiError::Results(RecordResultsError::OutOfRange(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            },
            DetectionApiError::Results(RecordResultsError::NotFound) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            },
            DetectionApiError::Results(RecordResultsError::AlreadyProcessed) => {
                (StatusCode::CONFLICT, "CONFLICT")
            },

            DetectionApiError::Review(ReviewDetectionError::PendingNotAllowed)
            | DetectionApiError::Review(ReviewDetectionError::SeverityRequired)
            | DetectionApiError::Review(ReviewDetectionError::ReviewerValidation(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            },
            DetectionApiError::Review(ReviewDetectionError::FineOutOfRange(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            },
            DetectionApiError::Review(ReviewDetectionError::NotFound) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            },
            DetectionApiError::Review(ReviewDetectionError::AlreadyReviewed) => {
                (StatusCode::CONFLICT, "CONFLICT")
            },

            DetectionApiError::Get(GetDetectionError::NotFound) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            },

            DetectionApiError::List(ListDetectionsError::InvalidPagination(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            },

            DetectionApiError::Create(CreateDetectionError::Database(_))
            | DetectionApiError::Results(RecordResultsError::Database(_))
            | DetectionApiError::Review(ReviewDetectionError::Database(_))
            | DetectionApiError::Get(GetDetectionError::Database(_))
            | DetectionApiError::List(ListDetectionsError::Database(_)) => {
                tracing::error!("Database error in detections API: {}", self);
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

impl std::fmt::Display for DetectionApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create(e) => write!(f, "{}", e),
            Self::Results(e) => write!(f, "{}", e),
            Self::Review(e) => write!(f, "{}", e),
            Self::Get(e) => write!(f, "{}", e),
            Self::List(e) => write!(f, "{}", e),
        }
    }
}
