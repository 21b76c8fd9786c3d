//! Violation API routes
//!
//! Violations are addressed by the detection they belong to (the relation
//! is one-to-one).
//!
//! - `POST /api/v1/violations/:detection_id/notify/authority` - Mark authority notified
//! - `POST /api/v1/violations/:detection_id/notify/owner` - Mark owner notified
//! - `GET /api/v1/violations/:detection_id` - Get the violation for a detection
//! - `GET /api/v1/violations` - List violations

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
    commands::{MarkNotifiedCommand, MarkNotifiedError, NotifyTarget},
    queries::{GetViolationError, GetViolationQuery, ListViolationsError, ListViolationsQuery},
};

pub fn violations_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(list_violations))
        .route("/:detection_id", get(get_violation))
        .route("/:detection_id/notify/authority", post(notify_authority))
        .route("/:detection_id/notify/owner", post(notify_owner))
}

async fn notify_authority(
    State(pool): State<PgPool>,
    Path(detection_id): Path<Uuid>,
) -> Result<Response, ViolationApiError> {
    mark_notified(pool, detection_id, NotifyTarget::Authority).await
}

async fn notify_owner(
    State(pool): State<PgPool>,
    Path(detection_id): Path<Uuid>,
) -> Result<Response, ViolationApiError> {
    mark_notified(pool, detection_id, NotifyTarget::Owner).await
}

#[tracing::instrument(skip(pool), fields(detection_id = %detection_id, target = %target))]
async fn mark_notified(
    pool: PgPool,
    detection_id: Uuid,
    target: NotifyTarget,
) -> Result<Response, ViolationApiError> {
    let command = MarkNotifiedCommand {
        detection_id,
        target,
    };

    let response = super::commands::notify::handle(pool, command).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool))]
async fn get_violation(
    State(pool): State<PgPool>,
    Path(detection_id): Path<Uuid>,
) -> Result<Response, ViolationApiError> {
    let query = GetViolationQuery { detection_id };

    let response = super::queries::get::handle(pool, query).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool, query))]
async fn list_violations(
    State(pool): State<PgPool>,
    Query(query): Query<ListViolationsQuery>,
) -> Result<Response, ViolationApiError> {
    let response = super::queries::list::handle(pool, query).await?;

    let meta = json!({ "pagination": response.pagination });

    Ok((StatusCode::OK, Json(ApiResponse::success_with_meta(response.items, meta)))
        .into_response())
}

#[derive(Debug)]
enum ViolationApiError {
    Notify(MarkNotifiedError),
    Get(GetViolationError),
    List(ListViolationsError),
}

impl From<MarkNotifiedError> for ViolationApiError {
    fn from(err: MarkNotifiedError) -> Self {
        Self::Notify(err)
    }
}

impl From<GetViolationError> for ViolationApiError {
    fn from(err: GetViolationError) -> Self {
        Self::Get(err)
    }
}

impl From<ListViolationsError> for ViolationApiError {
    fn from(err: ListViolationsError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for ViolationApiError {
    fn into_response(self) -> Response {
        match self {
            ViolationApiError::Notify(MarkNotifiedError::NotFound)
            | ViolationApiError::Get(GetViolationError::NotFound) => {
                let error = ErrorResponse::new("NOT_FOUND", "Violation not found");
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            ViolationApiError::List(ListViolationsError::InvalidPagination(_)) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            ViolationApiError::Notify(MarkNotifiedError::Database(_))
            | ViolationApiError::Get(GetViolationError::Database(_))
            | ViolationApiError::List(ListViolationsError::Database(_)) => {
                tracing::error!("Database error in violations API: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
        }
    }
}

impl std::fmt::Display for ViolationApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Notify(e) => write!(f, "{}", e),
            Self::Get(e) => write!(f, "{}", e),
            Self::List(e) => write!(f, "{}", e),
        }
    }
}
