//! Compliance API routes
//!
//! - `POST /api/v1/compliance/standards` - Create a standard
//! - `GET /api/v1/compliance/standards` - List standards
//! - `GET /api/v1/compliance/evaluate` - Evaluate a detection against a standard

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
    commands::{CreateStandardCommand, CreateStandardError},
    queries::{
        EvaluateComplianceError, EvaluateComplianceQuery, ListStandardsError, ListStandardsQuery,
    },
};

pub fn compliance_routes() -> Router<PgPool> {
    Router::new()
        .route("/standards", post(create_standard).get(list_standards))
        .route("/evaluate", get(evaluate_compliance))
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
async fn create_standard(
    State(pool): State<PgPool>,
    Json(command): Json<CreateStandardCommand>,
) -> Result<Response, ComplianceApiError> {
    let response = super::commands::create_standard::handle(pool, command).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool, query))]
async fn list_standards(
    State(pool): State<PgPool>,
    Query(query): Query<ListStandardsQuery>,
) -> Result<Response, ComplianceApiError> {
    let response = super::queries::list_standards::handle(pool, query).await?;

    let meta = json!({ "pagination": response.pagination });

    Ok((StatusCode::OK, Json(ApiResponse::success_with_meta(response.items, meta)))
        .into_response())
}

#[tracing::instrument(skip(pool))]
async fn evaluate_compliance(
    State(pool): State<PgPool>,
    Query(query): Query<EvaluateComplianceQuery>,
) -> Result<Response, ComplianceApiError> {
    let response = super::queries::evaluate::handle(pool, query).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[derive(Debug)]
enum ComplianceApiError {
    Create(CreateStandardError),
    Evaluate(EvaluateComplianceError),
    List(ListStandardsError),
}

impl From<CreateStandardError> for ComplianceApiError {
    fn from(err: CreateStandardError) -> Self {
        Self::Create(err)
    }
}

impl From<EvaluateComplianceError> for ComplianceApiError {
    fn from(err: EvaluateComplianceError) -> Self {
        Self::Evaluate(err)
    }
}

impl From<ListStandardsError> for ComplianceApiError {
    fn from(err: ListStandardsError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for ComplianceApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ComplianceApiError::Create(CreateStandardError::FieldValidation(_))
            | ComplianceApiError::List(ListStandardsError::InvalidPagination(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            },
            ComplianceApiError::Create(CreateStandardError::OutOfRange(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            },
            ComplianceApiError::Evaluate(EvaluateComplianceError::DetectionNotFound)
            | ComplianceApiError::Evaluate(EvaluateComplianceError::StandardNotFound) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            },
            ComplianceApiError::Create(CreateStandardError::Serialization(_))
            | ComplianceApiError::Create(CreateStandardError::Database(_))
            | ComplianceApiError::Evaluate(EvaluateComplianceError::Database(_))
            | ComplianceApiError::List(ListStandardsError::Database(_)) => {
                tracing::error!("Error in compliance API: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            },
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

impl std::fmt::Display for ComplianceApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create(e) => write!(f, "{}", e),
            Self::Evaluate(e) => write!(f, "{}", e),
            Self::List(e) => write!(f, "{}", e),
        }
    }
}
