//! Image upload API routes
//!
//! - `POST /api/v1/images/:camera_id/:filename` - Multipart frame upload
//! - `GET /api/v1/images/:camera_id/:filename` - Download a stored frame by its reference key

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::error::{AppError, ServerResult};
use crate::features::FeatureState;
use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use super::commands::{UploadImageCommand, UploadImageError};

pub fn images_routes() -> Router<FeatureState> {
    Router::new()
        .route("/:camera_id/:filename", post(upload_image).get(download_image))
}

#[tracing::instrument(skip(state, multipart), fields(camera_id = %camera_id, filename = %filename))]
async fn upload_image(
    State(state): State<FeatureState>,
    Path((camera_id, filename)): Path<(String, String)>,
    mut multipart: Multipart,
) -> Result<Response, ImageApiError> {
    let mut data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ImageApiError::Multipart(e.to_string()))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ImageApiError::Multipart(e.to_string()))?;
            data = Some(bytes.to_vec());
        }
    }

    let data = data.ok_or(ImageApiError::MissingFilePart)?;

    let command = UploadImageCommand {
        camera_id,
        filename,
        data,
    };

    let response = super::commands::upload::handle(state.db, state.media, command).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state), fields(camera_id = %camera_id, filename = %filename))]
async fn download_image(
    State(state): State<FeatureState>,
    Path((camera_id, filename)): Path<(String, String)>,
) -> ServerResult<Response> {
    let key = format!("{}/{}", camera_id, filename);

    let data = state
        .media
        .load(&key)
        .await
        .map_err(|_| AppError::NotFound(format!("No stored frame under key '{}'", key)))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/octet-stream")],
        data,
    )
        .into_response())
}

#[derive(Debug)]
enum ImageApiError {
    Upload(UploadImageError),
    Multipart(String),
    MissingFilePart,
}

impl From<UploadImageError> for ImageApiError {
    fn from(err: UploadImageError) -> Self {
        Self::Upload(err)
    }
}

impl IntoResponse for ImageApiError {
    fn into_response(self) -> Response {
        match self {
            ImageApiError::Upload(UploadImageError::InvalidFilename)
            | ImageApiError::Upload(UploadImageError::EmptyImage)
            | ImageApiError::MissingFilePart => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            ImageApiError::Upload(UploadImageError::TooLarge) => {
                let error = ErrorResponse::new("PAYLOAD_TOO_LARGE", self.to_string());
                (StatusCode::PAYLOAD_TOO_LARGE, Json(error)).into_response()
            },
            ImageApiError::Upload(UploadImageError::CameraNotFound(_)) => {
                let error = ErrorResponse::new("NOT_FOUND", self.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            ImageApiError::Multipart(ref detail) => {
                let error = ErrorResponse::new(
                    "VALIDATION_ERROR",
                    format!("Malformed multipart request: {}", detail),
                );
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            ImageApiError::Upload(UploadImageError::Storage(_))
            | ImageApiError::Upload(UploadImageError::Database(_)) => {
                tracing::error!("Error during image upload: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
        }
    }
}

impl std::fmt::Display for ImageApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upload(e) => write!(f, "{}", e),
            Self::Multipart(detail) => write!(f, "Malformed multipart request: {}", detail),
            Self::MissingFilePart => write!(f, "Multipart request is missing the 'file' part"),
        }
    }
}
