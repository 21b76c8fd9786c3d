use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCameraQuery {
    pub camera_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCameraResponse {
    pub id: Uuid,
    pub camera_id: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub is_active: bool,
    pub installation_date: NaiveDate,
}

#[derive(Debug, thiserror::Error)]
pub enum GetCameraError {
    #[error("Camera identifier is required")]
    IdentifierRequired,
    #[error("Camera not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl GetCameraQuery {
    pub fn validate(&self) -> Result<(), GetCameraError> {
        if self.camera_id.trim().is_empty() {
            return Err(GetCameraError::IdentifierRequired);
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetCameraQuery) -> Result<GetCameraResponse, GetCameraError> {
    query.validate()?;

    let record = sqlx::query_as::<_, CameraRecord>(
        r#"
        SELECT id, camera_id, location, latitude, longitude, is_active, installation_date
        FROM cameras
        WHERE camera_id = $1
        "#,
    )
    .bind(&query.camera_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetCameraError::NotFound)?;

    Ok(GetCameraResponse {
        id: record.id,
        camera_id: record.camera_id,
        location: record.location,
        latitude: record.latitude,
        longitude: record.longitude,
        is_active: record.is_active,
        installation_date: record.installation_date,
    })
}

#[derive(Debug, sqlx::FromRow)]
struct CameraRecord {
    id: Uuid,
    camera_id: String,
    location: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    is_active: bool,
    installation_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_requires_identifier() {
        let query = GetCameraQuery {
            camera_id: "".to_string(),
        };
        assert!(matches!(
            query.validate(),
            Err(GetCameraError::IdentifierRequired)
        ));
    }
}
