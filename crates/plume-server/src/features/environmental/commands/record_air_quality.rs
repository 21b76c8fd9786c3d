//! Record air quality measurement command
//!
//! The declared AQI category must agree with the numeric AQI; the
//! breakpoint table lives in `plume_common::types::AqiCategory`.

use chrono::{DateTime, Utc};
use plume_common::types::AqiCategory;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{
    validate_name, validate_range, NameValidationError, RangeValidationError,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordAirQualityCommand {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm25: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm10: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub co: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub so2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub o3: Option<f64>,

    pub aqi: i32,
    pub aqi_category: AqiCategory,

    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordAirQualityResponse {
    pub id: Uuid,
    pub location: String,
    pub aqi: i32,
    pub aqi_category: AqiCategory,
    pub recorded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum RecordAirQualityError {
    #[error("Field validation failed: {0}")]
    FieldValidation(#[from] NameValidationError),

    #[error("Measurement out of range: {0}")]
    OutOfRange(#[from] RangeValidationError),

    #[error("AQI category '{category}' does not match AQI value {aqi}")]
    CategoryMismatch { category: AqiCategory, aqi: i32 },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RecordAirQualityCommand {
    pub fn validate(&self) -> Result<(), RecordAirQualityError> {
        validate_name(&self.location, "location", 200)?;
        validate_range(self.latitude, "latitude", -90.0, 90.0)?;
        validate_range(self.longitude, "longitude", -180.0, 180.0)?;
        validate_range(f64::from(self.aqi), "aqi", 0.0, 1000.0)?;

        if !self.aqi_category.matches_aqi(self.aqi) {
            return Err(RecordAirQualityError::CategoryMismatch {
                category: self.aqi_category,
                aqi: self.aqi,
            });
        }

        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(location = %command.location, aqi = command.aqi))]
pub async fn handle(
    pool: PgPool,
    command: RecordAirQualityCommand,
) -> Result<RecordAirQualityResponse, RecordAirQualityError> {
    command.validate()?;

    let record = sqlx::query_as::<_, AirQualityRecord>(
        r#"
        INSERT INTO air_quality_data
            (location, latitude, longitude, pm25, pm10, no2, co, so2, o3, aqi, aqi_category,
             recorded_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING id, location, aqi, aqi_category, recorded_at, created_at
        "#,
    )
    .bind(&command.location)
    .bind(command.latitude)
    .bind(command.longitude)
    .bind(command.pm25)
    .bind(command.pm10)
    .bind(command.no2)
    .bind(command.co)
    .bind(command.so2)
    .bind(command.o3)
    .bind(command.aqi)
    .bind(command.aqi_category)
    .bind(command.recorded_at)
    .fetch_one(&pool)
    .await?;

    tracing::info!(air_quality_id = %record.id, "Air quality measurement recorded");

    Ok(RecordAirQualityResponse {
        id: record.id,
        location: record.location,
        aqi: record.aqi,
        aqi_category: record.aqi_category,
        recorded_at: record.recorded_at,
        created_at: record.created_at,
    })
}

#[derive(Debug, sqlx::FromRow)]
struct AirQualityRecord {
    id: Uuid,
    location: String,
    aqi: i32,
    aqi_category: AqiCategory,
    recorded_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_command() -> RecordAirQualityCommand {
        RecordAirQualityCommand {
            location: "Downtown".to_string(),
            latitude: 47.61,
            longitude: -122.33,
            pm25: Some(12.0),
            pm10: Some(20.0),
            no2: Some(18.0),
            co: Some(0.4),
            so2: Some(2.0),
            o3: Some(30.0),
            aqi: 42,
            aqi_category: AqiCategory::Good,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(base_command().validate().is_ok());
    }

    #[test]
    fn test_validation_category_mismatch() {
        let mut cmd = base_command();
        cmd.aqi = 180;
        assert!(matches!(
            cmd.validate(),
            Err(RecordAirQualityError::CategoryMismatch { aqi: 180, .. })
        ));
    }

    #[test]
    fn test_validation_category_boundary() {
        let mut cmd = base_command();
        cmd.aqi = 50;
        cmd.aqi_category = AqiCategory::Good;
        assert!(cmd.validate().is_ok());

        cmd.aqi = 51;
        assert!(cmd.validate().is_err());
        cmd.aqi_category = AqiCategory::Moderate;
        assert!(cmd.validate().is_ok());
    }

    #[test]
    fn test_validation_negative_aqi() {
        let mut cmd = base_command();
        cmd.aqi = -1;
        assert!(matches!(
            cmd.validate(),
            Err(RecordAirQualityError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_validation_pollutants_optional() {
        let mut cmd = base_command();
        cmd.pm25 = None;
        cmd.pm10 = None;
        cmd.no2 = None;
        cmd.co = None;
        cmd.so2 = None;
        cmd.o3 = None;
        assert!(cmd.validate().is_ok());
    }
}
