//! Record weather measurement command
//!
//! Weather data is an append-only time series keyed by location and
//! `recorded_at`; nothing updates a row once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{
    validate_name, validate_optional_range, validate_range, NameValidationError,
    RangeValidationError,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordWeatherCommand {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,

    pub temperature: f64,
    pub humidity: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_direction: Option<i32>,

    pub weather_condition: String,
    #[serde(default)]
    pub weather_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_coverage: Option<i32>,

    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordWeatherResponse {
    pub id: Uuid,
    pub location: String,
    pub temperature: f64,
    pub humidity: f64,
    pub weather_condition: String,
    pub recorded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum RecordWeatherError {
    #[error("Field validation failed: {0}")]
    FieldValidation(#[from] NameValidationError),

    #[error("Measurement out of range: {0}")]
    OutOfRange(#[from] RangeValidationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RecordWeatherCommand {
    pub fn validate(&self) -> Result<(), RecordWeatherError> {
        validate_name(&self.location, "location", 200)?;
        validate_name(&self.weather_condition, "weather_condition", 100)?;

        validate_range(self.latitude, "latitude", -90.0, 90.0)?;
        validate_range(self.longitude, "longitude", -180.0, 180.0)?;
        validate_range(self.humidity, "humidity", 0.0, 100.0)?;

        validate_optional_range(
            self.wind_direction.map(f64::from),
            "wind_direction",
            0.0,
            360.0,
        )?;
        validate_optional_range(
            self.cloud_coverage.map(f64::from),
            "cloud_coverage",
            0.0,
            100.0,
        )?;

        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(location = %command.location))]
pub async fn handle(
    pool: PgPool,
    command: RecordWeatherCommand,
) -> Result<RecordWeatherResponse, RecordWeatherError> {
    command.validate()?;

    let record = sqlx::query_as::<_, WeatherRecord>(
        r#"
        INSERT INTO weather_data
            (location, latitude, longitude, temperature, humidity, pressure, visibility,
             wind_speed, wind_direction, weather_condition, weather_description, cloud_coverage,
             recorded_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING id, location, temperature, humidity, weather_condition, recorded_at, created_at
        "#,
    )
    .bind(&command.location)
    .bind(command.latitude)
    .bind(command.longitude)
    .bind(command.temperature)
    .bind(command.humidity)
    .bind(command.pressure)
    .bind(command.visibility)
    .bind(command.wind_speed)
    .bind(command.wind_direction)
    .bind(&command.weather_condition)
    .bind(&command.weather_description)
    .bind(command.cloud_coverage)
    .bind(command.recorded_at)
    .fetch_one(&pool)
    .await?;

    tracing::info!(weather_id = %record.id, "Weather measurement recorded");

    Ok(RecordWeatherResponse {
        id: record.id,
        location: record.location,
        temperature: record.temperature,
        humidity: record.humidity,
        weather_condition: record.weather_condition,
        recorded_at: record.recorded_at,
        created_at: record.created_at,
    })
}

#[derive(Debug, sqlx::FromRow)]
struct WeatherRecord {
    id: Uuid,
    location: String,
    temperature: f64,
    humidity: f64,
    weather_condition: String,
    recorded_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}
