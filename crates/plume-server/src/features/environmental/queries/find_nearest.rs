//! Nearest-measurement lookup
//!
//! For a location and reference timestamp, returns per dataset the row
//! whose `recorded_at` is closest in absolute distance, restricted to a
//! tolerance window. Either dataset can be null independently when nothing
//! qualifies.

use chrono::{DateTime, Utc};
use plume_common::types::AqiCategory;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const DEFAULT_TOLERANCE_SECS: i64 = 3600;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindNearestQuery {
    pub location: String,
    pub timestamp: DateTime<Utc>,

    /// Maximum |recorded_at - timestamp| in seconds; defaults to one hour
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance_secs: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestWeather {
    pub id: Uuid,
    pub temperature: f64,
    pub humidity: f64,
    pub weather_condition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestAirQuality {
    pub id: Uuid,
    pub aqi: i32,
    pub aqi_category: AqiCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm25: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm10: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FindNearestResponse {
    pub location: String,
    pub timestamp: DateTime<Utc>,
    pub tolerance_secs: i64,
    pub weather: Option<NearestWeather>,
    pub air_quality: Option<NearestAirQuality>,
}

#[derive(Debug, thiserror::Error)]
pub enum FindNearestError {
    #[error("Location is required")]
    LocationRequired,
    #[error("Tolerance must be positive")]
    InvalidTolerance,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl FindNearestQuery {
    pub fn tolerance_secs(&self) -> i64 {
        self.tolerance_secs.unwrap_or(DEFAULT_TOLERANCE_SECS)
    }

    pub fn validate(&self) -> Result<(), FindNearestError> {
        if self.location.trim().is_empty() {
            return Err(FindNearestError::LocationRequired);
        }
        if self.tolerance_secs() <= 0 {
            return Err(FindNearestError::InvalidTolerance);
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool), fields(location = %query.location))]
pub async fn handle(
    pool: PgPool,
    query: FindNearestQuery,
) -> Result<FindNearestResponse, FindNearestError> {
    query.validate()?;

    let tolerance = query.tolerance_secs();

    let weather = sqlx::query_as::<_, WeatherRow>(
        r#"
        SELECT id, temperature, humidity, weather_condition, wind_speed, recorded_at
        FROM weather_data
        WHERE location = $1
          AND recorded_at BETWEEN $2 - make_interval(secs => $3::double precision)
                              AND $2 + make_interval(secs => $3::double precision)
        ORDER BY ABS(EXTRACT(EPOCH FROM (recorded_at - $2)))
        LIMIT 1
        "#,
    )
    .bind(&query.location)
    .bind(query.timestamp)
    .bind(tolerance)
    .fetch_optional(&pool)
    .await?
    .map(|row| NearestWeather {
        id: row.id,
        temperature: row.temperature,
        humidity: row.humidity,
        weather_condition: row.weather_condition,
        wind_speed: row.wind_speed,
        recorded_at: row.recorded_at,
    });

    let air_quality = sqlx::query_as::<_, AirQualityRow>(
        r#"
        SELECT id, aqi, aqi_category, pm25, pm10, recorded_at
        FROM air_quality_data
        WHERE location = $1
          AND recorded_at BETWEEN $2 - make_interval(secs => $3::double precision)
                              AND $2 + make_interval(secs => $3::double precision)
        ORDER BY ABS(EXTRACT(EPOCH FROM (recorded_at - $2)))
        LIMIT 1
        "#,
    )
    .bind(&query.location)
    .bind(query.timestamp)
    .bind(tolerance)
    .fetch_optional(&pool)
    .await?
    .map(|row| NearestAirQuality {
        id: row.id,
        aqi: row.aqi,
        aqi_category: row.aqi_category,
        pm25: row.pm25,
        pm10: row.pm10,
        recorded_at: row.recorded_at,
    });

    tracing::debug!(
        weather_found = weather.is_some(),
        air_quality_found = air_quality.is_some(),
        "Nearest lookup complete"
    );

    Ok(FindNearestResponse {
        location: query.location,
        timestamp: query.timestamp,
        tolerance_secs: tolerance,
        weather,
        air_quality,
    })
}

#[derive(Debug, sqlx::FromRow)]
struct WeatherRow {
    id: Uuid,
    temperature: f64,
    humidity: f64,
    weather_condition: String,
    wind_speed: Option<f64>,
    recorded_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct AirQualityRow {
    id: Uuid,
    aqi: i32,
    aqi_category: AqiCategory,
    pm25: Option<f64>,
    pm10: Option<f64>,
    recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_query() -> FindNearestQuery {
        FindNearestQuery {
            location: "Downtown".to_string(),
            timestamp: Utc::now(),
            tolerance_secs: None,
        }
    }

    #[test]
    fn test_default_tolerance() {
        assert_eq!(base_query().tolerance_secs(), 3600);
    }

    #[test]
    fn test_explicit_tolerance() {
        let mut query = base_query();
        query.tolerance_secs = Some(600);
        assert_eq!(query.tolerance_secs(), 600);
    }

    #[test]
    fn test_validation_requires_location() {
        let mut query = base_query();
        query.location = " ".to_string();
        assert!(matches!(
            query.validate(),
            Err(FindNearestError::LocationRequired)
        ));
    }

    #[test]
    fn test_validation_rejects_non_positive_tolerance() {
        let mut query = base_query();
        query.tolerance_secs = Some(0);
        assert!(matches!(
            query.validate(),
            Err(FindNearestError::InvalidTolerance)
        ));
    }
}
