//! Upsert environmental impact aggregate command
//!
//! One aggregate row per (location, measurement_date). Re-submitting the
//! same key replaces the aggregate values via `ON CONFLICT ... DO UPDATE`,
//! so aggregation jobs can safely re-run for a day.

use chrono::{DateTime, NaiveDate, Utc};
use plume_common::types::AirQualityTrend;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{
    validate_name, validate_optional_range, validate_range, NameValidationError,
    RangeValidationError,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertImpactCommand {
    pub location: String,
    pub measurement_date: NaiveDate,

    pub total_violations: i32,
    pub total_vehicles_detected: i32,
    pub compliant_vehicles: i32,
    pub violation_rate: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_aqi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pollution_reduction_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_quality_trend: Option<AirQualityTrend>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertImpactResponse {
    pub id: Uuid,
    pub location: String,
    pub measurement_date: NaiveDate,
    pub total_violations: i32,
    pub total_vehicles_detected: i32,
    pub compliant_vehicles: i32,
    pub violation_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_aqi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pollution_reduction_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_quality_trend: Option<AirQualityTrend>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpsertImpactError {
    #[error("Field validation failed: {0}")]
    FieldValidation(#[from] NameValidationError),

    #[error("Aggregate value out of range: {0}")]
    OutOfRange(#[from] RangeValidationError),

    #[error("Counts are inconsistent: compliant_vehicles ({compliant}) exceeds total_vehicles_detected ({total})")]
    InconsistentCounts { compliant: i32, total: i32 },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl UpsertImpactCommand {
    pub fn validate(&self) -> Result<(), UpsertImpactError> {
        validate_name(&self.location, "location", 200)?;

        validate_range(f64::from(self.total_violations), "total_violations", 0.0, f64::MAX)?;
        validate_range(
            f64::from(self.total_vehicles_detected),
            "total_vehicles_detected",
            0.0,
            f64::MAX,
        )?;
        validate_range(
            f64::from(self.compliant_vehicles),
            "compliant_vehicles",
            0.0,
            f64::MAX,
        )?;
        validate_range(self.violation_rate, "violation_rate", 0.0, 100.0)?;
        validate_optional_range(self.average_aqi, "average_aqi", 0.0, 1000.0)?;

        if self.compliant_vehicles > self.total_vehicles_detected {
            return Err(UpsertImpactError::InconsistentCounts {
                compliant: self.compliant_vehicles,
                total: self.total_vehicles_detected,
            });
        }

        Ok(())
    }
}

#[tracing::instrument(
    skip(pool, command),
    fields(location = %command.location, measurement_date = %command.measurement_date)
)]
pub async fn handle(
    pool: PgPool,
    command: UpsertImpactCommand,
) -> Result<UpsertImpactResponse, UpsertImpactError> {
    command.validate()?;

    let record = sqlx::query_as::<_, ImpactRecord>(
        r#"
        INSERT INTO environmental_impact
            (location, measurement_date, total_violations, total_vehicles_detected,
             compliant_vehicles, violation_rate, average_aqi, pollution_reduction_percentage,
             air_quality_trend)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (location, measurement_date) DO UPDATE
        SET total_violations = EXCLUDED.total_violations,
            total_vehicles_detected = EXCLUDED.total_vehicles_detected,
            compliant_vehicles = EXCLUDED.compliant_vehicles,
            violation_rate = EXCLUDED.violation_rate,
            average_aqi = EXCLUDED.average_aqi,
            pollution_reduction_percentage = EXCLUDED.pollution_reduction_percentage,
            air_quality_trend = EXCLUDED.air_quality_trend
        RETURNING id, location, measurement_date, total_violations, total_vehicles_detected,
                  compliant_vehicles, violation_rate, average_aqi,
                  pollution_reduction_percentage, air_quality_trend, created_at
        "#,
    )
    .bind(&command.location)
    .bind(command.measurement_date)
    .bind(command.total_violations)
    .bind(command.total_vehicles_detected)
    .bind(command.compliant_vehicles)
    .bind(command.violation_rate)
    .bind(command.average_aqi)
    .bind(command.pollution_reduction_percentage)
    .bind(command.air_quality_trend)
    .fetch_one(&pool)
    .await?;

    tracing::info!(impact_id = %record.id, "Environmental impact aggregate upserted");

    Ok(UpsertImpactResponse {
        id: record.id,
        location: record.location,
        measurement_date: record.measurement_date,
        total_violations: record.total_violations,
        total_vehicles_detected: record.total_vehicles_detected,
        compliant_vehicles: record.compliant_vehicles,
        violation_rate: record.violation_rate,
        average_aqi: record.average_aqi,
        pollution_reduction_percentage: record.pollution_reduction_percentage,
        air_quality_trend: record.air_quality_trend,
        created_at: record.created_at,
    })
}

#[derive(Debug, sqlx::FromRow)]
struct ImpactRecord {
    id: Uuid,
    location: String,
    measurement_date: NaiveDate,
    total_violations: i32,
    total_vehicles_detected: i32,
    compliant_vehicles: i32,
    violation_rate: f64,
    average_aqi: Option<f64>,
    pollution_reduction_percentage: Option<f64>,
    air_quality_trend: Option<AirQualityTrend>,
    created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_command() -> UpsertImpactCommand {
        UpsertImpactCommand {
            location: "Downtown".to_string(),
            measurement_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            total_violations: 4,
            total_vehicles_detected: 120,
            compliant_vehicles: 116,
            violation_rate: 3.33,
            average_aqi: Some(54.0),
            pollution_reduction_percentage: Some(1.2),
            air_quality_trend: Some(AirQualityTrend::Improving),
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(base_command().validate().is_ok());
    }

    #[test]
    fn test_validation_negative_counts() {
        let mut cmd = base_command();
        cmd.total_violations = -1;
        assert!(matches!(cmd.validate(), Err(UpsertImpactError::OutOfRange(_))));
    }

    #[test]
    fn test_validation_rate_above_hundred() {
        let mut cmd = base_command();
        cmd.violation_rate = 100.5;
        assert!(matches!(cmd.validate(), Err(UpsertImpactError::OutOfRange(_))));
    }

    #[test]
    fn test_validation_compliant_exceeds_total() {
        let mut cmd = base_command();
        cmd.compliant_vehicles = 121;
        assert!(matches!(
            cmd.validate(),
            Err(UpsertImpactError::InconsistentCounts { compliant: 121, total: 120 })
        ));
    }
}
