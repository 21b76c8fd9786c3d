//! Create compliance standard command

use chrono::{DateTime, NaiveDate, Utc};
use plume_common::types::VehicleType;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{
    validate_name, validate_optional_range, validate_range, NameValidationError,
    RangeValidationError,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStandardCommand {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Maximum allowed smoke opacity in percent
    pub max_smoke_opacity: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pm25: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pm10: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_no2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_co: Option<f64>,

    /// Vehicle classes the standard applies to; empty means all
    #[serde(default)]
    pub vehicle_types: Vec<VehicleType>,

    /// Region names the standard applies to; empty means everywhere
    #[serde(default)]
    pub applicable_regions: Vec<String>,

    pub effective_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStandardResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub max_smoke_opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pm25: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pm10: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_no2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_co: Option<f64>,
    pub vehicle_types: Vec<VehicleType>,
    pub applicable_regions: Vec<String>,
    pub is_active: bool,
    pub effective_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateStandardError {
    #[error("Field validation failed: {0}")]
    FieldValidation(#[from] NameValidationError),

    #[error("Threshold out of range: {0}")]
    OutOfRange(#[from] RangeValidationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreateStandardCommand {
    pub fn validate(&self) -> Result<(), CreateStandardError> {
        validate_name(&self.name, "name", 200)?;
        validate_range(self.max_smoke_opacity, "max_smoke_opacity", 0.0, 100.0)?;
        validate_optional_range(self.max_pm25, "max_pm25", 0.0, f64::MAX)?;
        validate_optional_range(self.max_pm10, "max_pm10", 0.0, f64::MAX)?;
        validate_optional_range(self.max_no2, "max_no2", 0.0, f64::MAX)?;
        validate_optional_range(self.max_co, "max_co", 0.0, f64::MAX)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
pub async fn handle(
    pool: PgPool,
    command: CreateStandardCommand,
) -> Result<CreateStandardResponse, CreateStandardError> {
    command.validate()?;

    let vehicle_types = serde_json::to_value(&command.vehicle_types)?;
    let regions = serde_json::to_value(&command.applicable_regions)?;

    let record = sqlx::query_as::<_, StandardRecord>(
        r#"
        INSERT INTO compliance_standards
            (name, description, max_smoke_opacity, max_pm25, max_pm10, max_no2, max_co,
             vehicle_types, applicable_regions, effective_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, name, description, max_smoke_opacity, max_pm25, max_pm10, max_no2, max_co,
                  vehicle_types, applicable_regions, is_active, effective_date, created_at
        "#,
    )
    .bind(&command.name)
    .bind(&command.description)
    .bind(command.max_smoke_opacity)
    .bind(command.max_pm25)
    .bind(command.max_pm10)
    .bind(command.max_no2)
    .bind(command.max_co)
    .bind(vehicle_types)
    .bind(regions)
    .bind(command.effective_date)
    .fetch_one(&pool)
    .await?;

    tracing::info!(standard_id = %record.id, "Compliance standard created");

    let vehicle_types: Vec<VehicleType> = serde_json::from_value(record.vehicle_types)?;
    let applicable_regions: Vec<String> = serde_json::from_value(record.applicable_regions)?;

    Ok(CreateStandardResponse {
        id: record.id,
        name: record.name,
        description: record.description,
        max_smoke_opacity: record.max_smoke_opacity,
        max_pm25: record.max_pm25,
        max_pm10: record.max_pm10,
        max_no2: record.max_no2,
        max_co: record.max_co,
        vehicle_types,
        applicable_regions,
        is_active: record.is_active,
        effective_date: record.effective_date,
        created_at: record.created_at,
    })
}

#[derive(Debug, sqlx::FromRow)]
struct StandardRecord {
    id: Uuid,
    name: String,
    description: String,
    max_smoke_opacity: f64,
    max_pm25: Option<f64>,
    max_pm10: Option<f64>,
    max_no2: Option<f64>,
    max_co: Option<f64>,
    vehicle_types: serde_json::Value,
    applicable_regions: serde_json::Value,
    is_active: bool,
    effective_date: NaiveDate,
    created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_command() -> CreateStandardCommand {
        CreateStandardCommand {
            name: "Euro 6 urban".to_string(),
            description: "Urban emission limits".to_string(),
            max_smoke_opacity: 20.0,
            max_pm25: Some(25.0),
            max_pm10: Some(50.0),
            max_no2: Some(80.0),
            max_co: Some(1.0),
            vehicle_types: vec![VehicleType::Car, VehicleType::Truck],
            applicable_regions: vec!["Downtown".to_string()],
            effective_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(base_command().validate().is_ok());
    }

    #[test]
    fn test_validation_empty_name() {
        let mut cmd = base_command();
        cmd.name = " ".to_string();
        assert!(matches!(
            cmd.validate(),
            Err(CreateStandardError::FieldValidation(_))
        ));
    }

    #[test]
    fn test_validation_opacity_out_of_range() {
        let mut cmd = base_command();
        cmd.max_smoke_opacity = 101.0;
        assert!(matches!(cmd.validate(), Err(CreateStandardError::OutOfRange(_))));
    }

    #[test]
    fn test_validation_negative_threshold() {
        let mut cmd = base_command();
        cmd.max_pm25 = Some(-1.0);
        assert!(matches!(cmd.validate(), Err(CreateStandardError::OutOfRange(_))));
    }

    #[test]
    fn test_validation_empty_scopes_are_fine() {
        let mut cmd = base_command();
        cmd.vehicle_types = vec![];
        cmd.applicable_regions = vec![];
        assert!(cmd.validate().is_ok());
    }
}
