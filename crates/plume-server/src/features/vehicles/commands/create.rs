//! Create vehicle command
//!
//! Registers a vehicle in the reference registry. The license plate is the
//! public identifier; it is stored in canonical uppercase form and its
//! uniqueness is enforced by the database so that concurrent registrations
//! cannot race past the check.

use chrono::{DateTime, NaiveDate, Utc};
use plume_common::types::VehicleType;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{
    is_valid_email, normalize_plate, validate_name, validate_plate, NameValidationError,
    PlateValidationError,
};

/// Command to register a new vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVehicleCommand {
    /// License plate (must be unique)
    pub license_plate: String,

    /// Vehicle classification
    pub vehicle_type: VehicleType,

    /// Optional owner contact fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<NaiveDate>,
}

/// Response from registering a vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVehicleResponse {
    pub id: Uuid,
    pub license_plate: String,
    pub vehicle_type: VehicleType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur when registering a vehicle
#[derive(Debug, thiserror::Error)]
pub enum CreateVehicleError {
    #[error("License plate validation failed: {0}")]
    PlateValidation(#[from] PlateValidationError),

    #[error("Owner name validation failed: {0}")]
    OwnerNameValidation(#[from] NameValidationError),

    #[error("Owner email '{0}' is not a valid email address")]
    EmailInvalid(String),

    #[error("Vehicle with license plate '{0}' already exists")]
    DuplicatePlate(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreateVehicleCommand {
    /// Validates the command parameters
    #[tracing::instrument(skip(self), fields(license_plate = %self.license_plate))]
    pub fn validate(&self) -> Result<(), CreateVehicleError> {
        validate_plate(&self.license_plate, 20)?;

        if let Some(ref name) = self.owner_name {
            validate_name(name, "owner_name", 100)?;
        }

        if let Some(ref email) = self.owner_email {
            if !is_valid_email(email) {
                return Err(CreateVehicleError::EmailInvalid(email.clone()));
            }
        }

        Ok(())
    }
}

/// Handler function for vehicle registration
#[tracing::instrument(
    skip(pool, command),
    fields(license_plate = %command.license_plate, vehicle_type = %command.vehicle_type)
)]
pub async fn handle(
    pool: PgPool,
    command: CreateVehicleCommand,
) -> Result<CreateVehicleResponse, CreateVehicleError> {
    command.validate()?;

    let plate = normalize_plate(&command.license_plate);

    tracing::info!("Registering vehicle");

    let record = sqlx::query_as::<_, VehicleRecord>(
        r#"
        INSERT INTO vehicles
            (license_plate, vehicle_type, owner_name, owner_phone, owner_email, registration_date)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, license_plate, vehicle_type, owner_name, owner_phone, owner_email,
                  registration_date, created_at
        "#,
    )
    .bind(&plate)
    .bind(command.vehicle_type)
    .bind(&command.owner_name)
    .bind(&command.owner_phone)
    .bind(&command.owner_email)
    .bind(command.registration_date)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return CreateVehicleError::DuplicatePlate(plate.clone());
            }
        }
        CreateVehicleError::Database(e)
    })?;

    tracing::info!(
        vehicle_id = %record.id,
        license_plate = %record.license_plate,
        "Vehicle registered successfully"
    );

    Ok(CreateVehicleResponse {
        id: record.id,
        license_plate: record.license_plate,
        vehicle_type: record.vehicle_type,
        owner_name: record.owner_name,
        owner_phone: record.owner_phone,
        owner_email: record.owner_email,
        registration_date: record.registration_date,
        created_at: record.created_at,
    })
}

#[derive(Debug, sqlx::FromRow)]
struct VehicleRecord {
    id: Uuid,
    license_plate: String,
    vehicle_type: VehicleType,
    owner_name: Option<String>,
    owner_phone: Option<String>,
    owner_email: Option<String>,
    registration_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_command() -> CreateVehicleCommand {
        CreateVehicleCommand {
            license_plate: "ABC-1234".to_string(),
            vehicle_type: VehicleType::Car,
            owner_name: Some("Jamie Rivera".to_string()),
            owner_phone: Some("555-0142".to_string()),
            owner_email: Some("jamie@example.com".to_string()),
            registration_date: None,
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(base_command().validate().is_ok());
    }

    #[test]
    fn test_validation_empty_plate() {
        let mut cmd = base_command();
        cmd.license_plate = "".to_string();
        assert!(matches!(
            cmd.validate(),
            Err(CreateVehicleError::PlateValidation(_))
        ));
    }

    #[test]
    fn test_validation_plate_invalid_chars() {
        let mut cmd = base_command();
        cmd.license_plate = "ABC_1234!".to_string();
        assert!(matches!(
            cmd.validate(),
            Err(CreateVehicleError::PlateValidation(_))
        ));
    }

    #[test]
    fn test_validation_invalid_email() {
        let mut cmd = base_command();
        cmd.owner_email = Some("not-an-email".to_string());
        assert!(matches!(cmd.validate(), Err(CreateVehicleError::EmailInvalid(_))));
    }

    #[test]
    fn test_validation_owner_name_too_long() {
        let mut cmd = base_command();
        cmd.owner_name = Some("x".repeat(101));
        assert!(matches!(
            cmd.validate(),
            Err(CreateVehicleError::OwnerNameValidation(_))
        ));
    }

    #[test]
    fn test_validation_no_owner_fields_is_fine() {
        let mut cmd = base_command();
        cmd.owner_name = None;
        cmd.owner_phone = None;
        cmd.owner_email = None;
        assert!(cmd.validate().is_ok());
    }
}
