use chrono::{DateTime, NaiveDate, Utc};
use plume_common::types::VehicleType;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetVehicleQuery {
    pub license_plate: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetVehicleResponse {
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

#[derive(Debug, thiserror::Error)]
pub enum GetVehicleError {
    #[error("License plate is required")]
    PlateRequired,
    #[error("Vehicle not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl GetVehicleQuery {
    pub fn validate(&self) -> Result<(), GetVehicleError> {
        if self.license_plate.trim().is_empty() {
            return Err(GetVehicleError::PlateRequired);
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: GetVehicleQuery,
) -> Result<GetVehicleResponse, GetVehicleError> {
    query.validate()?;

    let record = sqlx::query_as::<_, VehicleRecord>(
        r#"
        SELECT id, license_plate, vehicle_type, owner_name, owner_phone, owner_email,
               registration_date, created_at
        FROM vehicles
        WHERE UPPER(license_plate) = UPPER($1)
        "#,
    )
    .bind(&query.license_plate)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetVehicleError::NotFound)?;

    Ok(GetVehicleResponse {
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

    #[test]
    fn test_validation_requires_plate() {
        let query = GetVehicleQuery {
            license_plate: "  ".to_string(),
        };
        assert!(matches!(query.validate(), Err(GetVehicleError::PlateRequired)));
    }

    #[test]
    fn test_validation_success() {
        let query = GetVehicleQuery {
            license_plate: "ABC-1234".to_string(),
        };
        assert!(query.validate().is_ok());
    }
}
