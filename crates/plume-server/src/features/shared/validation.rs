//! Shared validation utilities
//!
//! Common validation functions for input data across commands and queries.

use thiserror::Error;

/// Errors that can occur during license plate validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlateValidationError {
    #[error("License plate is required and cannot be empty")]
    Required,

    #[error("License plate must be between 1 and {max_length} characters")]
    TooLong { max_length: usize },

    #[error("License plate can only contain letters, numbers, hyphens, and spaces")]
    InvalidFormat,
}

/// Errors that can occur during name validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    #[error("{field} is required and cannot be empty")]
    Required { field: &'static str },

    #[error("{field} must be between 1 and {max_length} characters")]
    TooLong {
        field: &'static str,
        max_length: usize,
    },

    #[error("{field} can only contain letters, numbers, hyphens, and underscores")]
    InvalidFormat { field: &'static str },
}

/// Errors that can occur during numeric range validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RangeValidationError {
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Validate a license plate
///
/// # Rules
/// - Must not be empty (after trimming whitespace)
/// - Must not exceed max_length characters
/// - Must contain only ASCII letters, digits, hyphens, and spaces
pub fn validate_plate(plate: &str, max_length: usize) -> Result<(), PlateValidationError> {
    if plate.trim().is_empty() {
        return Err(PlateValidationError::Required);
    }

    if plate.len() > max_length {
        return Err(PlateValidationError::TooLong { max_length });
    }

    if !plate
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ' ')
    {
        return Err(PlateValidationError::InvalidFormat);
    }

    Ok(())
}

/// Canonical storage form of a license plate: trimmed and uppercased.
///
/// Plates are stored in this form so the case-sensitive uniqueness
/// constraint matches the case-insensitive lookups.
pub fn normalize_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}

/// Validate a required text field
pub fn validate_name(
    name: &str,
    field: &'static str,
    max_length: usize,
) -> Result<(), NameValidationError> {
    if name.trim().is_empty() {
        return Err(NameValidationError::Required { field });
    }

    if name.len() > max_length {
        return Err(NameValidationError::TooLong { field, max_length });
    }

    Ok(())
}

/// Validate a public identifier
///
/// Identifiers end up in URL paths and storage keys, so the charset is
/// restricted to ASCII letters, digits, hyphens, and underscores.
pub fn validate_identifier(
    id: &str,
    field: &'static str,
    max_length: usize,
) -> Result<(), NameValidationError> {
    validate_name(id, field, max_length)?;

    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(NameValidationError::InvalidFormat { field });
    }

    Ok(())
}

/// Validate that a value lies within a closed range
pub fn validate_range(
    value: f64,
    field: &'static str,
    min: f64,
    max: f64,
) -> Result<(), RangeValidationError> {
    if value < min || value > max || value.is_nan() {
        return Err(RangeValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Validate an optional value against a closed range
pub fn validate_optional_range(
    value: Option<f64>,
    field: &'static str,
    min: f64,
    max: f64,
) -> Result<(), RangeValidationError> {
    if let Some(value) = value {
        validate_range(value, field, min, max)?;
    }
    Ok(())
}

/// Validate latitude/longitude, either both present or both absent
pub fn validate_coordinates(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<(), RangeValidationError> {
    validate_optional_range(latitude, "latitude", -90.0, 90.0)?;
    validate_optional_range(longitude, "longitude", -180.0, 180.0)?;
    Ok(())
}

/// Check that an email address has a plausible shape.
///
/// This is a basic check (one '@' with non-empty local and domain parts,
/// domain containing a dot), not full RFC 5322 validation.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
