//! Common domain types used across plume
//!
//! The closed enumerations here mirror the PostgreSQL enum types created by
//! the initial migration. Each implements `FromStr` (for query-string
//! parsing) and `Display`, and derives `sqlx::Type` so it can be bound and
//! decoded directly against the corresponding database type.

use serde::{Deserialize, Serialize};

use crate::error::PlumeError;

/// Checksum algorithm type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChecksumAlgorithm {
    Sha256,
    Sha512,
}

impl std::fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChecksumAlgorithm::Sha256 => write!(f, "sha256"),
            ChecksumAlgorithm::Sha512 => write!(f, "sha512"),
        }
    }
}

// ============================================================================
// Domain Enumerations
// ============================================================================

/// Vehicle classification for the vehicle registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "vehicle_type", rename_all = "snake_case")]
pub enum VehicleType {
    Car,
    Truck,
    Bus,
    Motorcycle,
    Other,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Car => "car",
            VehicleType::Truck => "truck",
            VehicleType::Bus => "bus",
            VehicleType::Motorcycle => "motorcycle",
            VehicleType::Other => "other",
        }
    }
}

impl std::str::FromStr for VehicleType {
    type Err = PlumeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "car" => Ok(VehicleType::Car),
            "truck" => Ok(VehicleType::Truck),
            "bus" => Ok(VehicleType::Bus),
            "motorcycle" => Ok(VehicleType::Motorcycle),
            "other" => Ok(VehicleType::Other),
            _ => Err(PlumeError::InvalidEnumValue {
                field: "vehicle_type",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Review workflow state of a detection record.
///
/// A detection starts at `Pending`; the three other states are terminal
/// reviewer decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "review_status", rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Confirmed,
    FalsePositive,
    Disputed,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Confirmed => "confirmed",
            ReviewStatus::FalsePositive => "false_positive",
            ReviewStatus::Disputed => "disputed",
        }
    }

    /// Whether this status accepts no further transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReviewStatus::Pending)
    }
}

impl std::str::FromStr for ReviewStatus {
    type Err = PlumeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReviewStatus::Pending),
            "confirmed" => Ok(ReviewStatus::Confirmed),
            "false_positive" => Ok(ReviewStatus::FalsePositive),
            "disputed" => Ok(ReviewStatus::Disputed),
            _ => Err(PlumeError::InvalidEnumValue {
                field: "review_status",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity of a confirmed emissions violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "severity", rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = PlumeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            _ => Err(PlumeError::InvalidEnumValue {
                field: "severity",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// EPA-style Air Quality Index category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "aqi_category", rename_all = "snake_case")]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AqiCategory::Good => "good",
            AqiCategory::Moderate => "moderate",
            AqiCategory::UnhealthySensitive => "unhealthy_sensitive",
            AqiCategory::Unhealthy => "unhealthy",
            AqiCategory::VeryUnhealthy => "very_unhealthy",
            AqiCategory::Hazardous => "hazardous",
        }
    }

    /// Category implied by a numeric AQI value, per the standard breakpoints.
    pub fn from_aqi(aqi: i32) -> Self {
        match aqi {
            i32::MIN..=50 => AqiCategory::Good,
            51..=100 => AqiCategory::Moderate,
            101..=150 => AqiCategory::UnhealthySensitive,
            151..=200 => AqiCategory::Unhealthy,
            201..=300 => AqiCategory::VeryUnhealthy,
            _ => AqiCategory::Hazardous,
        }
    }

    /// Whether this category is consistent with the given numeric AQI.
    pub fn matches_aqi(&self, aqi: i32) -> bool {
        *self == Self::from_aqi(aqi)
    }
}

impl std::str::FromStr for AqiCategory {
    type Err = PlumeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(AqiCategory::Good),
            "moderate" => Ok(AqiCategory::Moderate),
            "unhealthy_sensitive" => Ok(AqiCategory::UnhealthySensitive),
            "unhealthy" => Ok(AqiCategory::Unhealthy),
            "very_unhealthy" => Ok(AqiCategory::VeryUnhealthy),
            "hazardous" => Ok(AqiCategory::Hazardous),
            _ => Err(PlumeError::InvalidEnumValue {
                field: "aqi_category",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a location's air quality over a measurement period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "air_quality_trend", rename_all = "snake_case")]
pub enum AirQualityTrend {
    Improving,
    Stable,
    Declining,
}

impl AirQualityTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            AirQualityTrend::Improving => "improving",
            AirQualityTrend::Stable => "stable",
            AirQualityTrend::Declining => "declining",
        }
    }
}

impl std::str::FromStr for AirQualityTrend {
    type Err = PlumeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "improving" => Ok(AirQualityTrend::Improving),
            "stable" => Ok(AirQualityTrend::Stable),
            "declining" => Ok(AirQualityTrend::Declining),
            _ => Err(PlumeError::InvalidEnumValue {
                field: "air_quality_trend",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for AirQualityTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_status_round_trip() {
        for status in [
            ReviewStatus::Pending,
            ReviewStatus::Confirmed,
            ReviewStatus::FalsePositive,
            ReviewStatus::Disputed,
        ] {
            let parsed: ReviewStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_review_status_invalid() {
        let result: Result<ReviewStatus, _> = "approved".parse();
        assert!(matches!(
            result,
            Err(PlumeError::InvalidEnumValue { field: "review_status", .. })
        ));
    }

    #[test]
    fn test_review_status_terminality() {
        assert!(!ReviewStatus::Pending.is_terminal());
        assert!(ReviewStatus::Confirmed.is_terminal());
        assert!(ReviewStatus::FalsePositive.is_terminal());
        assert!(ReviewStatus::Disputed.is_terminal());
    }

    #[test]
    fn test_vehicle_type_parse() {
        assert_eq!("truck".parse::<VehicleType>().unwrap(), VehicleType::Truck);
        assert!("bicycle".parse::<VehicleType>().is_err());
    }

    #[test]
    fn test_aqi_category_breakpoints() {
        assert_eq!(AqiCategory::from_aqi(0), AqiCategory::Good);
        assert_eq!(AqiCategory::from_aqi(50), AqiCategory::Good);
        assert_eq!(AqiCategory::from_aqi(51), AqiCategory::Moderate);
        assert_eq!(AqiCategory::from_aqi(150), AqiCategory::UnhealthySensitive);
        assert_eq!(AqiCategory::from_aqi(151), AqiCategory::Unhealthy);
        assert_eq!(AqiCategory::from_aqi(300), AqiCategory::VeryUnhealthy);
        assert_eq!(AqiCategory::from_aqi(301), AqiCategory::Hazardous);
        assert_eq!(AqiCategory::from_aqi(999), AqiCategory::Hazardous);
    }

    #[test]
    fn test_aqi_category_consistency() {
        assert!(AqiCategory::Moderate.matches_aqi(75));
        assert!(!AqiCategory::Good.matches_aqi(75));
    }

    #[test]
    fn test_severity_serde_rename() {
        let json = serde_json::to_string(&Severity::High).unwrap();
        assert_eq!(json, "\"high\"");
        let back: Severity = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(back, Severity::Low);
    }

    #[test]
    fn test_trend_parse() {
        assert_eq!(
            "improving".parse::<AirQualityTrend>().unwrap(),
            AirQualityTrend::Improving
        );
        assert!("flat".parse::<AirQualityTrend>().is_err());
    }
}
