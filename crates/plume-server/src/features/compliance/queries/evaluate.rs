//! Compliance evaluation
//!
//! Pure comparison of measured values against a standard's thresholds.
//! A detection is compliant when every threshold the standard defines is
//! met by the corresponding measurement. A missing measurement counts as
//! compliant for that field: absence of data is not treated as evidence of
//! a violation.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateComplianceQuery {
    pub detection_id: Uuid,
    pub standard_id: Uuid,
}

/// Measured values pulled from a detection and its nearest air quality data
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Measurements {
    pub smoke_opacity: Option<f64>,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub no2: Option<f64>,
    pub co: Option<f64>,
}

/// Threshold set from a compliance standard
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Thresholds {
    pub max_smoke_opacity: f64,
    pub max_pm25: Option<f64>,
    pub max_pm10: Option<f64>,
    pub max_no2: Option<f64>,
    pub max_co: Option<f64>,
}

/// Verdict for a single threshold comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldVerdict {
    /// Measurement present and within the threshold
    Compliant,
    /// Measurement present and above the threshold
    Exceeded,
    /// No measurement available for this field
    NoData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateComplianceResponse {
    pub detection_id: Uuid,
    pub standard_id: Uuid,
    pub is_compliant: bool,
    pub smoke_opacity: FieldVerdict,
    pub pm25: FieldVerdict,
    pub pm10: FieldVerdict,
    pub no2: FieldVerdict,
    pub co: FieldVerdict,
}

#[derive(Debug, thiserror::Error)]
pub enum EvaluateComplianceError {
    #[error("Detection not found")]
    DetectionNotFound,
    #[error("Compliance standard not found")]
    StandardNotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

fn check_field(measured: Option<f64>, threshold: Option<f64>) -> FieldVerdict {
    match (measured, threshold) {
        // No threshold defined means the field is unconstrained
        (_, None) => FieldVerdict::Compliant,
        (None, Some(_)) => FieldVerdict::NoData,
        (Some(m), Some(t)) => {
            if m <= t {
                FieldVerdict::Compliant
            } else {
                FieldVerdict::Exceeded
            }
        },
    }
}

/// Evaluate measurements against a standard's thresholds.
///
/// Compliant iff no field is `Exceeded`; `NoData` does not break compliance.
pub fn evaluate(measurements: &Measurements, thresholds: &Thresholds) -> [FieldVerdict; 5] {
    [
        check_field(measurements.smoke_opacity, Some(thresholds.max_smoke_opacity)),
        check_field(measurements.pm25, thresholds.max_pm25),
        check_field(measurements.pm10, thresholds.max_pm10),
        check_field(measurements.no2, thresholds.max_no2),
        check_field(measurements.co, thresholds.max_co),
    ]
}

#[tracing::instrument(
    skip(pool),
    fields(detection_id = %query.detection_id, standard_id = %query.standard_id)
)]
pub async fn handle(
    pool: PgPool,
    query: EvaluateComplianceQuery,
) -> Result<EvaluateComplianceResponse, EvaluateComplianceError> {
    let detection = sqlx::query_as::<_, DetectionRow>(
        "SELECT smoke_opacity, detected_at, camera_id FROM detections WHERE id = $1",
    )
    .bind(query.detection_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(EvaluateComplianceError::DetectionNotFound)?;

    let standard = sqlx::query_as::<_, StandardRow>(
        r#"
        SELECT max_smoke_opacity, max_pm25, max_pm10, max_no2, max_co
        FROM compliance_standards
        WHERE id = $1
        "#,
    )
    .bind(query.standard_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(EvaluateComplianceError::StandardNotFound)?;

    // Pollutant measurements come from the air quality series nearest to the
    // detection, at the camera's location, within an hour
    let air_quality = sqlx::query_as::<_, AirQualityRow>(
        r#"
        SELECT aq.pm25, aq.pm10, aq.no2, aq.co
        FROM air_quality_data aq
        JOIN cameras c ON c.id = $2
        WHERE aq.location = c.location
          AND aq.recorded_at BETWEEN $1 - interval '1 hour' AND $1 + interval '1 hour'
        ORDER BY ABS(EXTRACT(EPOCH FROM (aq.recorded_at - $1)))
        LIMIT 1
        "#,
    )
    .bind(detection.detected_at)
    .bind(detection.camera_id)
    .fetch_optional(&pool)
    .await?;

    let measurements = Measurements {
        smoke_opacity: detection.smoke_opacity,
        pm25: air_quality.as_ref().and_then(|aq| aq.pm25),
        pm10: air_quality.as_ref().and_then(|aq| aq.pm10),
        no2: air_quality.as_ref().and_then(|aq| aq.no2),
        co: air_quality.as_ref().and_then(|aq| aq.co),
    };

    let thresholds = Thresholds {
        max_smoke_opacity: standard.max_smoke_opacity,
        max_pm25: standard.max_pm25,
        max_pm10: standard.max_pm10,
        max_no2: standard.max_no2,
        max_co: standard.max_co,
    };

    let [smoke_opacity, pm25, pm10, no2, co] = evaluate(&measurements, &thresholds);
    let is_compliant = [smoke_opacity, pm25, pm10, no2, co]
        .iter()
        .all(|v| *v != FieldVerdict::Exceeded);

    tracing::info!(is_compliant, "Compliance evaluated");

    Ok(EvaluateComplianceResponse {
        detection_id: query.detection_id,
        standard_id: query.standard_id,
        is_compliant,
        smoke_opacity,
        pm25,
        pm10,
        no2,
        co,
    })
}

#[derive(Debug, sqlx::FromRow)]
struct DetectionRow {
    smoke_opacity: Option<f64>,
    detected_at: chrono::DateTime<chrono::Utc>,
    camera_id: Uuid,
}

#[derive(Debug, sqlx::FromRow)]
struct StandardRow {
    max_smoke_opacity: f64,
    max_pm25: Option<f64>,
    max_pm10: Option<f64>,
    max_no2: Option<f64>,
    max_co: Option<f64>,
}

#[derive(Debug, sqlx::FromRow)]
struct AirQualityRow {
    pm25: Option<f64>,
    pm10: Option<f64>,
    no2: Option<f64>,
    co: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> Thresholds {
        Thresholds {
            max_smoke_opacity: 20.0,
            max_pm25: Some(25.0),
            max_pm10: Some(50.0),
            max_no2: None,
            max_co: None,
        }
    }

    fn is_compliant(verdicts: [FieldVerdict; 5]) -> bool {
        verdicts.iter().all(|v| *v != FieldVerdict::Exceeded)
    }

    #[test]
    fn test_all_within_thresholds() {
        let measurements = Measurements {
            smoke_opacity: Some(15.0),
            pm25: Some(10.0),
            pm10: Some(30.0),
            no2: Some(999.0),
            co: None,
        };
        let verdicts = evaluate(&measurements, &thresholds());
        assert!(is_compliant(verdicts));
        // no2 has no threshold, so even an extreme value is unconstrained
        assert_eq!(verdicts[3], FieldVerdict::Compliant);
    }

    #[test]
    fn test_exceeded_opacity_breaks_compliance() {
        let measurements = Measurements {
            smoke_opacity: Some(20.1),
            ..Default::default()
        };
        let verdicts = evaluate(&measurements, &thresholds());
        assert_eq!(verdicts[0], FieldVerdict::Exceeded);
        assert!(!is_compliant(verdicts));
    }

    #[test]
    fn test_threshold_boundary_is_compliant() {
        let measurements = Measurements {
            smoke_opacity: Some(20.0),
            pm25: Some(25.0),
            ..Default::default()
        };
        let verdicts = evaluate(&measurements, &thresholds());
        assert!(is_compliant(verdicts));
    }

    #[test]
    fn test_missing_measurement_is_compliant_by_default() {
        // Deliberate policy: absence of data never counts as a violation,
        // even though the standard defines a threshold for the field.
        let measurements = Measurements::default();
        let verdicts = evaluate(&measurements, &thresholds());
        assert_eq!(verdicts[0], FieldVerdict::NoData);
        assert_eq!(verdicts[1], FieldVerdict::NoData);
        assert!(is_compliant(verdicts));
    }

    #[test]
    fn test_single_exceeded_field_dominates() {
        let measurements = Measurements {
            smoke_opacity: Some(5.0),
            pm25: Some(26.0),
            pm10: None,
            no2: None,
            co: None,
        };
        let verdicts = evaluate(&measurements, &thresholds());
        assert_eq!(verdicts[1], FieldVerdict::Exceeded);
        assert!(!is_compliant(verdicts));
    }
}
