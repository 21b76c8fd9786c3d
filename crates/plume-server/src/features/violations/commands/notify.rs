//! Notification marking commands
//!
//! The service records that a notification was sent; delivery itself is an
//! external collaborator. Marking is idempotent: the `WHERE NOT <flag>`
//! guard means the timestamp is written exactly once, and a repeat call
//! returns the unchanged record.

use chrono::{DateTime, Utc};
use plume_common::types::Severity;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Which party was notified about a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyTarget {
    Authority,
    Owner,
}

impl NotifyTarget {
    fn flag_column(self) -> &'static str {
        match self {
            Self::Authority => "authority_notified",
            Self::Owner => "owner_notified",
        }
    }

    fn timestamp_column(self) -> &'static str {
        match self {
            Self::Authority => "authority_notified_at",
            Self::Owner => "owner_notified_at",
        }
    }
}

impl std::fmt::Display for NotifyTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authority => write!(f, "authority"),
            Self::Owner => write!(f, "owner"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkNotifiedCommand {
    pub detection_id: Uuid,
    pub target: NotifyTarget,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkNotifiedResponse {
    pub id: Uuid,
    pub detection_id: Uuid,
    pub severity: Severity,
    pub authority_notified: bool,
    pub owner_notified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authority_notified_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_notified_at: Option<DateTime<Utc>>,
    /// False when the notification had already been marked
    pub newly_marked: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum MarkNotifiedError {
    #[error("Violation not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool), fields(detection_id = %command.detection_id, target = %command.target))]
pub async fn handle(
    pool: PgPool,
    command: MarkNotifiedCommand,
) -> Result<MarkNotifiedResponse, MarkNotifiedError> {
    let flag = command.target.flag_column();
    let stamp = command.target.timestamp_column();

    // Column names come from the enum above, never from input
    let update_sql = format!(
        r#"
        UPDATE violations
        SET {flag} = TRUE, {stamp} = now()
        WHERE detection_id = $1 AND NOT {flag}
        RETURNING id, detection_id, severity, authority_notified, owner_notified,
                  authority_notified_at, owner_notified_at
        "#
    );

    let updated = sqlx::query_as::<_, ViolationRow>(&update_sql)
        .bind(command.detection_id)
        .fetch_optional(&pool)
        .await?;

    if let Some(row) = updated {
        tracing::info!(violation_id = %row.id, "Notification marked");
        return Ok(row.into_response(true));
    }

    // Already marked, or the violation does not exist
    let existing = sqlx::query_as::<_, ViolationRow>(
        r#"
        SELECT id, detection_id, severity, authority_notified, owner_notified,
               authority_notified_at, owner_notified_at
        FROM violations
        WHERE detection_id = $1
        "#,
    )
    .bind(command.detection_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(MarkNotifiedError::NotFound)?;

    tracing::debug!(violation_id = %existing.id, "Notification was already marked");

    Ok(existing.into_response(false))
}

#[derive(Debug, sqlx::FromRow)]
struct ViolationRow {
    id: Uuid,
    detection_id: Uuid,
    severity: Severity,
    authority_notified: bool,
    owner_notified: bool,
    authority_notified_at: Option<DateTime<Utc>>,
    owner_notified_at: Option<DateTime<Utc>>,
}

impl ViolationRow {
    fn into_response(self, newly_marked: bool) -> MarkNotifiedResponse {
        MarkNotifiedResponse {
            id: self.id,
            detection_id: self.detection_id,
            severity: self.severity,
            authority_notified: self.authority_notified,
            owner_notified: self.owner_notified,
            authority_notified_at: self.authority_notified_at,
            owner_notified_at: self.owner_notified_at,
            newly_marked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_columns() {
        assert_eq!(NotifyTarget::Authority.flag_column(), "authority_notified");
        assert_eq!(
            NotifyTarget::Authority.timestamp_column(),
            "authority_notified_at"
        );
        assert_eq!(NotifyTarget::Owner.flag_column(), "owner_notified");
        assert_eq!(NotifyTarget::Owner.timestamp_column(), "owner_notified_at");
    }

    #[test]
    fn test_target_display() {
        assert_eq!(NotifyTarget::Authority.to_string(), "authority");
        assert_eq!(NotifyTarget::Owner.to_string(), "owner");
    }

    #[test]
    fn test_target_serde() {
        let target: NotifyTarget = serde_json::from_str("\"authority\"").unwrap();
        assert_eq!(target, NotifyTarget::Authority);
        assert!(serde_json::from_str::<NotifyTarget>("\"postman\"").is_err());
    }
}
