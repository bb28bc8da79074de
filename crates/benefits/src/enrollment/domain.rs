use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog entry an employee may enroll in. Rows are seeded at setup time
/// and read-only through the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Benefit {
    pub id: i32,
    pub benefit_name: String,
    pub category: String,
    pub provider: Option<String>,
    pub description: String,
    pub link: Option<String>,
}

/// Review state of an enrollment. Submissions start `Pending`; only HR
/// review moves a row to `Approved` or `Denied`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrollmentStatus {
    Pending,
    Approved,
    Denied,
}

impl EnrollmentStatus {
    pub fn label(self) -> &'static str {
        match self {
            EnrollmentStatus::Pending => "Pending",
            EnrollmentStatus::Approved => "Approved",
            EnrollmentStatus::Denied => "Denied",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(EnrollmentStatus::Pending),
            "Approved" => Some(EnrollmentStatus::Approved),
            "Denied" => Some(EnrollmentStatus::Denied),
            _ => None,
        }
    }
}

/// The two outcomes HR may assign. Deliberately narrower than
/// [`EnrollmentStatus`]: review can never move a row back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewDecision {
    Approved,
    Denied,
}

impl ReviewDecision {
    pub fn label(self) -> &'static str {
        self.status().label()
    }

    pub fn status(self) -> EnrollmentStatus {
        match self {
            ReviewDecision::Approved => EnrollmentStatus::Approved,
            ReviewDecision::Denied => EnrollmentStatus::Denied,
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value {
            "Approved" => Some(ReviewDecision::Approved),
            "Denied" => Some(ReviewDecision::Denied),
            _ => None,
        }
    }
}

/// Raw enrollment request body. Fields are optional so that absence is a
/// validation error (400) rather than a deserialization rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrollmentSubmission {
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub employee_name: Option<String>,
    #[serde(default)]
    pub benefit_id: Option<i32>,
}

/// Raw HR status-update request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    #[serde(default)]
    pub enrollment_id: Option<i32>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A stored enrollment row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub enrollment_id: i32,
    pub employee_id: String,
    pub employee_name: String,
    pub benefit_id: i32,
    pub enrollment_date: DateTime<Utc>,
    pub status: EnrollmentStatus,
}

/// Employee-facing view: an enrollment joined with its benefit details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeEnrollment {
    pub benefit_name: String,
    pub category: String,
    pub enrollment_date: DateTime<Utc>,
    pub status: EnrollmentStatus,
}

/// HR-facing view over the full review queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewQueueEntry {
    pub enrollment_id: i32,
    pub employee_id: String,
    pub employee_name: String,
    pub benefit_name: String,
    pub enrollment_date: DateTime<Utc>,
    pub status: EnrollmentStatus,
}

/// Input validation failures, mapped to 400 by the router.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("'{0}' is not a valid review decision")]
    InvalidDecision(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_round_trip() {
        for status in [
            EnrollmentStatus::Pending,
            EnrollmentStatus::Approved,
            EnrollmentStatus::Denied,
        ] {
            assert_eq!(EnrollmentStatus::from_label(status.label()), Some(status));
        }
        assert_eq!(EnrollmentStatus::from_label("Cancelled"), None);
    }

    #[test]
    fn review_decision_rejects_pending() {
        assert_eq!(ReviewDecision::from_label("Approved"), Some(ReviewDecision::Approved));
        assert_eq!(ReviewDecision::from_label("Denied"), Some(ReviewDecision::Denied));
        assert_eq!(ReviewDecision::from_label("Pending"), None);
        assert_eq!(ReviewDecision::from_label("approved"), None);
    }

    #[test]
    fn submission_tolerates_missing_fields() {
        let submission: EnrollmentSubmission =
            serde_json::from_str(r#"{"employee_id":"E1"}"#).expect("partial body deserializes");
        assert_eq!(submission.employee_id.as_deref(), Some("E1"));
        assert!(submission.employee_name.is_none());
        assert!(submission.benefit_id.is_none());
    }
}
