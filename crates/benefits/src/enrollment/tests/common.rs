use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::enrollment::domain::{
    Benefit, EmployeeEnrollment, EnrollmentRecord, EnrollmentSubmission, ReviewDecision,
    ReviewQueueEntry, StatusUpdateRequest,
};
use crate::enrollment::memory::MemoryEnrollmentStore;
use crate::enrollment::service::EnrollmentService;
use crate::enrollment::store::{EnrollmentStore, NewEnrollment, StoreError};

pub(super) fn benefit(id: i32, name: &str, category: &str) -> Benefit {
    Benefit {
        id,
        benefit_name: name.to_string(),
        category: category.to_string(),
        provider: Some("Internal".to_string()),
        description: format!("{name} coverage details."),
        link: Some("#".to_string()),
    }
}

pub(super) fn catalog() -> Vec<Benefit> {
    vec![
        benefit(1, "Health Insurance Plan", "Health & Wellness"),
        benefit(2, "401(k) Retirement Plan", "Financial"),
        benefit(3, "Paid Time Off (PTO)", "Time Off"),
    ]
}

pub(super) fn build_service() -> (
    Arc<EnrollmentService<MemoryEnrollmentStore>>,
    Arc<MemoryEnrollmentStore>,
) {
    let store = Arc::new(MemoryEnrollmentStore::with_catalog(catalog()));
    let service = Arc::new(EnrollmentService::new(store.clone()));
    (service, store)
}

pub(super) fn submission(employee_id: &str, benefit_id: i32) -> EnrollmentSubmission {
    EnrollmentSubmission {
        employee_id: Some(employee_id.to_string()),
        employee_name: Some("Jane Doe".to_string()),
        benefit_id: Some(benefit_id),
    }
}

pub(super) fn status_update(enrollment_id: i32, status: &str) -> StatusUpdateRequest {
    StatusUpdateRequest {
        enrollment_id: Some(enrollment_id),
        status: Some(status.to_string()),
    }
}

/// Store stub whose every operation reports a backend failure.
pub(super) struct OfflineStore;

#[async_trait]
impl EnrollmentStore for OfflineStore {
    async fn list_benefits(&self) -> Result<Vec<Benefit>, StoreError> {
        Err(StoreError::Backend("store offline".to_string()))
    }

    async fn insert_enrollment(
        &self,
        _enrollment: &NewEnrollment,
    ) -> Result<EnrollmentRecord, StoreError> {
        Err(StoreError::Backend("store offline".to_string()))
    }

    async fn enrollments_for_employee(
        &self,
        _employee_id: &str,
    ) -> Result<Vec<EmployeeEnrollment>, StoreError> {
        Err(StoreError::Backend("store offline".to_string()))
    }

    async fn review_queue(&self) -> Result<Vec<ReviewQueueEntry>, StoreError> {
        Err(StoreError::Backend("store offline".to_string()))
    }

    async fn update_status(
        &self,
        _enrollment_id: i32,
        _decision: ReviewDecision,
    ) -> Result<(), StoreError> {
        Err(StoreError::Backend("store offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is json")
}
