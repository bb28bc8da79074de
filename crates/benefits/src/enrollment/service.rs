use std::sync::Arc;

use super::domain::{
    Benefit, EmployeeEnrollment, EnrollmentRecord, EnrollmentSubmission, ReviewDecision,
    ReviewQueueEntry, StatusUpdateRequest, ValidationError,
};
use super::store::{EnrollmentStore, NewEnrollment, StoreError};

/// Service validating requests before they reach the store.
pub struct EnrollmentService<S> {
    store: Arc<S>,
}

impl<S> EnrollmentService<S>
where
    S: EnrollmentStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The full catalog, ordered by (category, name).
    pub async fn catalog(&self) -> Result<Vec<Benefit>, ServiceError> {
        Ok(self.store.list_benefits().await?)
    }

    /// Validate and insert a new `Pending` enrollment. Blank fields count
    /// as missing; duplicates surface as [`StoreError::Duplicate`].
    pub async fn submit(
        &self,
        submission: EnrollmentSubmission,
    ) -> Result<EnrollmentRecord, ServiceError> {
        let employee_id = required_text(submission.employee_id, "employee_id")?;
        let employee_name = required_text(submission.employee_name, "employee_name")?;
        let benefit_id = required_id(submission.benefit_id, "benefit_id")?;

        let enrollment = NewEnrollment {
            employee_id,
            employee_name,
            benefit_id,
        };
        Ok(self.store.insert_enrollment(&enrollment).await?)
    }

    /// Approved enrollments for one employee, newest first.
    pub async fn employee_enrollments(
        &self,
        employee_id: &str,
    ) -> Result<Vec<EmployeeEnrollment>, ServiceError> {
        Ok(self.store.enrollments_for_employee(employee_id).await?)
    }

    /// Every enrollment joined with benefit details, `Pending` first.
    pub async fn review_queue(&self) -> Result<Vec<ReviewQueueEntry>, ServiceError> {
        Ok(self.store.review_queue().await?)
    }

    /// Apply an HR decision. The target status is restricted to
    /// `Approved`/`Denied`; anything else is a validation error and the
    /// row is left untouched.
    pub async fn review(
        &self,
        request: StatusUpdateRequest,
    ) -> Result<ReviewDecision, ServiceError> {
        let enrollment_id = required_id(request.enrollment_id, "enrollment_id")?;
        let status = required_text(request.status, "status")?;
        let decision = ReviewDecision::from_label(&status)
            .ok_or_else(|| ValidationError::InvalidDecision(status))?;

        self.store.update_status(enrollment_id, decision).await?;
        Ok(decision)
    }
}

fn required_text(
    value: Option<String>,
    field: &'static str,
) -> Result<String, ValidationError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ValidationError::MissingField(field)),
    }
}

// Identifiers are SERIAL columns, so zero and negatives can never match a
// row; treat them like an absent field.
fn required_id(value: Option<i32>, field: &'static str) -> Result<i32, ValidationError> {
    match value {
        Some(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::MissingField(field)),
    }
}

/// Error raised by the enrollment service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
