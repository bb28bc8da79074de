use async_trait::async_trait;

use super::domain::{
    Benefit, EmployeeEnrollment, EnrollmentRecord, ReviewDecision, ReviewQueueEntry,
};

/// A validated enrollment request, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEnrollment {
    pub employee_id: String,
    pub employee_name: String,
    pub benefit_id: i32,
}

/// Storage abstraction so the service and router can be exercised in
/// isolation. Implementations own all ordering and join semantics:
///
/// - `list_benefits` orders by (category, benefit_name) ascending.
/// - `enrollments_for_employee` returns only `Approved` rows, newest first.
/// - `review_queue` sorts `Pending` rows before decided ones, each group
///   newest first.
#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    async fn list_benefits(&self) -> Result<Vec<Benefit>, StoreError>;

    /// Insert a `Pending` enrollment with a store-assigned timestamp.
    /// A second insert for the same (employee, benefit) pair must fail
    /// with [`StoreError::Duplicate`], never overwrite.
    async fn insert_enrollment(&self, enrollment: &NewEnrollment)
        -> Result<EnrollmentRecord, StoreError>;

    async fn enrollments_for_employee(
        &self,
        employee_id: &str,
    ) -> Result<Vec<EmployeeEnrollment>, StoreError>;

    async fn review_queue(&self) -> Result<Vec<ReviewQueueEntry>, StoreError>;

    /// Apply an HR decision to a single row. Unknown ids yield
    /// [`StoreError::NotFound`].
    async fn update_status(
        &self,
        enrollment_id: i32,
        decision: ReviewDecision,
    ) -> Result<(), StoreError>;
}

/// Error enumeration for store failures. Everything the router cannot act
/// on specifically collapses into `Backend` and surfaces as a 500.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("enrollment already exists for this employee and benefit")]
    Duplicate,
    #[error("enrollment not found")]
    NotFound,
    #[error("storage failure: {0}")]
    Backend(String),
}
