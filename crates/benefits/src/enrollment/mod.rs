//! Benefits catalog and enrollment workflow.
//!
//! The flow is intentionally flat: a catalog of benefits seeded at setup
//! time, enrollment submissions keyed by (employee, benefit), and an HR
//! review step that moves a `Pending` enrollment to `Approved` or `Denied`.
//! Storage sits behind [`EnrollmentStore`] so the service and router can be
//! exercised against the in-memory store while production runs on Postgres.

pub mod domain;
pub mod memory;
pub mod postgres;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    Benefit, EmployeeEnrollment, EnrollmentRecord, EnrollmentStatus, EnrollmentSubmission,
    ReviewDecision, ReviewQueueEntry, StatusUpdateRequest, ValidationError,
};
pub use memory::MemoryEnrollmentStore;
pub use postgres::PgEnrollmentStore;
pub use router::enrollment_router;
pub use service::{EnrollmentService, ServiceError};
pub use store::{EnrollmentStore, NewEnrollment, StoreError};
