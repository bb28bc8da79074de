use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use super::domain::{
    Benefit, EmployeeEnrollment, EnrollmentRecord, EnrollmentStatus, ReviewDecision,
    ReviewQueueEntry,
};
use super::store::{EnrollmentStore, NewEnrollment, StoreError};

/// In-memory [`EnrollmentStore`] mirroring the Postgres semantics: the
/// unique (employee, benefit) constraint, the `Approved`-only employee
/// view, and the `Pending`-first review queue ordering. Used by tests;
/// production state lives in Postgres.
#[derive(Default)]
pub struct MemoryEnrollmentStore {
    inner: Mutex<Inner>,
}

struct Inner {
    benefits: Vec<Benefit>,
    enrollments: Vec<EnrollmentRecord>,
    next_id: i32,
}

// Ids mirror a SERIAL column and start at 1.
impl Default for Inner {
    fn default() -> Self {
        Self {
            benefits: Vec::new(),
            enrollments: Vec::new(),
            next_id: 1,
        }
    }
}

impl MemoryEnrollmentStore {
    pub fn with_catalog(benefits: Vec<Benefit>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                benefits,
                enrollments: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Snapshot of the raw enrollment rows, for assertions.
    pub fn enrollments(&self) -> Vec<EnrollmentRecord> {
        self.inner
            .lock()
            .expect("store mutex poisoned")
            .enrollments
            .clone()
    }
}

#[async_trait]
impl EnrollmentStore for MemoryEnrollmentStore {
    async fn list_benefits(&self) -> Result<Vec<Benefit>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        let mut rows = guard.benefits.clone();
        rows.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.benefit_name.cmp(&b.benefit_name))
        });
        Ok(rows)
    }

    async fn insert_enrollment(
        &self,
        enrollment: &NewEnrollment,
    ) -> Result<EnrollmentRecord, StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");

        if guard.enrollments.iter().any(|row| {
            row.employee_id == enrollment.employee_id && row.benefit_id == enrollment.benefit_id
        }) {
            return Err(StoreError::Duplicate);
        }
        if !guard.benefits.iter().any(|b| b.id == enrollment.benefit_id) {
            // Matches the foreign-key violation path: a generic backend error.
            return Err(StoreError::Backend(format!(
                "benefit {} does not exist",
                enrollment.benefit_id
            )));
        }

        let id = guard.next_id;
        guard.next_id += 1;

        // Offset by the sequence so insertion order survives same-instant inserts.
        let record = EnrollmentRecord {
            enrollment_id: id,
            employee_id: enrollment.employee_id.clone(),
            employee_name: enrollment.employee_name.clone(),
            benefit_id: enrollment.benefit_id,
            enrollment_date: Utc::now() + Duration::milliseconds(i64::from(id)),
            status: EnrollmentStatus::Pending,
        };
        guard.enrollments.push(record.clone());
        Ok(record)
    }

    async fn enrollments_for_employee(
        &self,
        employee_id: &str,
    ) -> Result<Vec<EmployeeEnrollment>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        let mut rows: Vec<EmployeeEnrollment> = guard
            .enrollments
            .iter()
            .filter(|row| {
                row.employee_id == employee_id && row.status == EnrollmentStatus::Approved
            })
            .filter_map(|row| {
                let benefit = guard.benefits.iter().find(|b| b.id == row.benefit_id)?;
                Some(EmployeeEnrollment {
                    benefit_name: benefit.benefit_name.clone(),
                    category: benefit.category.clone(),
                    enrollment_date: row.enrollment_date,
                    status: row.status,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.enrollment_date.cmp(&a.enrollment_date));
        Ok(rows)
    }

    async fn review_queue(&self) -> Result<Vec<ReviewQueueEntry>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        let mut rows: Vec<ReviewQueueEntry> = guard
            .enrollments
            .iter()
            .filter_map(|row| {
                let benefit = guard.benefits.iter().find(|b| b.id == row.benefit_id)?;
                Some(ReviewQueueEntry {
                    enrollment_id: row.enrollment_id,
                    employee_id: row.employee_id.clone(),
                    employee_name: row.employee_name.clone(),
                    benefit_name: benefit.benefit_name.clone(),
                    enrollment_date: row.enrollment_date,
                    status: row.status,
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            let rank = |status: EnrollmentStatus| u8::from(status != EnrollmentStatus::Pending);
            rank(a.status)
                .cmp(&rank(b.status))
                .then_with(|| b.enrollment_date.cmp(&a.enrollment_date))
        });
        Ok(rows)
    }

    async fn update_status(
        &self,
        enrollment_id: i32,
        decision: ReviewDecision,
    ) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        let row = guard
            .enrollments
            .iter_mut()
            .find(|row| row.enrollment_id == enrollment_id)
            .ok_or(StoreError::NotFound)?;
        row.status = decision.status();
        Ok(())
    }
}
