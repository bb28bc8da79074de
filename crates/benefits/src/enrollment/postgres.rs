use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use super::domain::{
    Benefit, EmployeeEnrollment, EnrollmentRecord, EnrollmentStatus, ReviewDecision,
    ReviewQueueEntry,
};
use super::store::{EnrollmentStore, NewEnrollment, StoreError};
use crate::config::DatabaseConfig;

/// SQLSTATE code Postgres reports for unique-constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

const CREATE_BENEFITS: &str = r#"
CREATE TABLE IF NOT EXISTS benefits (
    id SERIAL PRIMARY KEY,
    benefit_name VARCHAR(100) NOT NULL UNIQUE,
    category VARCHAR(50) NOT NULL,
    provider VARCHAR(100),
    description TEXT NOT NULL,
    link VARCHAR(255)
)
"#;

const CREATE_ENROLLMENTS: &str = r#"
CREATE TABLE IF NOT EXISTS benefit_enrollments (
    enrollment_id SERIAL PRIMARY KEY,
    employee_id VARCHAR(50) NOT NULL,
    employee_name VARCHAR(100) NOT NULL,
    benefit_id INTEGER NOT NULL REFERENCES benefits(id),
    enrollment_date TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
    status VARCHAR(20) NOT NULL DEFAULT 'Pending',
    UNIQUE(employee_id, benefit_id)
)
"#;

struct SeedBenefit {
    name: &'static str,
    category: &'static str,
    provider: &'static str,
    description: &'static str,
    link: &'static str,
}

const SAMPLE_BENEFITS: &[SeedBenefit] = &[
    SeedBenefit {
        name: "Health Insurance Plan",
        category: "Health & Wellness",
        provider: "BlueCross",
        description: "Comprehensive medical, dental, and vision coverage.",
        link: "#",
    },
    SeedBenefit {
        name: "401(k) Retirement Plan",
        category: "Financial",
        provider: "Fidelity",
        description: "Company-matching contributions up to 5%.",
        link: "#",
    },
    SeedBenefit {
        name: "Paid Time Off (PTO)",
        category: "Time Off",
        provider: "Internal",
        description: "Generous vacation, sick leave, and personal days.",
        link: "#",
    },
    SeedBenefit {
        name: "Professional Development",
        category: "Career",
        provider: "Udemy",
        description: "Access to online courses and a yearly conference budget.",
        link: "#",
    },
];

/// PostgreSQL-backed [`EnrollmentStore`]. All requests share the pool;
/// the database's constraint machinery serializes conflicting writes.
#[derive(Clone)]
pub struct PgEnrollmentStore {
    pool: PgPool,
}

impl PgEnrollmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.connection_url())
            .await
            .map_err(map_sqlx)?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Idempotently create both tables and seed the sample catalog inside
    /// one transaction. Runs before the listener binds; any failure rolls
    /// back and is fatal to startup.
    pub async fn setup(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        sqlx::query(CREATE_BENEFITS)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        sqlx::query(CREATE_ENROLLMENTS)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;

        for benefit in SAMPLE_BENEFITS {
            sqlx::query(
                "INSERT INTO benefits (benefit_name, category, provider, description, link) \
                 VALUES ($1, $2, $3, $4, $5) ON CONFLICT (benefit_name) DO NOTHING",
            )
            .bind(benefit.name)
            .bind(benefit.category)
            .bind(benefit.provider)
            .bind(benefit.description)
            .bind(benefit.link)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        }

        tx.commit().await.map_err(map_sqlx)?;
        info!("schema ready, sample benefits checked/inserted");
        Ok(())
    }
}

#[async_trait]
impl EnrollmentStore for PgEnrollmentStore {
    async fn list_benefits(&self) -> Result<Vec<Benefit>, StoreError> {
        sqlx::query_as::<_, Benefit>(
            "SELECT id, benefit_name, category, provider, description, link \
             FROM benefits ORDER BY category, benefit_name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn insert_enrollment(
        &self,
        enrollment: &NewEnrollment,
    ) -> Result<EnrollmentRecord, StoreError> {
        let row = sqlx::query_as::<_, EnrollmentRow>(
            "INSERT INTO benefit_enrollments (employee_id, employee_name, benefit_id, status) \
             VALUES ($1, $2, $3, $4) \
             RETURNING enrollment_id, employee_id, employee_name, benefit_id, enrollment_date, status",
        )
        .bind(&enrollment.employee_id)
        .bind(&enrollment.employee_name)
        .bind(enrollment.benefit_id)
        .bind(EnrollmentStatus::Pending.label())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.try_into()
    }

    async fn enrollments_for_employee(
        &self,
        employee_id: &str,
    ) -> Result<Vec<EmployeeEnrollment>, StoreError> {
        let rows = sqlx::query_as::<_, EmployeeEnrollmentRow>(
            "SELECT b.benefit_name, b.category, e.enrollment_date, e.status \
             FROM benefit_enrollments e \
             JOIN benefits b ON e.benefit_id = b.id \
             WHERE e.employee_id = $1 AND e.status = $2 \
             ORDER BY e.enrollment_date DESC",
        )
        .bind(employee_id)
        .bind(EnrollmentStatus::Approved.label())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn review_queue(&self) -> Result<Vec<ReviewQueueEntry>, StoreError> {
        let rows = sqlx::query_as::<_, ReviewQueueRow>(
            "SELECT e.enrollment_id, e.employee_id, e.employee_name, b.benefit_name, \
                    e.enrollment_date, e.status \
             FROM benefit_enrollments e \
             JOIN benefits b ON e.benefit_id = b.id \
             ORDER BY CASE e.status WHEN 'Pending' THEN 1 ELSE 2 END, e.enrollment_date DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn update_status(
        &self,
        enrollment_id: i32,
        decision: ReviewDecision,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE benefit_enrollments SET status = $1 WHERE enrollment_id = $2",
        )
        .bind(decision.label())
        .bind(enrollment_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

fn map_sqlx(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db) = err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::Duplicate;
        }
    }
    StoreError::Backend(err.to_string())
}

fn parse_status(value: &str) -> Result<EnrollmentStatus, StoreError> {
    EnrollmentStatus::from_label(value)
        .ok_or_else(|| StoreError::Backend(format!("unknown enrollment status '{value}'")))
}

// Row shapes keep the `status` column textual; conversion into domain
// types is the one place an unexpected label can surface.

#[derive(sqlx::FromRow)]
struct EnrollmentRow {
    enrollment_id: i32,
    employee_id: String,
    employee_name: String,
    benefit_id: i32,
    enrollment_date: DateTime<Utc>,
    status: String,
}

impl TryFrom<EnrollmentRow> for EnrollmentRecord {
    type Error = StoreError;

    fn try_from(row: EnrollmentRow) -> Result<Self, StoreError> {
        Ok(Self {
            enrollment_id: row.enrollment_id,
            employee_id: row.employee_id,
            employee_name: row.employee_name,
            benefit_id: row.benefit_id,
            enrollment_date: row.enrollment_date,
            status: parse_status(&row.status)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct EmployeeEnrollmentRow {
    benefit_name: String,
    category: String,
    enrollment_date: DateTime<Utc>,
    status: String,
}

impl TryFrom<EmployeeEnrollmentRow> for EmployeeEnrollment {
    type Error = StoreError;

    fn try_from(row: EmployeeEnrollmentRow) -> Result<Self, StoreError> {
        Ok(Self {
            benefit_name: row.benefit_name,
            category: row.category,
            enrollment_date: row.enrollment_date,
            status: parse_status(&row.status)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ReviewQueueRow {
    enrollment_id: i32,
    employee_id: String,
    employee_name: String,
    benefit_name: String,
    enrollment_date: DateTime<Utc>,
    status: String,
}

impl TryFrom<ReviewQueueRow> for ReviewQueueEntry {
    type Error = StoreError;

    fn try_from(row: ReviewQueueRow) -> Result<Self, StoreError> {
        Ok(Self {
            enrollment_id: row.enrollment_id,
            employee_id: row.employee_id,
            employee_name: row.employee_name,
            benefit_name: row.benefit_name,
            enrollment_date: row.enrollment_date,
            status: parse_status(&row.status)?,
        })
    }
}
