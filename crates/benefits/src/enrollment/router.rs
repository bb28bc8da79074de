use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::error;

use super::domain::{EnrollmentSubmission, StatusUpdateRequest};
use super::service::{EnrollmentService, ServiceError};
use super::store::{EnrollmentStore, StoreError};

/// Router builder exposing the employee- and HR-facing endpoints.
pub fn enrollment_router<S>(service: Arc<EnrollmentService<S>>) -> Router
where
    S: EnrollmentStore + 'static,
{
    Router::new()
        .route("/api/benefits", get(list_benefits_handler::<S>))
        .route("/api/enroll", post(enroll_handler::<S>))
        .route(
            "/api/enrollments/:employee_id",
            get(employee_enrollments_handler::<S>),
        )
        .route("/api/hr/enrollments", get(review_queue_handler::<S>))
        .route("/api/hr/update-status", post(update_status_handler::<S>))
        .with_state(service)
}

pub(crate) async fn list_benefits_handler<S>(
    State(service): State<Arc<EnrollmentService<S>>>,
) -> Response
where
    S: EnrollmentStore + 'static,
{
    match service.catalog().await {
        Ok(benefits) => (StatusCode::OK, axum::Json(benefits)).into_response(),
        Err(err) => {
            error!(%err, "benefits listing failed");
            let payload = json!({ "message": "Failed to fetch benefits." });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn enroll_handler<S>(
    State(service): State<Arc<EnrollmentService<S>>>,
    axum::Json(submission): axum::Json<EnrollmentSubmission>,
) -> Response
where
    S: EnrollmentStore + 'static,
{
    match service.submit(submission).await {
        Ok(record) => {
            let payload = json!({
                "success": true,
                "message": "Enrollment submitted for HR approval!",
                "enrollment_id": record.enrollment_id,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(ServiceError::Validation(_)) => {
            let payload = json!({
                "success": false,
                "message": "Missing required fields.",
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(ServiceError::Store(StoreError::Duplicate)) => {
            let payload = json!({
                "success": false,
                "message": "You have already submitted an enrollment for this benefit.",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            error!(err = %other, "enrollment submission failed");
            let payload = json!({
                "success": false,
                "message": "Server error during enrollment.",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn employee_enrollments_handler<S>(
    State(service): State<Arc<EnrollmentService<S>>>,
    Path(employee_id): Path<String>,
) -> Response
where
    S: EnrollmentStore + 'static,
{
    match service.employee_enrollments(&employee_id).await {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(err) => {
            error!(%err, %employee_id, "employee enrollment lookup failed");
            let payload = json!({ "message": "Failed to fetch enrollments." });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn review_queue_handler<S>(
    State(service): State<Arc<EnrollmentService<S>>>,
) -> Response
where
    S: EnrollmentStore + 'static,
{
    match service.review_queue().await {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(err) => {
            error!(%err, "review queue listing failed");
            let payload = json!({ "message": "Failed to fetch HR enrollments." });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn update_status_handler<S>(
    State(service): State<Arc<EnrollmentService<S>>>,
    axum::Json(request): axum::Json<StatusUpdateRequest>,
) -> Response
where
    S: EnrollmentStore + 'static,
{
    match service.review(request).await {
        Ok(decision) => {
            let payload = json!({
                "success": true,
                "message": format!("Enrollment status updated to {}.", decision.label()),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(ServiceError::Validation(_)) => {
            let payload = json!({
                "success": false,
                "message": "Invalid request data.",
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(ServiceError::Store(StoreError::NotFound)) => {
            let payload = json!({
                "success": false,
                "message": "Enrollment not found.",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            error!(err = %other, "status update failed");
            let payload = json!({
                "success": false,
                "message": "Server error while updating status.",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
