use super::common::*;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::enrollment::router::enrollment_router;
use crate::enrollment::service::EnrollmentService;

fn json_request(method: &str, path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get_request(path: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn benefits_route_lists_catalog_in_order() {
    let (service, _store) = build_service();
    let router = enrollment_router(service);

    let response = router
        .oneshot(get_request("/api/benefits"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let rows = payload.as_array().expect("array body");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["category"], "Financial");
    assert_eq!(rows[1]["category"], "Health & Wellness");
    assert_eq!(rows[2]["category"], "Time Off");
}

#[tokio::test]
async fn enroll_route_returns_created_then_conflict() {
    let (service, store) = build_service();
    let router = enrollment_router(service);

    let body = json!({ "employee_id": "E1", "employee_name": "Jane", "benefit_id": 1 });

    let response = router
        .clone()
        .oneshot(json_request("POST", "/api/enroll", body.clone()))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(true));

    let response = router
        .oneshot(json_request("POST", "/api/enroll", body))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(false));

    assert_eq!(store.enrollments().len(), 1);
}

#[tokio::test]
async fn enroll_route_rejects_missing_fields() {
    let (service, store) = build_service();
    let router = enrollment_router(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/enroll",
            json!({ "employee_id": "E1", "benefit_id": 1 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], "Missing required fields.");
    assert!(store.enrollments().is_empty());
}

#[tokio::test]
async fn enroll_route_maps_backend_failures_to_server_error() {
    let service = Arc::new(EnrollmentService::new(Arc::new(OfflineStore)));
    let router = enrollment_router(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/enroll",
            json!({ "employee_id": "E1", "employee_name": "Jane", "benefit_id": 1 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn employee_route_returns_approved_rows_only() {
    let (service, _store) = build_service();

    let approved = service
        .submit(submission("E7", 1))
        .await
        .expect("submission succeeds");
    service
        .submit(submission("E7", 2))
        .await
        .expect("submission succeeds");
    service
        .review(status_update(approved.enrollment_id, "Approved"))
        .await
        .expect("approval succeeds");

    let router = enrollment_router(service);
    let response = router
        .oneshot(get_request("/api/enrollments/E7"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let rows = payload.as_array().expect("array body");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["status"], "Approved");
    assert_eq!(rows[0]["benefit_name"], "Health Insurance Plan");
}

#[tokio::test]
async fn hr_route_lists_pending_before_decided() {
    let (service, _store) = build_service();

    let first = service.submit(submission("E1", 1)).await.expect("submit");
    service.submit(submission("E2", 1)).await.expect("submit");
    service
        .review(status_update(first.enrollment_id, "Denied"))
        .await
        .expect("denial succeeds");

    let router = enrollment_router(service);
    let response = router
        .oneshot(get_request("/api/hr/enrollments"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let rows = payload.as_array().expect("array body");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["status"], "Pending");
    assert_eq!(rows[1]["status"], "Denied");
    assert!(rows[0].get("employee_name").is_some());
    assert!(rows[0].get("benefit_name").is_some());
}

#[tokio::test]
async fn update_status_route_validates_and_applies() {
    let (service, store) = build_service();
    let record = service.submit(submission("E1", 1)).await.expect("submit");
    let router = enrollment_router(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/hr/update-status",
            json!({ "enrollment_id": record.enrollment_id, "status": "Active" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], "Invalid request data.");

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/hr/update-status",
            json!({ "enrollment_id": 9999, "status": "Approved" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/hr/update-status",
            json!({ "enrollment_id": record.enrollment_id, "status": "Approved" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], "Enrollment status updated to Approved.");

    assert_eq!(
        store.enrollments()[0].status,
        crate::enrollment::domain::EnrollmentStatus::Approved
    );
}
