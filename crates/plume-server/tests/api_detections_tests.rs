//! Integration tests for the detection lifecycle
//!
//! Covers the full path: camera registration, detection ingestion, one-shot
//! results recording, the review transition with its transactional violation
//! insert, and idempotent notification marking.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

mod helpers;
use helpers::{setup_test_app, setup_test_db};

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn create_camera(app: &axum::Router, camera_id: &str) {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/cameras",
            json!({ "camera_id": camera_id, "location": "Main St & 5th Ave" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn create_detection(app: &axum::Router, camera_id: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/detections",
            json!({
                "camera_id": camera_id,
                "image_path": "cam/abc123-frame.jpg"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["review_status"], "pending");
    assert_eq!(json["data"]["is_violation"], false);
    json["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
#[ignore] // Requires a PostgreSQL instance
async fn test_detection_requires_existing_camera() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool).await;

    let response = app
        .oneshot(post_json(
            "/api/v1/detections",
            json!({ "camera_id": "GHOST-1", "image_path": "x/frame.jpg" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
#[ignore] // Requires a PostgreSQL instance
async fn test_results_are_recorded_exactly_once() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool).await;

    create_camera(&app, "CAM-100").await;
    let detection_id = create_detection(&app, "CAM-100").await;

    let results = json!({
        "smoke_detected": true,
        "smoke_opacity": 42.0,
        "confidence_score": 0.88,
        "vehicle_detected": true,
        "license_plate_detected": "ABC-1234"
    });

    let first = app
        .clone()
        .oneshot(post_json(
            &format!("/api/v1/detections/{detection_id}/results"),
            results.clone(),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let json = body_json(first).await;
    assert!(json["data"]["processed_at"].is_string());

    // processed_at is immutable once set
    let second = app
        .oneshot(post_json(
            &format!("/api/v1/detections/{detection_id}/results"),
            results,
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore] // Requires a PostgreSQL instance
async fn test_confidence_out_of_range_rejected() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool).await;

    create_camera(&app, "CAM-101").await;
    let detection_id = create_detection(&app, "CAM-101").await;

    let response = app
        .oneshot(post_json(
            &format!("/api/v1/detections/{detection_id}/results"),
            json!({
                "smoke_detected": false,
                "confidence_score": 1.5,
                "vehicle_detected": false
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore] // Requires a PostgreSQL instance
async fn test_confirm_creates_violation_atomically() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool.clone()).await;

    create_camera(&app, "CAM-102").await;
    let detection_id = create_detection(&app, "CAM-102").await;

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/v1/detections/{detection_id}/review"),
            json!({
                "status": "confirmed",
                "reviewed_by": "inspector-7",
                "severity": "high",
                "fine_amount": 250.0
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["review_status"], "confirmed");
    assert_eq!(json["data"]["is_violation"], true);
    assert_eq!(json["data"]["violation"]["severity"], "high");

    // The detail endpoint embeds the violation record
    let detail = app
        .clone()
        .oneshot(get(&format!("/api/v1/detections/{detection_id}")))
        .await
        .unwrap();
    let json = body_json(detail).await;
    assert_eq!(json["data"]["violation"]["fine_amount"], 250.0);

    // Reviewing again conflicts; the violation row stays unique
    let again = app
        .oneshot(post_json(
            &format!("/api/v1/detections/{detection_id}/review"),
            json!({ "status": "disputed", "reviewed_by": "inspector-8" }),
        ))
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM violations")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore] // Requires a PostgreSQL instance
async fn test_false_positive_creates_no_violation() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool.clone()).await;

    create_camera(&app, "CAM-103").await;
    let detection_id = create_detection(&app, "CAM-103").await;

    let response = app
        .oneshot(post_json(
            &format!("/api/v1/detections/{detection_id}/review"),
            json!({ "status": "false_positive", "reviewed_by": "inspector-7" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_violation"], false);
    assert!(json["data"]["violation"].is_null());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM violations")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
#[ignore] // Requires a PostgreSQL instance
async fn test_notification_marking_is_idempotent() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool).await;

    create_camera(&app, "CAM-104").await;
    let detection_id = create_detection(&app, "CAM-104").await;

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/v1/detections/{detection_id}/review"),
            json!({ "status": "confirmed", "reviewed_by": "inspector-7", "severity": "low" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let first = app
        .clone()
        .oneshot(post_json(
            &format!("/api/v1/violations/{detection_id}/notify/authority"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first_json = body_json(first).await;
    assert_eq!(first_json["data"]["newly_marked"], true);
    let first_stamp = first_json["data"]["authority_notified_at"].clone();
    assert!(first_stamp.is_string());

    // Repeat call returns the unchanged record with the original timestamp
    let second = app
        .oneshot(post_json(
            &format!("/api/v1/violations/{detection_id}/notify/authority"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    let second_json = body_json(second).await;
    assert_eq!(second_json["data"]["newly_marked"], false);
    assert_eq!(second_json["data"]["authority_notified_at"], first_stamp);
    assert_eq!(second_json["data"]["owner_notified"], false);
}

#[tokio::test]
#[ignore] // Requires a PostgreSQL instance
async fn test_list_detections_filters() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool).await;

    create_camera(&app, "CAM-105").await;
    create_camera(&app, "CAM-106").await;
    let d1 = create_detection(&app, "CAM-105").await;
    let _d2 = create_detection(&app, "CAM-106").await;

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/v1/detections/{d1}/review"),
            json!({ "status": "confirmed", "reviewed_by": "inspector-7", "severity": "medium" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/api/v1/detections?is_violation=true"))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["id"], d1.as_str());

    let response = app
        .oneshot(get("/api/v1/detections?camera_id=CAM-106&review_status=pending"))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["camera_id"], "CAM-106");
}
