//! Integration tests for vehicle API endpoints

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

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

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
#[ignore] // Requires a PostgreSQL instance
async fn test_create_and_get_vehicle() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool).await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/vehicles",
            json!({
                "license_plate": "ABC-1234",
                "vehicle_type": "car",
                "owner_name": "Jamie Rivera",
                "owner_email": "jamie@example.com"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["license_plate"], "ABC-1234");

    // Lookup is case-insensitive on the plate
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/vehicles/abc-1234")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["vehicle_type"], "car");
}

#[tokio::test]
#[ignore] // Requires a PostgreSQL instance
async fn test_duplicate_plate_conflicts() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool).await;

    let body = json!({ "license_plate": "DUP-0001", "vehicle_type": "truck" });

    let first = app
        .clone()
        .oneshot(post_json("/api/v1/vehicles", body.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(post_json("/api/v1/vehicles", body))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let json = body_json(second).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "CONFLICT");
}

#[tokio::test]
#[ignore] // Requires a PostgreSQL instance
async fn test_duplicate_plate_conflicts_across_case() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool).await;

    let first = app
        .clone()
        .oneshot(post_json(
            "/api/v1/vehicles",
            json!({ "license_plate": "abc-1234", "vehicle_type": "car" }),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    // Plates are stored uppercased, so the variant collides
    let json = body_json(first).await;
    assert_eq!(json["data"]["license_plate"], "ABC-1234");

    let second = app
        .oneshot(post_json(
            "/api/v1/vehicles",
            json!({ "license_plate": "ABC-1234", "vehicle_type": "car" }),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore] // Requires a PostgreSQL instance
async fn test_get_vehicle_not_found() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/vehicles/MISSING-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
#[ignore] // Requires a PostgreSQL instance
async fn test_invalid_vehicle_type_rejected() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool).await;

    let response = app
        .oneshot(post_json(
            "/api/v1/vehicles",
            json!({ "license_plate": "XYZ-9", "vehicle_type": "hovercraft" }),
        ))
        .await
        .unwrap();

    // serde rejects the unknown enum variant before the handler runs
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore] // Requires a PostgreSQL instance
async fn test_list_vehicles_pagination_meta() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool).await;

    for i in 0..3 {
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/vehicles",
                json!({ "license_plate": format!("LST-{i:04}"), "vehicle_type": "bus" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/vehicles?page=1&per_page=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
    assert_eq!(json["meta"]["pagination"]["total"], 3);
    assert_eq!(json["meta"]["pagination"]["per_page"], 2);
}
