//! Integration tests for environmental data endpoints

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

fn weather_at(recorded_at: &str) -> Value {
    json!({
        "location": "Downtown",
        "latitude": 47.61,
        "longitude": -122.33,
        "temperature": 18.0,
        "humidity": 60.0,
        "weather_condition": "cloudy",
        "recorded_at": recorded_at
    })
}

#[tokio::test]
#[ignore] // Requires a PostgreSQL instance
async fn test_nearest_picks_closest_within_tolerance() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool).await;

    for recorded_at in ["2025-06-01T10:00:00Z", "2025-06-01T10:40:00Z"] {
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/environmental/weather",
                weather_at(recorded_at),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(get(
            "/api/v1/environmental/nearest?location=Downtown&timestamp=2025-06-01T10:15:00Z",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    // 10:00 is 15 minutes away, 10:40 is 25; the closer row wins
    assert_eq!(
        json["data"]["weather"]["recorded_at"],
        "2025-06-01T10:00:00Z"
    );
    // No air quality data was recorded, so that dataset is null
    assert!(json["data"]["air_quality"].is_null());

    // A tight tolerance excludes both rows
    let response = app
        .oneshot(get(
            "/api/v1/environmental/nearest?location=Downtown&timestamp=2025-06-01T09:00:00Z&tolerance_secs=600",
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert!(json["data"]["weather"].is_null());
}

#[tokio::test]
#[ignore] // Requires a PostgreSQL instance
async fn test_air_quality_category_must_match_aqi() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool).await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/environmental/air-quality",
            json!({
                "location": "Downtown",
                "latitude": 47.61,
                "longitude": -122.33,
                "aqi": 180,
                "aqi_category": "good",
                "recorded_at": "2025-06-01T10:00:00Z"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // The matching category is accepted
    let response = app
        .oneshot(post_json(
            "/api/v1/environmental/air-quality",
            json!({
                "location": "Downtown",
                "latitude": 47.61,
                "longitude": -122.33,
                "aqi": 180,
                "aqi_category": "unhealthy",
                "recorded_at": "2025-06-01T10:00:00Z"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
#[ignore] // Requires a PostgreSQL instance
async fn test_impact_upsert_replaces_same_day_row() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool.clone()).await;

    let mut body = json!({
        "location": "Downtown",
        "measurement_date": "2025-06-01",
        "total_violations": 4,
        "total_vehicles_detected": 120,
        "compliant_vehicles": 116,
        "violation_rate": 3.33
    });

    let first = app
        .clone()
        .oneshot(post_json("/api/v1/environmental/impact", body.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    body["total_violations"] = json!(6);
    body["violation_rate"] = json!(5.0);

    let second = app
        .oneshot(post_json("/api/v1/environmental/impact", body))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    let json = body_json(second).await;
    assert_eq!(json["data"]["total_violations"], 6);

    // Still a single row for the (location, date) key
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM environmental_impact")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}
