use std::{sync::Arc, time::Duration};

use analytics_service::{
    http::{router, AppState},
    store::{InMemoryReadingStore, ReadingStore, StoreError},
};
use axum::body::Body;
use axum::http::{header, HeaderName, Request, StatusCode};
use reading_client::domain::{NewReading, OwnerId, Reading};
use serde_json::{json, Value};
use tower::ServiceExt;

const OWNER_HEADER: &str = "x-owner-id";

fn app_with(store: Arc<dyn ReadingStore>) -> axum::Router {
    router(AppState::new(
        store,
        Duration::from_secs(5),
        HeaderName::from_static(OWNER_HEADER),
        3,
    ))
}

fn get(uri: &str, owner: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(OWNER_HEADER, owner)
        .body(Body::empty())
        .unwrap()
}

fn post_reading(owner: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/readings")
        .header(OWNER_HEADER, owner)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn seed(app: &axum::Router, owner: &str, readings: &[(&str, &str, f64)]) {
    for (date, appliance, units) in readings {
        let resp = app
            .clone()
            .oneshot(post_reading(
                owner,
                json!({ "date": date, "applianceName": appliance, "units": units, "costPerUnit": 0.5 }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }
}

struct DownStore;

#[async_trait::async_trait]
impl ReadingStore for DownStore {
    async fn find_by_owner(&self, _owner: &OwnerId) -> Result<Vec<Reading>, StoreError> {
        Err(StoreError::Unavailable("connection reset".into()))
    }

    async fn create(&self, _owner: &OwnerId, _reading: NewReading) -> Result<Reading, StoreError> {
        Err(StoreError::Unavailable("connection reset".into()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection reset".into()))
    }
}

#[tokio::test]
async fn create_reading_derives_total_cost() {
    let app = app_with(Arc::new(InMemoryReadingStore::new()));

    let resp = app
        .oneshot(post_reading(
            "u-1",
            json!({ "date": "2024-01-05", "applianceName": "Fridge", "units": 10, "costPerUnit": 0.25 }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let reading = body_json(resp).await;
    assert_eq!(reading["ownerId"], "u-1");
    assert_eq!(reading["applianceName"], "Fridge");
    assert_eq!(reading["totalCost"], 2.5);
    assert_eq!(reading["date"], "2024-01-05T00:00:00Z");
}

#[tokio::test]
async fn create_reading_missing_fields_is_bad_request() {
    let app = app_with(Arc::new(InMemoryReadingStore::new()));

    let resp = app
        .oneshot(post_reading("u-1", json!({ "date": "2024-01-05", "units": 1 })))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["message"], "missing required fields");
}

#[tokio::test]
async fn create_reading_with_mistyped_fields_is_bad_request() {
    let app = app_with(Arc::new(InMemoryReadingStore::new()));

    for body in [
        json!({ "date": "2024-01-05", "applianceName": "AC", "units": "abc", "costPerUnit": 0.5 }),
        json!({ "date": 5, "applianceName": "AC", "units": 1, "costPerUnit": 0.5 }),
    ] {
        let resp = app.clone().oneshot(post_reading("u-1", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let message = body_json(resp).await["message"].as_str().unwrap().to_string();
        assert!(!message.is_empty());
    }
}

#[tokio::test]
async fn create_reading_with_invalid_json_is_bad_request() {
    let app = app_with(Arc::new(InMemoryReadingStore::new()));

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/readings")
                .header(OWNER_HEADER, "u-1")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"date\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["message"].is_string());
}

#[tokio::test]
async fn requests_without_owner_are_unauthorized() {
    let app = app_with(Arc::new(InMemoryReadingStore::new()));

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/readings/summary/monthly")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn sliding_average_over_latest_readings() {
    let app = app_with(Arc::new(InMemoryReadingStore::new()));
    seed(
        &app,
        "u-1",
        &[("2024-01-01", "AC", 10.0), ("2024-01-02", "AC", 20.0), ("2024-01-03", "AC", 30.0)],
    )
    .await;

    let resp = app
        .oneshot(get("/api/readings/average?n=2", "u-1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({ "n": 2, "averageUnits": 25.0 }));
}

#[tokio::test]
async fn sliding_average_defaults_and_echoes_requested_n() {
    let app = app_with(Arc::new(InMemoryReadingStore::new()));
    seed(&app, "u-1", &[("2024-01-01", "AC", 6.0), ("2024-01-02", "AC", 12.0)]).await;

    let absent = body_json(app.clone().oneshot(get("/api/readings/average", "u-1")).await.unwrap()).await;
    assert_eq!(absent, json!({ "n": 3, "averageUnits": 9.0 }));

    let garbage = body_json(
        app.clone()
            .oneshot(get("/api/readings/average?n=abc", "u-1"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(garbage["n"], 3);

    // The response reports the requested window, not the clamped one.
    let oversized = body_json(
        app.clone()
            .oneshot(get("/api/readings/average?n=50", "u-1"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(oversized, json!({ "n": 50, "averageUnits": 9.0 }));

    let zero = body_json(app.oneshot(get("/api/readings/average?n=0", "u-1")).await.unwrap()).await;
    assert_eq!(zero, json!({ "n": 0, "averageUnits": 12.0 }));
}

#[tokio::test]
async fn monthly_summary_is_sparse_and_chronological() {
    let app = app_with(Arc::new(InMemoryReadingStore::new()));
    seed(
        &app,
        "u-1",
        &[("2024-02-01", "AC", 8.0), ("2024-01-05", "AC", 10.0), ("2024-01-20", "TV", 5.0)],
    )
    .await;

    let resp = app
        .oneshot(get("/api/readings/summary/monthly", "u-1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!([
            { "year": 2024, "month": 1, "totalUnits": 15.0, "totalCost": 7.5 },
            { "year": 2024, "month": 2, "totalUnits": 8.0, "totalCost": 4.0 },
        ])
    );
}

#[tokio::test]
async fn appliance_summary_orders_by_total_units() {
    let app = app_with(Arc::new(InMemoryReadingStore::new()));
    seed(
        &app,
        "u-1",
        &[("2024-01-01", "Fridge", 10.0), ("2024-01-02", "AC", 30.0), ("2024-01-03", "Fridge", 5.0)],
    )
    .await;
    seed(&app, "u-2", &[("2024-01-01", "Heater", 100.0)]).await;

    let resp = app
        .oneshot(get("/api/readings/summary/appliance", "u-1"))
        .await
        .unwrap();

    assert_eq!(
        body_json(resp).await,
        json!([
            { "applianceName": "AC", "totalUnits": 30.0, "totalCost": 15.0 },
            { "applianceName": "Fridge", "totalUnits": 15.0, "totalCost": 7.5 },
        ])
    );
}

#[tokio::test]
async fn empty_history_gives_zero_and_empty_lists() {
    let app = app_with(Arc::new(InMemoryReadingStore::new()));

    let avg = body_json(app.clone().oneshot(get("/api/readings/average?n=4", "new")).await.unwrap()).await;
    assert_eq!(avg, json!({ "n": 4, "averageUnits": 0.0 }));

    for uri in ["/api/readings/summary/monthly", "/api/readings/summary/appliance", "/api/readings"] {
        let list = body_json(app.clone().oneshot(get(uri, "new")).await.unwrap()).await;
        assert_eq!(list, json!([]));
    }
}

#[tokio::test]
async fn list_readings_is_date_ordered() {
    let app = app_with(Arc::new(InMemoryReadingStore::new()));
    seed(&app, "u-1", &[("2024-03-01", "AC", 1.0), ("2024-01-01", "TV", 2.0)]).await;

    let readings = body_json(app.oneshot(get("/api/readings", "u-1")).await.unwrap()).await;
    let names: Vec<&str> = readings
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["applianceName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["TV", "AC"]);
}

#[tokio::test]
async fn store_outage_is_opaque_server_error() {
    let app = app_with(Arc::new(DownStore));

    for uri in [
        "/api/readings/average?n=3",
        "/api/readings/summary/monthly",
        "/api/readings/summary/appliance",
    ] {
        let resp = app.clone().oneshot(get(uri, "u-1")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await, json!({ "message": "failed to compute analytics" }));
    }
}

#[tokio::test]
async fn health_reports_store_connectivity() {
    let up = body_json(
        app_with(Arc::new(InMemoryReadingStore::new()))
            .oneshot(get("/api/health", "ignored"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(up["status"], "ok");
    assert_eq!(up["store"]["connected"], true);

    let down = body_json(app_with(Arc::new(DownStore)).oneshot(get("/api/health", "ignored")).await.unwrap()).await;
    assert_eq!(down["store"]["connected"], false);
}
