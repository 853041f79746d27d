//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle for each endpoint. The durable
//! store is pointed at a port nothing listens on, so these also exercise
//! the fail-open behavior the service promises: a cache outage degrades
//! writes, never reads served by the fast layer and never availability.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use simplicache::cache::{DurableCache, FastCache};
use simplicache::monitor::AlertThresholds;
use simplicache::{api::create_router, AppState, CacheService, Config};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    let config = Config {
        redis_host: "127.0.0.1".to_string(),
        redis_port: 59999,
        redis_connect_timeout: 1,
        redis_op_timeout: 1,
        ..Config::default()
    };
    let fast = FastCache::new(100);
    let durable = DurableCache::connect(&config).expect("pool creation is lazy");
    let state = AppState::new(CacheService::new(fast, durable, AlertThresholds::default()));
    create_router(state)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn set_body(key: &str, output: &str, ttl: Option<u64>) -> String {
    let mut body = json!({
        "key": key,
        "value": {
            "output": output,
            "model_version": "mt5-v1.0",
            "processing_time_ms": 120
        }
    });
    if let Some(ttl) = ttl {
        body["ttl"] = json!(ttl);
    }
    body.to_string()
}

fn put_set(key: &str, output: &str, ttl: Option<u64>) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri("/set")
        .header("content-type", "application/json")
        .body(Body::from(set_body(key, output, ttl)))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// == SET + GET Endpoint Tests ==

#[tokio::test]
async fn test_set_reports_partial_failure_but_get_serves_value() {
    let app = create_test_app();

    // The durable layer is down: the dual write must report failure...
    let response = app
        .clone()
        .oneshot(put_set("key1", "Einfacher Text.", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["stored"], false);

    // ...while the fast-layer copy keeps serving reads.
    let response = app.oneshot(get("/get/key1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], "key1");
    assert_eq!(json["value"]["output"], "Einfacher Text.");
    assert_eq!(json["value"]["model_version"], "mt5-v1.0");
}

#[tokio::test]
async fn test_get_nonexistent_returns_not_found() {
    let app = create_test_app();

    let response = app.oneshot(get("/get/nonexistent")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("nonexistent"));
}

#[tokio::test]
async fn test_set_rejects_empty_key() {
    let app = create_test_app();

    let response = app.oneshot(put_set("", "text", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn test_zero_ttl_entry_is_absent_on_next_get() {
    let app = create_test_app();

    app.clone()
        .oneshot(put_set("fleeting", "text", Some(0)))
        .await
        .unwrap();

    let response = app.oneshot(get("/get/fleeting")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == DELETE + EXISTS Endpoint Tests ==

#[tokio::test]
async fn test_delete_removes_key() {
    let app = create_test_app();

    app.clone()
        .oneshot(put_set("to_delete", "text", None))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/del/to_delete")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The durable half of the dual delete failed, so deleted is false,
    // but the key is gone from the fast layer.
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["deleted"], false);

    let response = app.oneshot(get("/get/to_delete")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_exists_endpoint() {
    let app = create_test_app();

    app.clone()
        .oneshot(put_set("present", "text", None))
        .await
        .unwrap();

    let response = app.clone().oneshot(get("/exists/present")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["exists"], true);

    let response = app.oneshot(get("/exists/absent")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["exists"], false);
}

// == Diagnostic Surface Tests ==

#[tokio::test]
async fn test_health_reports_degraded_store() {
    let app = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["store"]["status"], "unhealthy");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_stats_reports_coordinator_counters() {
    let app = create_test_app();

    app.clone()
        .oneshot(put_set("key1", "text", None))
        .await
        .unwrap();
    app.clone().oneshot(get("/get/key1")).await.unwrap();
    app.clone().oneshot(get("/get/missing")).await.unwrap();

    let response = app.oneshot(get("/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["coordinator"]["hits"], 1);
    assert_eq!(json["coordinator"]["misses"], 1);
    assert_eq!(json["coordinator"]["total_requests"], 2);
    // Store-native counters are unavailable while the store is down.
    assert!(json["store"].is_null());
}

#[tokio::test]
async fn test_metrics_report_includes_alerts_and_uptime() {
    let app = create_test_app();

    // Nine misses, one hit: hit ratio 0.1 is below the default floor.
    app.clone()
        .oneshot(put_set("key1", "text", None))
        .await
        .unwrap();
    app.clone().oneshot(get("/get/key1")).await.unwrap();
    for i in 0..9 {
        app.clone()
            .oneshot(get(&format!("/get/missing{i}")))
            .await
            .unwrap();
    }

    let response = app.oneshot(get("/metrics/report")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["metrics"]["hit_count"], 1);
    assert_eq!(json["metrics"]["miss_count"], 9);
    assert!((json["metrics"]["hit_ratio"].as_f64().unwrap() - 0.1).abs() < 1e-9);
    assert!(json["uptime_seconds"].as_f64().unwrap() >= 0.0);

    let alerts = json["alerts"].as_array().unwrap();
    assert!(alerts.iter().any(|a| a["kind"] == "low_hit_ratio"));
    assert_eq!(json["alert_count"], alerts.len());
}

#[tokio::test]
async fn test_metrics_history_and_reset() {
    let app = create_test_app();

    app.clone().oneshot(get("/get/miss1")).await.unwrap();
    app.clone().oneshot(get("/metrics/report")).await.unwrap();

    let response = app
        .clone()
        .oneshot(get("/metrics/history?limit=10"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert!(!json.as_array().unwrap().is_empty());

    let response = app.clone().oneshot(post("/metrics/reset")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/metrics/report")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["metrics"]["total_requests"], 0);
    assert_eq!(json["metrics"]["hit_ratio"], 0.0);
}

// == Flush Endpoint Tests ==

#[tokio::test]
async fn test_flush_refused_without_confirmation() {
    let app = create_test_app();

    let response = app.oneshot(post("/flush")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("confirm"));
}

#[tokio::test]
async fn test_flush_with_confirmation_reports_store_outcome() {
    let app = create_test_app();

    let response = app.oneshot(post("/flush?confirm=true")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The durable store is down, so the flush itself could not run.
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["flushed"], false);
}

// == Expire Endpoint Tests ==

#[tokio::test]
async fn test_expire_reports_store_outcome() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/expire/key1")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"ttl": 60}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["applied"], false);
}
