//! HTTP surface tests for the report trigger
//!
//! Covers the pre-flight probe, bearer authentication, the success body
//! shape, and the fatal-collection 500 path.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum_test::TestServer;
use serde_json::Value;
use tower::util::ServiceExt;

use dopamina_report::api::{create_router, AppState};
use dopamina_report::auth::ServiceKeyVerifier;
use dopamina_report::config::Config;
use dopamina_report::services::report_service::WeeklyReportService;
use dopamina_report::services::time_provider::MockTimeProvider;
use dopamina_report::services::webhook::WebhookNotifier;

use common::{completed_task, in_window, invocation_time, session, FakeStore};

const SERVICE_KEY: &str = "test-service-key-long-enough";

fn test_router(store: Arc<FakeStore>) -> axum::Router {
    let report_service = Arc::new(WeeklyReportService::new(
        store,
        Arc::new(MockTimeProvider::new(invocation_time())),
        WebhookNotifier::disabled(),
    ));
    let state = Arc::new(AppState {
        report_service,
        verifier: ServiceKeyVerifier::new(SERVICE_KEY),
    });
    let config = Config {
        service_key: SERVICE_KEY.to_string(),
        ..Config::default()
    };
    create_router(state, &config)
}

fn seeded_store() -> Arc<FakeStore> {
    Arc::new(FakeStore::with_activity(
        vec![
            session("u1", "t1", 20, in_window(4, 9)),
            session("u1", "t1", 10, in_window(5, 9)),
            session("u1", "t2", 5, in_window(6, 9)),
        ],
        vec![
            completed_task("u1", "t1", "Write the report", Some(30), in_window(5, 18)),
            completed_task("u1", "t2", "Answer email", Some(10), in_window(6, 18)),
        ],
    ))
}

#[tokio::test]
async fn test_trigger_returns_run_summary() {
    let server = TestServer::new(test_router(seeded_store())).unwrap();

    let response = server
        .post("/api/reports/weekly")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {SERVICE_KEY}")).unwrap(),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["ok"], true);
    assert_eq!(body["week_start_date"], "2024-06-03");
    assert_eq!(body["users_processed"], 1);
    assert!(body.get("users_failed").is_none());
}

#[tokio::test]
async fn test_trigger_rejects_wrong_key() {
    let store = seeded_store();
    let server = TestServer::new(test_router(Arc::clone(&store))).unwrap();

    let response = server
        .post("/api/reports/weekly")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer not-the-right-key"),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "Unauthorized");
    // No run executed.
    assert_eq!(store.report_count(), 0);
}

#[tokio::test]
async fn test_trigger_requires_authorization_header() {
    let server = TestServer::new(test_router(seeded_store())).unwrap();

    let response = server.post("/api/reports/weekly").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_collection_failure_maps_to_500() {
    let store = seeded_store();
    store.fail_reads.store(true, Ordering::SeqCst);
    let server = TestServer::new(test_router(Arc::clone(&store))).unwrap();

    let response = server
        .post("/api/reports/weekly")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {SERVICE_KEY}")).unwrap(),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("read failed"));
    assert_eq!(store.report_count(), 0);
}

#[tokio::test]
async fn test_preflight_probe_succeeds() {
    let router = test_router(seeded_store());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/reports/weekly")
        .header(header::ORIGIN, "https://app.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::new(test_router(seeded_store())).unwrap();

    let response = server.get("/api/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "OK");
}
