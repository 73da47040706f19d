//! End-to-end handler tests over the sync router with in-memory stores.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware, Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

use acadia_api_sync::{claims_from_headers, sync_router, EdgeConfigState, SyncState};
use acadia_sync::testing::{sample_record, MemoryAudit, MemoryStore};
use acadia_sync::EdgeHandle;

struct TestApp {
    router: Router,
    local: Arc<MemoryStore>,
    d1: Arc<MemoryStore>,
    audit: Arc<MemoryAudit>,
}

fn app_with_edge() -> TestApp {
    let local = Arc::new(MemoryStore::new("local"));
    let d1 = Arc::new(MemoryStore::new("d1"));
    let audit = Arc::new(MemoryAudit::new());
    let state = SyncState {
        local: local.clone(),
        audit: audit.clone(),
        edge: EdgeConfigState::Ready(EdgeHandle {
            store: d1.clone(),
            probe: d1.clone(),
        }),
    };
    let router = sync_router(state).layer(middleware::from_fn(claims_from_headers));
    TestApp {
        router,
        local,
        d1,
        audit,
    }
}

fn app_without_edge() -> TestApp {
    let local = Arc::new(MemoryStore::new("local"));
    let d1 = Arc::new(MemoryStore::new("d1"));
    let audit = Arc::new(MemoryAudit::new());
    let state = SyncState {
        local: local.clone(),
        audit: audit.clone(),
        edge: EdgeConfigState::NotConfigured {
            missing: vec![
                "CLOUDFLARE_ACCOUNT_ID".to_string(),
                "CLOUDFLARE_D1_DATABASE_ID".to_string(),
                "CLOUDFLARE_D1_API_TOKEN".to_string(),
            ],
        },
    };
    let router = sync_router(state).layer(middleware::from_fn(claims_from_headers));
    TestApp {
        router,
        local,
        d1,
        audit,
    }
}

fn post_sync(uri: &str, role: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(role) = role {
        builder = builder
            .header("x-actor-id", Uuid::new_v4().to_string())
            .header("x-actor-email", "admin@acadia.dev")
            .header("x-actor-role", role);
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn get_sync(role: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri("/sync");
    if let Some(role) = role {
        builder = builder
            .header("x-actor-email", "viewer@acadia.dev")
            .header("x-actor-role", role);
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn trigger_requires_authentication() {
    let app = app_with_edge();
    let response = app.router.oneshot(post_sync("/sync", None, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn trigger_requires_super_admin() {
    let app = app_with_edge();
    let response = app
        .router
        .oneshot(post_sync("/sync", Some("TEACHER"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn trigger_without_edge_credentials_is_unavailable() {
    let app = app_without_edge();
    let response = app
        .router
        .oneshot(post_sync("/sync", Some("SUPER_ADMIN"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = json_body(response).await;
    let hints = body["envVarsNeeded"].as_object().unwrap();
    assert!(hints.contains_key("CLOUDFLARE_ACCOUNT_ID"));
    assert!(hints.contains_key("CLOUDFLARE_D1_DATABASE_ID"));
    assert!(hints.contains_key("CLOUDFLARE_D1_API_TOKEN"));
    assert!(app.audit.entries().is_empty());
}

#[tokio::test]
async fn trigger_rejects_unknown_direction() {
    let app = app_with_edge();
    let response = app
        .router
        .oneshot(post_sync("/sync?direction=sideways", Some("SUPER_ADMIN"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("sideways"));
}

#[tokio::test]
async fn trigger_runs_bidirectional_sync_and_audits() {
    let app = app_with_edge();
    app.d1.insert(sample_record("edge-only@acadia.dev", "Edge Only"));
    app.local
        .insert(sample_record("local-only@acadia.dev", "Local Only"));

    let response = app
        .router
        .clone()
        .oneshot(post_sync("/sync", Some("SUPER_ADMIN"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Sync completed"));
    assert_eq!(body["dryRun"], json!(false));
    assert_eq!(body["direction"], json!("bidirectional"));
    assert_eq!(body["roleFilter"], json!("ALL"));
    // An unfiltered run still carries the key, as an explicit null.
    assert!(body.as_object().unwrap().contains_key("academyId"));
    assert_eq!(body["academyId"], json!(null));
    assert_eq!(body["result"]["fromD1ToLocal"]["created"], json!(1));
    assert_eq!(body["result"]["fromLocalToD1"]["created"], json!(1));
    // The edge-to-primary pass ran first, so its new record already matches
    // on the reverse pass.
    assert_eq!(body["result"]["fromLocalToD1"]["updated"], json!(1));

    assert!(app.local.get("edge-only@acadia.dev").is_some());
    assert!(app.d1.get("local-only@acadia.dev").is_some());

    let entries = app.audit.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "D1_USER_SYNC");
    assert!(entries[0].description.contains("bidirectional"));
}

#[tokio::test]
async fn trigger_dry_run_counts_without_writing() {
    let app = app_with_edge();
    app.d1.insert(sample_record("edge-only@acadia.dev", "Edge Only"));

    let response = app
        .router
        .oneshot(post_sync(
            "/sync?direction=from-d1",
            Some("SUPER_ADMIN"),
            Some(json!({"dryRun": true})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(
        body["message"],
        json!("Sync simulation completed (no changes applied)")
    );
    assert_eq!(body["dryRun"], json!(true));
    assert_eq!(body["result"]["fromD1ToLocal"]["created"], json!(1));

    assert!(app.local.is_empty());
    assert_eq!(app.local.write_count(), 0);
    assert!(app.audit.entries().is_empty());
}

#[tokio::test]
async fn trigger_passes_filters_through() {
    let app = app_with_edge();
    let mut director = sample_record("director@acadia.dev", "Director");
    director.role = "DIRECTOR".to_string();
    app.d1.insert(director);
    app.d1.insert(sample_record("student@acadia.dev", "Student"));

    let response = app
        .router
        .oneshot(post_sync(
            "/sync?direction=from-d1&role=DIRECTOR&academyId=acad-1",
            Some("SUPER_ADMIN"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["roleFilter"], json!("DIRECTOR"));
    assert_eq!(body["academyId"], json!("acad-1"));
    assert_eq!(body["result"]["fromD1ToLocal"]["created"], json!(1));
    assert!(app.local.get("director@acadia.dev").is_some());
    assert!(app.local.get("student@acadia.dev").is_none());
}

#[tokio::test]
async fn status_requires_authentication() {
    let app = app_with_edge();
    let response = app.router.oneshot(get_sync(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn status_reports_both_stores_when_connected() {
    let app = app_with_edge();
    app.local.insert(sample_record("a@acadia.dev", "A"));
    app.d1.insert(sample_record("b@acadia.dev", "B"));
    app.d1.insert(sample_record("c@acadia.dev", "C"));

    let response = app.router.oneshot(get_sync(Some("TEACHER"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["workerStatus"], json!("connected"));
    assert_eq!(body["localStats"]["totalUsers"], json!(1));
    assert_eq!(body["d1Stats"]["totalUsers"], json!(2));
    assert_eq!(body["recentSyncs"], json!([]));
}

#[tokio::test]
async fn status_degrades_when_edge_not_configured() {
    let app = app_without_edge();

    let response = app.router.oneshot(get_sync(Some("SUPER_ADMIN"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["workerStatus"], json!("disconnected"));
    // Disconnected reports the key as an explicit null, never omits it.
    assert!(body.as_object().unwrap().contains_key("d1Stats"));
    assert_eq!(body["d1Stats"], json!(null));
}
