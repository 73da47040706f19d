//! Engine behavior over the D1 adapter with a mocked query endpoint.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use acadia_edge::{D1Client, D1Config};
use acadia_sync::testing::MemoryStore;
use acadia_sync::{D1UserStore, RawSyncRequest, SyncDirective, SyncEngine};

fn d1_store(server: &MockServer) -> Arc<D1UserStore> {
    let config = D1Config::new("acct", "db", "token").with_base_url(server.uri());
    Arc::new(D1UserStore::new(D1Client::new(config).unwrap()))
}

fn from_d1() -> SyncDirective {
    SyncDirective::build(RawSyncRequest {
        direction: Some("from-d1".to_string()),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn malformed_rows_fail_individually_while_the_rest_sync() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts/acct/d1/database/db/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": [{
                "results": [
                    {"email": "a@x.com", "password": "$2a$10$h", "role": "STUDENT", "approved": 1, "points": 10},
                    {"email": "broken@x.com", "password": "$2a$10$h", "role": "STUDENT", "emailVerified": "not-a-date"},
                    {"name": "No Email", "role": "STUDENT", "approved": 1},
                    {"email": "c@x.com", "password": "$2a$10$h", "role": "TEACHER", "approved": 0},
                ],
            }],
        })))
        .mount(&server)
        .await;

    let local = Arc::new(MemoryStore::new("local"));
    let engine = SyncEngine::new(local.clone(), d1_store(&server));
    let result = engine.run(&from_d1()).await;

    let pass = &result.from_d1_to_local;
    assert_eq!((pass.created, pass.updated, pass.failed), (2, 0, 2));

    // The unparseable timestamp is keyed by the row's own email; the row
    // without one falls back to the synthetic key.
    assert_eq!(pass.errors[0].email, "broken@x.com");
    assert!(pass.errors[0].error.contains("Unparseable timestamp"));
    assert_eq!(pass.errors[1].email, "*");
    assert!(pass.errors[1].error.contains("email"));

    // Every valid record still applied.
    assert!(local.get("a@x.com").is_some());
    assert!(local.get("c@x.com").is_some());
    assert!(local.get("broken@x.com").is_none());
}

#[tokio::test]
async fn endpoint_failure_is_still_fatal_to_the_pass() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let local = Arc::new(MemoryStore::new("local"));
    let engine = SyncEngine::new(local.clone(), d1_store(&server));
    let result = engine.run(&from_d1()).await;

    let pass = &result.from_d1_to_local;
    assert_eq!((pass.created, pass.updated, pass.failed), (0, 0, 1));
    assert_eq!(pass.errors[0].email, "*");
    assert!(local.is_empty());
}
