//! Engine behavior tests against in-memory fake stores.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use acadia_sync::testing::{sample_record, MemoryStore};
use acadia_sync::{RawSyncRequest, SyncDirective, SyncEngine};

fn directive(raw: RawSyncRequest) -> SyncDirective {
    SyncDirective::build(raw).unwrap()
}

fn from_d1() -> RawSyncRequest {
    RawSyncRequest {
        direction: Some("from-d1".to_string()),
        ..Default::default()
    }
}

fn to_d1() -> RawSyncRequest {
    RawSyncRequest {
        direction: Some("to-d1".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn absent_record_is_created_with_mapped_fields() {
    let d1 = Arc::new(MemoryStore::with_records(
        "d1",
        vec![sample_record("a@x.com", "Alice")],
    ));
    let local = Arc::new(MemoryStore::new("local"));
    let engine = SyncEngine::new(local.clone(), d1);

    let result = engine.run(&directive(from_d1())).await;

    let pass = &result.from_d1_to_local;
    assert_eq!((pass.created, pass.updated, pass.failed), (1, 0, 0));
    let created = local.get("a@x.com").unwrap();
    assert_eq!(created.name.as_deref(), Some("Alice"));
    assert_eq!(created.password, "$2a$10$opaquehash");
}

#[tokio::test]
async fn present_record_is_overwritten_from_source() {
    let mut stale = sample_record("b@x.com", "Old Name");
    stale.points = 5;
    let local = Arc::new(MemoryStore::with_records("local", vec![stale]));

    let mut fresh = sample_record("b@x.com", "New Name");
    fresh.points = 50;
    let d1 = Arc::new(MemoryStore::with_records("d1", vec![fresh]));

    let engine = SyncEngine::new(local.clone(), d1);
    let result = engine.run(&directive(from_d1())).await;

    let pass = &result.from_d1_to_local;
    assert_eq!((pass.created, pass.updated, pass.failed), (0, 1, 0));
    let updated = local.get("b@x.com").unwrap();
    assert_eq!(updated.name.as_deref(), Some("New Name"));
    assert_eq!(updated.points, 50);
}

#[tokio::test]
async fn one_failing_record_never_aborts_the_pass() {
    let d1 = Arc::new(MemoryStore::with_records(
        "d1",
        vec![
            sample_record("a@x.com", "A"),
            sample_record("c@x.com", "C"),
            sample_record("z@x.com", "Z"),
        ],
    ));
    let local = Arc::new(MemoryStore::new("local"));
    local.fail_writes_for("c@x.com");

    let engine = SyncEngine::new(local.clone(), d1);
    let result = engine.run(&directive(from_d1())).await;

    let pass = &result.from_d1_to_local;
    assert_eq!(pass.failed, 1);
    assert_eq!(pass.applied(), 2);
    assert_eq!(pass.errors.len(), 1);
    assert_eq!(pass.errors[0].email, "c@x.com");
    assert!(pass.errors[0].error.contains("injected write failure"));
    // The failing record is not partially written; the others are present.
    assert!(local.get("c@x.com").is_none());
    assert!(local.get("a@x.com").is_some());
    assert!(local.get("z@x.com").is_some());
}

#[tokio::test]
async fn dry_run_counts_without_mutating() {
    let d1 = Arc::new(MemoryStore::with_records(
        "d1",
        vec![sample_record("a@x.com", "A"), sample_record("b@x.com", "B")],
    ));
    let local = Arc::new(MemoryStore::with_records(
        "local",
        vec![sample_record("b@x.com", "Stale B")],
    ));

    let engine = SyncEngine::new(local.clone(), d1.clone());
    let raw = RawSyncRequest {
        dry_run: Some(true),
        ..from_d1()
    };
    let result = engine.run(&directive(raw)).await;

    // Counters are exactly what a real run would report.
    let pass = &result.from_d1_to_local;
    assert_eq!((pass.created, pass.updated, pass.failed), (1, 1, 0));
    // Neither store saw a single write.
    assert_eq!(local.write_count(), 0);
    assert_eq!(d1.write_count(), 0);
    assert!(local.get("a@x.com").is_none());
    assert_eq!(local.get("b@x.com").unwrap().name.as_deref(), Some("Stale B"));
}

#[tokio::test]
async fn second_identical_run_updates_everything_and_creates_nothing() {
    let d1 = Arc::new(MemoryStore::with_records(
        "d1",
        vec![sample_record("a@x.com", "A"), sample_record("b@x.com", "B")],
    ));
    let local = Arc::new(MemoryStore::new("local"));
    let engine = SyncEngine::new(local.clone(), d1);

    let first = engine.run(&directive(from_d1())).await;
    assert_eq!(first.from_d1_to_local.created, 2);

    let second = engine.run(&directive(from_d1())).await;
    let pass = &second.from_d1_to_local;
    // Matched records are always rewritten; no no-op skipping.
    assert_eq!((pass.created, pass.updated, pass.failed), (0, 2, 0));
    assert_eq!(local.len(), 2);
}

#[tokio::test]
async fn from_d1_never_writes_to_the_edge_store() {
    let d1 = Arc::new(MemoryStore::with_records(
        "d1",
        vec![sample_record("a@x.com", "A")],
    ));
    let local = Arc::new(MemoryStore::with_records(
        "local",
        vec![sample_record("only-local@x.com", "L")],
    ));

    let engine = SyncEngine::new(local.clone(), d1.clone());
    engine.run(&directive(from_d1())).await;

    assert_eq!(d1.write_count(), 0);
    assert!(d1.get("only-local@x.com").is_none());
}

#[tokio::test]
async fn to_d1_never_writes_to_the_local_store() {
    let d1 = Arc::new(MemoryStore::new("d1"));
    let local = Arc::new(MemoryStore::with_records(
        "local",
        vec![sample_record("a@x.com", "A")],
    ));

    let engine = SyncEngine::new(local.clone(), d1.clone());
    let result = engine.run(&directive(to_d1())).await;

    assert_eq!(result.from_local_to_d1.created, 1);
    // The unscheduled direction keeps its zeroed default.
    assert_eq!(result.from_d1_to_local.applied(), 0);
    assert_eq!(local.write_count(), 0);
    assert!(d1.get("a@x.com").is_some());
}

#[tokio::test]
async fn role_and_academy_filters_exclude_records_entirely() {
    let mut director = sample_record("dir@x.com", "Director");
    director.role = "DIRECTOR".to_string();
    let mut other_academy = sample_record("other@x.com", "Other");
    other_academy.academy_id = Some("acad-2".to_string());

    let d1 = Arc::new(MemoryStore::with_records(
        "d1",
        vec![sample_record("stu@x.com", "Student"), director, other_academy],
    ));
    let local = Arc::new(MemoryStore::new("local"));
    let engine = SyncEngine::new(local.clone(), d1);

    let raw = RawSyncRequest {
        role: Some("STUDENT".to_string()),
        academy_id: Some("acad-1".to_string()),
        ..from_d1()
    };
    let result = engine.run(&directive(raw)).await;

    let pass = &result.from_d1_to_local;
    assert_eq!((pass.created, pass.updated, pass.failed), (1, 0, 0));
    assert!(pass.errors.is_empty());
    assert!(local.get("stu@x.com").is_some());
    assert!(local.get("dir@x.com").is_none());
    assert!(local.get("other@x.com").is_none());
}

#[tokio::test]
async fn fetch_failure_aborts_only_its_own_pass() {
    let d1 = Arc::new(MemoryStore::with_records(
        "d1",
        vec![sample_record("a@x.com", "A")],
    ));
    d1.set_fail_fetch(true);
    let local = Arc::new(MemoryStore::with_records(
        "local",
        vec![sample_record("b@x.com", "B")],
    ));

    let engine = SyncEngine::new(local.clone(), d1.clone());
    let result = engine.run(&directive(RawSyncRequest::default())).await;

    // The from-d1 pass aborted with one synthetic failure entry.
    let aborted = &result.from_d1_to_local;
    assert_eq!((aborted.created, aborted.updated, aborted.failed), (0, 0, 1));
    assert_eq!(aborted.errors[0].email, "*");
    assert!(aborted.errors[0].error.contains("injected fetch failure"));

    // The to-d1 pass still ran to completion.
    let completed = &result.from_local_to_d1;
    assert_eq!((completed.created, completed.updated, completed.failed), (1, 0, 0));
    assert!(d1.get("b@x.com").is_some());
}

#[tokio::test]
async fn bidirectional_converges_both_stores() {
    let d1 = Arc::new(MemoryStore::with_records(
        "d1",
        vec![sample_record("edge@x.com", "Edge Only")],
    ));
    let local = Arc::new(MemoryStore::with_records(
        "local",
        vec![sample_record("local@x.com", "Local Only")],
    ));

    let engine = SyncEngine::new(local.clone(), d1.clone());
    let result = engine.run(&directive(RawSyncRequest::default())).await;

    // Pass one copies the edge record down; pass two then sees it as a local
    // source record, so the second pass updates it back and creates the
    // local-only one.
    assert_eq!(result.from_d1_to_local.created, 1);
    assert_eq!(result.from_local_to_d1.created, 1);
    assert_eq!(result.from_local_to_d1.updated, 1);
    assert_eq!(local.len(), 2);
    assert_eq!(d1.len(), 2);
}
