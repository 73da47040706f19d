//! In-memory fake stores for tests.
//!
//! Deterministic [`UserStore`]/[`AuditLog`]/[`HealthProbe`] implementations
//! with per-email write-failure injection, used by the engine suite here and
//! (behind the `test-util` feature) by downstream handler tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::record::{RecordFilter, RecordSet, UserRecord};
use crate::store::{
    AuditEntry, AuditLog, AuditRecord, HealthProbe, RoleCounts, StoreError, StoreResult,
    UserStore,
};

/// Build a student record with the given email and name.
#[must_use]
pub fn sample_record(email: &str, name: &str) -> UserRecord {
    UserRecord {
        email: email.to_string(),
        password: "$2a$10$opaquehash".to_string(),
        name: Some(name.to_string()),
        phone: Some("010-0000-0000".to_string()),
        role: "STUDENT".to_string(),
        grade: Some("G7".to_string()),
        parent_phone: None,
        student_code: None,
        student_id: None,
        academy_id: Some("acad-1".to_string()),
        approved: true,
        ai_chat_enabled: false,
        ai_homework_enabled: false,
        ai_study_enabled: false,
        points: 0,
        email_verified: None,
    }
}

/// In-memory user store with failure injection.
pub struct MemoryStore {
    name: &'static str,
    records: Mutex<Vec<UserRecord>>,
    fail_writes_for: Mutex<HashSet<String>>,
    fail_fetch: AtomicBool,
    fail_probe: AtomicBool,
    writes: AtomicU32,
}

impl MemoryStore {
    /// Create an empty store labelled `name`.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            records: Mutex::new(Vec::new()),
            fail_writes_for: Mutex::new(HashSet::new()),
            fail_fetch: AtomicBool::new(false),
            fail_probe: AtomicBool::new(false),
            writes: AtomicU32::new(0),
        }
    }

    /// Create a store pre-seeded with records.
    #[must_use]
    pub fn with_records(name: &'static str, records: Vec<UserRecord>) -> Self {
        let store = Self::new(name);
        *store.records.lock().unwrap() = records;
        store
    }

    /// Seed one record.
    pub fn insert(&self, record: UserRecord) {
        self.records.lock().unwrap().push(record);
    }

    /// Make every write for `email` fail with an injected error.
    pub fn fail_writes_for(&self, email: &str) {
        self.fail_writes_for
            .lock()
            .unwrap()
            .insert(email.to_string());
    }

    /// Make the next fetches fail fatally.
    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    /// Make health probes fail.
    pub fn set_fail_probe(&self, fail: bool) {
        self.fail_probe.store(fail, Ordering::SeqCst);
    }

    /// Current record for `email`, if present.
    #[must_use]
    pub fn get(&self, email: &str) -> Option<UserRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.email == email)
            .cloned()
    }

    /// Number of records currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// True when no records are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of create/update calls that reached this store.
    #[must_use]
    pub fn write_count(&self) -> u32 {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_write(&self, email: &str) -> StoreResult<()> {
        if self.fail_writes_for.lock().unwrap().contains(email) {
            return Err(StoreError::internal(format!(
                "injected write failure for {email}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch_users(&self, filter: &RecordFilter) -> StoreResult<RecordSet> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(StoreError::internal("injected fetch failure"));
        }
        Ok(RecordSet::from_records(
            self.records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| filter.role.as_deref().is_none_or(|role| r.role == role))
                .filter(|r| {
                    filter
                        .academy_id
                        .as_deref()
                        .is_none_or(|id| r.academy_id.as_deref() == Some(id))
                })
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        Ok(self.get(email))
    }

    async fn create_user(&self, record: &UserRecord) -> StoreResult<()> {
        self.check_write(&record.email)?;
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.email == record.email) {
            return Err(StoreError::internal(format!(
                "unique constraint violation: {}",
                record.email
            )));
        }
        records.push(record.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update_user(&self, record: &UserRecord) -> StoreResult<()> {
        self.check_write(&record.email)?;
        let mut records = self.records.lock().unwrap();
        let Some(existing) = records.iter_mut().find(|r| r.email == record.email) else {
            return Err(StoreError::internal(format!(
                "no record to update: {}",
                record.email
            )));
        };
        // Mutable field set only; email/password/role/email_verified keep
        // their destination values, matching the real stores.
        existing.name = record.name.clone();
        existing.phone = record.phone.clone();
        existing.grade = record.grade.clone();
        existing.parent_phone = record.parent_phone.clone();
        existing.student_code = record.student_code.clone();
        existing.student_id = record.student_id.clone();
        existing.academy_id = record.academy_id.clone();
        existing.approved = record.approved;
        existing.ai_chat_enabled = record.ai_chat_enabled;
        existing.ai_homework_enabled = record.ai_homework_enabled;
        existing.ai_study_enabled = record.ai_study_enabled;
        existing.points = record.points;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn count_by_role(&self) -> StoreResult<RoleCounts> {
        let records = self.records.lock().unwrap();
        let count_role =
            |role: &str| records.iter().filter(|r| r.role == role).count() as i64;
        Ok(RoleCounts {
            total_users: records.len() as i64,
            students: count_role("STUDENT"),
            directors: count_role("DIRECTOR"),
            teachers: count_role("TEACHER"),
        })
    }
}

#[async_trait]
impl HealthProbe for MemoryStore {
    async fn probe(&self) -> StoreResult<()> {
        if self.fail_probe.load(Ordering::SeqCst) {
            return Err(StoreError::internal("injected probe failure"));
        }
        Ok(())
    }
}

/// In-memory audit log with failure injection.
#[derive(Default)]
pub struct MemoryAudit {
    entries: Mutex<Vec<AuditEntry>>,
    fail_append: AtomicBool,
}

impl MemoryAudit {
    /// Create an empty audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make appends fail.
    pub fn set_fail_append(&self, fail: bool) {
        self.fail_append.store(fail, Ordering::SeqCst);
    }

    /// All appended entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditLog for MemoryAudit {
    async fn append(&self, entry: &AuditEntry) -> StoreResult<()> {
        if self.fail_append.load(Ordering::SeqCst) {
            return Err(StoreError::internal("injected audit failure"));
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn recent(&self, action: &str, limit: i64) -> StoreResult<Vec<AuditRecord>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|e| e.action == action)
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|e| AuditRecord {
                id: Uuid::new_v4(),
                action: e.action.clone(),
                description: e.description.clone(),
                created_at: Utc::now(),
                user: None,
            })
            .collect())
    }
}
