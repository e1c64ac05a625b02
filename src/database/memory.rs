//! In-process lifecycle store.
//!
//! A unit of work holds the state lock for its whole lifetime, which
//! serializes transitions the same way row locks do in PostgreSQL. Writes go
//! straight to the guarded state; a snapshot taken at `begin` is put back if
//! the unit of work is dropped without committing.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::database::store::{JobRecordStore, LifecycleStore, TrashLedger, UnitOfWork};
use crate::error::{Error, Result};
use crate::middleware::auth::Actor;
use crate::middleware::ownership::{Authorization, OwnershipResolver};
use crate::models::job_record::{DeletionState, JobRecord, JobRecordSummary};
use crate::models::trash_entry::{TrashEntry, TrashView, TRASH_STATUS};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    records: BTreeMap<i64, JobRecord>,
    trash: BTreeMap<i64, TrashEntry>,
    user_alumni: HashMap<i64, Option<i64>>,
    next_trash_id: i64,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_ledger_removal: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record` as-is, replacing any record with the same id.
    pub async fn put_job_record(&self, record: JobRecord) {
        let mut state = self.state.lock().await;
        state.records.insert(record.id, record);
    }

    /// Links a user account to an alumni identity (or to none).
    pub async fn link_user(&self, user_id: i64, alumni_id: Option<i64>) {
        let mut state = self.state.lock().await;
        state.user_alumni.insert(user_id, alumni_id);
    }

    pub async fn job_record(&self, id: i64) -> Option<JobRecord> {
        self.state.lock().await.records.get(&id).cloned()
    }

    pub async fn trash_entries(&self) -> Vec<TrashEntry> {
        self.state.lock().await.trash.values().cloned().collect()
    }

    /// Makes the next ledger removal fail with a store error.
    pub fn fail_next_ledger_removal(&self) {
        self.fail_ledger_removal.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl LifecycleStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>> {
        let guard = self.state.clone().lock_owned().await;
        let snapshot = guard.clone();
        Ok(Box::new(MemoryUnitOfWork {
            guard,
            snapshot: Some(snapshot),
            fail_ledger_removal: self.fail_ledger_removal.clone(),
        }))
    }
}

#[async_trait]
impl OwnershipResolver for MemoryStore {
    async fn authorize(&self, actor: &Actor, job_record_id: i64) -> Result<Authorization> {
        if actor.is_admin() {
            return Ok(Authorization::Admin);
        }
        let state = self.state.lock().await;
        let record = state
            .records
            .get(&job_record_id)
            .ok_or_else(|| Error::NotFound("Job record not found".to_string()))?;
        let linked = state.user_alumni.get(&actor.user_id).copied().flatten();
        Ok(Authorization::from_link(record.alumni_id, linked))
    }
}

pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<MemoryState>,
    snapshot: Option<MemoryState>,
    fail_ledger_removal: Arc<AtomicBool>,
}

impl MemoryUnitOfWork {
    fn check_removal_fault(&self) -> Result<()> {
        if self.fail_ledger_removal.swap(false, Ordering::SeqCst) {
            return Err(Error::Database(sqlx::Error::Protocol(
                "injected ledger removal failure".to_string(),
            )));
        }
        Ok(())
    }
}

impl Drop for MemoryUnitOfWork {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.guard = snapshot;
        }
    }
}

#[async_trait]
impl JobRecordStore for MemoryUnitOfWork {
    async fn get(&mut self, id: i64) -> Result<JobRecord> {
        self.guard
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Job record not found".to_string()))
    }

    async fn list_trashed(&mut self) -> Result<Vec<JobRecordSummary>> {
        let mut items: Vec<JobRecordSummary> = self
            .guard
            .records
            .values()
            .filter(|r| r.is_trashed())
            .cloned()
            .map(Into::into)
            .collect();
        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(items)
    }

    async fn set_deletion_state(&mut self, id: i64, state: DeletionState) -> Result<JobRecord> {
        let record = self
            .guard
            .records
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Job record not found".to_string()))?;
        record.deletion_state = state;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn hard_delete(&mut self, id: i64) -> Result<()> {
        self.guard
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound("Job record not found".to_string()))
    }
}

#[async_trait]
impl TrashLedger for MemoryUnitOfWork {
    async fn insert_if_absent(&mut self, job_record_id: i64) -> Result<bool> {
        let state = &mut *self.guard;
        if state.trash.values().any(|t| t.job_record_id == job_record_id) {
            return Ok(false);
        }
        state.next_trash_id += 1;
        let id = state.next_trash_id;
        state.trash.insert(
            id,
            TrashEntry {
                id,
                job_record_id,
                status: TRASH_STATUS.to_string(),
                created_at: Utc::now(),
            },
        );
        Ok(true)
    }

    async fn get_by_entry_id(&mut self, trash_entry_id: i64) -> Result<TrashEntry> {
        self.guard
            .trash
            .get(&trash_entry_id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Trash entry not found".to_string()))
    }

    async fn list(&mut self) -> Result<Vec<TrashView>> {
        let state = &*self.guard;
        let mut items: Vec<TrashView> = state
            .trash
            .values()
            .filter_map(|entry| {
                state.records.get(&entry.job_record_id).map(|record| TrashView {
                    trash_entry_id: entry.id,
                    job_record_id: entry.job_record_id,
                    status: entry.status.clone(),
                    created_at: entry.created_at,
                    owner_alumni_id: record.alumni_id,
                    company: record.company.clone(),
                    position: record.position.clone(),
                    industry: record.industry.clone(),
                })
            })
            .collect();
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.trash_entry_id.cmp(&a.trash_entry_id))
        });
        Ok(items)
    }

    async fn remove_by_entry_id(&mut self, trash_entry_id: i64) -> Result<u64> {
        self.check_removal_fault()?;
        Ok(self.guard.trash.remove(&trash_entry_id).map_or(0, |_| 1))
    }

    async fn remove_by_job_record_id(&mut self, job_record_id: i64) -> Result<u64> {
        self.check_removal_fault()?;
        let before = self.guard.trash.len();
        self.guard.trash.retain(|_, t| t.job_record_id != job_record_id);
        Ok((before - self.guard.trash.len()) as u64)
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        let orphaned = self
            .guard
            .trash
            .values()
            .any(|t| !self.guard.records.contains_key(&t.job_record_id));
        if orphaned {
            return Err(Error::Internal(
                "trash entry references a missing job record".to_string(),
            ));
        }
        self.snapshot = None;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::NaiveDate;

    pub fn job_record(id: i64, alumni_id: i64) -> JobRecord {
        let now = Utc::now();
        JobRecord {
            id,
            alumni_id,
            company: format!("Company {}", id),
            position: "Engineer".to_string(),
            industry: "Software".to_string(),
            location: "Jakarta".to_string(),
            salary_range: Some("10-15jt".to_string()),
            start_date: NaiveDate::from_ymd_opt(2022, 1, 10).unwrap(),
            end_date: None,
            status: "current".to_string(),
            description: None,
            deletion_state: DeletionState::Active,
            created_at: now,
            updated_at: now,
        }
    }
}
