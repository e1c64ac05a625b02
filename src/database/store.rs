//! Storage seams for the job record lifecycle.
//!
//! The coordinator never writes to a store directly: it opens a
//! [`UnitOfWork`] through [`LifecycleStore::begin`], performs every step of a
//! transition through it and commits. Dropping a unit of work without
//! committing discards all of its writes.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::job_record::{DeletionState, JobRecord, JobRecordSummary};
use crate::models::trash_entry::{TrashEntry, TrashView};

#[async_trait]
pub trait JobRecordStore: Send {
    /// `NotFound` when no record has this id.
    async fn get(&mut self, id: i64) -> Result<JobRecord>;

    /// Trashed records, most recently updated first.
    async fn list_trashed(&mut self) -> Result<Vec<JobRecordSummary>>;

    /// Unconditional flag write; refreshes `updated_at`.
    async fn set_deletion_state(&mut self, id: i64, state: DeletionState) -> Result<JobRecord>;

    /// Unconditional row removal. Callers only invoke this while trashed.
    async fn hard_delete(&mut self, id: i64) -> Result<()>;
}

#[async_trait]
pub trait TrashLedger: Send {
    /// Returns `true` when a new entry was written, `false` when one already existed.
    async fn insert_if_absent(&mut self, job_record_id: i64) -> Result<bool>;

    async fn get_by_entry_id(&mut self, trash_entry_id: i64) -> Result<TrashEntry>;

    /// Entries joined with their job record, newest first.
    async fn list(&mut self) -> Result<Vec<TrashView>>;

    /// Number of entries removed (0 or 1).
    async fn remove_by_entry_id(&mut self, trash_entry_id: i64) -> Result<u64>;

    /// Number of entries removed (0 or 1).
    async fn remove_by_job_record_id(&mut self, job_record_id: i64) -> Result<u64>;
}

#[async_trait]
pub trait UnitOfWork: JobRecordStore + TrashLedger {
    async fn commit(self: Box<Self>) -> Result<()>;
}

#[async_trait]
pub trait LifecycleStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>>;
}
