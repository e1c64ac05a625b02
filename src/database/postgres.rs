use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::database::store::{JobRecordStore, LifecycleStore, TrashLedger, UnitOfWork};
use crate::error::{Error, Result};
use crate::models::job_record::{DeletionState, JobRecord, JobRecordSummary};
use crate::models::trash_entry::{TrashEntry, TrashView, TRASH_STATUS};

pub(crate) const JOB_RECORD_COLUMNS: &str = "id, alumni_id, company, position, industry, location, salary_range, start_date, end_date, status, description, deletion_state, created_at, updated_at";

#[derive(Clone)]
pub struct PgLifecycleStore {
    pool: PgPool,
}

impl PgLifecycleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LifecycleStore for PgLifecycleStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

/// One database transaction. Rolled back by sqlx when dropped uncommitted.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl JobRecordStore for PgUnitOfWork {
    async fn get(&mut self, id: i64) -> Result<JobRecord> {
        let sql = format!("SELECT {} FROM job_records WHERE id = $1", JOB_RECORD_COLUMNS);
        sqlx::query_as::<_, JobRecord>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?
            .ok_or_else(|| Error::NotFound("Job record not found".to_string()))
    }

    async fn list_trashed(&mut self) -> Result<Vec<JobRecordSummary>> {
        let items = sqlx::query_as::<_, JobRecordSummary>(
            r#"
            SELECT id, alumni_id, company, position, industry, deletion_state, updated_at
            FROM job_records
            WHERE deletion_state = 'trashed'
            ORDER BY updated_at DESC, id DESC
            "#,
        )
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(items)
    }

    async fn set_deletion_state(&mut self, id: i64, state: DeletionState) -> Result<JobRecord> {
        let sql = format!(
            "UPDATE job_records SET deletion_state = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            JOB_RECORD_COLUMNS
        );
        sqlx::query_as::<_, JobRecord>(&sql)
            .bind(id)
            .bind(state.as_str())
            .fetch_optional(&mut *self.tx)
            .await?
            .ok_or_else(|| Error::NotFound("Job record not found".to_string()))
    }

    async fn hard_delete(&mut self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM job_records WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Job record not found".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TrashLedger for PgUnitOfWork {
    async fn insert_if_absent(&mut self, job_record_id: i64) -> Result<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO job_record_trash (job_record_id, status)
            VALUES ($1, $2)
            ON CONFLICT (job_record_id) DO NOTHING
            "#,
        )
        .bind(job_record_id)
        .bind(TRASH_STATUS)
        .execute(&mut *self.tx)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn get_by_entry_id(&mut self, trash_entry_id: i64) -> Result<TrashEntry> {
        sqlx::query_as::<_, TrashEntry>(
            "SELECT id, job_record_id, status, created_at FROM job_record_trash WHERE id = $1",
        )
        .bind(trash_entry_id)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| Error::NotFound("Trash entry not found".to_string()))
    }

    async fn list(&mut self) -> Result<Vec<TrashView>> {
        let items = sqlx::query_as::<_, TrashView>(
            r#"
            SELECT t.id AS trash_entry_id, t.job_record_id, t.status, t.created_at,
                   j.alumni_id AS owner_alumni_id, j.company, j.position, j.industry
            FROM job_record_trash t
            JOIN job_records j ON j.id = t.job_record_id
            ORDER BY t.created_at DESC, t.id DESC
            "#,
        )
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(items)
    }

    async fn remove_by_entry_id(&mut self, trash_entry_id: i64) -> Result<u64> {
        let res = sqlx::query("DELETE FROM job_record_trash WHERE id = $1")
            .bind(trash_entry_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(res.rows_affected())
    }

    async fn remove_by_job_record_id(&mut self, job_record_id: i64) -> Result<u64> {
        let res = sqlx::query("DELETE FROM job_record_trash WHERE job_record_id = $1")
            .bind(job_record_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(res.rows_affected())
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn commit(self: Box<Self>) -> Result<()> {
        let this = *self;
        this.tx.commit().await?;
        Ok(())
    }
}
