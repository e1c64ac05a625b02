use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::error::{Error, Result};
use crate::middleware::auth::Actor;

/// Outcome of checking an actor against one job record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Admin,
    Owner,
    Denied,
}

impl Authorization {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Authorization::Denied)
    }

    /// Compares the record's owner with the actor's linked alumni identity.
    pub fn from_link(record_alumni_id: i64, actor_alumni_id: Option<i64>) -> Self {
        match actor_alumni_id {
            Some(linked) if linked == record_alumni_id => Authorization::Owner,
            _ => Authorization::Denied,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnershipResolver: Send + Sync {
    /// `NotFound` when the job record does not exist.
    async fn authorize(&self, actor: &Actor, job_record_id: i64) -> Result<Authorization>;
}

#[derive(Clone)]
pub struct PgOwnershipResolver {
    pool: PgPool,
}

impl PgOwnershipResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct OwnershipRow {
    record_alumni_id: i64,
    actor_alumni_id: Option<i64>,
}

#[async_trait]
impl OwnershipResolver for PgOwnershipResolver {
    async fn authorize(&self, actor: &Actor, job_record_id: i64) -> Result<Authorization> {
        if actor.is_admin() {
            return Ok(Authorization::Admin);
        }

        let row = sqlx::query_as::<_, OwnershipRow>(
            r#"
            SELECT j.alumni_id AS record_alumni_id, u.alumni_id AS actor_alumni_id
            FROM job_records j
            LEFT JOIN users u ON u.id = $2
            WHERE j.id = $1
            "#,
        )
        .bind(job_record_id)
        .bind(actor.user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Job record not found".to_string()))?;

        Ok(Authorization::from_link(row.record_alumni_id, row.actor_alumni_id))
    }
}
