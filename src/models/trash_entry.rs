use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The only status a live ledger entry ever carries.
pub const TRASH_STATUS: &str = "trashed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TrashEntry {
    pub id: i64,
    pub job_record_id: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// A ledger entry joined with the display fields of its job record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TrashView {
    pub trash_entry_id: i64,
    pub job_record_id: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub owner_alumni_id: i64,
    pub company: String,
    pub position: String,
    pub industry: String,
}
