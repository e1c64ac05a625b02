use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Whether a job record participates in normal listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletionState {
    Active,
    Trashed,
}

impl DeletionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletionState::Active => "active",
            DeletionState::Trashed => "trashed",
        }
    }
}

impl fmt::Display for DeletionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown deletion state: {0}")]
pub struct UnknownDeletionState(pub String);

impl FromStr for DeletionState {
    type Err = UnknownDeletionState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(DeletionState::Active),
            "trashed" => Ok(DeletionState::Trashed),
            other => Err(UnknownDeletionState(other.to_string())),
        }
    }
}

impl TryFrom<String> for DeletionState {
    type Error = UnknownDeletionState;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobRecord {
    pub id: i64,
    pub alumni_id: i64,
    pub company: String,
    pub position: String,
    pub industry: String,
    pub location: String,
    pub salary_range: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub deletion_state: DeletionState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    pub fn is_trashed(&self) -> bool {
        self.deletion_state == DeletionState::Trashed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobRecordSummary {
    pub id: i64,
    pub alumni_id: i64,
    pub company: String,
    pub position: String,
    pub industry: String,
    #[sqlx(try_from = "String")]
    pub deletion_state: DeletionState,
    pub updated_at: DateTime<Utc>,
}

impl From<JobRecord> for JobRecordSummary {
    fn from(value: JobRecord) -> Self {
        Self {
            id: value.id,
            alumni_id: value.alumni_id,
            company: value.company,
            position: value.position,
            industry: value.industry,
            deletion_state: value.deletion_state,
            updated_at: value.updated_at,
        }
    }
}
