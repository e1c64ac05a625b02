use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::job_record::{DeletionState, JobRecordSummary};
use crate::models::trash_entry::TrashView;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateChangePayload {
    pub state: DeletionState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashItemResponse {
    pub trash_entry_id: i64,
    pub job_record_id: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub owner_alumni_id: i64,
    pub company: String,
    pub position: String,
    pub industry: String,
}

impl From<TrashView> for TrashItemResponse {
    fn from(value: TrashView) -> Self {
        Self {
            trash_entry_id: value.trash_entry_id,
            job_record_id: value.job_record_id,
            status: value.status,
            created_at: value.created_at,
            owner_alumni_id: value.owner_alumni_id,
            company: value.company,
            position: value.position,
            industry: value.industry,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecordSummaryResponse {
    pub id: i64,
    pub alumni_id: i64,
    pub company: String,
    pub position: String,
    pub industry: String,
    pub state: DeletionState,
    pub updated_at: DateTime<Utc>,
}

impl From<JobRecordSummary> for JobRecordSummaryResponse {
    fn from(value: JobRecordSummary) -> Self {
        Self {
            id: value.id,
            alumni_id: value.alumni_id,
            company: value.company,
            position: value.position,
            industry: value.industry,
            state: value.deletion_state,
            updated_at: value.updated_at,
        }
    }
}
