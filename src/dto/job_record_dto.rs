use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::job_record::{DeletionState, JobRecord};
use crate::services::job_record_service::JobRecordPage;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_create_dates"))]
pub struct CreateJobRecordPayload {
    #[validate(range(min = 1))]
    pub alumni_id: i64,
    #[validate(length(min = 1))]
    pub company: String,
    #[validate(length(min = 1))]
    pub position: String,
    #[validate(length(min = 1))]
    pub industry: String,
    #[validate(length(min = 1))]
    pub location: String,
    pub salary_range: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_update_dates"))]
pub struct UpdateJobRecordPayload {
    #[validate(length(min = 1))]
    pub company: String,
    #[validate(length(min = 1))]
    pub position: String,
    #[validate(length(min = 1))]
    pub industry: String,
    #[validate(length(min = 1))]
    pub location: String,
    pub salary_range: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[validate(length(min = 1))]
    pub status: String,
    pub description: Option<String>,
}

fn check_date_order(start: NaiveDate, end: Option<NaiveDate>) -> Result<(), ValidationError> {
    match end {
        Some(end) if end < start => Err(ValidationError::new("end_date_before_start_date")),
        _ => Ok(()),
    }
}

fn validate_create_dates(payload: &CreateJobRecordPayload) -> Result<(), ValidationError> {
    check_date_order(payload.start_date, payload.end_date)
}

fn validate_update_dates(payload: &UpdateJobRecordPayload) -> Result<(), ValidationError> {
    check_date_order(payload.start_date, payload.end_date)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecordResponse {
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
    pub state: DeletionState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<JobRecord> for JobRecordResponse {
    fn from(value: JobRecord) -> Self {
        Self {
            id: value.id,
            alumni_id: value.alumni_id,
            company: value.company,
            position: value.position,
            industry: value.industry,
            location: value.location,
            salary_range: value.salary_range,
            start_date: value.start_date,
            end_date: value.end_date,
            status: value.status,
            description: value.description,
            state: value.deletion_state,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobRecordListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
    pub sort_by: String,
    pub order: String,
    pub search: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecordListResponse {
    pub items: Vec<JobRecordResponse>,
    pub meta: PageMeta,
}

impl From<JobRecordPage> for JobRecordListResponse {
    fn from(value: JobRecordPage) -> Self {
        Self {
            items: value.items.into_iter().map(Into::into).collect(),
            meta: PageMeta {
                page: value.page,
                limit: value.limit,
                total: value.total,
                pages: value.pages,
                sort_by: value.sort_by.as_str().to_string(),
                order: value.order.as_str().to_string(),
                search: value.search,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(start: &str, end: Option<&str>) -> CreateJobRecordPayload {
        CreateJobRecordPayload {
            alumni_id: 3,
            company: "Acme".into(),
            position: "Engineer".into(),
            industry: "Software".into(),
            location: "Bandung".into(),
            salary_range: None,
            start_date: start.parse().unwrap(),
            end_date: end.map(|e| e.parse().unwrap()),
            status: None,
            description: None,
        }
    }

    #[test]
    fn end_date_may_not_precede_start_date() {
        assert!(payload("2021-05-01", Some("2023-01-01")).validate().is_ok());
        assert!(payload("2021-05-01", None).validate().is_ok());
        assert!(payload("2021-05-01", Some("2020-01-01")).validate().is_err());
    }

    #[test]
    fn blank_company_is_rejected() {
        let mut p = payload("2021-05-01", None);
        p.company = String::new();
        assert!(p.validate().is_err());
    }
}
