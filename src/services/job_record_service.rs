use sqlx::PgPool;
use tracing::instrument;

use crate::database::postgres::JOB_RECORD_COLUMNS;
use crate::dto::job_record_dto::{CreateJobRecordPayload, JobRecordListQuery, UpdateJobRecordPayload};
use crate::error::{Error, Result};
use crate::models::job_record::JobRecord;

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;
const DEFAULT_STATUS: &str = "current";

/// Columns a listing may be ordered by. Anything else falls back to `Id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    Id,
    Company,
    Position,
    Industry,
    Location,
    StartDate,
    Status,
    CreatedAt,
}

impl SortColumn {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("company") => Self::Company,
            Some("position") => Self::Position,
            Some("industry") => Self::Industry,
            Some("location") => Self::Location,
            Some("start_date") => Self::StartDate,
            Some("status") => Self::Status,
            Some("created_at") => Self::CreatedAt,
            _ => Self::Id,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Company => "company",
            Self::Position => "position",
            Self::Industry => "industry",
            Self::Location => "location",
            Self::StartDate => "start_date",
            Self::Status => "status",
            Self::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub page: i64,
    pub limit: i64,
    pub search: String,
    pub sort_by: SortColumn,
    pub order: SortOrder,
}

impl ListParams {
    pub fn from_query(query: &JobRecordListQuery) -> Self {
        Self {
            page: query.page.unwrap_or(1).max(1),
            limit: query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            search: query
                .search
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            sort_by: SortColumn::parse(query.sort_by.as_deref()),
            order: SortOrder::parse(query.order.as_deref()),
        }
    }

    fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    fn pattern(&self) -> String {
        let escaped = self
            .search
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        format!("%{}%", escaped)
    }
}

pub struct JobRecordPage {
    pub items: Vec<JobRecord>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
    pub sort_by: SortColumn,
    pub order: SortOrder,
    pub search: String,
}

fn page_count(total: i64, limit: i64) -> i64 {
    if total == 0 {
        0
    } else {
        (total + limit - 1) / limit
    }
}

const SEARCH_FILTER: &str = "deletion_state = 'active' AND (company ILIKE $1 OR position ILIKE $1 OR industry ILIKE $1 OR location ILIKE $1)";

#[derive(Clone)]
pub struct JobRecordService {
    pool: PgPool,
}

impl JobRecordService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, query))]
    pub async fn list(&self, query: JobRecordListQuery) -> Result<JobRecordPage> {
        let params = ListParams::from_query(&query);
        let pattern = params.pattern();

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM job_records WHERE {}", SEARCH_FILTER))
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await?;

        let sql = format!(
            "SELECT {} FROM job_records WHERE {} ORDER BY {} {}, id {} LIMIT $2 OFFSET $3",
            JOB_RECORD_COLUMNS,
            SEARCH_FILTER,
            params.sort_by.as_str(),
            params.order.as_sql(),
            params.order.as_sql(),
        );
        let items = sqlx::query_as::<_, JobRecord>(&sql)
            .bind(&pattern)
            .bind(params.limit)
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(JobRecordPage {
            items,
            page: params.page,
            limit: params.limit,
            total,
            pages: page_count(total, params.limit),
            sort_by: params.sort_by,
            order: params.order,
            search: params.search,
        })
    }

    pub async fn get_by_id(&self, id: i64) -> Result<JobRecord> {
        let sql = format!("SELECT {} FROM job_records WHERE id = $1", JOB_RECORD_COLUMNS);
        sqlx::query_as::<_, JobRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn list_by_alumni(&self, alumni_id: i64) -> Result<Vec<JobRecord>> {
        let sql = format!(
            "SELECT {} FROM job_records WHERE alumni_id = $1 AND deletion_state = 'active' \
             ORDER BY start_date DESC, id DESC",
            JOB_RECORD_COLUMNS
        );
        let items = sqlx::query_as::<_, JobRecord>(&sql)
            .bind(alumni_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    #[instrument(skip(self, payload), fields(alumni_id = payload.alumni_id))]
    pub async fn create(&self, payload: CreateJobRecordPayload) -> Result<JobRecord> {
        let status = payload
            .status
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STATUS.to_string());
        let sql = format!(
            r#"
            INSERT INTO job_records (
                alumni_id, company, position, industry, location,
                salary_range, start_date, end_date, status, description
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            JOB_RECORD_COLUMNS
        );
        sqlx::query_as::<_, JobRecord>(&sql)
            .bind(payload.alumni_id)
            .bind(&payload.company)
            .bind(&payload.position)
            .bind(&payload.industry)
            .bind(&payload.location)
            .bind(&payload.salary_range)
            .bind(payload.start_date)
            .bind(payload.end_date)
            .bind(&status)
            .bind(&payload.description)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match err {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => Error::BadRequest(
                    format!("Alumni {} does not exist", payload.alumni_id),
                ),
                other => other.into(),
            })
    }

    /// Rewrites the descriptive fields. The deletion state is left alone.
    pub async fn update(&self, id: i64, payload: UpdateJobRecordPayload) -> Result<JobRecord> {
        let sql = format!(
            r#"
            UPDATE job_records
            SET company = $2, position = $3, industry = $4, location = $5,
                salary_range = $6, start_date = $7, end_date = $8, status = $9,
                description = $10, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            JOB_RECORD_COLUMNS
        );
        sqlx::query_as::<_, JobRecord>(&sql)
            .bind(id)
            .bind(&payload.company)
            .bind(&payload.position)
            .bind(&payload.industry)
            .bind(&payload.location)
            .bind(&payload.salary_range)
            .bind(payload.start_date)
            .bind(payload.end_date)
            .bind(&payload.status)
            .bind(&payload.description)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }
}

fn not_found() -> Error {
    Error::NotFound("Job record not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sort_column_falls_back_to_id() {
        assert_eq!(SortColumn::parse(Some("company")), SortColumn::Company);
        assert_eq!(SortColumn::parse(Some("start_date")), SortColumn::StartDate);
        assert_eq!(SortColumn::parse(Some("id; DROP TABLE users")), SortColumn::Id);
        assert_eq!(SortColumn::parse(None), SortColumn::Id);
    }

    #[test]
    fn order_is_case_insensitive_and_defaults_to_asc() {
        assert_eq!(SortOrder::parse(Some("DESC")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(Some("sideways")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(None), SortOrder::Asc);
    }

    #[test]
    fn paging_is_clamped() {
        let query = JobRecordListQuery {
            page: Some(0),
            limit: Some(500),
            ..Default::default()
        };
        let params = ListParams::from_query(&query);
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 100);
        assert_eq!(params.offset(), 0);

        let query = JobRecordListQuery {
            page: Some(3),
            limit: Some(0),
            ..Default::default()
        };
        let params = ListParams::from_query(&query);
        assert_eq!(params.limit, 1);
        assert_eq!(params.offset(), 2);
    }

    #[test]
    fn search_wildcards_are_escaped() {
        let query = JobRecordListQuery {
            search: Some(" 100%_ ".into()),
            ..Default::default()
        };
        let params = ListParams::from_query(&query);
        assert_eq!(params.search, "100%_");
        assert_eq!(params.pattern(), "%100\\%\\_%");
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
    }
}
