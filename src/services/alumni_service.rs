use sqlx::PgPool;
use tracing::{info, instrument};

use crate::dto::alumni_dto::{CreateAlumniPayload, UpdateAlumniPayload};
use crate::error::{Error, Result};
use crate::models::alumni::Alumni;

const ALUMNI_COLUMNS: &str = "id, nim, name, major, cohort_year, graduation_year, email, phone, address, created_at, updated_at";

#[derive(Clone)]
pub struct AlumniService {
    pool: PgPool,
}

impl AlumniService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Alumni>> {
        let sql = format!("SELECT {} FROM alumni ORDER BY id", ALUMNI_COLUMNS);
        let items = sqlx::query_as::<_, Alumni>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Alumni> {
        let sql = format!("SELECT {} FROM alumni WHERE id = $1", ALUMNI_COLUMNS);
        sqlx::query_as::<_, Alumni>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn create(&self, payload: CreateAlumniPayload) -> Result<Alumni> {
        let sql = format!(
            r#"
            INSERT INTO alumni (nim, name, major, cohort_year, graduation_year, email, phone, address)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            ALUMNI_COLUMNS
        );
        sqlx::query_as::<_, Alumni>(&sql)
            .bind(&payload.nim)
            .bind(&payload.name)
            .bind(&payload.major)
            .bind(payload.cohort_year)
            .bind(payload.graduation_year)
            .bind(&payload.email)
            .bind(&payload.phone)
            .bind(&payload.address)
            .fetch_one(&self.pool)
            .await
            .map_err(unique_to_conflict)
    }

    pub async fn update(&self, id: i64, payload: UpdateAlumniPayload) -> Result<Alumni> {
        let sql = format!(
            r#"
            UPDATE alumni
            SET name = $2, major = $3, cohort_year = $4, graduation_year = $5,
                email = $6, phone = $7, address = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ALUMNI_COLUMNS
        );
        sqlx::query_as::<_, Alumni>(&sql)
            .bind(id)
            .bind(&payload.name)
            .bind(&payload.major)
            .bind(payload.cohort_year)
            .bind(payload.graduation_year)
            .bind(&payload.email)
            .bind(&payload.phone)
            .bind(&payload.address)
            .fetch_optional(&self.pool)
            .await
            .map_err(unique_to_conflict)?
            .ok_or_else(not_found)
    }

    /// Removes the alumni together with its job records and their trash entries.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM job_record_trash
            WHERE job_record_id IN (SELECT id FROM job_records WHERE alumni_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let records = sqlx::query("DELETE FROM job_records WHERE alumni_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let res = sqlx::query("DELETE FROM alumni WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if res.rows_affected() == 0 {
            return Err(not_found());
        }

        tx.commit().await?;
        info!(job_records = records.rows_affected(), "alumni deleted");
        Ok(())
    }
}

fn not_found() -> Error {
    Error::NotFound("Alumni not found".to_string())
}

fn unique_to_conflict(err: sqlx::Error) -> Error {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            Error::Conflict("NIM or email already in use".to_string())
        }
        other => other.into(),
    }
}
