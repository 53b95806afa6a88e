use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::resume::ResumeRecord;
use crate::models::stored::{to_row, ResumeRow, StoredResume};
use crate::store::{RecordStore, StoreError};

pub struct PgRecordStore {
    pool: PgPool,
    persist_full_record: bool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool, persist_full_record: bool) -> Self {
        Self {
            pool,
            persist_full_record,
        }
    }

    /// Creates the `resumes` table if missing and widens older tables with `extras`.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS resumes (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL,
                full_name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT,
                location TEXT,
                summary TEXT,
                experience JSONB NOT NULL DEFAULT '[]'::jsonb,
                education JSONB NOT NULL DEFAULT '[]'::jsonb,
                skills TEXT,
                template TEXT NOT NULL DEFAULT 'modern',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("ALTER TABLE resumes ADD COLUMN IF NOT EXISTS extras JSONB")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS resumes_user_created_idx ON resumes (user_id, created_at DESC)",
        )
        .execute(&self.pool)
        .await?;

        info!("Resume schema ready");
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn create(&self, record: &ResumeRecord, owner: Uuid) -> Result<Uuid, StoreError> {
        let row = to_row(
            record,
            Uuid::new_v4(),
            owner,
            Utc::now(),
            self.persist_full_record,
        )?;

        sqlx::query(
            r#"
            INSERT INTO resumes
                (id, user_id, full_name, email, phone, location, summary,
                 experience, education, skills, template, extras, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(row.id)
        .bind(row.user_id)
        .bind(&row.full_name)
        .bind(&row.email)
        .bind(&row.phone)
        .bind(&row.location)
        .bind(&row.summary)
        .bind(&row.experience)
        .bind(&row.education)
        .bind(&row.skills)
        .bind(&row.template)
        .bind(&row.extras)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;

        info!(resume_id = %row.id, user_id = %owner, "Stored resume");
        Ok(row.id)
    }

    async fn list(&self, owner: Uuid) -> Result<Vec<StoredResume>, StoreError> {
        let rows = sqlx::query_as::<_, ResumeRow>(
            r#"
            SELECT id, user_id, full_name, email, phone, location, summary,
                   experience, education, skills, template, extras, created_at
            FROM resumes
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(StoredResume::from_row).collect())
    }

    async fn get(&self, id: Uuid, owner: Uuid) -> Result<StoredResume, StoreError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            SELECT id, user_id, full_name, email, phone, location, summary,
                   experience, education, skills, template, extras, created_at
            FROM resumes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))?;

        Ok(StoredResume::from_row(row))
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        info!(resume_id = %id, "Deleted resume");
        Ok(())
    }
}
