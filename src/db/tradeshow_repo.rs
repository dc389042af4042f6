// src/db/tradeshow_repo.rs

use async_trait::async_trait;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{
        db_utils::{foreign_key_violation, unique_violation},
        error::AppError,
    },
    models::tradeshow::{Booth, BoothInput, BoothPatch, Exhibitor, ExhibitorInput, ExhibitorPatch, TradeShow},
    services::scope_service::EventDirectory,
};

#[derive(Clone)]
pub struct TradeShowRepository {
    pool: PgPool,
}

fn map_booth_write(e: sqlx::Error, label: &str) -> AppError {
    match unique_violation(&e) {
        Some("uniq_booth_per_show") => AppError::LabelAlreadyExists(label.to_string()),
        _ => e.into(),
    }
}

fn map_show_write(e: sqlx::Error, code: &str) -> AppError {
    match unique_violation(&e) {
        Some("tradeshow_show_meeting_id_key") => AppError::EventCodeAlreadyExists(code.to_string()),
        _ => e.into(),
    }
}

// The booth passed the membership check but was deleted before the write landed.
fn map_exhibitor_write(e: sqlx::Error, booth_id: Option<i64>) -> AppError {
    match (foreign_key_violation(&e), booth_id) {
        (Some("tradeshow_exhibitor_booth_fkey"), Some(booth_id)) => AppError::not_found("booth", booth_id),
        _ => e.into(),
    }
}

impl TradeShowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Shows
    // ---

    pub async fn list_shows<'e, E>(&self, executor: E) -> Result<Vec<TradeShow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let shows = sqlx::query_as::<_, TradeShow>(
            "SELECT * FROM tradeshow_show ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(executor)
        .await?;
        Ok(shows)
    }

    pub async fn find_show<'e, E>(&self, executor: E, id: i64) -> Result<Option<TradeShow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let show = sqlx::query_as::<_, TradeShow>("SELECT * FROM tradeshow_show WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(show)
    }

    pub async fn create_show<'e, E>(&self, executor: E, code: &str, name: &str) -> Result<TradeShow, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, TradeShow>(
            "INSERT INTO tradeshow_show (meeting_id, name) VALUES ($1, $2) RETURNING *",
        )
        .bind(code)
        .bind(name)
        .fetch_one(executor)
        .await
        .map_err(|e| map_show_write(e, code))
    }

    pub async fn update_show<'e, E>(
        &self,
        executor: E,
        id: i64,
        code: Option<&str>,
        name: Option<&str>,
    ) -> Result<Option<TradeShow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, TradeShow>(
            r#"
            UPDATE tradeshow_show
            SET meeting_id = COALESCE($2, meeting_id),
                name       = COALESCE($3, name)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(code)
        .bind(name)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_show_write(e, code.unwrap_or_default()))
    }

    pub async fn delete_show<'e, E>(&self, executor: E, id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM tradeshow_show WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn next_code_number<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let n = sqlx::query_scalar::<_, i64>("SELECT nextval('event_code_seq')")
            .fetch_one(executor)
            .await?;
        Ok(n)
    }

    // ---
    // Booths
    // ---

    pub async fn list_booths<'e, E>(&self, executor: E, show_id: i64) -> Result<Vec<Booth>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let booths = sqlx::query_as::<_, Booth>(
            "SELECT * FROM tradeshow_booth WHERE tradeshow_id = $1 ORDER BY label ASC",
        )
        .bind(show_id)
        .fetch_all(executor)
        .await?;
        Ok(booths)
    }

    pub async fn find_booth<'e, E>(&self, executor: E, show_id: i64, id: i64) -> Result<Option<Booth>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let booth = sqlx::query_as::<_, Booth>(
            "SELECT * FROM tradeshow_booth WHERE id = $1 AND tradeshow_id = $2",
        )
        .bind(id)
        .bind(show_id)
        .fetch_optional(executor)
        .await?;
        Ok(booth)
    }

    pub async fn create_booth<'e, E>(&self, executor: E, show_id: i64, input: &BoothInput) -> Result<Booth, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Booth>(
            r#"
            INSERT INTO tradeshow_booth (tradeshow_id, label, x, y, width, height, is_active)
            VALUES ($1, $2, COALESCE($3, 20), COALESCE($4, 20),
                    COALESCE($5, 140), COALESCE($6, 90), COALESCE($7, TRUE))
            RETURNING *
            "#,
        )
        .bind(show_id)
        .bind(&input.label)
        .bind(input.x)
        .bind(input.y)
        .bind(input.width)
        .bind(input.height)
        .bind(input.is_active)
        .fetch_one(executor)
        .await
        .map_err(|e| map_booth_write(e, &input.label))
    }

    pub async fn upsert_booth_by_label<'e, E>(
        &self,
        executor: E,
        show_id: i64,
        input: &BoothInput,
    ) -> Result<Booth, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let booth = sqlx::query_as::<_, Booth>(
            r#"
            INSERT INTO tradeshow_booth (tradeshow_id, label, x, y, width, height, is_active)
            VALUES ($1, $2, COALESCE($3, 20), COALESCE($4, 20),
                    COALESCE($5, 140), COALESCE($6, 90), COALESCE($7, TRUE))
            ON CONFLICT (tradeshow_id, label)
            DO UPDATE SET
                x         = COALESCE($3, tradeshow_booth.x),
                y         = COALESCE($4, tradeshow_booth.y),
                width     = COALESCE($5, tradeshow_booth.width),
                height    = COALESCE($6, tradeshow_booth.height),
                is_active = COALESCE($7, tradeshow_booth.is_active)
            RETURNING *
            "#,
        )
        .bind(show_id)
        .bind(&input.label)
        .bind(input.x)
        .bind(input.y)
        .bind(input.width)
        .bind(input.height)
        .bind(input.is_active)
        .fetch_one(executor)
        .await?;
        Ok(booth)
    }

    pub async fn update_booth<'e, E>(
        &self,
        executor: E,
        show_id: i64,
        id: i64,
        patch: &BoothPatch,
    ) -> Result<Option<Booth>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Booth>(
            r#"
            UPDATE tradeshow_booth
            SET label     = COALESCE($3, label),
                x         = COALESCE($4, x),
                y         = COALESCE($5, y),
                width     = COALESCE($6, width),
                height    = COALESCE($7, height),
                is_active = COALESCE($8, is_active)
            WHERE id = $1 AND tradeshow_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(show_id)
        .bind(patch.label.as_deref())
        .bind(patch.x)
        .bind(patch.y)
        .bind(patch.width)
        .bind(patch.height)
        .bind(patch.is_active)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_booth_write(e, patch.label.as_deref().unwrap_or_default()))
    }

    pub async fn delete_booth<'e, E>(&self, executor: E, show_id: i64, id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM tradeshow_booth WHERE id = $1 AND tradeshow_id = $2")
            .bind(id)
            .bind(show_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_booths_of_show<'e, E>(&self, executor: E, show_id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM tradeshow_booth WHERE tradeshow_id = $1")
            .bind(show_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // ---
    // Exhibitors
    // ---

    pub async fn list_exhibitors<'e, E>(
        &self,
        executor: E,
        show_id: i64,
        company: Option<&str>,
    ) -> Result<Vec<Exhibitor>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exhibitors = sqlx::query_as::<_, Exhibitor>(
            r#"
            SELECT * FROM tradeshow_exhibitor
            WHERE tradeshow_id = $1 AND ($2::TEXT IS NULL OR company = $2)
            ORDER BY company ASC, name ASC
            "#,
        )
        .bind(show_id)
        .bind(company)
        .fetch_all(executor)
        .await?;
        Ok(exhibitors)
    }

    pub async fn find_exhibitor<'e, E>(
        &self,
        executor: E,
        show_id: i64,
        id: i64,
    ) -> Result<Option<Exhibitor>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exhibitor = sqlx::query_as::<_, Exhibitor>(
            "SELECT * FROM tradeshow_exhibitor WHERE id = $1 AND tradeshow_id = $2",
        )
        .bind(id)
        .bind(show_id)
        .fetch_optional(executor)
        .await?;
        Ok(exhibitor)
    }

    pub async fn create_exhibitor<'e, E>(
        &self,
        executor: E,
        show_id: i64,
        input: &ExhibitorInput,
    ) -> Result<Exhibitor, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exhibitor = sqlx::query_as::<_, Exhibitor>(
            r#"
            INSERT INTO tradeshow_exhibitor (tradeshow_id, name, company, tags, booth_id, x, y)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(show_id)
        .bind(&input.name)
        .bind(&input.company)
        .bind(&input.tags)
        .bind(input.booth_id)
        .bind(input.x)
        .bind(input.y)
        .fetch_one(executor)
        .await
        .map_err(|e| map_exhibitor_write(e, input.booth_id))?;
        Ok(exhibitor)
    }

    pub async fn update_exhibitor<'e, E>(
        &self,
        executor: E,
        show_id: i64,
        id: i64,
        patch: &ExhibitorPatch,
    ) -> Result<Option<Exhibitor>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Nullable columns take a "present" flag so an explicit null can clear them.
        let exhibitor = sqlx::query_as::<_, Exhibitor>(
            r#"
            UPDATE tradeshow_exhibitor
            SET name     = COALESCE($3, name),
                company  = COALESCE($4, company),
                tags     = COALESCE($5, tags),
                booth_id = CASE WHEN $6 THEN $7 ELSE booth_id END,
                x        = CASE WHEN $8 THEN $9 ELSE x END,
                y        = CASE WHEN $10 THEN $11 ELSE y END
            WHERE id = $1 AND tradeshow_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(show_id)
        .bind(patch.name.as_deref())
        .bind(patch.company.as_deref())
        .bind(patch.tags.clone())
        .bind(patch.booth_id.is_some())
        .bind(patch.booth_id.flatten())
        .bind(patch.x.is_some())
        .bind(patch.x.flatten())
        .bind(patch.y.is_some())
        .bind(patch.y.flatten())
        .fetch_optional(executor)
        .await
        .map_err(|e| map_exhibitor_write(e, patch.booth_id.flatten()))?;
        Ok(exhibitor)
    }

    pub async fn delete_exhibitor<'e, E>(&self, executor: E, show_id: i64, id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM tradeshow_exhibitor WHERE id = $1 AND tradeshow_id = $2")
            .bind(id)
            .bind(show_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_exhibitors_of_show<'e, E>(&self, executor: E, show_id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM tradeshow_exhibitor WHERE tradeshow_id = $1")
            .bind(show_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl EventDirectory for TradeShowRepository {
    type Event = TradeShow;
    const RESOURCE: &'static str = "tradeshow";

    async fn get_or_create_by_code(&self, code: &str, name: &str) -> Result<TradeShow, AppError> {
        let show = sqlx::query_as::<_, TradeShow>(
            r#"
            INSERT INTO tradeshow_show (meeting_id, name)
            VALUES ($1, $2)
            ON CONFLICT (meeting_id) DO UPDATE SET meeting_id = EXCLUDED.meeting_id
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(show)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<TradeShow>, AppError> {
        self.find_show(&self.pool, id).await
    }

    async fn find_latest(&self) -> Result<Option<TradeShow>, AppError> {
        let show = sqlx::query_as::<_, TradeShow>(
            "SELECT * FROM tradeshow_show ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(show)
    }
}
