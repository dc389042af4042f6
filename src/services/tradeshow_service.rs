// src/services/tradeshow_service.rs

use chrono::Utc;
use sqlx::{PgConnection, PgPool};

use crate::{
    common::error::AppError,
    db::TradeShowRepository,
    models::tradeshow::{
        Booth, BoothInput, BoothPatch, BoothUpsert, Exhibitor, ExhibitorInput, ExhibitorPatch, TradeShow,
        TradeShowSnapshot,
    },
    services::{
        conference_service::make_event_code,
        scope_service::{ScopeRequest, ScopeResolver},
    },
};

/// Counts of what a reset removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetSummary {
    pub booths: u64,
    pub exhibitors: u64,
}

#[derive(Clone)]
pub struct TradeShowService {
    repo: TradeShowRepository,
    scope: ScopeResolver,
    pool: PgPool,
}

impl TradeShowService {
    pub fn new(repo: TradeShowRepository, scope: ScopeResolver, pool: PgPool) -> Self {
        Self { repo, scope, pool }
    }

    pub async fn resolve_show(&self, request: &ScopeRequest) -> Result<TradeShow, AppError> {
        self.scope.resolve(&self.repo, request).await
    }

    // =========================================================================
    //  SHOWS
    // =========================================================================

    pub async fn list_shows(&self) -> Result<Vec<TradeShow>, AppError> {
        self.repo.list_shows(&self.pool).await
    }

    pub async fn get_show(&self, id: i64) -> Result<TradeShow, AppError> {
        self.repo
            .find_show(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("tradeshow", id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn create_show(&self, code: Option<String>, name: Option<String>) -> Result<TradeShow, AppError> {
        let code = match code {
            Some(code) => code,
            None => {
                let n = self.repo.next_code_number(&self.pool).await?;
                make_event_code("T", Utc::now().date_naive(), n)
            }
        };
        let name = name.unwrap_or_else(|| code.clone());

        let show = self.repo.create_show(&self.pool, &code, &name).await?;
        tracing::info!(tradeshow_id = show.id, code = %show.meeting_id, "tradeshow created");
        Ok(show)
    }

    pub async fn update_show(&self, id: i64, code: Option<&str>, name: Option<&str>) -> Result<TradeShow, AppError> {
        self.repo
            .update_show(&self.pool, id, code, name)
            .await?
            .ok_or_else(|| AppError::not_found("tradeshow", id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_show(&self, id: i64) -> Result<(), AppError> {
        if !self.repo.delete_show(&self.pool, id).await? {
            return Err(AppError::not_found("tradeshow", id));
        }
        tracing::info!(tradeshow_id = id, "tradeshow deleted");
        Ok(())
    }

    /// Empties the floor plan but keeps the show row. Both deletes commit together.
    #[tracing::instrument(skip(self))]
    pub async fn reset(&self, show_id: i64) -> Result<ResetSummary, AppError> {
        let mut tx = self.pool.begin().await?;

        self.repo
            .find_show(&mut *tx, show_id)
            .await?
            .ok_or_else(|| AppError::not_found("tradeshow", show_id))?;

        let exhibitors = self.repo.delete_exhibitors_of_show(&mut *tx, show_id).await?;
        let booths = self.repo.delete_booths_of_show(&mut *tx, show_id).await?;

        tx.commit().await?;
        tracing::info!(tradeshow_id = show_id, booths, exhibitors, "tradeshow reset");
        Ok(ResetSummary { booths, exhibitors })
    }

    // =========================================================================
    //  BOOTHS
    // =========================================================================

    pub async fn list_booths(&self, show_id: i64) -> Result<Vec<Booth>, AppError> {
        self.repo.list_booths(&self.pool, show_id).await
    }

    pub async fn get_booth(&self, show_id: i64, id: i64) -> Result<Booth, AppError> {
        self.repo
            .find_booth(&self.pool, show_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("booth", id))
    }

    pub async fn create_booth(&self, show_id: i64, input: &BoothInput) -> Result<Booth, AppError> {
        self.repo.create_booth(&self.pool, show_id, input).await
    }

    pub async fn update_booth(&self, show_id: i64, id: i64, patch: &BoothPatch) -> Result<Booth, AppError> {
        self.repo
            .update_booth(&self.pool, show_id, id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("booth", id))
    }

    /// Exhibitors sitting in the booth are kept and lose their booth reference.
    pub async fn delete_booth(&self, show_id: i64, id: i64) -> Result<(), AppError> {
        if !self.repo.delete_booth(&self.pool, show_id, id).await? {
            return Err(AppError::not_found("booth", id));
        }
        Ok(())
    }

    /// Same contract as the table bulk upsert: by id when given, else by label,
    /// all in one transaction.
    #[tracing::instrument(skip(self, items), fields(items = items.len()))]
    pub async fn bulk_upsert_booths(&self, show_id: i64, items: Vec<BoothUpsert>) -> Result<Vec<i64>, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(items.len());

        for item in items {
            let booth = match item.id {
                Some(id) => self
                    .repo
                    .update_booth(&mut *tx, show_id, id, &BoothPatch::from(item.booth))
                    .await?
                    .ok_or_else(|| AppError::not_found("booth", id))?,
                None => self.repo.upsert_booth_by_label(&mut *tx, show_id, &item.booth).await?,
            };
            ids.push(booth.id);
        }

        tx.commit().await?;
        tracing::info!(tradeshow_id = show_id, count = ids.len(), "booths reconciled");
        Ok(ids)
    }

    // =========================================================================
    //  EXHIBITORS
    // =========================================================================

    async fn check_booth(&self, conn: &mut PgConnection, show_id: i64, booth_id: Option<i64>) -> Result<(), AppError> {
        if let Some(booth_id) = booth_id {
            self.repo
                .find_booth(&mut *conn, show_id, booth_id)
                .await?
                .ok_or_else(|| AppError::not_found("booth", booth_id))?;
        }
        Ok(())
    }

    pub async fn list_exhibitors(&self, show_id: i64, company: Option<&str>) -> Result<Vec<Exhibitor>, AppError> {
        self.repo.list_exhibitors(&self.pool, show_id, company).await
    }

    pub async fn get_exhibitor(&self, show_id: i64, id: i64) -> Result<Exhibitor, AppError> {
        self.repo
            .find_exhibitor(&self.pool, show_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("exhibitor", id))
    }

    pub async fn create_exhibitor(&self, show_id: i64, input: &ExhibitorInput) -> Result<Exhibitor, AppError> {
        let mut tx = self.pool.begin().await?;
        self.check_booth(&mut *tx, show_id, input.booth_id).await?;
        let exhibitor = self.repo.create_exhibitor(&mut *tx, show_id, input).await?;
        tx.commit().await?;
        Ok(exhibitor)
    }

    pub async fn update_exhibitor(&self, show_id: i64, id: i64, patch: &ExhibitorPatch) -> Result<Exhibitor, AppError> {
        let mut tx = self.pool.begin().await?;
        self.check_booth(&mut *tx, show_id, patch.booth_id.flatten()).await?;
        let exhibitor = self
            .repo
            .update_exhibitor(&mut *tx, show_id, id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("exhibitor", id))?;
        tx.commit().await?;
        Ok(exhibitor)
    }

    pub async fn delete_exhibitor(&self, show_id: i64, id: i64) -> Result<(), AppError> {
        if !self.repo.delete_exhibitor(&self.pool, show_id, id).await? {
            return Err(AppError::not_found("exhibitor", id));
        }
        Ok(())
    }

    // =========================================================================
    //  BOOTSTRAP
    // =========================================================================

    pub async fn bootstrap(&self, show: TradeShow) -> Result<TradeShowSnapshot, AppError> {
        let booths = self.repo.list_booths(&self.pool, show.id).await?;
        let exhibitors = self.repo.list_exhibitors(&self.pool, show.id, None).await?;

        Ok(TradeShowSnapshot { show, booths, exhibitors })
    }
}
