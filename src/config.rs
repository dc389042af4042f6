// src/config.rs

use std::{env, str::FromStr, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{ConferenceRepository, TradeShowRepository},
    services::{
        conference_service::ConferenceService,
        scope_service::{ResolvePolicy, ScopeResolver},
        tradeshow_service::TradeShowService,
    },
};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub bind_addr: String,
    pub rust_log: String,
    pub scope_policy: ResolvePolicy,
    pub default_event_code: String,
    pub default_event_title: String,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_var<T>(key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = var_or(key, default);
    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("{key}='{raw}' is invalid: {e}"))
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        Ok(Self {
            database_url,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", "5")?,
            db_acquire_timeout: Duration::from_secs(parse_var("DB_ACQUIRE_TIMEOUT_SECS", "3")?),
            bind_addr: var_or("BIND_ADDR", "0.0.0.0:3000"),
            rust_log: var_or("RUST_LOG", "seating_backend=info,tower_http=info"),
            scope_policy: parse_var("EVENT_SCOPE_POLICY", "permissive")?,
            default_event_code: var_or("DEFAULT_EVENT_CODE", "QUICK-START"),
            default_event_title: var_or("DEFAULT_EVENT_TITLE", "Quick Start"),
        })
    }

    pub fn scope_resolver(&self) -> ScopeResolver {
        ScopeResolver::new(self.scope_policy, &self.default_event_code, &self.default_event_title)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub conference_service: ConferenceService,
    pub tradeshow_service: TradeShowService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .connect(&config.database_url)
            .await
            .context("could not connect to the database")?;

        tracing::info!(max_connections = config.db_max_connections, "database pool ready");

        Ok(Self::from_pool(db_pool, config.scope_resolver()))
    }

    /// Wires repositories and services around an existing pool.
    pub fn from_pool(db_pool: PgPool, scope: ScopeResolver) -> Self {
        let conference_service = ConferenceService::new(
            ConferenceRepository::new(db_pool.clone()),
            scope.clone(),
            db_pool.clone(),
        );
        let tradeshow_service = TradeShowService::new(
            TradeShowRepository::new(db_pool.clone()),
            scope,
            db_pool.clone(),
        );

        Self {
            db_pool,
            conference_service,
            tradeshow_service,
        }
    }
}
