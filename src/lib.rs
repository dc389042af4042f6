// src/lib.rs

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::AppState;

/// The whole HTTP surface: JSON API under `/api`, docs under `/swagger-ui`.
pub fn app(app_state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(handlers::conference_routes())
        .nest("/tradeshow", handlers::tradeshow_routes());

    Router::new()
        .nest("/api", api)
        .with_state(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}
