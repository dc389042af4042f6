// src/common/error.rs

use std::borrow::Cow;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    ValidationError(#[from] ValidationErrors),

    #[error("Malformed request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    // Also covers records that exist but belong to another event.
    #[error("{resource} not found")]
    NotFound { resource: &'static str, key: String },

    #[error("Event code '{0}' already exists")]
    EventCodeAlreadyExists(String),

    #[error("Label '{0}' already exists in this event")]
    LabelAlreadyExists(String),

    #[error("Seat {seat_index} of table {table_id} is already taken")]
    SeatAlreadyTaken { table_id: i64, seat_index: i32 },

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(resource: &'static str, id: i64) -> Self {
        AppError::NotFound { resource, key: id.to_string() }
    }

    /// Single-field validation failure, shaped like the derive-generated ones.
    pub fn invalid_field(
        field: &'static str,
        code: &'static str,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        let mut err = ValidationError::new(code);
        err.message = Some(message.into());
        let mut errors = ValidationErrors::new();
        errors.add(field, err);
        AppError::ValidationError(errors)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::EventCodeAlreadyExists(_)
            | AppError::LabelAlreadyExists(_)
            | AppError::SeatAlreadyTaken { .. } => StatusCode::CONFLICT,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::ValidationError(errors) => json!({
                "error": "One or more fields are invalid.",
                "details": errors,
            }),
            AppError::InvalidBody(rejection) => json!({
                "error": "Malformed request body.",
                "details": { "reason": rejection.body_text() },
            }),
            AppError::NotFound { resource, key } => json!({
                "error": self.to_string(),
                "details": { "resource": resource, "key": key },
            }),
            AppError::EventCodeAlreadyExists(code) => json!({
                "error": self.to_string(),
                "details": { "code": code },
            }),
            AppError::LabelAlreadyExists(label) => json!({
                "error": self.to_string(),
                "details": { "label": label },
            }),
            AppError::SeatAlreadyTaken { table_id, seat_index } => json!({
                "error": self.to_string(),
                "details": { "table": table_id, "seat_index": seat_index },
            }),
            // Detail goes to the log only.
            AppError::DatabaseError(e) => {
                tracing::error!("Database error: {:?}", e);
                json!({ "error": "An unexpected error occurred." })
            }
            AppError::InternalServerError(e) => {
                tracing::error!("Internal server error: {:?}", e);
                json!({ "error": "An unexpected error occurred." })
            }
        };

        (status, Json(body)).into_response()
    }
}
