// src/middleware/scope.rs

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{common::error::AppError, services::scope_service::ScopeRequest};

/// Query parameters that point a conference request at its meeting.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MeetingScopeParams {
    /// External meeting code; created on first use.
    pub code: Option<String>,
    /// Numeric meeting id.
    pub meeting: Option<String>,
    /// Alias of `meeting`.
    pub meeting_id: Option<String>,
}

/// Query parameters that point a tradeshow request at its show.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ShowScopeParams {
    /// External show code; created on first use.
    pub meeting_id: Option<String>,
    /// Numeric show id.
    pub tradeshow: Option<String>,
}

/// Event reference of a conference request. Not resolved yet: handlers
/// validate their payload first.
#[derive(Debug, Clone)]
pub struct MeetingScope(pub ScopeRequest);

/// Event reference of a tradeshow request.
#[derive(Debug, Clone)]
pub struct ShowScope(pub ScopeRequest);

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// Event codes are stored as VARCHAR(32).
const MAX_CODE_LEN: usize = 32;

fn parse_code(field: &'static str, value: Option<String>) -> Result<Option<String>, AppError> {
    match non_empty(value) {
        Some(code) if code.chars().count() > MAX_CODE_LEN => Err(AppError::invalid_field(
            field,
            "length",
            format!("event codes are at most {MAX_CODE_LEN} characters"),
        )),
        code => Ok(code),
    }
}

fn parse_id(field: &'static str, value: Option<String>) -> Result<Option<i64>, AppError> {
    match non_empty(value) {
        None => Ok(None),
        Some(raw) => raw.parse::<i64>().map(Some).map_err(|_| {
            AppError::invalid_field(field, "not_an_id", format!("'{raw}' is not a numeric id"))
        }),
    }
}

fn query_params<T>(parts: &Parts) -> Result<T, AppError>
where
    T: for<'de> Deserialize<'de>,
{
    Query::<T>::try_from_uri(&parts.uri)
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::invalid_field("query", "malformed", rejection.body_text()))
}

impl MeetingScopeParams {
    pub fn into_request(self) -> Result<ScopeRequest, AppError> {
        let id = match parse_id("meeting", self.meeting)? {
            Some(id) => Some(id),
            None => parse_id("meeting_id", self.meeting_id)?,
        };
        Ok(ScopeRequest { code: parse_code("code", self.code)?, id })
    }
}

impl ShowScopeParams {
    pub fn into_request(self) -> Result<ScopeRequest, AppError> {
        Ok(ScopeRequest {
            code: parse_code("meeting_id", self.meeting_id)?,
            id: parse_id("tradeshow", self.tradeshow)?,
        })
    }
}

impl<S> FromRequestParts<S> for MeetingScope
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let params: MeetingScopeParams = query_params(parts)?;
        Ok(MeetingScope(params.into_request()?))
    }
}

impl<S> FromRequestParts<S> for ShowScope
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let params: ShowScopeParams = query_params(parts)?;
        Ok(ShowScope(params.into_request()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn meeting_scope(uri: &str) -> Result<ScopeRequest, AppError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        MeetingScope::from_request_parts(&mut parts, &()).await.map(|s| s.0)
    }

    async fn show_scope(uri: &str) -> Result<ScopeRequest, AppError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        ShowScope::from_request_parts(&mut parts, &()).await.map(|s| s.0)
    }

    #[tokio::test]
    async fn reads_code_and_numeric_meeting() {
        let scope = meeting_scope("/api/tables?code=C-TEST-0001").await.unwrap();
        assert_eq!(scope, ScopeRequest::by_code("C-TEST-0001"));

        let scope = meeting_scope("/api/tables?meeting=12").await.unwrap();
        assert_eq!(scope, ScopeRequest::by_id(12));

        let scope = meeting_scope("/api/tables?meeting_id=7").await.unwrap();
        assert_eq!(scope, ScopeRequest::by_id(7));
    }

    #[tokio::test]
    async fn empty_values_count_as_absent() {
        let scope = meeting_scope("/api/tables?code=&meeting=").await.unwrap();
        assert_eq!(scope, ScopeRequest::default());

        let scope = meeting_scope("/api/tables").await.unwrap();
        assert_eq!(scope, ScopeRequest::default());
    }

    #[tokio::test]
    async fn non_numeric_id_is_a_validation_error() {
        let err = meeting_scope("/api/tables?meeting=abc").await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = show_scope("/api/tradeshow/booths?tradeshow=x1").await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn overlong_codes_are_rejected() {
        let code = "C".repeat(33);
        let err = meeting_scope(&format!("/api/tables?code={code}")).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn tradeshow_meeting_id_is_the_show_code() {
        let scope = show_scope("/api/tradeshow/booths?meeting_id=T-20250906-1234").await.unwrap();
        assert_eq!(scope, ScopeRequest::by_code("T-20250906-1234"));

        let scope = show_scope("/api/tradeshow/booths?tradeshow=3").await.unwrap();
        assert_eq!(scope, ScopeRequest::by_id(3));
    }
}
