// src/handlers/tradeshow.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        json::{present, Payload},
        scope::{ShowScope, ShowScopeParams},
    },
    models::{
        responses::{IdsResponse, OkResponse},
        tradeshow::{
            Booth, BoothInput, BoothPatch, BoothUpsert, Exhibitor, ExhibitorInput, ExhibitorPatch, TradeShow,
            TradeShowSnapshot,
        },
    },
};

// =============================================================================
//  AREA 1: SHOWS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ShowPayload {
    /// External code. Generated as `T-YYYYMMDD-NNNN` when omitted.
    #[validate(length(min = 1, max = 32, message = "meeting_id must be 1 to 32 characters"))]
    #[schema(example = "T-20250906-1234")]
    pub meeting_id: Option<String>,

    #[validate(length(max = 200, message = "name must be at most 200 characters"))]
    pub name: Option<String>,
}

// GET /api/tradeshow/shows
#[utoipa::path(
    get,
    path = "/api/tradeshow/shows",
    tag = "Tradeshows",
    responses((status = 200, description = "All shows, newest first", body = Vec<TradeShow>))
)]
pub async fn list_shows(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.tradeshow_service.list_shows().await?))
}

// POST /api/tradeshow/shows
#[utoipa::path(
    post,
    path = "/api/tradeshow/shows",
    tag = "Tradeshows",
    request_body = ShowPayload,
    responses(
        (status = 201, description = "Show created", body = TradeShow),
        (status = 409, description = "Code already in use")
    )
)]
pub async fn create_show(
    State(app_state): State<AppState>,
    Payload(payload): Payload<ShowPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let show = app_state
        .tradeshow_service
        .create_show(payload.meeting_id, payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(show)))
}

// GET /api/tradeshow/shows/resolve
#[utoipa::path(
    get,
    path = "/api/tradeshow/shows/resolve",
    tag = "Tradeshows",
    params(ShowScopeParams),
    responses(
        (status = 200, description = "The show the parameters point at", body = TradeShow),
        (status = 404, description = "Unknown id, or no reference under the strict policy")
    )
)]
pub async fn resolve_show(
    State(app_state): State<AppState>,
    ShowScope(scope): ShowScope,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.tradeshow_service.resolve_show(&scope).await?))
}

// GET /api/tradeshow/shows/bootstrap
#[utoipa::path(
    get,
    path = "/api/tradeshow/shows/bootstrap",
    tag = "Tradeshows",
    params(ShowScopeParams),
    responses((status = 200, description = "Show with its booths and exhibitors", body = TradeShowSnapshot))
)]
pub async fn bootstrap(
    State(app_state): State<AppState>,
    ShowScope(scope): ShowScope,
) -> Result<impl IntoResponse, AppError> {
    let service = &app_state.tradeshow_service;
    let show = service.resolve_show(&scope).await?;
    Ok(Json(service.bootstrap(show).await?))
}

// GET /api/tradeshow/shows/{id}
#[utoipa::path(
    get,
    path = "/api/tradeshow/shows/{id}",
    tag = "Tradeshows",
    params(("id" = i64, Path, description = "Show id")),
    responses(
        (status = 200, description = "Show", body = TradeShow),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_show(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.tradeshow_service.get_show(id).await?))
}

// PATCH /api/tradeshow/shows/{id}
#[utoipa::path(
    patch,
    path = "/api/tradeshow/shows/{id}",
    tag = "Tradeshows",
    request_body = ShowPayload,
    params(("id" = i64, Path, description = "Show id")),
    responses(
        (status = 200, description = "Show updated", body = TradeShow),
        (status = 404, description = "Not found"),
        (status = 409, description = "Code already in use")
    )
)]
pub async fn update_show(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Payload(payload): Payload<ShowPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let show = app_state
        .tradeshow_service
        .update_show(id, payload.meeting_id.as_deref(), payload.name.as_deref())
        .await?;

    Ok(Json(show))
}

// DELETE /api/tradeshow/shows/{id}
#[utoipa::path(
    delete,
    path = "/api/tradeshow/shows/{id}",
    tag = "Tradeshows",
    params(("id" = i64, Path, description = "Show id")),
    responses(
        (status = 204, description = "Show and everything in it removed"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_show(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.tradeshow_service.delete_show(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/tradeshow/shows/{id}/reset
#[utoipa::path(
    post,
    path = "/api/tradeshow/shows/{id}/reset",
    tag = "Tradeshows",
    params(("id" = i64, Path, description = "Show id")),
    responses(
        (status = 200, description = "All booths and exhibitors of the show removed", body = OkResponse),
        (status = 404, description = "Not found")
    )
)]
pub async fn reset_show(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.tradeshow_service.reset(id).await?;
    Ok(Json(OkResponse::ok()))
}

// =============================================================================
//  AREA 2: BOOTHS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BoothPayload {
    #[validate(length(min = 1, max = 20, message = "label must be 1 to 20 characters"))]
    #[schema(example = "B1")]
    pub label: String,

    pub x: Option<i32>,
    pub y: Option<i32>,

    #[serde(alias = "width")]
    #[validate(range(min = 0, message = "w cannot be negative"))]
    pub w: Option<i32>,

    #[serde(alias = "height")]
    #[validate(range(min = 0, message = "h cannot be negative"))]
    pub h: Option<i32>,

    pub is_active: Option<bool>,
}

impl From<BoothPayload> for BoothInput {
    fn from(p: BoothPayload) -> Self {
        BoothInput {
            label: p.label,
            x: p.x,
            y: p.y,
            width: p.w,
            height: p.h,
            is_active: p.is_active,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BoothPatchPayload {
    #[validate(length(min = 1, max = 20, message = "label must be 1 to 20 characters"))]
    pub label: Option<String>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    #[serde(alias = "width")]
    #[validate(range(min = 0))]
    pub w: Option<i32>,
    #[serde(alias = "height")]
    #[validate(range(min = 0))]
    pub h: Option<i32>,
    pub is_active: Option<bool>,
}

impl From<BoothPatchPayload> for BoothPatch {
    fn from(p: BoothPatchPayload) -> Self {
        BoothPatch {
            label: p.label,
            x: p.x,
            y: p.y,
            width: p.w,
            height: p.h,
            is_active: p.is_active,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkBoothItem {
    pub id: Option<i64>,
    #[serde(flatten)]
    #[validate(nested)]
    pub booth: BoothPayload,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkBoothsPayload {
    #[serde(alias = "booths")]
    #[validate(nested)]
    pub items: Vec<BulkBoothItem>,
}

// GET /api/tradeshow/booths
#[utoipa::path(
    get,
    path = "/api/tradeshow/booths",
    tag = "Booths",
    params(ShowScopeParams),
    responses((status = 200, description = "Booths of the show, by label", body = Vec<Booth>))
)]
pub async fn list_booths(
    State(app_state): State<AppState>,
    ShowScope(scope): ShowScope,
) -> Result<impl IntoResponse, AppError> {
    let service = &app_state.tradeshow_service;
    let show = service.resolve_show(&scope).await?;
    Ok(Json(service.list_booths(show.id).await?))
}

// POST /api/tradeshow/booths
#[utoipa::path(
    post,
    path = "/api/tradeshow/booths",
    tag = "Booths",
    params(ShowScopeParams),
    request_body = BoothPayload,
    responses(
        (status = 201, description = "Booth created", body = Booth),
        (status = 409, description = "Label already used in this show")
    )
)]
pub async fn create_booth(
    State(app_state): State<AppState>,
    ShowScope(scope): ShowScope,
    Payload(payload): Payload<BoothPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let service = &app_state.tradeshow_service;
    let show = service.resolve_show(&scope).await?;
    let booth = service.create_booth(show.id, &payload.into()).await?;

    Ok((StatusCode::CREATED, Json(booth)))
}

// POST /api/tradeshow/booths/bulk
#[utoipa::path(
    post,
    path = "/api/tradeshow/booths/bulk",
    tag = "Booths",
    params(ShowScopeParams),
    request_body = BulkBoothsPayload,
    responses(
        (status = 200, description = "Resulting booth ids, in input order", body = IdsResponse),
        (status = 404, description = "An item id is not a booth of this show")
    )
)]
pub async fn bulk_upsert_booths(
    State(app_state): State<AppState>,
    ShowScope(scope): ShowScope,
    Payload(payload): Payload<BulkBoothsPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let items = payload
        .items
        .into_iter()
        .map(|item| BoothUpsert { id: item.id, booth: item.booth.into() })
        .collect();

    let service = &app_state.tradeshow_service;
    let show = service.resolve_show(&scope).await?;
    let ids = service.bulk_upsert_booths(show.id, items).await?;

    Ok(Json(IdsResponse { ids }))
}

// GET /api/tradeshow/booths/{id}
#[utoipa::path(
    get,
    path = "/api/tradeshow/booths/{id}",
    tag = "Booths",
    params(("id" = i64, Path, description = "Booth id"), ShowScopeParams),
    responses(
        (status = 200, description = "Booth", body = Booth),
        (status = 404, description = "Not a booth of this show")
    )
)]
pub async fn get_booth(
    State(app_state): State<AppState>,
    ShowScope(scope): ShowScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let service = &app_state.tradeshow_service;
    let show = service.resolve_show(&scope).await?;
    Ok(Json(service.get_booth(show.id, id).await?))
}

// PATCH /api/tradeshow/booths/{id}
#[utoipa::path(
    patch,
    path = "/api/tradeshow/booths/{id}",
    tag = "Booths",
    params(("id" = i64, Path, description = "Booth id"), ShowScopeParams),
    request_body = BoothPatchPayload,
    responses(
        (status = 200, description = "Booth updated", body = Booth),
        (status = 404, description = "Not a booth of this show"),
        (status = 409, description = "Label already used in this show")
    )
)]
pub async fn update_booth(
    State(app_state): State<AppState>,
    ShowScope(scope): ShowScope,
    Path(id): Path<i64>,
    Payload(payload): Payload<BoothPatchPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let service = &app_state.tradeshow_service;
    let show = service.resolve_show(&scope).await?;
    Ok(Json(service.update_booth(show.id, id, &payload.into()).await?))
}

// DELETE /api/tradeshow/booths/{id}
#[utoipa::path(
    delete,
    path = "/api/tradeshow/booths/{id}",
    tag = "Booths",
    params(("id" = i64, Path, description = "Booth id"), ShowScopeParams),
    responses(
        (status = 204, description = "Booth removed; its exhibitors are kept without a booth"),
        (status = 404, description = "Not a booth of this show")
    )
)]
pub async fn delete_booth(
    State(app_state): State<AppState>,
    ShowScope(scope): ShowScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let service = &app_state.tradeshow_service;
    let show = service.resolve_show(&scope).await?;
    service.delete_booth(show.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  AREA 3: EXHIBITORS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ExhibitorPayload {
    #[validate(length(min = 1, max = 200, message = "name must be 1 to 200 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 200))]
    pub company: String,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Must be a booth of the same show.
    #[serde(rename = "boothId", alias = "booth_id")]
    pub booth_id: Option<i64>,

    pub x: Option<i32>,
    pub y: Option<i32>,
}

impl From<ExhibitorPayload> for ExhibitorInput {
    fn from(p: ExhibitorPayload) -> Self {
        ExhibitorInput {
            name: p.name,
            company: p.company,
            tags: p.tags,
            booth_id: p.booth_id,
            x: p.x,
            y: p.y,
        }
    }
}

/// `null` clears `boothId`, `x` or `y`; an absent field is left alone.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ExhibitorPatchPayload {
    #[validate(length(min = 1, max = 200, message = "name must be 1 to 200 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 200))]
    pub company: Option<String>,

    pub tags: Option<Vec<String>>,

    #[serde(rename = "boothId", alias = "booth_id", default, deserialize_with = "present")]
    #[schema(value_type = Option<i64>)]
    pub booth_id: Option<Option<i64>>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i32>)]
    pub x: Option<Option<i32>>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i32>)]
    pub y: Option<Option<i32>>,
}

impl From<ExhibitorPatchPayload> for ExhibitorPatch {
    fn from(p: ExhibitorPatchPayload) -> Self {
        ExhibitorPatch {
            name: p.name,
            company: p.company,
            tags: p.tags,
            booth_id: p.booth_id,
            x: p.x,
            y: p.y,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExhibitorFilter {
    /// Exact company name.
    pub company: Option<String>,
}

// GET /api/tradeshow/exhibitors
#[utoipa::path(
    get,
    path = "/api/tradeshow/exhibitors",
    tag = "Exhibitors",
    params(ShowScopeParams, ExhibitorFilter),
    responses((status = 200, description = "Exhibitors of the show, by company and name", body = Vec<Exhibitor>))
)]
pub async fn list_exhibitors(
    State(app_state): State<AppState>,
    ShowScope(scope): ShowScope,
    Query(filter): Query<ExhibitorFilter>,
) -> Result<impl IntoResponse, AppError> {
    let company = filter.company.as_deref().filter(|c| !c.is_empty());

    let service = &app_state.tradeshow_service;
    let show = service.resolve_show(&scope).await?;
    Ok(Json(service.list_exhibitors(show.id, company).await?))
}

// POST /api/tradeshow/exhibitors
#[utoipa::path(
    post,
    path = "/api/tradeshow/exhibitors",
    tag = "Exhibitors",
    params(ShowScopeParams),
    request_body = ExhibitorPayload,
    responses(
        (status = 201, description = "Exhibitor created", body = Exhibitor),
        (status = 404, description = "boothId is not a booth of this show")
    )
)]
pub async fn create_exhibitor(
    State(app_state): State<AppState>,
    ShowScope(scope): ShowScope,
    Payload(payload): Payload<ExhibitorPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let service = &app_state.tradeshow_service;
    let show = service.resolve_show(&scope).await?;
    let exhibitor = service.create_exhibitor(show.id, &payload.into()).await?;

    Ok((StatusCode::CREATED, Json(exhibitor)))
}

// GET /api/tradeshow/exhibitors/{id}
#[utoipa::path(
    get,
    path = "/api/tradeshow/exhibitors/{id}",
    tag = "Exhibitors",
    params(("id" = i64, Path, description = "Exhibitor id"), ShowScopeParams),
    responses(
        (status = 200, description = "Exhibitor", body = Exhibitor),
        (status = 404, description = "Not an exhibitor of this show")
    )
)]
pub async fn get_exhibitor(
    State(app_state): State<AppState>,
    ShowScope(scope): ShowScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let service = &app_state.tradeshow_service;
    let show = service.resolve_show(&scope).await?;
    Ok(Json(service.get_exhibitor(show.id, id).await?))
}

// PATCH /api/tradeshow/exhibitors/{id}
#[utoipa::path(
    patch,
    path = "/api/tradeshow/exhibitors/{id}",
    tag = "Exhibitors",
    params(("id" = i64, Path, description = "Exhibitor id"), ShowScopeParams),
    request_body = ExhibitorPatchPayload,
    responses(
        (status = 200, description = "Exhibitor updated", body = Exhibitor),
        (status = 404, description = "Exhibitor or boothId not in this show")
    )
)]
pub async fn update_exhibitor(
    State(app_state): State<AppState>,
    ShowScope(scope): ShowScope,
    Path(id): Path<i64>,
    Payload(payload): Payload<ExhibitorPatchPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let service = &app_state.tradeshow_service;
    let show = service.resolve_show(&scope).await?;
    Ok(Json(service.update_exhibitor(show.id, id, &payload.into()).await?))
}

// DELETE /api/tradeshow/exhibitors/{id}
#[utoipa::path(
    delete,
    path = "/api/tradeshow/exhibitors/{id}",
    tag = "Exhibitors",
    params(("id" = i64, Path, description = "Exhibitor id"), ShowScopeParams),
    responses(
        (status = 204, description = "Exhibitor removed"),
        (status = 404, description = "Not an exhibitor of this show")
    )
)]
pub async fn delete_exhibitor(
    State(app_state): State<AppState>,
    ShowScope(scope): ShowScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let service = &app_state.tradeshow_service;
    let show = service.resolve_show(&scope).await?;
    service.delete_exhibitor(show.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhibitor_patch_tells_null_from_absent() {
        let clear: ExhibitorPatchPayload = serde_json::from_str(r#"{ "boothId": null }"#).unwrap();
        assert_eq!(clear.booth_id, Some(None));
        assert_eq!(clear.x, None);

        let keep: ExhibitorPatchPayload = serde_json::from_str(r#"{ "name": "Ada" }"#).unwrap();
        assert_eq!(keep.booth_id, None);

        let set: ExhibitorPatchPayload = serde_json::from_str(r#"{ "booth_id": 4, "x": 10 }"#).unwrap();
        assert_eq!(set.booth_id, Some(Some(4)));
        assert_eq!(set.x, Some(Some(10)));
    }

    #[test]
    fn booth_geometry_accepts_short_and_long_names() {
        let short: BoothPayload = serde_json::from_str(r#"{ "label": "B1", "w": 160, "h": 80 }"#).unwrap();
        let long: BoothPayload = serde_json::from_str(r#"{ "label": "B1", "width": 160, "height": 80 }"#).unwrap();

        assert_eq!(BoothInput::from(short), BoothInput::from(long));
    }

    #[test]
    fn bulk_booths_accept_the_booths_alias() {
        let payload: BulkBoothsPayload =
            serde_json::from_str(r#"{ "booths": [{ "label": "B1" }, { "id": 2, "label": "B2" }] }"#).unwrap();

        assert_eq!(payload.items.len(), 2);
        assert_eq!(payload.items[1].id, Some(2));
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn booth_label_length_is_checked() {
        let payload: BoothPayload = serde_json::from_str(r#"{ "label": "" }"#).unwrap();
        assert!(payload.validate().is_err());
    }
}
