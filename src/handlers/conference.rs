// src/handlers/conference.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        json::{present, Payload},
        scope::{MeetingScope, MeetingScopeParams},
    },
    models::{
        conference::{
            Assignment, AssignmentInput, AssignmentPatch, AssignmentStatus, Attendee, AttendeeInput,
            AttendeePatch, ConferenceSnapshot, Meeting, Table, TableInput, TablePatch, TableType, TableUpsert,
        },
        responses::{IdsResponse, OkResponse},
    },
};

// =============================================================================
//  AREA 1: MEETINGS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MeetingPayload {
    /// Generated as `C-YYYYMMDD-NNNN` when omitted.
    #[validate(length(min = 1, max = 32, message = "code must be 1 to 32 characters"))]
    #[schema(example = "C-TEST-0001")]
    pub code: Option<String>,

    #[validate(length(max = 128, message = "title must be at most 128 characters"))]
    pub title: Option<String>,

    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MeetingPatchPayload {
    #[validate(length(min = 1, max = 32, message = "code must be 1 to 32 characters"))]
    pub code: Option<String>,

    #[validate(length(max = 128, message = "title must be at most 128 characters"))]
    pub title: Option<String>,

    /// `null` clears the date; leaving it out keeps it.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<NaiveDate>)]
    pub date: Option<Option<NaiveDate>>,
}

// GET /api/meetings
#[utoipa::path(
    get,
    path = "/api/meetings",
    tag = "Meetings",
    responses((status = 200, description = "All meetings, newest first", body = Vec<Meeting>))
)]
pub async fn list_meetings(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let meetings = app_state.conference_service.list_meetings().await?;
    Ok(Json(meetings))
}

// POST /api/meetings
#[utoipa::path(
    post,
    path = "/api/meetings",
    tag = "Meetings",
    request_body = MeetingPayload,
    responses(
        (status = 201, description = "Meeting created", body = Meeting),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Code already in use")
    )
)]
pub async fn create_meeting(
    State(app_state): State<AppState>,
    Payload(payload): Payload<MeetingPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let meeting = app_state
        .conference_service
        .create_meeting(payload.code, payload.title, payload.date)
        .await?;

    Ok((StatusCode::CREATED, Json(meeting)))
}

// GET /api/meetings/resolve
#[utoipa::path(
    get,
    path = "/api/meetings/resolve",
    tag = "Meetings",
    params(MeetingScopeParams),
    responses(
        (status = 200, description = "The meeting the parameters point at", body = Meeting),
        (status = 404, description = "Unknown id, or no reference under the strict policy")
    )
)]
pub async fn resolve_meeting(
    State(app_state): State<AppState>,
    MeetingScope(scope): MeetingScope,
) -> Result<impl IntoResponse, AppError> {
    let meeting = app_state.conference_service.resolve_meeting(&scope).await?;
    Ok(Json(meeting))
}

// GET /api/meetings/{id}
#[utoipa::path(
    get,
    path = "/api/meetings/{id}",
    tag = "Meetings",
    params(("id" = i64, Path, description = "Meeting id")),
    responses(
        (status = 200, description = "Meeting", body = Meeting),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_meeting(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let meeting = app_state.conference_service.get_meeting(id).await?;
    Ok(Json(meeting))
}

// PATCH /api/meetings/{id}
#[utoipa::path(
    patch,
    path = "/api/meetings/{id}",
    tag = "Meetings",
    request_body = MeetingPatchPayload,
    params(("id" = i64, Path, description = "Meeting id")),
    responses(
        (status = 200, description = "Meeting updated", body = Meeting),
        (status = 404, description = "Not found"),
        (status = 409, description = "Code already in use")
    )
)]
pub async fn update_meeting(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Payload(payload): Payload<MeetingPatchPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let meeting = app_state
        .conference_service
        .update_meeting(id, payload.code.as_deref(), payload.title.as_deref(), payload.date)
        .await?;

    Ok(Json(meeting))
}

// DELETE /api/meetings/{id}
#[utoipa::path(
    delete,
    path = "/api/meetings/{id}",
    tag = "Meetings",
    params(("id" = i64, Path, description = "Meeting id")),
    responses(
        (status = 204, description = "Meeting and everything in it removed"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_meeting(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.conference_service.delete_meeting(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  AREA 2: TABLES
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TablePayload {
    #[validate(length(min = 1, max = 16, message = "label must be 1 to 16 characters"))]
    #[schema(example = "T1")]
    pub label: String,

    pub table_type: TableType,

    /// 6 for a new table; an existing table keeps its count when left out.
    #[validate(range(min = 0, message = "seats cannot be negative"))]
    #[schema(example = 6)]
    pub seats: Option<i32>,

    pub x: Option<i32>,
    pub y: Option<i32>,
}

impl From<TablePayload> for TableInput {
    fn from(p: TablePayload) -> Self {
        TableInput {
            label: p.label,
            table_type: p.table_type,
            seats: p.seats,
            x: p.x,
            y: p.y,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TablePatchPayload {
    #[validate(length(min = 1, max = 16, message = "label must be 1 to 16 characters"))]
    pub label: Option<String>,
    pub table_type: Option<TableType>,
    #[validate(range(min = 0, message = "seats cannot be negative"))]
    pub seats: Option<i32>,
    pub x: Option<i32>,
    pub y: Option<i32>,
}

impl From<TablePatchPayload> for TablePatch {
    fn from(p: TablePatchPayload) -> Self {
        TablePatch {
            label: p.label,
            table_type: p.table_type,
            seats: p.seats,
            x: p.x,
            y: p.y,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkTableItem {
    /// Update this table instead of matching by label.
    pub id: Option<i64>,
    #[serde(flatten)]
    #[validate(nested)]
    pub table: TablePayload,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkTablesPayload {
    #[serde(alias = "tables")]
    #[validate(nested)]
    pub items: Vec<BulkTableItem>,
}

// GET /api/tables
#[utoipa::path(
    get,
    path = "/api/tables",
    tag = "Tables",
    params(MeetingScopeParams),
    responses((status = 200, description = "Tables of the meeting", body = Vec<Table>))
)]
pub async fn list_tables(
    State(app_state): State<AppState>,
    MeetingScope(scope): MeetingScope,
) -> Result<impl IntoResponse, AppError> {
    let service = &app_state.conference_service;
    let meeting = service.resolve_meeting(&scope).await?;
    let tables = service.list_tables(meeting.id).await?;
    Ok(Json(tables))
}

// POST /api/tables
#[utoipa::path(
    post,
    path = "/api/tables",
    tag = "Tables",
    params(MeetingScopeParams),
    request_body = TablePayload,
    responses(
        (status = 201, description = "Table created", body = Table),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Label already used in this meeting")
    )
)]
pub async fn create_table(
    State(app_state): State<AppState>,
    MeetingScope(scope): MeetingScope,
    Payload(payload): Payload<TablePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let service = &app_state.conference_service;
    let meeting = service.resolve_meeting(&scope).await?;
    let table = service.create_table(meeting.id, &payload.into()).await?;

    Ok((StatusCode::CREATED, Json(table)))
}

// POST /api/tables/bulk
#[utoipa::path(
    post,
    path = "/api/tables/bulk",
    tag = "Tables",
    params(MeetingScopeParams),
    request_body = BulkTablesPayload,
    responses(
        (status = 200, description = "Resulting table ids, in input order", body = IdsResponse),
        (status = 400, description = "Invalid item"),
        (status = 404, description = "An item id is not a table of this meeting")
    )
)]
pub async fn bulk_upsert_tables(
    State(app_state): State<AppState>,
    MeetingScope(scope): MeetingScope,
    Payload(payload): Payload<BulkTablesPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let items = payload
        .items
        .into_iter()
        .map(|item| TableUpsert { id: item.id, table: item.table.into() })
        .collect();

    let service = &app_state.conference_service;
    let meeting = service.resolve_meeting(&scope).await?;
    let ids = service.bulk_upsert_tables(meeting.id, items).await?;

    Ok(Json(IdsResponse { ids }))
}

// GET /api/tables/{id}
#[utoipa::path(
    get,
    path = "/api/tables/{id}",
    tag = "Tables",
    params(("id" = i64, Path, description = "Table id"), MeetingScopeParams),
    responses(
        (status = 200, description = "Table", body = Table),
        (status = 404, description = "Not a table of this meeting")
    )
)]
pub async fn get_table(
    State(app_state): State<AppState>,
    MeetingScope(scope): MeetingScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let service = &app_state.conference_service;
    let meeting = service.resolve_meeting(&scope).await?;
    Ok(Json(service.get_table(meeting.id, id).await?))
}

// PATCH /api/tables/{id}
#[utoipa::path(
    patch,
    path = "/api/tables/{id}",
    tag = "Tables",
    params(("id" = i64, Path, description = "Table id"), MeetingScopeParams),
    request_body = TablePatchPayload,
    responses(
        (status = 200, description = "Table updated", body = Table),
        (status = 404, description = "Not a table of this meeting"),
        (status = 409, description = "Label already used in this meeting")
    )
)]
pub async fn update_table(
    State(app_state): State<AppState>,
    MeetingScope(scope): MeetingScope,
    Path(id): Path<i64>,
    Payload(payload): Payload<TablePatchPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let service = &app_state.conference_service;
    let meeting = service.resolve_meeting(&scope).await?;
    let table = service.update_table(meeting.id, id, &payload.into()).await?;

    Ok(Json(table))
}

// DELETE /api/tables/{id}
#[utoipa::path(
    delete,
    path = "/api/tables/{id}",
    tag = "Tables",
    params(("id" = i64, Path, description = "Table id"), MeetingScopeParams),
    responses(
        (status = 204, description = "Table and its assignments removed"),
        (status = 404, description = "Not a table of this meeting")
    )
)]
pub async fn delete_table(
    State(app_state): State<AppState>,
    MeetingScope(scope): MeetingScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let service = &app_state.conference_service;
    let meeting = service.resolve_meeting(&scope).await?;
    service.delete_table(meeting.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  AREA 3: ATTENDEES
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AttendeePayload {
    #[validate(length(min = 1, max = 64, message = "full_name must be 1 to 64 characters"))]
    #[schema(example = "Ada Lovelace")]
    pub full_name: String,

    #[serde(default)]
    #[validate(length(max = 64))]
    pub department: String,

    #[serde(default)]
    #[validate(length(max = 64))]
    pub position: String,

    #[serde(default)]
    pub note: String,
}

impl From<AttendeePayload> for AttendeeInput {
    fn from(p: AttendeePayload) -> Self {
        AttendeeInput {
            full_name: p.full_name,
            department: p.department,
            position: p.position,
            note: p.note,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AttendeePatchPayload {
    #[validate(length(min = 1, max = 64, message = "full_name must be 1 to 64 characters"))]
    pub full_name: Option<String>,
    #[validate(length(max = 64))]
    pub department: Option<String>,
    #[validate(length(max = 64))]
    pub position: Option<String>,
    pub note: Option<String>,
}

impl From<AttendeePatchPayload> for AttendeePatch {
    fn from(p: AttendeePatchPayload) -> Self {
        AttendeePatch {
            full_name: p.full_name,
            department: p.department,
            position: p.position,
            note: p.note,
        }
    }
}

// GET /api/attendees
#[utoipa::path(
    get,
    path = "/api/attendees",
    tag = "Attendees",
    params(MeetingScopeParams),
    responses((status = 200, description = "Attendees of the meeting", body = Vec<Attendee>))
)]
pub async fn list_attendees(
    State(app_state): State<AppState>,
    MeetingScope(scope): MeetingScope,
) -> Result<impl IntoResponse, AppError> {
    let service = &app_state.conference_service;
    let meeting = service.resolve_meeting(&scope).await?;
    Ok(Json(service.list_attendees(meeting.id).await?))
}

// POST /api/attendees
#[utoipa::path(
    post,
    path = "/api/attendees",
    tag = "Attendees",
    params(MeetingScopeParams),
    request_body = AttendeePayload,
    responses(
        (status = 201, description = "Attendee created", body = Attendee),
        (status = 400, description = "Invalid payload")
    )
)]
pub async fn create_attendee(
    State(app_state): State<AppState>,
    MeetingScope(scope): MeetingScope,
    Payload(payload): Payload<AttendeePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let service = &app_state.conference_service;
    let meeting = service.resolve_meeting(&scope).await?;
    let attendee = service.create_attendee(meeting.id, &payload.into()).await?;

    Ok((StatusCode::CREATED, Json(attendee)))
}

// GET /api/attendees/{id}
#[utoipa::path(
    get,
    path = "/api/attendees/{id}",
    tag = "Attendees",
    params(("id" = i64, Path, description = "Attendee id"), MeetingScopeParams),
    responses(
        (status = 200, description = "Attendee", body = Attendee),
        (status = 404, description = "Not an attendee of this meeting")
    )
)]
pub async fn get_attendee(
    State(app_state): State<AppState>,
    MeetingScope(scope): MeetingScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let service = &app_state.conference_service;
    let meeting = service.resolve_meeting(&scope).await?;
    Ok(Json(service.get_attendee(meeting.id, id).await?))
}

// PATCH /api/attendees/{id}
#[utoipa::path(
    patch,
    path = "/api/attendees/{id}",
    tag = "Attendees",
    params(("id" = i64, Path, description = "Attendee id"), MeetingScopeParams),
    request_body = AttendeePatchPayload,
    responses(
        (status = 200, description = "Attendee updated", body = Attendee),
        (status = 404, description = "Not an attendee of this meeting")
    )
)]
pub async fn update_attendee(
    State(app_state): State<AppState>,
    MeetingScope(scope): MeetingScope,
    Path(id): Path<i64>,
    Payload(payload): Payload<AttendeePatchPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let service = &app_state.conference_service;
    let meeting = service.resolve_meeting(&scope).await?;
    let attendee = service.update_attendee(meeting.id, id, &payload.into()).await?;

    Ok(Json(attendee))
}

// DELETE /api/attendees/{id}
#[utoipa::path(
    delete,
    path = "/api/attendees/{id}",
    tag = "Attendees",
    params(("id" = i64, Path, description = "Attendee id"), MeetingScopeParams),
    responses(
        (status = 204, description = "Attendee and their assignments removed"),
        (status = 404, description = "Not an attendee of this meeting")
    )
)]
pub async fn delete_attendee(
    State(app_state): State<AppState>,
    MeetingScope(scope): MeetingScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let service = &app_state.conference_service;
    let meeting = service.resolve_meeting(&scope).await?;
    service.delete_attendee(meeting.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  AREA 4: ASSIGNMENTS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignmentPayload {
    #[serde(alias = "table_id")]
    pub table: i64,

    #[serde(alias = "attendee_id")]
    pub attendee: i64,

    #[validate(range(min = 0, message = "seat_index cannot be negative"))]
    pub seat_index: i32,

    /// Defaults to `assigned`.
    #[validate(length(min = 1, max = 16, message = "status must be 1 to 16 characters"))]
    #[schema(example = "assigned")]
    pub status: Option<String>,
}

impl From<AssignmentPayload> for AssignmentInput {
    fn from(p: AssignmentPayload) -> Self {
        AssignmentInput {
            table_id: p.table,
            attendee_id: p.attendee,
            seat_index: p.seat_index,
            status: p.status.map(AssignmentStatus::from).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignmentPatchPayload {
    #[serde(alias = "table_id")]
    pub table: Option<i64>,
    #[serde(alias = "attendee_id")]
    pub attendee: Option<i64>,
    #[validate(range(min = 0, message = "seat_index cannot be negative"))]
    pub seat_index: Option<i32>,
    #[validate(length(min = 1, max = 16, message = "status must be 1 to 16 characters"))]
    pub status: Option<String>,
}

impl From<AssignmentPatchPayload> for AssignmentPatch {
    fn from(p: AssignmentPatchPayload) -> Self {
        AssignmentPatch {
            table_id: p.table,
            attendee_id: p.attendee,
            seat_index: p.seat_index,
            status: p.status.map(AssignmentStatus::from),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkAssignmentsPayload {
    #[serde(alias = "assignments")]
    #[validate(nested)]
    pub items: Vec<AssignmentPayload>,
}

// GET /api/assignments
#[utoipa::path(
    get,
    path = "/api/assignments",
    tag = "Assignments",
    params(MeetingScopeParams),
    responses((status = 200, description = "Assignments of the meeting", body = Vec<Assignment>))
)]
pub async fn list_assignments(
    State(app_state): State<AppState>,
    MeetingScope(scope): MeetingScope,
) -> Result<impl IntoResponse, AppError> {
    let service = &app_state.conference_service;
    let meeting = service.resolve_meeting(&scope).await?;
    Ok(Json(service.list_assignments(meeting.id).await?))
}

// POST /api/assignments
#[utoipa::path(
    post,
    path = "/api/assignments",
    tag = "Assignments",
    params(MeetingScopeParams),
    request_body = AssignmentPayload,
    responses(
        (status = 201, description = "Attendee seated", body = Assignment),
        (status = 400, description = "Invalid payload or seat outside the table"),
        (status = 404, description = "Table or attendee not in this meeting"),
        (status = 409, description = "Seat already taken")
    )
)]
pub async fn create_assignment(
    State(app_state): State<AppState>,
    MeetingScope(scope): MeetingScope,
    Payload(payload): Payload<AssignmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let service = &app_state.conference_service;
    let meeting = service.resolve_meeting(&scope).await?;
    let assignment = service.create_assignment(meeting.id, &payload.into()).await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

// POST /api/assignments/bulk
#[utoipa::path(
    post,
    path = "/api/assignments/bulk",
    tag = "Assignments",
    params(MeetingScopeParams),
    request_body = BulkAssignmentsPayload,
    responses(
        (status = 201, description = "Ids of the new assignments, in input order", body = IdsResponse),
        (status = 400, description = "Invalid item"),
        (status = 404, description = "Table or attendee not in this meeting"),
        (status = 409, description = "A seat is already taken; nothing was written")
    )
)]
pub async fn bulk_create_assignments(
    State(app_state): State<AppState>,
    MeetingScope(scope): MeetingScope,
    Payload(payload): Payload<BulkAssignmentsPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let items: Vec<AssignmentInput> = payload.items.into_iter().map(Into::into).collect();

    let service = &app_state.conference_service;
    let meeting = service.resolve_meeting(&scope).await?;
    let ids = service.bulk_create_assignments(meeting.id, &items).await?;

    Ok((StatusCode::CREATED, Json(IdsResponse { ids })))
}

// DELETE /api/assignments/clear
#[utoipa::path(
    delete,
    path = "/api/assignments/clear",
    tag = "Assignments",
    params(MeetingScopeParams),
    responses((status = 200, description = "Every assignment of the meeting removed", body = OkResponse))
)]
pub async fn clear_assignments(
    State(app_state): State<AppState>,
    MeetingScope(scope): MeetingScope,
) -> Result<impl IntoResponse, AppError> {
    let service = &app_state.conference_service;
    let meeting = service.resolve_meeting(&scope).await?;
    service.clear_assignments(meeting.id).await?;
    Ok(Json(OkResponse::ok()))
}

// GET /api/assignments/{id}
#[utoipa::path(
    get,
    path = "/api/assignments/{id}",
    tag = "Assignments",
    params(("id" = i64, Path, description = "Assignment id"), MeetingScopeParams),
    responses(
        (status = 200, description = "Assignment", body = Assignment),
        (status = 404, description = "Not an assignment of this meeting")
    )
)]
pub async fn get_assignment(
    State(app_state): State<AppState>,
    MeetingScope(scope): MeetingScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let service = &app_state.conference_service;
    let meeting = service.resolve_meeting(&scope).await?;
    Ok(Json(service.get_assignment(meeting.id, id).await?))
}

// PATCH /api/assignments/{id}
#[utoipa::path(
    patch,
    path = "/api/assignments/{id}",
    tag = "Assignments",
    params(("id" = i64, Path, description = "Assignment id"), MeetingScopeParams),
    request_body = AssignmentPatchPayload,
    responses(
        (status = 200, description = "Assignment updated", body = Assignment),
        (status = 404, description = "Assignment, table or attendee not in this meeting"),
        (status = 409, description = "Seat already taken")
    )
)]
pub async fn update_assignment(
    State(app_state): State<AppState>,
    MeetingScope(scope): MeetingScope,
    Path(id): Path<i64>,
    Payload(payload): Payload<AssignmentPatchPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let service = &app_state.conference_service;
    let meeting = service.resolve_meeting(&scope).await?;
    let assignment = service.update_assignment(meeting.id, id, &payload.into()).await?;

    Ok(Json(assignment))
}

// DELETE /api/assignments/{id}
#[utoipa::path(
    delete,
    path = "/api/assignments/{id}",
    tag = "Assignments",
    params(("id" = i64, Path, description = "Assignment id"), MeetingScopeParams),
    responses(
        (status = 204, description = "Seat freed"),
        (status = 404, description = "Not an assignment of this meeting")
    )
)]
pub async fn delete_assignment(
    State(app_state): State<AppState>,
    MeetingScope(scope): MeetingScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let service = &app_state.conference_service;
    let meeting = service.resolve_meeting(&scope).await?;
    service.delete_assignment(meeting.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  AREA 5: BOOTSTRAP
// =============================================================================

// GET /api/bootstrap
#[utoipa::path(
    get,
    path = "/api/bootstrap",
    tag = "Bootstrap",
    params(MeetingScopeParams),
    responses((status = 200, description = "Meeting with its attendees, tables and assignments", body = ConferenceSnapshot))
)]
pub async fn bootstrap(
    State(app_state): State<AppState>,
    MeetingScope(scope): MeetingScope,
) -> Result<impl IntoResponse, AppError> {
    let service = &app_state.conference_service;
    let meeting = service.resolve_meeting(&scope).await?;
    Ok(Json(service.bootstrap(meeting).await?))
}
