// src/models/conference.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// ---
// 1. Meeting (the event)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Meeting {
    pub id: i64,
    #[schema(example = "C-20250908-6927")]
    pub code: String,
    pub title: String,
    pub date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

// ---
// 2. Table (the slot)
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "table_type")]
pub enum TableType {
    #[sqlx(rename = "C")]
    #[serde(rename = "C")]
    Circle,
    #[sqlx(rename = "S")]
    #[serde(rename = "S")]
    Square,
    #[sqlx(rename = "R")]
    #[serde(rename = "R")]
    Row,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Table {
    pub id: i64,
    #[serde(rename = "meeting")]
    pub meeting_id: i64,
    #[schema(example = "T1")]
    pub label: String,
    pub table_type: TableType,
    pub seats: i32,
    pub x: i32,
    pub y: i32,
}

// ---
// 3. Attendee (the occupant)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Attendee {
    pub id: i64,
    #[serde(rename = "meeting")]
    pub meeting_id: i64,
    pub full_name: String,
    pub department: String,
    pub position: String,
    pub note: String,
}

// ---
// 4. Assignment (attendee -> seat)
// ---

/// Free-form status tag. Known values get their own variant, anything else
/// is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssignmentStatus {
    #[default]
    Assigned,
    Reserved,
    CheckedIn,
    Other(String),
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AssignmentStatus::Assigned => "assigned",
            AssignmentStatus::Reserved => "reserved",
            AssignmentStatus::CheckedIn => "checked_in",
            AssignmentStatus::Other(s) => s,
        }
    }
}

impl From<String> for AssignmentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "assigned" => AssignmentStatus::Assigned,
            "reserved" => AssignmentStatus::Reserved,
            "checked_in" => AssignmentStatus::CheckedIn,
            _ => AssignmentStatus::Other(value),
        }
    }
}

impl From<AssignmentStatus> for String {
    fn from(value: AssignmentStatus) -> Self {
        match value {
            AssignmentStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Assignment {
    pub id: i64,
    #[serde(rename = "meeting")]
    pub meeting_id: i64,
    #[serde(rename = "table")]
    pub table_id: i64,
    #[serde(rename = "attendee")]
    pub attendee_id: i64,
    pub seat_index: i32,
    #[sqlx(try_from = "String")]
    #[schema(value_type = String, example = "assigned")]
    pub status: AssignmentStatus,
    pub updated_at: DateTime<Utc>,
}

// ---
// 5. Write models (already validated, handed to the repository)
// ---
#[derive(Debug, Clone, PartialEq)]
pub struct TableInput {
    pub label: String,
    pub table_type: TableType,
    // None keeps the stored value (or the column default on insert).
    pub seats: Option<i32>,
    pub x: Option<i32>,
    pub y: Option<i32>,
}

/// One entry of a bulk table upsert: by id when given, else by label.
#[derive(Debug, Clone, PartialEq)]
pub struct TableUpsert {
    pub id: Option<i64>,
    pub table: TableInput,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TablePatch {
    pub label: Option<String>,
    pub table_type: Option<TableType>,
    pub seats: Option<i32>,
    pub x: Option<i32>,
    pub y: Option<i32>,
}

impl From<TableInput> for TablePatch {
    fn from(input: TableInput) -> Self {
        Self {
            label: Some(input.label),
            table_type: Some(input.table_type),
            seats: input.seats,
            x: input.x,
            y: input.y,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendeeInput {
    pub full_name: String,
    pub department: String,
    pub position: String,
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendeePatch {
    pub full_name: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentInput {
    pub table_id: i64,
    pub attendee_id: i64,
    pub seat_index: i32,
    pub status: AssignmentStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentPatch {
    pub table_id: Option<i64>,
    pub attendee_id: Option<i64>,
    pub seat_index: Option<i32>,
    pub status: Option<AssignmentStatus>,
}

// ---
// 6. Bootstrap snapshot
// ---
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConferenceSnapshot {
    pub meeting: Meeting,
    pub attendees: Vec<Attendee>,
    pub tables: Vec<Table>,
    pub assignments: Vec<Assignment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_keeps_unknown_values_verbatim() {
        let status: AssignmentStatus = serde_json::from_str("\"vip-hold\"").unwrap();
        assert_eq!(status, AssignmentStatus::Other("vip-hold".into()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"vip-hold\"");
    }

    #[test]
    fn status_recognises_known_values() {
        let status: AssignmentStatus = serde_json::from_str("\"checked_in\"").unwrap();
        assert_eq!(status, AssignmentStatus::CheckedIn);
        assert_eq!(AssignmentStatus::default().as_str(), "assigned");
    }

    #[test]
    fn table_type_uses_single_letter_codes() {
        assert_eq!(serde_json::to_string(&TableType::Circle).unwrap(), "\"C\"");
        let row: TableType = serde_json::from_str("\"R\"").unwrap();
        assert_eq!(row, TableType::Row);
    }

    #[test]
    fn foreign_keys_are_exposed_without_id_suffix() {
        let table = Table {
            id: 1,
            meeting_id: 9,
            label: "T1".into(),
            table_type: TableType::Square,
            seats: 6,
            x: 20,
            y: 20,
        };
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["meeting"], 9);
        assert!(json.get("meeting_id").is_none());
    }
}
