// src/models/tradeshow.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A single tradeshow; booths and exhibitors are grouped under it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TradeShow {
    pub id: i64,
    /// External code, e.g. "T-20250906-1234".
    pub meeting_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A booth on the floor plan, rendered by (x, y, w, h).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booth {
    pub id: i64,
    #[serde(rename = "tradeshow")]
    pub tradeshow_id: i64,
    #[schema(example = "B1")]
    pub label: String,
    pub x: i32,
    pub y: i32,
    #[serde(rename = "w")]
    pub width: i32,
    #[serde(rename = "h")]
    pub height: i32,
    pub is_active: bool,
}

/// An exhibitor card. Sits in a booth through `booth_id`, or floats at (x, y).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Exhibitor {
    pub id: i64,
    #[serde(rename = "tradeshow")]
    pub tradeshow_id: i64,
    pub name: String,
    pub company: String,
    #[schema(example = json!(["AI", "Robotics"]))]
    pub tags: Vec<String>,
    #[serde(rename = "boothId")]
    pub booth_id: Option<i64>,
    pub x: Option<i32>,
    pub y: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoothInput {
    pub label: String,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoothUpsert {
    pub id: Option<i64>,
    pub booth: BoothInput,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoothPatch {
    pub label: Option<String>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub is_active: Option<bool>,
}

impl From<BoothInput> for BoothPatch {
    fn from(input: BoothInput) -> Self {
        Self {
            label: Some(input.label),
            x: input.x,
            y: input.y,
            width: input.width,
            height: input.height,
            is_active: input.is_active,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExhibitorInput {
    pub name: String,
    pub company: String,
    pub tags: Vec<String>,
    pub booth_id: Option<i64>,
    pub x: Option<i32>,
    pub y: Option<i32>,
}

/// Outer `None` leaves a field alone; `Some(None)` clears a nullable one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExhibitorPatch {
    pub name: Option<String>,
    pub company: Option<String>,
    pub tags: Option<Vec<String>>,
    pub booth_id: Option<Option<i64>>,
    pub x: Option<Option<i32>>,
    pub y: Option<Option<i32>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TradeShowSnapshot {
    pub show: TradeShow,
    pub booths: Vec<Booth>,
    pub exhibitors: Vec<Exhibitor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booth_geometry_is_exposed_as_w_and_h() {
        let booth = Booth {
            id: 3,
            tradeshow_id: 1,
            label: "B1".into(),
            x: 20,
            y: 20,
            width: 140,
            height: 90,
            is_active: true,
        };
        let json = serde_json::to_value(&booth).unwrap();

        assert_eq!(json["w"], 140);
        assert_eq!(json["h"], 90);
        assert!(json.get("width").is_none());
        assert_eq!(json["tradeshow"], 1);
    }

    #[test]
    fn exhibitor_booth_reference_is_booth_id_camel_case() {
        let exhibitor = Exhibitor {
            id: 5,
            tradeshow_id: 1,
            name: "Ada".into(),
            company: "Analytical Engines".into(),
            tags: vec!["AI".into()],
            booth_id: None,
            x: Some(300),
            y: Some(120),
        };
        let json = serde_json::to_value(&exhibitor).unwrap();

        assert!(json["boothId"].is_null());
        assert_eq!(json["x"], 300);
    }
}
