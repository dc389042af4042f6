// src/models/responses.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result of a bulk call: resulting ids, in input order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IdsResponse {
    pub ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}
