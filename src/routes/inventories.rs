//! Inventory list routes.
//!
//! Rejected VVAIS reports answer `422` with a field → message map instead of
//! a single error string, so every failing field can be shown at once.

#[cfg(test)]
#[path = "inventories_test.rs"]
mod tests;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::routes::{ApiError, api_error};
use crate::services::inventory::{self, Inventory, InventoryError};
use crate::state::AppState;

#[derive(Serialize)]
pub struct InventoryResponse {
    #[serde(flatten)]
    pub inventory: Inventory,
    pub media: &'static str,
}

fn to_response(inventory: Inventory) -> InventoryResponse {
    let media = inventory.media().as_str();
    InventoryResponse { inventory, media }
}

/// `GET /api/institutions/:id/fond/inventories` — list inventory lists of a fond.
pub async fn list_inventories(
    State(state): State<AppState>,
    Path(fond_id): Path<i64>,
) -> Result<Json<Vec<InventoryResponse>>, ApiError> {
    let rows = inventory::list_inventories(&state, fond_id)
        .await
        .map_err(inventory_error)?;
    Ok(Json(rows.into_iter().map(to_response).collect()))
}

/// `POST /api/institutions/:id/fond/inventories` — import a VVAIS report.
pub async fn create_inventory(
    State(state): State<AppState>,
    Path(fond_id): Path<i64>,
    Json(report): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<InventoryResponse>), ApiError> {
    let created = inventory::add_inventory_from_vvais(&state, fond_id, &report)
        .await
        .map_err(inventory_error)?;
    Ok((StatusCode::CREATED, Json(to_response(created))))
}

pub(crate) fn inventory_error_to_status(err: &InventoryError) -> StatusCode {
    match err {
        InventoryError::FondNotFound(_) => StatusCode::NOT_FOUND,
        InventoryError::AlreadyExists(_) => StatusCode::CONFLICT,
        InventoryError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        InventoryError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn inventory_error(err: InventoryError) -> ApiError {
    let status = inventory_error_to_status(&err);
    match err.error_map() {
        Some(errors) => (status, Json(json!({ "errors": errors }))),
        None => api_error(status, err),
    }
}
