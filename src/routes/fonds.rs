//! Fond routes.

#[cfg(test)]
#[path = "fonds_test.rs"]
mod tests;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;

use crate::routes::{ApiError, api_error};
use crate::services::fond::{self, Fond, FondError, NewFond};
use crate::state::AppState;

/// `GET /api/fonds` — list fonds.
pub async fn list_fonds(State(state): State<AppState>) -> Result<Json<Vec<Fond>>, ApiError> {
    fond::list_fonds(&state).await.map(Json).map_err(fond_error)
}

/// `GET /api/institutions/:id/fond` — load the fond of an institution.
pub async fn get_fond(State(state): State<AppState>, Path(institution_id): Path<i64>) -> Result<Json<Fond>, ApiError> {
    fond::get_fond(&state, institution_id).await.map(Json).map_err(fond_error)
}

/// `POST /api/institutions/:id/fond` — create the fond of an institution.
pub async fn create_fond(
    State(state): State<AppState>,
    Path(institution_id): Path<i64>,
    Json(body): Json<NewFond>,
) -> Result<(StatusCode, Json<Fond>), ApiError> {
    let created = fond::add_fond(&state, institution_id, &body).await.map_err(fond_error)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(crate) fn fond_error_to_status(err: &FondError) -> StatusCode {
    match err {
        FondError::NotFound(_) | FondError::InstitutionNotFound(_) => StatusCode::NOT_FOUND,
        FondError::AlreadyExists(_) | FondError::InstitutionHasFond(_) => StatusCode::CONFLICT,
        FondError::InvalidValue(_) => StatusCode::UNPROCESSABLE_ENTITY,
        FondError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn fond_error(err: FondError) -> ApiError {
    api_error(fond_error_to_status(&err), err)
}
