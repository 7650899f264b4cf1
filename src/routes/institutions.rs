//! Institution routes.

#[cfg(test)]
#[path = "institutions_test.rs"]
mod tests;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::routes::{ApiError, api_error};
use crate::services::institution::{self, Institution, InstitutionDetails, InstitutionError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateInstitutionBody {
    pub reg_nr: i64,
    pub name: String,
    pub project_id: i64,
}

#[derive(Deserialize, Default)]
pub struct InstitutionListQuery {
    pub project_id: Option<i64>,
}

/// `GET /api/institutions?project_id=` — list institutions.
pub async fn list_institutions(
    State(state): State<AppState>,
    Query(query): Query<InstitutionListQuery>,
) -> Result<Json<Vec<Institution>>, ApiError> {
    institution::list_institutions(&state, query.project_id)
        .await
        .map(Json)
        .map_err(institution_error)
}

/// `POST /api/institutions` — create an institution.
pub async fn create_institution(
    State(state): State<AppState>,
    Json(body): Json<CreateInstitutionBody>,
) -> Result<(StatusCode, Json<Institution>), ApiError> {
    let created = institution::add_institution(&state, body.reg_nr, &body.name, body.project_id)
        .await
        .map_err(institution_error)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/institutions/:id` — load an institution.
pub async fn get_institution(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Institution>, ApiError> {
    institution::get_institution(&state, id)
        .await
        .map(Json)
        .map_err(institution_error)
}

/// `PATCH /api/institutions/:id` — update creator and signer details.
pub async fn update_institution(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(details): Json<InstitutionDetails>,
) -> Result<Json<Institution>, ApiError> {
    institution::update_details(&state, id, &details)
        .await
        .map(Json)
        .map_err(institution_error)
}

pub(crate) fn institution_error_to_status(err: &InstitutionError) -> StatusCode {
    match err {
        InstitutionError::NotFound(_) | InstitutionError::ProjectNotFound(_) => StatusCode::NOT_FOUND,
        InstitutionError::AlreadyExists => StatusCode::CONFLICT,
        InstitutionError::InvalidValue(_) => StatusCode::UNPROCESSABLE_ENTITY,
        InstitutionError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn institution_error(err: InstitutionError) -> ApiError {
    api_error(institution_error_to_status(&err), err)
}
