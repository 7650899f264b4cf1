//! Project routes.

#[cfg(test)]
#[path = "projects_test.rs"]
mod tests;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::routes::{ApiError, api_error};
use crate::services::project::{self, Project, ProjectError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateProjectBody {
    pub name: String,
}

/// `GET /api/projects` — list projects.
pub async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<Project>>, ApiError> {
    project::list_projects(&state).await.map(Json).map_err(project_error)
}

/// `POST /api/projects` — create a project.
pub async fn create_project(
    State(state): State<AppState>,
    Json(body): Json<CreateProjectBody>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let project = project::add_project(&state, &body.name).await.map_err(project_error)?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// `GET /api/projects/:id` — load a project.
pub async fn get_project(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Project>, ApiError> {
    project::get_project(&state, id).await.map(Json).map_err(project_error)
}

/// `POST /api/projects/:id/validate` — mark a project as validated.
pub async fn validate_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Project>, ApiError> {
    project::change_validation_status(&state, id)
        .await
        .map(Json)
        .map_err(project_error)
}

pub(crate) fn project_error_to_status(err: &ProjectError) -> StatusCode {
    match err {
        ProjectError::NotFound(_) => StatusCode::NOT_FOUND,
        ProjectError::AlreadyExists(_) => StatusCode::CONFLICT,
        ProjectError::InvalidName => StatusCode::UNPROCESSABLE_ENTITY,
        ProjectError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn project_error(err: ProjectError) -> ApiError {
    api_error(project_error_to_status(&err), err)
}
